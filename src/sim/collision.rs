//! Collision detection and response for the ball
//!
//! Circle-vs-box contacts are classified by face so the response can push
//! the ball out along one axis and flip only that velocity component.
//! Corner contacts reflect along the corner normal instead.

use glam::Vec2;

use super::geometry::{Aabb, reflect};

/// Which part of a box the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    Top,
    Bottom,
    Left,
    Right,
    Corner,
}

/// Result of a ball/box contact check
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub side: ContactSide,
    /// Closest point on the box to the ball center
    pub point: Vec2,
    /// Surface normal pointing toward the ball
    pub normal: Vec2,
    /// Penetration depth along the normal (for position correction)
    pub penetration: f32,
}

impl ContactSide {
    fn normal(self) -> Vec2 {
        match self {
            ContactSide::Top => Vec2::NEG_Y,
            ContactSide::Bottom => Vec2::Y,
            ContactSide::Left => Vec2::NEG_X,
            ContactSide::Right => Vec2::X,
            ContactSide::Corner => Vec2::ZERO,
        }
    }
}

/// Check a moving ball against a box
///
/// Returns `None` unless the ball overlaps the box. The velocity decides
/// which face was struck when the ball sits in a corner region or has
/// already tunnelled past the surface.
pub fn ball_box_collision(pos: Vec2, radius: f32, vel: Vec2, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(pos);
    let delta = pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    if dist_sq <= f32::EPSILON {
        return Some(inside_contact(pos, radius, vel, aabb));
    }

    let dist = dist_sq.sqrt();
    let outside_x = delta.x != 0.0;
    let outside_y = delta.y != 0.0;

    let side = match (outside_x, outside_y) {
        (false, _) => {
            if delta.y < 0.0 {
                ContactSide::Top
            } else {
                ContactSide::Bottom
            }
        }
        (true, false) => {
            if delta.x < 0.0 {
                ContactSide::Left
            } else {
                ContactSide::Right
            }
        }
        (true, true) => {
            // Corner region: only a ball heading into both faces hits the corner
            let approaching_x = vel.x * delta.x < 0.0;
            let approaching_y = vel.y * delta.y < 0.0;
            match (approaching_x, approaching_y) {
                (true, false) if delta.x < 0.0 => ContactSide::Left,
                (true, false) => ContactSide::Right,
                (false, true) if delta.y < 0.0 => ContactSide::Top,
                (false, true) => ContactSide::Bottom,
                (true, true) => ContactSide::Corner,
                // Grazing past the corner while leaving both faces
                (false, false) => return None,
            }
        }
    };

    let normal = match side {
        ContactSide::Corner => delta / dist,
        other => other.normal(),
    };

    Some(Contact {
        side,
        point: closest,
        normal,
        penetration: radius - dist,
    })
}

/// Ball center is inside the box: pick the entry face from the velocity
fn inside_contact(pos: Vec2, radius: f32, vel: Vec2, aabb: &Aabb) -> Contact {
    let to_left = pos.x - aabb.min.x;
    let to_right = aabb.max.x - pos.x;
    let to_top = pos.y - aabb.min.y;
    let to_bottom = aabb.max.y - pos.y;

    let (x_side, x_depth) = if vel.x > 0.0 || (vel.x == 0.0 && to_left <= to_right) {
        (ContactSide::Left, to_left)
    } else {
        (ContactSide::Right, to_right)
    };
    let (y_side, y_depth) = if vel.y > 0.0 || (vel.y == 0.0 && to_top <= to_bottom) {
        (ContactSide::Top, to_top)
    } else {
        (ContactSide::Bottom, to_bottom)
    };

    let (side, depth) = if x_depth < y_depth {
        (x_side, x_depth)
    } else {
        (y_side, y_depth)
    };

    Contact {
        side,
        point: pos,
        normal: side.normal(),
        penetration: depth + radius,
    }
}

/// Push the ball out of the box and reflect its velocity
///
/// Returns the corrected `(position, velocity)`.
pub fn resolve_box_contact(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    aabb: &Aabb,
    contact: &Contact,
) -> (Vec2, Vec2) {
    let mut pos = pos;
    let mut vel = vel;
    match contact.side {
        ContactSide::Top => {
            pos.y = aabb.min.y - radius;
            vel.y = -vel.y.abs();
        }
        ContactSide::Bottom => {
            pos.y = aabb.max.y + radius;
            vel.y = vel.y.abs();
        }
        ContactSide::Left => {
            pos.x = aabb.min.x - radius;
            vel.x = -vel.x.abs();
        }
        ContactSide::Right => {
            pos.x = aabb.max.x + radius;
            vel.x = vel.x.abs();
        }
        ContactSide::Corner => {
            pos = contact.point + contact.normal * radius;
            if vel.dot(contact.normal) < 0.0 {
                vel = reflect(vel, contact.normal);
            }
        }
    }
    (pos, vel)
}

/// Bounce velocity off the paddle
///
/// Center hits go straight up; hits toward the edges approach
/// `max_angle_deg` from vertical.
pub fn paddle_bounce(
    ball_x: f32,
    paddle_center_x: f32,
    paddle_width: f32,
    speed: f32,
    max_angle_deg: f32,
    min_vertical: f32,
) -> Vec2 {
    let half = (paddle_width * 0.5).max(f32::EPSILON);
    let offset = ((ball_x - paddle_center_x) / half).clamp(-1.0, 1.0);
    let angle = (offset * max_angle_deg).to_radians();
    let vel = Vec2::new(speed * angle.sin(), -speed * angle.cos());
    enforce_min_vertical(vel, min_vertical)
}

/// Keep |vel.y| at or above `min_vertical` without changing the speed
pub fn enforce_min_vertical(vel: Vec2, min_vertical: f32) -> Vec2 {
    if vel.y.abs() >= min_vertical {
        return vel;
    }
    let speed = vel.length();
    let y_sign = if vel.y > 0.0 { 1.0 } else { -1.0 };
    let x_sign = if vel.x < 0.0 { -1.0 } else { 1.0 };
    let y = min_vertical.min(speed);
    let x = (speed * speed - y * y).max(0.0).sqrt();
    Vec2::new(x * x_sign, y * y_sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> Aabb {
        Aabb::from_rect(100.0, 100.0, 40.0, 16.0)
    }

    #[test]
    fn test_top_face_contact() {
        let b = brick();
        // Ball above the brick, moving down
        let c = ball_box_collision(Vec2::new(120.0, 96.0), 6.0, Vec2::new(0.0, 3.0), &b)
            .expect("should hit");
        assert_eq!(c.side, ContactSide::Top);
        assert!((c.penetration - 2.0).abs() < 1e-4);

        let (pos, vel) = resolve_box_contact(Vec2::new(120.0, 96.0), Vec2::new(1.0, 3.0), 6.0, &b, &c);
        assert_eq!(pos.y, 94.0);
        assert_eq!(vel, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn test_side_contacts() {
        let b = brick();
        let left = ball_box_collision(Vec2::new(96.0, 108.0), 6.0, Vec2::new(3.0, 0.5), &b)
            .expect("should hit");
        assert_eq!(left.side, ContactSide::Left);

        let right = ball_box_collision(Vec2::new(144.0, 108.0), 6.0, Vec2::new(-3.0, 0.5), &b)
            .expect("should hit");
        assert_eq!(right.side, ContactSide::Right);

        let (_, vel) = resolve_box_contact(Vec2::new(144.0, 108.0), Vec2::new(-3.0, 0.5), 6.0, &b, &right);
        assert_eq!(vel, Vec2::new(3.0, 0.5));
    }

    #[test]
    fn test_corner_classified_by_velocity() {
        let b = brick();
        let pos = Vec2::new(97.0, 97.0);

        // Heading into both faces: a true corner hit
        let c = ball_box_collision(pos, 6.0, Vec2::new(2.0, 2.0), &b).expect("should hit");
        assert_eq!(c.side, ContactSide::Corner);
        let (_, vel) = resolve_box_contact(pos, Vec2::new(2.0, 2.0), 6.0, &b, &c);
        assert!(vel.x < 0.0 && vel.y < 0.0);

        // Moving only downward: treated as a top-face hit
        let c = ball_box_collision(pos, 6.0, Vec2::new(-1.0, 2.0), &b).expect("should hit");
        assert_eq!(c.side, ContactSide::Top);
    }

    #[test]
    fn test_corner_graze_moving_away_is_no_contact() {
        let b = brick();
        // Overlapping the bottom-right corner while heading down and right
        let pos = Vec2::new(142.0, 118.0);
        assert!(ball_box_collision(pos, 6.0, Vec2::new(3.0, 4.0), &b).is_none());
        assert!(ball_box_collision(pos, 6.0, Vec2::new(0.0, 4.0), &b).is_none());
        // Same spot heading back in still collides
        assert!(ball_box_collision(pos, 6.0, Vec2::new(-3.0, -4.0), &b).is_some());
    }

    #[test]
    fn test_tunnelled_ball_uses_velocity() {
        let b = brick();
        // Center inside the box near the bottom face, moving up: entered from below
        let c = ball_box_collision(Vec2::new(120.0, 114.0), 6.0, Vec2::new(0.0, -4.0), &b)
            .expect("should hit");
        assert_eq!(c.side, ContactSide::Bottom);
    }

    #[test]
    fn test_miss() {
        let b = brick();
        assert!(ball_box_collision(Vec2::new(120.0, 80.0), 6.0, Vec2::new(0.0, 3.0), &b).is_none());
        // Exactly touching is not an overlap
        assert!(ball_box_collision(Vec2::new(120.0, 94.0), 6.0, Vec2::new(0.0, 3.0), &b).is_none());
    }

    #[test]
    fn test_paddle_bounce_angles() {
        let center = paddle_bounce(50.0, 50.0, 80.0, 5.0, 60.0, 1.0);
        assert!(center.x.abs() < 1e-5);
        assert!((center.y + 5.0).abs() < 1e-5);

        let edge = paddle_bounce(90.0, 50.0, 80.0, 5.0, 60.0, 1.0);
        let from_vertical = edge.x.atan2(-edge.y).to_degrees();
        assert!((from_vertical - 60.0).abs() < 1e-3);
        assert!((edge.length() - 5.0).abs() < 1e-4);

        // Beyond the edge is clamped
        let past = paddle_bounce(200.0, 50.0, 80.0, 5.0, 60.0, 1.0);
        assert!((past - edge).length() < 1e-5);
    }

    #[test]
    fn test_min_vertical_enforced() {
        let v = enforce_min_vertical(Vec2::new(5.0, -0.1), 2.0);
        assert!((v.y + 2.0).abs() < 1e-5);
        assert!((v.length() - Vec2::new(5.0, -0.1).length()).abs() < 1e-4);
        assert!(v.x > 0.0);
    }
}
