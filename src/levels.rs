//! Brick Breaker level data
//!
//! Levels are static grids of optional brick definitions. The built-in set
//! is written as ASCII rows:
//!
//! | char | brick |
//! |------|-------|
//! | `.`  | empty |
//! | `n`  | normal (1 hit) |
//! | `s`  | strong (2 hits) |
//! | `m`  | metal (3 hits) |
//! | `x`  | indestructible |

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickKind {
    #[default]
    Normal,
    Strong,
    Metal,
    /// Cannot be destroyed, doesn't count for level clear
    Indestructible,
}

impl BrickKind {
    /// Hits to destroy (`None` = never)
    pub fn max_health(self) -> Option<u8> {
        match self {
            BrickKind::Normal => Some(1),
            BrickKind::Strong => Some(2),
            BrickKind::Metal => Some(3),
            BrickKind::Indestructible => None,
        }
    }

    pub fn default_points(self) -> u32 {
        match self {
            BrickKind::Normal => 10,
            BrickKind::Strong => 20,
            BrickKind::Metal => 30,
            BrickKind::Indestructible => 0,
        }
    }

    pub fn is_destructible(self) -> bool {
        self != BrickKind::Indestructible
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(BrickKind::Normal),
            's' => Some(BrickKind::Strong),
            'm' => Some(BrickKind::Metal),
            'x' => Some(BrickKind::Indestructible),
            _ => None,
        }
    }
}

/// One cell of a level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickDef {
    pub kind: BrickKind,
    /// Overrides the kind's default points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl BrickDef {
    pub fn new(kind: BrickKind) -> Self {
        Self { kind, points: None }
    }

    pub fn points(&self) -> u32 {
        self.points.unwrap_or_else(|| self.kind.default_points())
    }
}

/// A level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub name: String,
    /// Row-major grid; `None` is an empty cell
    pub rows: Vec<Vec<Option<BrickDef>>>,
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f32,
}

fn default_speed_multiplier() -> f32 {
    1.0
}

impl Level {
    /// Build a level from ASCII rows (see module docs)
    pub fn from_ascii(id: u32, name: &str, rows: &[&str], speed_multiplier: f32) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| BrickKind::from_char(c).map(BrickDef::new))
                    .collect()
            })
            .collect();
        Self {
            id,
            name: name.to_string(),
            rows,
            speed_multiplier,
        }
    }

    /// Widest row
    pub fn columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn destructible_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .flatten()
            .filter(|def| def.kind.is_destructible())
            .count()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destructible_count() == 0 {
            return Err(ConfigError::EmptyLevel {
                id: self.id,
                name: self.name.clone(),
            });
        }
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "level.speedMultiplier",
                value: self.speed_multiplier as f64,
            });
        }
        Ok(())
    }
}

/// Validate a whole level set
pub fn validate_levels(levels: &[Level]) -> Result<(), ConfigError> {
    if levels.is_empty() {
        return Err(ConfigError::NoLevels);
    }
    levels.iter().try_for_each(Level::validate)
}

/// Parse a host-supplied level set
pub fn levels_from_json(json: &str) -> Result<Vec<Level>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Level set from an optional page attribute, falling back to the built-ins
///
/// A malformed attribute is logged and ignored.
pub fn levels_or_builtin(json: Option<&str>) -> Vec<Level> {
    match json.map(levels_from_json) {
        Some(Ok(levels)) => levels,
        Some(Err(e)) => {
            log::warn!("ignoring malformed level set: {}", e);
            builtin_levels()
        }
        None => builtin_levels(),
    }
}

/// The built-in level set
pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level::from_ascii(
            1,
            "Warm Up",
            &[
                "nnnnnnnnnn",
                "nnnnnnnnnn",
                "nnnnnnnnnn",
                "nnnnnnnnnn",
            ],
            1.0,
        ),
        Level::from_ascii(
            2,
            "Checkerboard",
            &[
                "ssssssssss",
                "n.n.n.n.n.",
                ".n.n.n.n.n",
                "n.n.n.n.n.",
                "snsnsnsnsn",
            ],
            1.1,
        ),
        Level::from_ascii(
            3,
            "Fortress",
            &[
                "mmmmmmmmmm",
                "sx......xs",
                "sx.nnnn.xs",
                "sx.nnnn.xs",
                "s........s",
                "ssssssssss",
            ],
            1.2,
        ),
        Level::from_ascii(
            4,
            "Pyramid",
            &[
                "....mm....",
                "...smms...",
                "..snnnns..",
                ".snnnnnns.",
                "snnnnnnnns",
                "xx......xx",
            ],
            1.3,
        ),
        Level::from_ascii(
            5,
            "Gauntlet",
            &[
                "mmmmmmmmmm",
                "x.x.x.x.x.",
                "ssssssssss",
                ".x.x.x.x.x",
                "nnnnnnnnnn",
                "nnnnnnnnnn",
            ],
            1.4,
        ),
    ]
}
