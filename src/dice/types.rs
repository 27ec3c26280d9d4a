use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Size of each half of a pool: skilled + unskilled, and lucky + unlucky.
pub const MAX_DICE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Skilled,
    Unskilled,
    Lucky,
    Unlucky,
}

impl Kind {
    /// Marker shown next to a rolled value.
    pub fn marker(self) -> &'static str {
        match self {
            Kind::Skilled => "\u{1F7E9}",
            Kind::Unskilled => "\u{1F7E5}",
            Kind::Lucky => "\u{2B1C}",
            Kind::Unlucky => "\u{2B1B}",
        }
    }

    /// The die kind that fills the rest of this kind's half of the pool.
    pub fn complement(self) -> Kind {
        match self {
            Kind::Skilled => Kind::Unskilled,
            Kind::Unskilled => Kind::Skilled,
            Kind::Lucky => Kind::Unlucky,
            Kind::Unlucky => Kind::Lucky,
        }
    }

    pub fn die(self) -> Die {
        match self {
            Kind::Skilled => SKILLED_DIE,
            Kind::Unskilled => UNSKILLED_DIE,
            Kind::Lucky => LUCKY_DIE,
            Kind::Unlucky => UNLUCKY_DIE,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Skilled => "skilled",
            Kind::Unskilled => "unskilled",
            Kind::Lucky => "lucky",
            Kind::Unlucky => "unlucky",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    pub sides: u32,
    /// Number of highest faces that count as a success.
    pub successful_sides: u32,
    pub kind: Kind,
}

impl Die {
    /// Success means the value landed in the top `successful_sides` faces.
    pub fn is_success(&self, value: u32) -> bool {
        value > self.sides - self.successful_sides
    }
}

pub const SKILLED_DIE: Die = Die { sides: 6, successful_sides: 2, kind: Kind::Skilled };
pub const UNSKILLED_DIE: Die = Die { sides: 6, successful_sides: 1, kind: Kind::Unskilled };
pub const LUCKY_DIE: Die = Die { sides: 6, successful_sides: 2, kind: Kind::Lucky };
pub const UNLUCKY_DIE: Die = Die { sides: 6, successful_sides: 1, kind: Kind::Unlucky };

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("cannot get a number from \"{0}\"")]
    NotANumber(String),

    #[error("the number of {kind} dice, {count}, exceeds the maximum of {max}")]
    PoolSizeExceeded { kind: Kind, count: usize, max: usize },

    #[error(
        "somehow the number of {kind} dice, {count}, and the number of {complement} dice, {complement_count}, is not equal to {max}"
    )]
    InvariantViolation { kind: Kind, count: usize, complement: Kind, complement_count: usize, max: usize },
}

/// Every die to roll for one invocation, split by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub skilled: Vec<Die>,
    pub unskilled: Vec<Die>,
    pub lucky: Vec<Die>,
    pub unlucky: Vec<Die>,
}

/// One realized die roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    pub value: u32,
    pub is_success: bool,
    pub die: Die,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    /// Skilled results followed by unskilled results.
    pub skill: Vec<DieResult>,
    /// Lucky results followed by unlucky results.
    pub luck: Vec<DieResult>,
}

impl Results {
    pub fn skill_successes(&self) -> usize {
        self.skill.iter().filter(|r| r.is_success).count()
    }

    pub fn luck_successes(&self) -> usize {
        self.luck.iter().filter(|r| r.is_success).count()
    }
}
