use std::{num::ParseIntError, str::FromStr};

use parley::ParsedValue;

#[derive(Debug, thiserror::Error)]
pub enum ByteSizeError {
    #[error("size is empty")]
    Empty,

    #[error("unknown size suffix {0:?}; use one of k, M, or G")]
    Suffix(String),

    #[error("invalid number: {0}")]
    Number(#[from] ParseIntError),

    #[error("size is too large")]
    Overflow,
}

/// A byte count with an optional binary suffix: `512`, `64k`, `2M`, `1G`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl FromStr for ByteSize {
    type Err = ByteSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());

        let (digits, suffix) = s.split_at(split);

        if digits.is_empty() {
            return Err(ByteSizeError::Empty);
        }

        let shift = match suffix {
            "" => 0,
            "k" | "K" => 10,
            "M" => 20,
            "G" => 30,
            suffix => return Err(ByteSizeError::Suffix(suffix.to_owned())),
        };

        let count: u64 = digits.parse()?;

        count
            .checked_mul(1 << shift)
            .map(ByteSize)
            .ok_or(ByteSizeError::Overflow)
    }
}

impl ParsedValue for ByteSize {}
