//! Rate units and conversion to the canonical items/min form.
//!
//! Conversions are exact: `items/s -> items/min` multiplies the raw Q32.32
//! bits by 60 and the inverse divides them by 60, so a value always survives
//! the round trip unchanged (unless the multiply saturated).

use crate::fixed::Fixed64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_MINUTE: i64 = 60;

/// The unit a port's nominal rate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RateUnit {
    /// Canonical unit.
    #[default]
    #[serde(rename = "items/min")]
    ItemsPerMin,
    #[serde(rename = "items/s")]
    ItemsPerSec,
}

impl RateUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            RateUnit::ItemsPerMin => "items/min",
            RateUnit::ItemsPerSec => "items/s",
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rate unit: {0}")]
pub struct UnknownRateUnit(pub String);

impl FromStr for RateUnit {
    type Err = UnknownRateUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "items/min" => Ok(RateUnit::ItemsPerMin),
            "items/s" => Ok(RateUnit::ItemsPerSec),
            other => Err(UnknownRateUnit(other.to_string())),
        }
    }
}

/// Convert a rate expressed in `unit` into items/min.
///
/// Saturates at the Q32.32 bounds instead of overflowing.
#[inline]
pub fn to_canonical_rate(value: Fixed64, unit: RateUnit) -> Fixed64 {
    match unit {
        RateUnit::ItemsPerMin => value,
        RateUnit::ItemsPerSec => value.saturating_mul_int(SECONDS_PER_MINUTE),
    }
}

/// Convert an items/min rate back into `unit`.
#[inline]
pub fn from_canonical_rate(value: Fixed64, unit: RateUnit) -> Fixed64 {
    match unit {
        RateUnit::ItemsPerMin => value,
        RateUnit::ItemsPerSec => value / SECONDS_PER_MINUTE,
    }
}
