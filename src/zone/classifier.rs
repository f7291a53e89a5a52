/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Zone;

/***************************************/
/*             Constants               */
/***************************************/
const TOP_THRESHOLD: f64 = 0.75;
const BOTTOM_THRESHOLD: f64 = 0.25;

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * How floors are partitioned into zones.
 *
 * Deserializes from the configuration names. Any unrecognized name falls back to
 * `Default`, whose zone no car is built for, so nothing gets dispatched under it.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ZoneStrategy {
    /// Top 25% / middle 50% / bottom 25% of the building
    Percentile,
    /// Odd and even floors
    Parity,
    Default,
}

impl From<String> for ZoneStrategy {
    fn from(name: String) -> Self {
        ZoneStrategy::from(name.as_str())
    }
}

impl From<&str> for ZoneStrategy {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "TOP_MIDDLE_BOTTOM" | "PERCENTILE" => ZoneStrategy::Percentile,
            "ODD_EVEN" | "PARITY" => ZoneStrategy::Parity,
            _ => ZoneStrategy::Default,
        }
    }
}

impl From<ZoneStrategy> for String {
    fn from(strategy: ZoneStrategy) -> Self {
        strategy.to_string()
    }
}

impl fmt::Display for ZoneStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneStrategy::Percentile => write!(f, "TOP_MIDDLE_BOTTOM"),
            ZoneStrategy::Parity => write!(f, "ODD_EVEN"),
            ZoneStrategy::Default => write!(f, "DEFAULT"),
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/// Zone a floor belongs to. Total for every input, floors <= 0 included.
pub fn zone_of(floor: i32, n_floors: u32, strategy: ZoneStrategy) -> Zone {
    match strategy {
        ZoneStrategy::Percentile => {
            let floor = floor as f64;
            let n_floors = n_floors as f64;

            // Above 75% is top, at or below 25% is bottom
            if floor > n_floors * TOP_THRESHOLD {
                Zone::Top
            } else if floor <= n_floors * BOTTOM_THRESHOLD {
                Zone::Bottom
            } else {
                Zone::Middle
            }
        }
        ZoneStrategy::Parity => {
            if floor.rem_euclid(2) == 1 {
                Zone::Odd
            } else {
                Zone::Even
            }
        }
        ZoneStrategy::Default => Zone::Default,
    }
}
