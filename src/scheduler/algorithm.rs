/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::BuildingConfig;
use crate::elevator::ElevatorCar;
use crate::shared::{Direction, Request};

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * Policy selecting which car serves a request.
 *
 * Every variant only considers cars whose zone matches the zone of the requested floor,
 * and never a car already reserved for a relocation in flight. Selection is read-only;
 * the caller relocates the chosen car.
 *
 * - `Fcfs`: first idle car in fleet order.
 * - `Sstf`: idle car closest to the requested floor.
 * - `Scan`: closest car that is idle, or already moving in the requested direction
 *           without having passed the requested floor.
 *
 * Ties on distance go to the car first in fleet order.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulingAlgorithm {
    #[default]
    #[serde(rename = "FCFS", alias = "fcfs")]
    Fcfs,
    #[serde(rename = "SSTF", alias = "sstf")]
    Sstf,
    #[serde(rename = "SCAN", alias = "scan")]
    Scan,
}

impl FromStr for SchedulingAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS" => Ok(SchedulingAlgorithm::Fcfs),
            "SSTF" => Ok(SchedulingAlgorithm::Sstf),
            "SCAN" => Ok(SchedulingAlgorithm::Scan),
            other => Err(format!(
                "Unknown scheduling algorithm '{}', expected FCFS, SSTF or SCAN",
                other
            )),
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingAlgorithm::Fcfs => write!(f, "FCFS"),
            SchedulingAlgorithm::Sstf => write!(f, "SSTF"),
            SchedulingAlgorithm::Scan => write!(f, "SCAN"),
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
impl SchedulingAlgorithm {
    /// Index into `fleet` of the car chosen for `request`, if any car qualifies
    pub fn schedule(
        &self,
        request: &Request,
        fleet: &[ElevatorCar],
        building: &BuildingConfig,
    ) -> Option<usize> {
        let mut candidates = fleet.iter().enumerate().filter(|(_, car)| {
            !car.is_reserved()
                && car.is_eligible_for_zone(request.floor, building.n_floors, building.zone_strategy)
        });

        match self {
            SchedulingAlgorithm::Fcfs => candidates
                .find(|(_, car)| car.is_idle())
                .map(|(index, _)| index),
            SchedulingAlgorithm::Sstf => closest(
                candidates.filter(|(_, car)| car.is_idle()),
                request.floor,
            ),
            SchedulingAlgorithm::Scan => closest(
                candidates.filter(|(_, car)| car.is_idle() || is_on_the_way(car, request)),
                request.floor,
            ),
        }
    }
}

/***************************************/
/*          Private functions          */
/***************************************/

// First car with the smallest distance to `floor`
fn closest<'a>(
    candidates: impl Iterator<Item = (usize, &'a ElevatorCar)>,
    floor: i32,
) -> Option<usize> {
    candidates
        .min_by_key(|(_, car)| car.current_floor().abs_diff(floor))
        .map(|(index, _)| index)
}

// Moving in the requested direction and not yet past the requested floor
fn is_on_the_way(car: &ElevatorCar, request: &Request) -> bool {
    if !car.motion_state().is_heading(request.direction) {
        return false;
    }

    match request.direction {
        Direction::Up => car.current_floor() <= request.floor,
        Direction::Down => car.current_floor() >= request.floor,
    }
}
