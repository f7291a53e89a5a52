/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::{CarSpec, ElevatorCar};
use crate::shared::Zone;
use crate::zone::ZoneStrategy;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Share of the fleet given to the bottom and middle zones. The top zone gets the rest.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ZoneSplit {
    pub bottom_share: f64,
    pub middle_share: f64,
}

impl Default for ZoneSplit {
    fn default() -> Self {
        ZoneSplit {
            bottom_share: 0.25,
            middle_share: 0.50,
        }
    }
}

impl ZoneSplit {
    /// Zone of the car at position `index` in a fleet of `n_cars`
    pub fn zone_for(&self, index: u32, n_cars: u32) -> Zone {
        let index = index as f64;
        let n_cars = n_cars as f64;

        if index < n_cars * self.bottom_share {
            Zone::Bottom
        } else if index < n_cars * (self.bottom_share + self.middle_share) {
            Zone::Middle
        } else {
            Zone::Top
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Builds the fleet at startup and assigns each car its zone for life.
 *
 * Under the percentile strategy the cars are split proportionally over bottom,
 * middle and top in id order. Under the parity strategy they alternate odd, even.
 * The default strategy keeps the proportional split, so no car will ever match.
 */
pub fn build_fleet(
    n_cars: u32,
    split: ZoneSplit,
    strategy: ZoneStrategy,
    start_floor: i32,
    spec: CarSpec,
) -> Vec<ElevatorCar> {
    if strategy == ZoneStrategy::Default {
        warn!("Zone strategy is DEFAULT, no car will match any request");
    }

    let fleet: Vec<ElevatorCar> = (0..n_cars)
        .map(|id| {
            let zone = match strategy {
                ZoneStrategy::Parity if id % 2 == 0 => Zone::Odd,
                ZoneStrategy::Parity => Zone::Even,
                ZoneStrategy::Percentile | ZoneStrategy::Default => split.zone_for(id, n_cars),
            };
            ElevatorCar::with_spec(id, zone, start_floor, spec)
        })
        .collect();

    info!(
        "Built fleet of {} cars using {} zoning",
        fleet.len(),
        strategy
    );
    fleet
}
