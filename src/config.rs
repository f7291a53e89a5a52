/***************************************/
/*        3rd party libraries          */
/***************************************/
use anyhow::{ensure, Context};
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::CarSpec;
use crate::fleet::ZoneSplit;
use crate::scheduler::SchedulingAlgorithm;
use crate::zone::ZoneStrategy;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub fleet: FleetConfig,
    pub dispatcher: DispatcherConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub n_floors: u32,
    pub zone_strategy: ZoneStrategy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FleetConfig {
    pub n_cars: u32,
    pub bottom_share: f64,
    pub middle_share: f64,
    pub start_floor: i32,
    pub max_load: u32,
    pub max_speed: f64,
    pub capacity: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DispatcherConfig {
    pub algorithm: SchedulingAlgorithm,
    pub requeue_interrupted: bool,
    pub validate_floors: bool,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            n_floors: 200,
            zone_strategy: ZoneStrategy::Percentile,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        let split = ZoneSplit::default();
        let spec = CarSpec::default();
        FleetConfig {
            n_cars: 50,
            bottom_share: split.bottom_share,
            middle_share: split.middle_share,
            start_floor: 0,
            max_load: spec.max_load,
            max_speed: spec.max_speed,
            capacity: spec.capacity,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            algorithm: SchedulingAlgorithm::Fcfs,
            requeue_interrupted: false,
            validate_floors: true,
        }
    }
}

impl FleetConfig {
    pub fn split(&self) -> ZoneSplit {
        ZoneSplit {
            bottom_share: self.bottom_share,
            middle_share: self.middle_share,
        }
    }

    pub fn car_spec(&self) -> CarSpec {
        CarSpec {
            max_load: self.max_load,
            max_speed: self.max_speed,
            capacity: self.capacity,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.building.n_floors > 0, "building.n_floors must be at least 1");
        ensure!(self.fleet.n_cars > 0, "fleet.n_cars must be at least 1");

        let shares = [self.fleet.bottom_share, self.fleet.middle_share];
        ensure!(
            shares.iter().all(|share| (0.0..=1.0).contains(share)),
            "fleet shares must lie between 0 and 1"
        );
        ensure!(
            shares.iter().sum::<f64>() <= 1.0,
            "fleet.bottom_share + fleet.middle_share must not exceed 1"
        );
        ensure!(self.fleet.max_speed > 0.0, "fleet.max_speed must be positive");

        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    parse_config(&config_str)
        .with_context(|| format!("Invalid configuration file {}", path.display()))
}

pub fn parse_config(config_str: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(config_str).context("Failed to parse configuration")?;
    config.validate()?;
    Ok(config)
}
