/* 3rd party libraries */
use anyhow::Context;
use clap::{Arg, Command};
use log::{info, warn};
use std::path::Path;
use std::time::Duration;

/* Custom libraries */
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::{load_config, Direction, DispatchService, Dispatcher, SchedulingAlgorithm};

/* Constants */
const SETTLE_TIMEOUT: Duration = Duration::from_secs(120);

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("elevator_dispatch")
        .about("Zone partitioned elevator dispatcher")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("algorithm")
                .long("algorithm")
                .takes_value(true)
                .possible_values(["FCFS", "SSTF", "SCAN"])
                .ignore_case(true)
                .help("Scheduling algorithm, overrides the configuration"),
        )
        .arg(
            Arg::new("call")
                .long("call")
                .takes_value(true)
                .multiple_occurrences(true)
                .value_name("FLOOR:UP|DOWN")
                .help("Hall call to submit"),
        )
        .arg(
            Arg::new("stop")
                .long("stop")
                .takes_value(true)
                .multiple_occurrences(true)
                .value_name("CAR_ID")
                .help("Car to emergency stop after the calls"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the final snapshot as JSON"),
        )
        .get_matches();

    // Load the configuration
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let mut config = unwrap_or_exit!(load_config(Path::new(config_path)));
    if let Some(name) = matches.value_of("algorithm") {
        config.dispatcher.algorithm = unwrap_or_exit!(name.parse::<SchedulingAlgorithm>());
    }

    // Parse the demo calls, the reference demo when nothing is given
    let calls: Vec<(i32, Direction)> = match matches.values_of("call") {
        Some(values) => unwrap_or_exit!(values.map(parse_call).collect::<anyhow::Result<_>>()),
        None => vec![(10, Direction::Up)],
    };
    let stops: Vec<u32> = match matches.values_of("stop") {
        Some(values) => unwrap_or_exit!(values
            .map(|id| id.parse::<u32>().with_context(|| format!("Invalid car id '{}'", id)))
            .collect::<anyhow::Result<_>>()),
        None if matches.values_of("call").is_none() => vec![1],
        None => Vec::new(),
    };

    // Start the dispatcher
    let dispatcher = Dispatcher::from_config(&config);
    let service = unwrap_or_exit!(DispatchService::start(dispatcher, 1.0));

    for (floor, direction) in calls {
        info!("Elevator called at floor {} to go {}", floor, direction);
        if let Err(e) = service.submit_request(floor, direction) {
            warn!("Call at floor {} rejected: {}", floor, e);
        }
    }

    for car_id in stops {
        if let Err(e) = service.emergency_stop(car_id) {
            warn!("Emergency stop rejected: {}", e);
        }
    }

    if !unwrap_or_exit!(service.wait_until_settled(SETTLE_TIMEOUT)) {
        warn!("Fleet still moving after {:?}", SETTLE_TIMEOUT);
    }

    // Monitor
    let snapshot = unwrap_or_exit!(service.inspect());
    if matches.is_present("json") {
        println!("{}", unwrap_or_exit!(serde_json::to_string_pretty(&snapshot)));
    } else {
        info!("System monitoring");
        for car in snapshot.iter() {
            info!(
                "Elevator {}: Floor {}, State {}, Zone {}",
                car.id, car.current_floor, car.motion_state, car.zone
            );
        }
    }

    let pending = unwrap_or_exit!(service.pending());
    if !pending.is_empty() {
        warn!("{} request(s) still waiting for a car", pending.len());
    }

    service.shutdown();
}

fn parse_call(value: &str) -> anyhow::Result<(i32, Direction)> {
    let (floor, direction) = value
        .split_once(':')
        .with_context(|| format!("Invalid call '{}', expected FLOOR:UP|DOWN", value))?;
    let floor = floor
        .trim()
        .parse::<i32>()
        .with_context(|| format!("Invalid floor in call '{}'", value))?;
    let direction = direction.parse::<Direction>().map_err(anyhow::Error::msg)?;
    Ok((floor, direction))
}
