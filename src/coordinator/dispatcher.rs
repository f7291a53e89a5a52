/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, warn};
use std::collections::VecDeque;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{BuildingConfig, Config, DispatcherConfig};
use crate::elevator::ElevatorCar;
use crate::fleet::build_fleet;
use crate::scheduler::SchedulingAlgorithm;
use crate::shared::{Assignment, CarSnapshot, DispatchError, Request};

/***************************************/
/*               Enums                 */
/***************************************/

/// How a matched car is moved during a drain round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// The car arrives within the drain round
    Instant,
    /// The car is reserved and starts moving; arrival is reported later with `complete`
    Deferred,
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Matches queued requests to cars.
 *
 * The dispatcher owns the fleet and the request queue. Scheduling only ever gets a
 * shared view of the fleet; every car mutation happens here.
 *
 * Draining is head-of-line blocking: when the oldest request cannot be served, it is
 * put back at the head and the round stops, even if newer requests could be served.
 *
 * # Fields
 * - `fleet`:                 Cars in fleet order, fixed at construction.
 * - `queue`:                 Pending requests, oldest first.
 * - `algorithm`:             Policy choosing a car for the head request.
 * - `building`:              Floor count and zone strategy used for every zone check.
 * - `requeue_interrupted`:   Whether a request cut short by an emergency stop goes back
 *                            in the queue. Otherwise it is dropped.
 * - `validate_floors`:       Whether `submit` rejects floors outside the building.
 */
pub struct Dispatcher {
    fleet: Vec<ElevatorCar>,
    queue: VecDeque<Request>,
    algorithm: SchedulingAlgorithm,
    building: BuildingConfig,
    requeue_interrupted: bool,
    validate_floors: bool,
}

impl Dispatcher {
    pub fn new(
        fleet: Vec<ElevatorCar>,
        building: BuildingConfig,
        settings: &DispatcherConfig,
    ) -> Dispatcher {
        Dispatcher {
            fleet,
            queue: VecDeque::new(),
            algorithm: settings.algorithm,
            building,
            requeue_interrupted: settings.requeue_interrupted,
            validate_floors: settings.validate_floors,
        }
    }

    /// Builds the fleet described by `config` and a dispatcher around it
    pub fn from_config(config: &Config) -> Dispatcher {
        let fleet = build_fleet(
            config.fleet.n_cars,
            config.fleet.split(),
            config.building.zone_strategy,
            config.fleet.start_floor,
            config.fleet.car_spec(),
        );
        Dispatcher::new(fleet, config.building, &config.dispatcher)
    }

    pub fn algorithm(&self) -> SchedulingAlgorithm {
        self.algorithm
    }

    pub fn building(&self) -> &BuildingConfig {
        &self.building
    }

    pub fn fleet(&self) -> &[ElevatorCar] {
        &self.fleet
    }

    pub fn car(&self, car_id: u32) -> Option<&ElevatorCar> {
        self.fleet.iter().find(|car| car.id() == car_id)
    }

    /// Requests still waiting for a car, oldest first
    pub fn pending(&self) -> Vec<Request> {
        self.queue.iter().copied().collect()
    }

    /// Queues `request` and drains, relocating matched cars immediately
    pub fn submit(&mut self, request: Request) -> Result<Vec<Assignment>, DispatchError> {
        self.submit_with(request, Relocation::Instant)
    }

    pub fn submit_with(
        &mut self,
        request: Request,
        relocation: Relocation,
    ) -> Result<Vec<Assignment>, DispatchError> {
        self.check_floor(request.floor)?;
        info!(
            "Dispatcher received request at floor {} going {}",
            request.floor, request.direction
        );
        self.queue.push_back(request);
        Ok(self.drain_with(relocation))
    }

    pub fn drain(&mut self) -> Vec<Assignment> {
        self.drain_with(Relocation::Instant)
    }

    /// Serves the queue from the head until it is empty or the head cannot be served
    pub fn drain_with(&mut self, relocation: Relocation) -> Vec<Assignment> {
        let mut assignments = Vec::new();

        while let Some(request) = self.queue.pop_front() {
            let index = match self.algorithm.schedule(&request, &self.fleet, &self.building) {
                Some(index) => index,
                None => {
                    warn!(
                        "No available elevator for floor {} going {}, {} request(s) waiting",
                        request.floor,
                        request.direction,
                        self.queue.len() + 1
                    );
                    // Back at the head, not the tail, so later requests stay queued behind it
                    self.queue.push_front(request);
                    break;
                }
            };

            let car = &mut self.fleet[index];
            let assignment = Assignment {
                car_id: car.id(),
                request,
                from_floor: car.current_floor(),
            };
            info!(
                "Dispatching elevator {} ({}) to floor {} using {}",
                car.id(),
                car.zone(),
                request.floor,
                self.algorithm
            );

            match relocation {
                Relocation::Instant => car.relocate_to(request.floor),
                Relocation::Deferred => {
                    car.begin_relocation(request);
                }
            }
            assignments.push(assignment);
        }

        assignments
    }

    /// Completes a deferred relocation. Stale trips are ignored and return `None`.
    pub fn complete(&mut self, car_id: u32, trip: u64) -> Result<Option<Request>, DispatchError> {
        let car = self.car_mut(car_id)?;
        let served = car.complete_relocation(trip);
        if let Some(request) = served {
            debug!("Elevator {} served floor {}", car_id, request.floor);
        }
        Ok(served)
    }

    /**
     * Forces a car idle.
     *
     * A request whose relocation was interrupted is re-queued at the tail or dropped,
     * depending on `requeue_interrupted`, and returned either way.
     */
    pub fn emergency_stop(&mut self, car_id: u32) -> Result<Option<Request>, DispatchError> {
        let requeue = self.requeue_interrupted;
        let car = self.car_mut(car_id)?;
        let interrupted = car.emergency_stop();

        if let Some(request) = interrupted {
            if requeue {
                info!(
                    "Re-queueing request for floor {} interrupted on elevator {}",
                    request.floor, car_id
                );
                self.queue.push_back(request);
            } else {
                warn!(
                    "Dropping request for floor {} interrupted on elevator {}",
                    request.floor, car_id
                );
            }
        }

        Ok(interrupted)
    }

    pub fn close_door(&mut self, car_id: u32) -> Result<(), DispatchError> {
        self.car_mut(car_id)?.close_door();
        Ok(())
    }

    pub fn inspect(&self) -> Vec<CarSnapshot> {
        self.fleet.iter().map(|car| car.snapshot()).collect()
    }

    /// Logs one line per car
    pub fn monitor(&self) {
        info!("System monitoring");
        for car in self.fleet.iter() {
            info!(
                "Elevator {}: Floor {}, State {}, Zone {}",
                car.id(),
                car.current_floor(),
                car.motion_state(),
                car.zone()
            );
        }
    }

    /***************************************/
    /*          Private functions          */
    /***************************************/
    fn car_mut(&mut self, car_id: u32) -> Result<&mut ElevatorCar, DispatchError> {
        match self.fleet.iter_mut().find(|car| car.id() == car_id) {
            Some(car) => Ok(car),
            None => {
                warn!("No elevator with id {}", car_id);
                Err(DispatchError::UnknownCar(car_id))
            }
        }
    }

    fn check_floor(&self, floor: i32) -> Result<(), DispatchError> {
        let n_floors = self.building.n_floors;
        if self.validate_floors && (floor < 1 || floor as i64 > n_floors as i64) {
            warn!("Rejecting request for floor {} outside 1..={}", floor, n_floors);
            return Err(DispatchError::FloorOutOfRange { floor, n_floors });
        }
        Ok(())
    }
}
