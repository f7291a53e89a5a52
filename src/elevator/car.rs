/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{CarSnapshot, MotionState, Request, Zone};
use crate::zone::{zone_of, ZoneStrategy};

/***************************************/
/*       Public data structures        */
/***************************************/

/// Physical attributes shared by every car of a fleet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarSpec {
    pub max_load: u32,
    pub max_speed: f64,
    pub capacity: u32,
}

impl Default for CarSpec {
    fn default() -> Self {
        CarSpec {
            max_load: 1000,
            max_speed: 10.0,
            capacity: 10,
        }
    }
}

/**
 * One elevator car.
 *
 * The car is a small state machine over `MotionState`. A relocation is the only way
 * out of any state and always ends in `Idle` with the door open. The zone is fixed
 * at construction.
 *
 * # Fields
 * - `id`:              Unique id, never changes.
 * - `current_floor`:   Only changed when a relocation completes.
 * - `motion_state`:    Idle, moving up or moving down.
 * - `zone`:            Zone the car serves, assigned by the fleet builder.
 * - `door_open`:       Opened at the end of every relocation, closed explicitly.
 * - `spec`:            Load, speed and capacity.
 * - `trip`:            Counter identifying the relocation in progress. Bumped by an
 *                      emergency stop so a late arrival for an old trip is ignored.
 * - `reservation`:     Request the car is travelling to serve, while a deferred
 *                      relocation is in flight.
 */
#[derive(Debug, Clone)]
pub struct ElevatorCar {
    id: u32,
    current_floor: i32,
    motion_state: MotionState,
    zone: Zone,
    door_open: bool,
    spec: CarSpec,
    trip: u64,
    reservation: Option<Request>,
}

impl ElevatorCar {
    pub fn new(id: u32, zone: Zone, start_floor: i32) -> ElevatorCar {
        ElevatorCar::with_spec(id, zone, start_floor, CarSpec::default())
    }

    pub fn with_spec(id: u32, zone: Zone, start_floor: i32, spec: CarSpec) -> ElevatorCar {
        ElevatorCar {
            id,
            current_floor: start_floor,
            motion_state: MotionState::Idle,
            zone,
            door_open: false,
            spec,
            trip: 0,
            reservation: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn is_door_open(&self) -> bool {
        self.door_open
    }

    pub fn spec(&self) -> CarSpec {
        self.spec
    }

    pub fn trip(&self) -> u64 {
        self.trip
    }

    pub fn reservation(&self) -> Option<Request> {
        self.reservation
    }

    /// True while a deferred relocation is in flight
    pub fn is_reserved(&self) -> bool {
        self.reservation.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.motion_state == MotionState::Idle
    }

    /// Moves the car to `target_floor` in one step and opens the door
    pub fn relocate_to(&mut self, target_floor: i32) {
        info!(
            "Elevator {} moving from floor {} to {}",
            self.id, self.current_floor, target_floor
        );
        self.motion_state = MotionState::towards(self.current_floor, target_floor);
        self.current_floor = target_floor;
        self.motion_state = MotionState::Idle;
        self.open_door();
    }

    /// Starts a relocation that completes later. Returns the trip number to complete it with.
    pub fn begin_relocation(&mut self, request: Request) -> u64 {
        self.trip += 1;
        self.motion_state = MotionState::towards(self.current_floor, request.floor);
        self.reservation = Some(request);
        debug!(
            "Elevator {} starting trip {} from floor {} to {} ({})",
            self.id, self.trip, self.current_floor, request.floor, self.motion_state
        );
        self.trip
    }

    /**
     * Finishes the relocation started with `begin_relocation`.
     *
     * Returns the served request, or `None` if the trip is stale because an emergency
     * stop happened in between. A stale completion leaves the car untouched.
     */
    pub fn complete_relocation(&mut self, trip: u64) -> Option<Request> {
        if trip != self.trip {
            debug!(
                "Elevator {} ignoring arrival for stale trip {} (current {})",
                self.id, trip, self.trip
            );
            return None;
        }

        let request = self.reservation.take()?;
        self.relocate_to(request.floor);
        Some(request)
    }

    /// Forces the car idle. Returns the request of an interrupted relocation, if any.
    pub fn emergency_stop(&mut self) -> Option<Request> {
        info!("Elevator {} emergency stop!", self.id);
        self.motion_state = MotionState::Idle;
        self.trip += 1;
        self.reservation.take()
    }

    pub fn open_door(&mut self) {
        self.door_open = true;
        debug!("Elevator {} door opened", self.id);
    }

    pub fn close_door(&mut self) {
        self.door_open = false;
        debug!("Elevator {} door closed", self.id);
    }

    pub fn is_eligible_for_zone(&self, floor: i32, n_floors: u32, strategy: ZoneStrategy) -> bool {
        self.zone == zone_of(floor, n_floors, strategy)
    }

    /// Time needed to travel from the current floor to `target_floor` at full speed.
    /// Saturates at `Duration::MAX` for speeds too small to ever arrive.
    pub fn travel_time(&self, target_floor: i32) -> Duration {
        let distance = target_floor.abs_diff(self.current_floor) as f64;
        if self.spec.max_speed <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(distance / self.spec.max_speed).unwrap_or(Duration::MAX)
    }

    pub fn snapshot(&self) -> CarSnapshot {
        CarSnapshot {
            id: self.id,
            current_floor: self.current_floor,
            motion_state: self.motion_state,
            zone: self.zone,
            door_open: self.door_open,
        }
    }

    /***************************************/
    /*         Test helper functions       */
    /***************************************/
    #[cfg(test)]
    pub fn test_set_motion_state(&mut self, motion_state: MotionState) {
        self.motion_state = motion_state;
    }
}
