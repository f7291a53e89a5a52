/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error};
use std::time::{Duration, Instant};

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCommand {
    /// Travel for `duration`, then report arrival for `trip`
    Travel { trip: u64, duration: Duration },
    /// Abandon the travel in progress without reporting arrival
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub car_id: u32,
    pub trip: u64,
}

enum Event {
    Command(MotorCommand),
    Disconnected,
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Travel worker for one car.
 *
 * The motor owns no car state. It waits out the travel time of a relocation and
 * reports the arrival back to the dispatcher, which decides whether the arrival still
 * counts. This keeps every car mutation on the dispatcher thread.
 *
 * # Fields
 * - `car_id`:        Car this motor drives.
 * - `command_rx`:    Receives travel and halt commands. The motor exits once every
 *                    sender is dropped.
 * - `arrival_tx`:    Reports finished trips to the dispatcher.
 */
pub struct CarMotor {
    car_id: u32,
    command_rx: cbc::Receiver<MotorCommand>,
    arrival_tx: cbc::Sender<Arrival>,
}

impl CarMotor {
    pub fn new(
        car_id: u32,
        command_rx: cbc::Receiver<MotorCommand>,
        arrival_tx: cbc::Sender<Arrival>,
    ) -> CarMotor {
        CarMotor {
            car_id,
            command_rx,
            arrival_tx,
        }
    }

    pub fn run(self) {
        let mut pending = self.wait_for_event();

        loop {
            pending = match pending {
                Event::Command(MotorCommand::Travel { trip, duration }) => {
                    match self.travel(trip, duration) {
                        Some(event) => event,
                        None => self.wait_for_event(),
                    }
                }
                // Nothing is moving, a halt has no effect
                Event::Command(MotorCommand::Halt) => self.wait_for_event(),
                Event::Disconnected => {
                    debug!("Motor for elevator {} shutting down", self.car_id);
                    return;
                }
            };
        }
    }

    fn wait_for_event(&self) -> Event {
        match self.command_rx.recv() {
            Ok(command) => Event::Command(command),
            Err(_) => Event::Disconnected,
        }
    }

    // Returns the event that cut the travel short, or None if the car arrived
    fn travel(&self, trip: u64, duration: Duration) -> Option<Event> {
        debug!(
            "Motor for elevator {} travelling {:?} on trip {}",
            self.car_id, duration, trip
        );
        let timer = match Instant::now().checked_add(duration) {
            Some(deadline) => cbc::at(deadline),
            // Too far away to ever arrive, only a command ends this trip
            None => cbc::never(),
        };

        cbc::select! {
            recv(self.command_rx) -> command => {
                match command {
                    Ok(MotorCommand::Halt) => {
                        debug!("Motor for elevator {} halted on trip {}", self.car_id, trip);
                        None
                    }
                    Ok(command) => Some(Event::Command(command)),
                    Err(_) => Some(Event::Disconnected),
                }
            }
            recv(timer) -> _ => {
                match self.arrival_tx.send(Arrival { car_id: self.car_id, trip }) {
                    Ok(()) => None,
                    Err(e) => {
                        error!("Motor for elevator {} failed to report arrival: {}", self.car_id, e);
                        Some(Event::Disconnected)
                    }
                }
            }
        }
    }
}
