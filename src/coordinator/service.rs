/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info};
use std::collections::HashMap;
use std::thread::{sleep, Builder, JoinHandle};
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::coordinator::dispatcher::{Dispatcher, Relocation};
use crate::elevator::{Arrival, CarMotor, MotorCommand};
use crate::shared::{Assignment, CarSnapshot, DispatchError, Direction, MotionState, Request};

/***************************************/
/*               Enums                 */
/***************************************/
enum Command {
    Submit(Request, cbc::Sender<Result<Vec<Assignment>, DispatchError>>),
    EmergencyStop(u32, cbc::Sender<Result<Option<Request>, DispatchError>>),
    CloseDoor(u32, cbc::Sender<Result<(), DispatchError>>),
    Inspect(cbc::Sender<Vec<CarSnapshot>>),
    Pending(cbc::Sender<Vec<Request>>),
}

enum Event {
    NewCommand(Command),
    CarArrived(Arrival),
    Terminate,
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Runs a `Dispatcher` on its own thread, with one motor thread per car.
 *
 * Queue changes and scheduling decisions stay serialized on the dispatcher thread. A
 * matched car is reserved and its motor waits out the travel time, so the car is
 * observably moving meanwhile and new requests are still accepted. When the motor
 * reports arrival the car is completed and the queue drained again.
 *
 * An emergency stop forces the car idle at once and halts its motor. The car's trip
 * number changes with the stop, so an arrival already on its way is ignored.
 *
 * # Fields
 * - `dispatcher`:      The synchronous dispatcher doing the actual work.
 * - `command_rx`:      Receives commands from `DispatchHandle`s.
 * - `arrival_rx`:      Receives arrivals from the car motors.
 * - `_arrival_tx`:     Kept so `arrival_rx` stays connected with an empty fleet.
 * - `terminate_rx`:    Stops the service.
 * - `motor_txs`:       Command channel of the motor for each car id.
 * - `motor_threads`:   Joined when the service stops.
 * - `time_scale`:      Multiplier on travel times. 1.0 is real time.
 */
pub struct DispatchService {
    dispatcher: Dispatcher,
    command_rx: cbc::Receiver<Command>,
    arrival_rx: cbc::Receiver<Arrival>,
    _arrival_tx: cbc::Sender<Arrival>,
    terminate_rx: cbc::Receiver<()>,
    motor_txs: HashMap<u32, cbc::Sender<MotorCommand>>,
    motor_threads: Vec<JoinHandle<()>>,
    time_scale: f64,
}

/// Client side of a running `DispatchService`. Cheap to use from any thread.
pub struct DispatchHandle {
    command_tx: cbc::Sender<Command>,
    terminate_tx: cbc::Sender<()>,
    service_thread: Option<JoinHandle<()>>,
}

impl DispatchService {
    /// Spawns the motors and the dispatcher thread. `time_scale` must be finite and positive.
    pub fn start(dispatcher: Dispatcher, time_scale: f64) -> std::io::Result<DispatchHandle> {
        if !time_scale.is_finite() || time_scale <= 0.0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("time scale must be finite and positive, got {}", time_scale),
            ));
        }

        let (command_tx, command_rx) = cbc::unbounded::<Command>();
        let (arrival_tx, arrival_rx) = cbc::unbounded::<Arrival>();
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

        let mut motor_txs = HashMap::new();
        let mut motor_threads = Vec::new();
        for car in dispatcher.fleet() {
            let (motor_tx, motor_rx) = cbc::unbounded::<MotorCommand>();
            let motor = CarMotor::new(car.id(), motor_rx, arrival_tx.clone());

            let motor_thread = Builder::new().name(format!("motor_{}", car.id()));
            motor_threads.push(motor_thread.spawn(move || motor.run())?);
            motor_txs.insert(car.id(), motor_tx);
        }

        let service = DispatchService {
            dispatcher,
            command_rx,
            arrival_rx,
            _arrival_tx: arrival_tx,
            terminate_rx,
            motor_txs,
            motor_threads,
            time_scale,
        };

        let service_thread = Builder::new().name("dispatcher".into());
        let service_thread = service_thread.spawn(move || service.run())?;

        Ok(DispatchHandle {
            command_tx,
            terminate_tx,
            service_thread: Some(service_thread),
        })
    }

    fn run(mut self) {
        info!(
            "Dispatcher running {} over {} cars",
            self.dispatcher.algorithm(),
            self.dispatcher.fleet().len()
        );

        loop {
            match self.wait_for_event() {
                Event::Terminate => break,
                event => self.handle_event(event),
            }
        }

        // Dropping the motor channels stops the motors
        self.motor_txs.clear();
        for motor_thread in self.motor_threads.drain(..) {
            if motor_thread.join().is_err() {
                error!("A car motor thread panicked");
            }
        }
        info!("Dispatcher terminated");
    }

    fn wait_for_event(&self) -> Event {
        cbc::select! {
            recv(self.command_rx) -> command => {
                match command {
                    Ok(command) => Event::NewCommand(command),
                    // Every handle is gone
                    Err(_) => Event::Terminate,
                }
            }
            recv(self.arrival_rx) -> arrival => {
                match arrival {
                    Ok(arrival) => Event::CarArrived(arrival),
                    Err(_) => Event::Terminate,
                }
            }
            recv(self.terminate_rx) -> _ => Event::Terminate,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::NewCommand(Command::Submit(request, reply_tx)) => {
                let result = self.dispatcher.submit_with(request, Relocation::Deferred);
                if let Ok(assignments) = &result {
                    self.start_motors(assignments);
                }
                let _ = reply_tx.send(result);
            }

            Event::NewCommand(Command::EmergencyStop(car_id, reply_tx)) => {
                let result = self.dispatcher.emergency_stop(car_id);
                if result.is_ok() {
                    self.send_motor(car_id, MotorCommand::Halt);
                    self.drain();
                }
                let _ = reply_tx.send(result);
            }

            Event::NewCommand(Command::CloseDoor(car_id, reply_tx)) => {
                let _ = reply_tx.send(self.dispatcher.close_door(car_id));
            }

            Event::NewCommand(Command::Inspect(reply_tx)) => {
                let _ = reply_tx.send(self.dispatcher.inspect());
            }

            Event::NewCommand(Command::Pending(reply_tx)) => {
                let _ = reply_tx.send(self.dispatcher.pending());
            }

            Event::CarArrived(arrival) => {
                match self.dispatcher.complete(arrival.car_id, arrival.trip) {
                    Ok(Some(_)) => self.drain(),
                    Ok(None) => {}
                    Err(e) => error!("Arrival from motor without a car: {}", e),
                }
            }

            Event::Terminate => {}
        }
    }

    fn drain(&mut self) {
        let assignments = self.dispatcher.drain_with(Relocation::Deferred);
        self.start_motors(&assignments);
    }

    fn start_motors(&self, assignments: &[Assignment]) {
        for assignment in assignments {
            let Some(car) = self.dispatcher.car(assignment.car_id) else {
                continue;
            };
            let travel_time = car.travel_time(assignment.request.floor);
            let duration = Duration::try_from_secs_f64(travel_time.as_secs_f64() * self.time_scale)
                .unwrap_or(Duration::MAX);
            debug!(
                "Elevator {} travelling {} -> {} for {:?}",
                car.id(),
                assignment.from_floor,
                assignment.request.floor,
                duration
            );
            self.send_motor(
                car.id(),
                MotorCommand::Travel {
                    trip: car.trip(),
                    duration,
                },
            );
        }
    }

    fn send_motor(&self, car_id: u32, command: MotorCommand) {
        if let Some(motor_tx) = self.motor_txs.get(&car_id) {
            if let Err(e) = motor_tx.send(command) {
                error!("Failed to send command to motor of elevator {}: {}", car_id, e);
            }
        }
    }
}

impl DispatchHandle {
    /// Entry point for a hall call
    pub fn submit_request(
        &self,
        floor: i32,
        direction: Direction,
    ) -> Result<Vec<Assignment>, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(Command::Submit(Request::new(floor, direction), reply_tx))?;
        reply_rx.recv().map_err(|_| DispatchError::ServiceStopped)?
    }

    pub fn emergency_stop(&self, car_id: u32) -> Result<Option<Request>, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(Command::EmergencyStop(car_id, reply_tx))?;
        reply_rx.recv().map_err(|_| DispatchError::ServiceStopped)?
    }

    pub fn close_door(&self, car_id: u32) -> Result<(), DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(Command::CloseDoor(car_id, reply_tx))?;
        reply_rx.recv().map_err(|_| DispatchError::ServiceStopped)?
    }

    pub fn inspect(&self) -> Result<Vec<CarSnapshot>, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(Command::Inspect(reply_tx))?;
        reply_rx.recv().map_err(|_| DispatchError::ServiceStopped)
    }

    pub fn pending(&self) -> Result<Vec<Request>, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(Command::Pending(reply_tx))?;
        reply_rx.recv().map_err(|_| DispatchError::ServiceStopped)
    }

    /// Polls until no car is moving. Returns false if `timeout` passed first.
    pub fn wait_until_settled(&self, timeout: Duration) -> Result<bool, DispatchError> {
        let deadline = Instant::now() + timeout;
        loop {
            let settled = self
                .inspect()?
                .iter()
                .all(|car| car.motion_state == MotionState::Idle);
            if settled {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(Duration::from_millis(5));
        }
    }

    /// Stops the dispatcher and every motor, and waits for them to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, command: Command) -> Result<(), DispatchError> {
        self.command_tx
            .send(command)
            .map_err(|_| DispatchError::ServiceStopped)
    }

    fn stop(&mut self) {
        if let Some(service_thread) = self.service_thread.take() {
            let _ = self.terminate_tx.send(());
            if service_thread.join().is_err() {
                error!("Dispatcher thread panicked");
            }
        }
    }
}

impl Drop for DispatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
