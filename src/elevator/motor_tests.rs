/*
 * Unit tests for the car motor thread
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_motor_reports_arrival
 * - test_motor_halt
 * - test_motor_endless_trip
 * - test_motor_shutdown
 *
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod motor_tests {
    use crate::elevator::{Arrival, CarMotor, MotorCommand};
    use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
    use std::thread::{spawn, JoinHandle};
    use std::time::Duration;

    fn setup_motor(car_id: u32) -> (JoinHandle<()>, Sender<MotorCommand>, Receiver<Arrival>) {
        // Arrange mock channels
        let (command_tx, command_rx) = unbounded::<MotorCommand>();
        let (arrival_tx, arrival_rx) = unbounded::<Arrival>();

        let motor = CarMotor::new(car_id, command_rx, arrival_tx);
        let motor_thread = spawn(move || motor.run());

        (motor_thread, command_tx, arrival_rx)
    }

    #[test]
    fn test_motor_reports_arrival() {
        // Purpose: Verify that the motor reports the trip after the travel time

        // Arrange
        let (motor_thread, command_tx, arrival_rx) = setup_motor(4);

        // Act
        command_tx
            .send(MotorCommand::Travel {
                trip: 1,
                duration: Duration::from_millis(20),
            })
            .unwrap();

        // Assert
        match arrival_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(arrival) => assert_eq!(arrival, Arrival { car_id: 4, trip: 1 }),
            Err(e) => panic!("Error receiving from arrival_rx: {:?}", e),
        }

        // Cleanup
        drop(command_tx);
        motor_thread.join().unwrap();
    }

    #[test]
    fn test_motor_halt() {
        // Purpose: Verify that a halted trip never reports arrival and the motor takes new trips

        // Arrange
        let (motor_thread, command_tx, arrival_rx) = setup_motor(1);

        // Act
        command_tx
            .send(MotorCommand::Travel {
                trip: 1,
                duration: Duration::from_millis(300),
            })
            .unwrap();
        command_tx.send(MotorCommand::Halt).unwrap();
        let halted = arrival_rx.recv_timeout(Duration::from_millis(600));

        command_tx
            .send(MotorCommand::Travel {
                trip: 2,
                duration: Duration::ZERO,
            })
            .unwrap();
        let next = arrival_rx.recv_timeout(Duration::from_secs(3));

        // Assert
        assert_eq!(halted, Err(RecvTimeoutError::Timeout));
        assert_eq!(next, Ok(Arrival { car_id: 1, trip: 2 }));

        // Cleanup
        drop(command_tx);
        motor_thread.join().unwrap();
    }

    #[test]
    fn test_motor_shutdown() {
        // Purpose: Verify that the motor exits mid travel when the dispatcher goes away

        // Arrange
        let (motor_thread, command_tx, _arrival_rx) = setup_motor(2);
        command_tx
            .send(MotorCommand::Travel {
                trip: 1,
                duration: Duration::from_secs(60),
            })
            .unwrap();

        // Act
        drop(command_tx);

        // Assert
        assert!(motor_thread.join().is_ok());
    }

    #[test]
    fn test_motor_endless_trip() {
        // Purpose: Verify that a trip too long for the clock waits for a halt and the motor keeps working

        // Arrange
        let (motor_thread, command_tx, arrival_rx) = setup_motor(3);

        // Act
        command_tx
            .send(MotorCommand::Travel {
                trip: 1,
                duration: Duration::MAX,
            })
            .unwrap();
        let waiting = arrival_rx.recv_timeout(Duration::from_millis(100));
        command_tx.send(MotorCommand::Halt).unwrap();
        command_tx
            .send(MotorCommand::Travel {
                trip: 2,
                duration: Duration::ZERO,
            })
            .unwrap();
        let next = arrival_rx.recv_timeout(Duration::from_secs(3));

        // Assert
        assert_eq!(waiting, Err(RecvTimeoutError::Timeout));
        assert_eq!(next, Ok(Arrival { car_id: 3, trip: 2 }));

        // Cleanup
        drop(command_tx);
        motor_thread.join().unwrap();
    }
}
