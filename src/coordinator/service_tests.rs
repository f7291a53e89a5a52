/*
 * Unit tests for the dispatch service
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_service_end_to_end
 * - test_service_accepts_requests_while_moving
 * - test_service_emergency_stop_wins
 * - test_service_drains_after_arrival
 * - test_service_errors
 * - test_service_survives_tiny_speed
 * - test_service_rejects_bad_time_scale
 * - test_service_shutdown
 *
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod service_tests {
    use crate::config::{parse_config, BuildingConfig, DispatcherConfig};
    use crate::coordinator::{DispatchHandle, DispatchService, Dispatcher};
    use crate::elevator::ElevatorCar;
    use crate::scheduler::SchedulingAlgorithm;
    use crate::shared::Direction::{Down, Up};
    use crate::shared::MotionState::{Idle, MovingUp};
    use crate::shared::{DispatchError, Request, Zone};
    use crate::zone::ZoneStrategy;
    use std::thread::sleep;
    use std::time::{Duration, Instant};

    fn building() -> BuildingConfig {
        BuildingConfig {
            n_floors: 100,
            zone_strategy: ZoneStrategy::Percentile,
        }
    }

    fn setup_service(fleet: Vec<ElevatorCar>, time_scale: f64) -> DispatchHandle {
        let settings = DispatcherConfig {
            algorithm: SchedulingAlgorithm::Sstf,
            ..DispatcherConfig::default()
        };
        let dispatcher = Dispatcher::new(fleet, building(), &settings);
        DispatchService::start(dispatcher, time_scale).unwrap()
    }

    fn reference_fleet() -> Vec<ElevatorCar> {
        vec![
            ElevatorCar::new(0, Zone::Bottom, 1),
            ElevatorCar::new(1, Zone::Bottom, 1),
            ElevatorCar::new(2, Zone::Middle, 50),
            ElevatorCar::new(3, Zone::Top, 90),
        ]
    }

    #[test]
    fn test_service_end_to_end() {
        // Purpose: Verify that the top car is seen moving, then arrives at floor 95

        // Arrange
        let service = setup_service(reference_fleet(), 0.5);

        // Act
        let assignments = service.submit_request(95, Up).unwrap();
        let moving = service.inspect().unwrap();
        let settled = service.wait_until_settled(Duration::from_secs(3)).unwrap();
        let arrived = service.inspect().unwrap();

        // Assert
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].car_id, 3);
        assert_eq!(moving[3].motion_state, MovingUp);
        assert_eq!(moving[3].current_floor, 90);
        assert!(settled);
        assert_eq!(arrived[3].motion_state, Idle);
        assert_eq!(arrived[3].current_floor, 95);
        assert!(arrived[3].door_open);

        // Cleanup
        service.shutdown();
    }

    #[test]
    fn test_service_accepts_requests_while_moving() {
        // Arrange
        let service = setup_service(reference_fleet(), 1.0);
        service.submit_request(99, Up).unwrap();

        // Act
        let start = Instant::now();
        let assignments = service.submit_request(10, Up).unwrap();
        let elapsed = start.elapsed();
        let snapshot = service.inspect().unwrap();

        // Assert
        assert!(elapsed < Duration::from_millis(500));
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].car_id, 0);
        assert_eq!(snapshot[3].motion_state, MovingUp);
        assert!(service.wait_until_settled(Duration::from_secs(5)).unwrap());
        let settled = service.inspect().unwrap();
        assert_eq!(settled[0].current_floor, 10);
        assert_eq!(settled[3].current_floor, 99);

        // Cleanup
        service.shutdown();
    }

    #[test]
    fn test_service_emergency_stop_wins() {
        // Purpose: Verify that a stopped car stays idle at its old floor and never completes the trip

        // Arrange
        let service = setup_service(reference_fleet(), 0.5);
        service.submit_request(99, Up).unwrap();

        // Act
        let interrupted = service.emergency_stop(3).unwrap();
        let stopped = service.inspect().unwrap();
        sleep(Duration::from_millis(700));
        let later = service.inspect().unwrap();

        // Assert
        assert_eq!(interrupted, Some(Request::new(99, Up)));
        assert_eq!(stopped[3].motion_state, Idle);
        assert_eq!(stopped[3].current_floor, 90);
        assert_eq!(later[3].motion_state, Idle);
        assert_eq!(later[3].current_floor, 90);
        assert!(service.pending().unwrap().is_empty());

        // Cleanup
        service.shutdown();
    }

    #[test]
    fn test_service_drains_after_arrival() {
        // Purpose: Verify that a request waiting for a busy car is served once the car arrives

        // Arrange
        let service = setup_service(vec![ElevatorCar::new(0, Zone::Top, 90)], 0.1);

        // Act
        let first = service.submit_request(95, Up).unwrap();
        let second = service.submit_request(80, Down).unwrap();
        let queued = service.pending().unwrap();
        let settled = service.wait_until_settled(Duration::from_secs(3)).unwrap();

        // Assert
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(queued, vec![Request::new(80, Down)]);
        assert!(settled);
        assert_eq!(service.inspect().unwrap()[0].current_floor, 80);
        assert!(service.pending().unwrap().is_empty());

        // Cleanup
        service.shutdown();
    }

    #[test]
    fn test_service_errors() {
        // Arrange
        let service = setup_service(reference_fleet(), 0.01);

        // Act
        let unknown_car = service.emergency_stop(17);
        let unknown_door = service.close_door(17);
        let out_of_range = service.submit_request(250, Up);
        let still_running = service.submit_request(30, Up);

        // Assert
        assert_eq!(unknown_car, Err(DispatchError::UnknownCar(17)));
        assert_eq!(unknown_door, Err(DispatchError::UnknownCar(17)));
        assert_eq!(
            out_of_range,
            Err(DispatchError::FloorOutOfRange { floor: 250, n_floors: 100 })
        );
        assert_eq!(still_running.unwrap()[0].car_id, 2);

        // Cleanup
        service.shutdown();
    }

    #[test]
    fn test_service_shutdown() {
        // Purpose: Verify that shutting down mid travel returns and joins every thread

        // Arrange
        let service = setup_service(reference_fleet(), 100.0);
        service.submit_request(99, Up).unwrap();

        // Act
        let start = Instant::now();
        service.shutdown();

        // Assert
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_service_survives_tiny_speed() {
        // Purpose: Verify that a valid but tiny max_speed leaves the dispatcher running

        // Arrange
        let config = parse_config("[fleet]\nmax_speed = 1e-300\nn_cars = 4\n").unwrap();
        let service = DispatchService::start(Dispatcher::from_config(&config), 1.0).unwrap();

        // Act
        let first = service.submit_request(10, Up);
        let second = service.submit_request(12, Up);
        let moving = service.inspect().unwrap();
        let interrupted = service.emergency_stop(0);

        // Assert
        assert_eq!(first.unwrap()[0].car_id, 0);
        assert!(second.unwrap().is_empty());
        assert_eq!(moving[0].motion_state, MovingUp);
        assert_eq!(interrupted, Ok(Some(Request::new(10, Up))));
        assert_eq!(service.pending(), Ok(Vec::new()));

        // Cleanup
        let start = Instant::now();
        service.shutdown();
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_service_rejects_bad_time_scale() {
        // Arrange
        let dispatcher = || Dispatcher::new(reference_fleet(), building(), &DispatcherConfig::default());

        // Act
        let negative = DispatchService::start(dispatcher(), -1.0);
        let zero = DispatchService::start(dispatcher(), 0.0);
        let not_a_number = DispatchService::start(dispatcher(), f64::NAN);
        let infinite = DispatchService::start(dispatcher(), f64::INFINITY);

        // Assert
        assert!(negative.is_err());
        assert!(zero.is_err());
        assert!(not_a_number.is_err());
        assert!(infinite.is_err());
    }
}
