pub mod car;
pub mod motor;
pub mod motor_tests;

pub use car::CarSpec;
pub use car::ElevatorCar;
pub use motor::Arrival;
pub use motor::CarMotor;
pub use motor::MotorCommand;
