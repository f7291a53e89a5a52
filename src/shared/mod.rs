pub mod errors;
pub mod macros;
pub mod structs;

pub use errors::DispatchError;
pub use structs::Assignment;
pub use structs::CarSnapshot;
pub use structs::Direction;
pub use structs::MotionState;
pub use structs::Request;
pub use structs::Zone;
