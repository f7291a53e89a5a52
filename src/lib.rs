//! Elevator dispatch and scheduling core.
//!
//! Floor requests are matched to cars under a zone partitioning rule using a
//! selectable scheduling policy (FCFS, SSTF or SCAN). The synchronous
//! [`Dispatcher`] moves cars instantly; [`DispatchService`] runs it on its own
//! thread with a motor thread per car, so relocations take time and can be
//! interrupted by an emergency stop.

/* Modules */
pub mod config;
pub mod coordinator;
pub mod elevator;
pub mod fleet;
pub mod scheduler;
pub mod shared;
pub mod zone;


/* Re-exports */
pub use config::{load_config, Config};
pub use coordinator::{DispatchHandle, DispatchService, Dispatcher};
pub use elevator::ElevatorCar;
pub use scheduler::SchedulingAlgorithm;
pub use shared::{CarSnapshot, DispatchError, Direction, MotionState, Request, Zone};
pub use zone::{zone_of, ZoneStrategy};
