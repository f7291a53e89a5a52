pub mod classifier;

pub use classifier::zone_of;
pub use classifier::ZoneStrategy;
