pub mod builder;

pub use builder::build_fleet;
pub use builder::ZoneSplit;
