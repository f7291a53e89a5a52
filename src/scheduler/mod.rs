pub mod algorithm;

pub use algorithm::SchedulingAlgorithm;
