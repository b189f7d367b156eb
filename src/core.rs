pub mod benchmark;
pub mod metrics;
pub mod normalize;
pub mod records;
pub mod scenario;
pub mod series;
