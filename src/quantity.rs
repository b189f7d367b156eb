#[macro_use]
mod macros;

pub mod area;
pub mod convert;
pub mod cost;
pub mod energy;
pub mod mass;
pub mod percent;
pub mod time;
pub mod volume;
