use std::fmt::{Debug, Display, Formatter};

use derive_more::{Add, From, Sub, Sum};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Add, Sub, Sum, From, Serialize, Deserialize)]
pub struct Percent(pub f64);

impl Percent {
    pub fn from_proportion(proportion: f64) -> Self {
        Self(proportion * 100.0)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl PartialEq for Percent {
    fn eq(&self, other: &Self) -> bool {
        ordered_float::OrderedFloat(self.0).eq(&ordered_float::OrderedFloat(other.0))
    }
}

impl Eq for Percent {}

impl PartialOrd for Percent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Percent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        ordered_float::OrderedFloat(self.0).cmp(&ordered_float::OrderedFloat(other.0))
    }
}
