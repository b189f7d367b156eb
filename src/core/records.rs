use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{calendar::Month, quantity::convert::SourceUnit};

/// Metered building resource.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Electricity,
    Gas,
    Water,
    Waste,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Electricity => "electricity",
            Self::Gas => "gas",
            Self::Water => "water",
            Self::Waste => "waste",
        })
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = crate::prelude::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "electricity" | "electric" => Ok(Self::Electricity),
            "gas" | "natural gas" => Ok(Self::Gas),
            "water" => Ok(Self::Water),
            "waste" => Ok(Self::Waste),
            _ => Err(anyhow::anyhow!("unrecognized resource kind `{value}`")),
        }
    }
}

/// One employee row of the badge matrix: a swipe count per calendar month.
/// A missing cell means zero swipes that month, not a missing month.
#[derive(Clone, Debug)]
pub struct BadgeRecord {
    pub floor: String,
    pub swipes: Vec<(Month, Option<u32>)>,
}

impl BadgeRecord {
    pub fn annual_total(&self) -> u32 {
        self.swipes.iter().filter_map(|(_, count)| *count).sum()
    }
}

/// One monthly meter reading in its source-native unit.
#[derive(Clone, Debug)]
pub struct UtilityRecord {
    pub month: Month,
    pub resource: ResourceKind,
    pub quantity: f64,
    pub unit: SourceUnit,
}

/// One conference-room reservation.
#[derive(Clone, Debug)]
pub struct BookingRecord {
    pub date: NaiveDate,
    pub room: String,
    pub start: Option<NaiveTime>,
    pub finish: Option<NaiveTime>,
    pub attendees: u32,
    pub attendance_type: String,
}
