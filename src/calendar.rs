use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Canonical calendar month. The ordering is the canonical Jan…Dec ordering,
/// and every monthly series in the pipeline is keyed by it.
#[derive(
    Debug, Hash, PartialOrd, Ord, Serialize, Deserialize, enumset::EnumSetType, derive_more::Display,
)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    /// 1-based month number, as in dates.
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }
}

impl std::str::FromStr for Month {
    type Err = Error;

    /// Accepts `Jan`, `January`, and `January 2025` style labels.
    fn from_str(value: &str) -> Result<Self> {
        let token = value.trim().split_whitespace().next().unwrap_or_default();
        let prefix: String = token.chars().take(3).collect::<String>().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|month| month.to_string().to_ascii_lowercase() == prefix)
            .with_context(|| format!("unrecognized month label `{value}`"))
    }
}

/// The ordered months covered by one analysis run.
///
/// The reference dataset covers January through September of a single year;
/// a full-year dataset uses all twelve months.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Calendar {
    pub year: i32,
    pub months: Vec<Month>,
}

impl Calendar {
    pub fn validate(&self) -> Result {
        ensure!(!self.months.is_empty(), "the analysis calendar must cover at least one month");
        ensure!(
            self.months.is_sorted_by(|lhs, rhs| lhs < rhs),
            "calendar months must be unique and in canonical order",
        );
        Ok(())
    }

    pub fn contains(&self, month: Month) -> bool {
        self.months.contains(&month)
    }

    pub fn as_set(&self) -> EnumSet<Month> {
        self.months.iter().copied().collect()
    }
}

/// A named subset of months used for seasonal averaging.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(pub EnumSet<Month>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_labels() {
        assert_eq!("Jan".parse::<Month>().unwrap(), Month::Jan);
        assert_eq!("September".parse::<Month>().unwrap(), Month::Sep);
        assert_eq!("January 2025".parse::<Month>().unwrap(), Month::Jan);
        assert!("q3".parse::<Month>().is_err());
    }

    #[test]
    fn calendar_rejects_out_of_order_months() {
        let calendar = Calendar { year: 2025, months: vec![Month::Feb, Month::Jan] };
        assert!(calendar.validate().is_err());
    }

    #[test]
    fn calendar_rejects_duplicates() {
        let calendar = Calendar { year: 2025, months: vec![Month::Jan, Month::Jan] };
        assert!(calendar.validate().is_err());
    }
}
