use std::{
    collections::BTreeMap,
    iter::Sum,
    ops::{AddAssign, Div},
};

use enumset::EnumSet;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    calendar::{Calendar, Month, Season},
    prelude::*,
};

/// Ordered monthly series over the canonical month ordering.
///
/// A month that was never observed is absent, not zero: totals and averages
/// run over the present months only, so a partial year never skews them.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct MonthlySeries<V> {
    values: BTreeMap<Month, V>,
}

impl<V> Default for MonthlySeries<V> {
    fn default() -> Self {
        Self { values: BTreeMap::new() }
    }
}

impl<V> MonthlySeries<V> {
    /// Insert a value for a month that must not be present yet.
    pub fn try_insert(&mut self, month: Month, value: V) -> Result {
        ensure!(
            !self.values.contains_key(&month),
            "duplicate entry for `{month}`: two rows claim the same month",
        );
        self.values.insert(month, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the present months in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, &V)> {
        self.values.iter().map(|(month, value)| (*month, value))
    }

    pub fn observed(&self) -> EnumSet<Month> {
        self.values.keys().copied().collect()
    }

    /// Calendar months with no observation.
    pub fn missing_in(&self, calendar: &Calendar) -> EnumSet<Month> {
        calendar.as_set() - self.observed()
    }
}

impl<V: Copy> MonthlySeries<V> {
    pub fn get(&self, month: Month) -> Option<V> {
        self.values.get(&month).copied()
    }

    /// Accumulate into a month, creating it when absent.
    pub fn accumulate(&mut self, month: Month, value: V)
    where
        V: AddAssign + Default,
    {
        *self.values.entry(month).or_default() += value;
    }

    /// Total over the *present* months.
    pub fn total(&self) -> V
    where
        V: Sum,
    {
        self.values.values().copied().sum()
    }

    /// Total over the full analysis calendar, or [`None`] when any calendar
    /// month is absent. Partial data must not masquerade as an annual total.
    pub fn calendar_total(&self, calendar: &Calendar) -> Option<V>
    where
        V: Sum,
    {
        self.missing_in(calendar).is_empty().then(|| self.total())
    }

    /// Mean over the present months, [`None`] for an empty series.
    #[expect(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<V>
    where
        V: Sum + Div<f64, Output = V>,
    {
        (!self.is_empty()).then(|| self.total() / self.values.len() as f64)
    }

    /// Mean over the observed months of the season, [`None`] when the season
    /// has no observed months.
    #[expect(clippy::cast_precision_loss)]
    pub fn season_mean(&self, season: Season) -> Option<V>
    where
        V: Sum + Div<f64, Output = V>,
    {
        let observed = (season.0 & self.observed()).len();
        (observed > 0).then(|| {
            self.iter()
                .filter(|(month, _)| season.0.contains(*month))
                .map(|(_, value)| *value)
                .sum::<V>()
                / observed as f64
        })
    }

    pub fn peak(&self) -> Option<(Month, V)>
    where
        V: Ord,
    {
        self.iter().map(|(month, value)| (month, *value)).max_by_key(|(_, value)| *value)
    }

    pub fn trough(&self) -> Option<(Month, V)>
    where
        V: Ord,
    {
        self.iter().map(|(month, value)| (month, *value)).min_by_key(|(_, value)| *value)
    }
}

impl<V> MonthlySeries<V> {
    /// Build from `(month, value)` pairs, rejecting duplicate months.
    pub fn try_from_iter(pairs: impl IntoIterator<Item = (Month, V)>) -> Result<Self> {
        let mut this = Self::default();
        for (month, value) in pairs {
            this.try_insert(month, value)?;
        }
        Ok(this)
    }
}

impl<T> Deltas for T where T: ?Sized {}

/// Pairwise month-over-month deltas over an ordered `(month, value)` iterator.
pub trait Deltas {
    fn deltas<V>(self) -> impl Iterator<Item = ((Month, Month), (V, V))>
    where
        Self: Iterator<Item = (Month, V)> + Sized,
        V: Copy,
    {
        self.tuple_windows()
            .map(|((from_month, from), (to_month, to))| ((from_month, to_month), (from, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::volume::Gallons;

    fn spring() -> Season {
        Season(Month::Mar | Month::Apr | Month::May)
    }

    #[test]
    fn duplicate_month_is_rejected() {
        let mut series = MonthlySeries::default();
        series.try_insert(Month::Jan, Gallons(1.0)).unwrap();
        assert!(series.try_insert(Month::Jan, Gallons(2.0)).is_err());
    }

    #[test]
    fn absent_months_are_excluded_from_means() {
        // Only two of the three spring months observed.
        let series = MonthlySeries::try_from_iter([
            (Month::Mar, Gallons(10.0)),
            (Month::May, Gallons(30.0)),
        ])
        .unwrap();
        assert_eq!(series.season_mean(spring()), Some(Gallons(20.0)));
    }

    #[test]
    fn season_with_no_observations_is_none() {
        let series = MonthlySeries::try_from_iter([(Month::Jul, Gallons(1.0))]).unwrap();
        assert_eq!(series.season_mean(spring()), None);
    }

    #[test]
    fn calendar_total_requires_every_month() {
        let calendar = Calendar { year: 2025, months: vec![Month::Jan, Month::Feb] };
        let series = MonthlySeries::try_from_iter([(Month::Jan, Gallons(5.0))]).unwrap();
        assert_eq!(series.calendar_total(&calendar), None);

        let full = MonthlySeries::try_from_iter([
            (Month::Jan, Gallons(5.0)),
            (Month::Feb, Gallons(7.0)),
        ])
        .unwrap();
        assert_eq!(full.calendar_total(&calendar), Some(Gallons(12.0)));
    }

    #[test]
    fn deltas_pair_adjacent_months() {
        let series = MonthlySeries::try_from_iter([
            (Month::Jan, Gallons(100.0)),
            (Month::Feb, Gallons(150.0)),
            (Month::Mar, Gallons(120.0)),
        ])
        .unwrap();
        let deltas: Vec<_> =
            series.iter().map(|(month, value)| (month, *value)).deltas().collect();
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].0, (Month::Jan, Month::Feb));
        assert_eq!(deltas[1].1, (Gallons(150.0), Gallons(120.0)));
    }
}
