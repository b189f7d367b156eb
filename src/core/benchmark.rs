use std::ops::{Div, Sub};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::metrics::{MetricValue, UndefinedReason},
    prelude::*,
    quantity::percent::Percent,
};

/// Which way a metric improves. Never assumed: use intensity improves
/// downwards, a diversion rate improves upwards, and a benchmark table must
/// say which it is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkTier<V> {
    /// Ordinal position: the subject building is always rank 0.
    pub rank: usize,
    pub label: String,
    pub value: V,
}

/// Rank-ordered benchmark reference points for one metric, with the subject
/// building at rank 0 as the 100% baseline.
#[derive(Debug, Serialize)]
pub struct BenchmarkTable<V> {
    pub direction: Direction,
    tiers: Vec<BenchmarkTier<V>>,
}

impl<V: Copy + PartialOrd> BenchmarkTable<V> {
    /// Build the table and validate that every successive tier improves on
    /// the previous one in the declared direction. A violation is a
    /// configuration-data bug and fails fast.
    pub fn try_new(
        subject_label: impl Into<String>,
        subject: V,
        direction: Direction,
        reference: impl IntoIterator<Item = (String, V)>,
    ) -> Result<Self> {
        let tiers: Vec<BenchmarkTier<V>> =
            std::iter::once(BenchmarkTier { rank: 0, label: subject_label.into(), value: subject })
                .chain(reference.into_iter().enumerate().map(|(index, (label, value))| {
                    BenchmarkTier { rank: index + 1, label, value }
                }))
                .collect();
        for (previous, next) in tiers.iter().tuple_windows() {
            let improves = match direction {
                Direction::LowerIsBetter => next.value < previous.value,
                Direction::HigherIsBetter => next.value > previous.value,
            };
            ensure!(
                improves,
                "benchmark tier `{}` (rank {}) does not improve on `{}` for {direction:?}",
                next.label,
                next.rank,
                previous.label,
            );
        }
        Ok(Self { direction, tiers })
    }

    pub fn subject(&self) -> &BenchmarkTier<V> {
        &self.tiers[0]
    }

    /// Reference tiers only, i.e. everything except the subject.
    pub fn reference_tiers(&self) -> &[BenchmarkTier<V>] {
        &self.tiers[1..]
    }
}

impl<V: Copy + PartialOrd + Div<Output = f64>> BenchmarkTable<V> {
    /// `subject / tier`. For a lower-is-better metric a ratio above 1 means
    /// the subject is worse than the tier; for higher-is-better the
    /// interpretation inverts.
    pub fn ratio_to(&self, tier: &BenchmarkTier<V>) -> MetricValue<f64> {
        let ratio = self.subject().value / tier.value;
        if ratio.is_finite() {
            MetricValue::Defined(ratio)
        } else {
            MetricValue::Undefined(UndefinedReason::ZeroDenominator("benchmark tier value"))
        }
    }

    /// `tier / subject`, with the subject as the 100% reference.
    pub fn percentage_of_baseline(&self, tier: &BenchmarkTier<V>) -> MetricValue<Percent> {
        let proportion = tier.value / self.subject().value;
        if proportion.is_finite() {
            MetricValue::Defined(Percent::from_proportion(proportion))
        } else {
            MetricValue::Undefined(UndefinedReason::ZeroDenominator("subject metric value"))
        }
    }
}

impl<V: Copy + PartialOrd + Sub<Output = V>> BenchmarkTable<V> {
    /// Signed per-area excess of the subject over the tier. Positive means
    /// the subject consumes more than the tier allows; the caller scales it
    /// by building area for absolute excess quantities.
    pub fn excess_over(&self, tier: &BenchmarkTier<V>) -> V {
        self.subject().value - tier.value
    }
}
