use serde::Serialize;

use crate::quantity::cost::Dollars;

/// One improvement step of a savings scenario.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioStep {
    pub label: String,
    pub annual_savings: Dollars,
}

#[derive(Clone, Debug, Serialize)]
pub struct CumulativePoint {
    pub label: String,
    pub delta: Dollars,
    pub cumulative: Dollars,
}

/// Running-total projection of an ordered improvement scenario.
///
/// Steps are applied in the declared order, never reordered by magnitude:
/// later steps assume the earlier ones have been realized. The projection is
/// a pure summation and does not judge feasibility. The first point is the
/// zero-savings baseline.
pub fn project(steps: &[ScenarioStep]) -> Vec<CumulativePoint> {
    let mut cumulative = Dollars::ZERO;
    std::iter::once(CumulativePoint {
        label: "Baseline".to_string(),
        delta: Dollars::ZERO,
        cumulative,
    })
    .chain(steps.iter().map(|step| {
        cumulative += step.annual_savings;
        CumulativePoint { label: step.label.clone(), delta: step.annual_savings, cumulative }
    }))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(label: &str, savings: f64) -> ScenarioStep {
        ScenarioStep { label: label.to_string(), annual_savings: Dollars(savings) }
    }

    #[test]
    fn cumulative_sequence_with_baseline() {
        let steps = [
            step("Space consolidation", 50.0),
            step("Smart HVAC", 30.0),
            step("Water optimization", 20.0),
            step("LED retrofit", 10.0),
        ];
        let points = project(&steps);
        let cumulative: Vec<f64> = points.iter().map(|point| point.cumulative.0).collect();
        assert_eq!(cumulative, vec![0.0, 50.0, 80.0, 100.0, 110.0]);
    }

    #[test]
    fn cumulative_is_monotonically_non_decreasing() {
        let steps = [step("a", 120_000.0), step("b", 0.0), step("c", 40_000.0)];
        let points = project(&steps);
        assert!(points.windows(2).all(|pair| pair[1].cumulative >= pair[0].cumulative));
    }

    #[test]
    fn declared_order_is_preserved() {
        let steps = [step("small first", 1.0), step("large second", 100.0)];
        let points = project(&steps);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Baseline", "small first", "large second"]);
    }
}
