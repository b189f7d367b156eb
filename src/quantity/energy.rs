use std::ops::{Div, Mul};

use crate::quantity::area::SquareFeet;

quantity!(KilowattHours, "kWh");

quantity!(KilowattHoursPerSquareFoot, "kWh/sqft/yr");

impl Div<SquareFeet> for KilowattHours {
    type Output = KilowattHoursPerSquareFoot;

    fn div(self, rhs: SquareFeet) -> Self::Output {
        KilowattHoursPerSquareFoot(self.0 / rhs.0)
    }
}

impl Mul<SquareFeet> for KilowattHoursPerSquareFoot {
    type Output = KilowattHours;

    fn mul(self, rhs: SquareFeet) -> Self::Output {
        KilowattHours(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_round_trips_through_area() {
        let area = SquareFeet(181_616.0);
        let annual = KilowattHours(5_666_000.0);
        assert_eq!(annual / area * area, annual);
    }
}
