use std::ops::{Div, Mul};

use crate::quantity::area::SquareFeet;

quantity!(Pounds, "lbs");

/// Short (US) tons.
quantity!(ShortTons, "tons");

quantity!(PoundsPerSquareFoot, "lbs/sqft/yr");

impl Pounds {
    pub const PER_SHORT_TON: f64 = 2000.0;

    pub fn to_short_tons(self) -> ShortTons {
        ShortTons(self.0 / Self::PER_SHORT_TON)
    }
}

impl ShortTons {
    pub fn to_pounds(self) -> Pounds {
        Pounds(self.0 * Pounds::PER_SHORT_TON)
    }
}

impl Div<SquareFeet> for Pounds {
    type Output = PoundsPerSquareFoot;

    fn div(self, rhs: SquareFeet) -> Self::Output {
        PoundsPerSquareFoot(self.0 / rhs.0)
    }
}

impl Mul<SquareFeet> for PoundsPerSquareFoot {
    type Output = Pounds;

    fn mul(self, rhs: SquareFeet) -> Self::Output {
        Pounds(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pounds_to_tons_and_back() {
        assert_eq!(Pounds(5000.0).to_short_tons(), ShortTons(2.5));
        assert_eq!(ShortTons(2.5).to_pounds(), Pounds(5000.0));
    }
}
