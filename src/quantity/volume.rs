use std::ops::{Div, Mul};

use crate::quantity::area::SquareFeet;

quantity!(Gallons, "gal");

quantity!(GallonsPerSquareFoot, "gal/sqft/yr");

/// Hundred cubic feet, the billing unit for natural gas.
quantity!(Ccf, "CCF");

quantity!(CcfPerSquareFoot, "CCF/sqft/yr");

impl Gallons {
    pub const fn to_kilo_gallons(self) -> f64 {
        self.0 / 1000.0
    }
}

impl Div<SquareFeet> for Gallons {
    type Output = GallonsPerSquareFoot;

    fn div(self, rhs: SquareFeet) -> Self::Output {
        GallonsPerSquareFoot(self.0 / rhs.0)
    }
}

impl Mul<SquareFeet> for GallonsPerSquareFoot {
    type Output = Gallons;

    fn mul(self, rhs: SquareFeet) -> Self::Output {
        Gallons(self.0 * rhs.0)
    }
}

impl Div<SquareFeet> for Ccf {
    type Output = CcfPerSquareFoot;

    fn div(self, rhs: SquareFeet) -> Self::Output {
        CcfPerSquareFoot(self.0 / rhs.0)
    }
}

impl Mul<SquareFeet> for CcfPerSquareFoot {
    type Output = Ccf;

    fn mul(self, rhs: SquareFeet) -> Self::Output {
        Ccf(self.0 * rhs.0)
    }
}
