use std::ops::Mul;

use crate::quantity::{energy::KilowattHours, mass::Pounds, volume::{Ccf, Gallons}};

quantity!(Dollars, "USD");

quantity!(DollarsPerKilowattHour, "USD/kWh");

quantity!(DollarsPerCcf, "USD/CCF");

quantity!(DollarsPerGallon, "USD/gal");

quantity!(PoundsPerKilowattHour, "lbs/kWh");

quantity!(PoundsPerCcf, "lbs/CCF");

/// Embedded energy of municipal water supply and treatment,
/// in kilowatt-hours per thousand gallons.
quantity!(KilowattHoursPerKiloGallon, "kWh/kgal");

impl Mul<DollarsPerKilowattHour> for KilowattHours {
    type Output = Dollars;

    fn mul(self, rhs: DollarsPerKilowattHour) -> Self::Output {
        Dollars(self.0 * rhs.0)
    }
}

impl Mul<DollarsPerCcf> for Ccf {
    type Output = Dollars;

    fn mul(self, rhs: DollarsPerCcf) -> Self::Output {
        Dollars(self.0 * rhs.0)
    }
}

impl Mul<DollarsPerGallon> for Gallons {
    type Output = Dollars;

    fn mul(self, rhs: DollarsPerGallon) -> Self::Output {
        Dollars(self.0 * rhs.0)
    }
}

impl Mul<PoundsPerKilowattHour> for KilowattHours {
    type Output = Pounds;

    fn mul(self, rhs: PoundsPerKilowattHour) -> Self::Output {
        Pounds(self.0 * rhs.0)
    }
}

impl Mul<PoundsPerCcf> for Ccf {
    type Output = Pounds;

    fn mul(self, rhs: PoundsPerCcf) -> Self::Output {
        Pounds(self.0 * rhs.0)
    }
}

impl Mul<KilowattHoursPerKiloGallon> for Gallons {
    type Output = KilowattHours;

    fn mul(self, rhs: KilowattHoursPerKiloGallon) -> Self::Output {
        KilowattHours(self.to_kilo_gallons() * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_cost() {
        assert_eq!(KilowattHours(100.0) * DollarsPerKilowattHour(0.15), Dollars(15.0));
    }

    #[test]
    fn water_embedded_energy() {
        // 129.777M gallons at 27.5 kWh/kgal.
        let embedded = Gallons(129_777_000.0) * KilowattHoursPerKiloGallon(27.5);
        assert_eq!(embedded, KilowattHours(3_568_867.5));
    }
}
