use serde::{Deserialize, Serialize};

/// Unit a raw meter reading is expressed in.
///
/// The common basis per dimension is: kilowatt-hours for energy, CCF for gas,
/// gallons for water, and short tons for waste mass. Readings are converted
/// to the common basis before any intensity or cost computation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum SourceUnit {
    #[display("kWh")]
    KilowattHours,
    #[display("MWh")]
    MegawattHours,
    #[display("CCF")]
    Ccf,
    #[display("kCCF")]
    KiloCcf,
    #[display("gal")]
    Gallons,
    #[display("Mgal")]
    MillionGallons,
    #[display("lbs")]
    Pounds,
    #[display("tons")]
    ShortTons,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Dimension {
    Energy,
    GasVolume,
    WaterVolume,
    Mass,
}

impl SourceUnit {
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::KilowattHours | Self::MegawattHours => Dimension::Energy,
            Self::Ccf | Self::KiloCcf => Dimension::GasVolume,
            Self::Gallons | Self::MillionGallons => Dimension::WaterVolume,
            Self::Pounds | Self::ShortTons => Dimension::Mass,
        }
    }

    /// Multiplier from this unit to the common basis of its dimension.
    const fn basis_factor(self) -> f64 {
        match self {
            Self::KilowattHours | Self::Ccf | Self::Gallons | Self::ShortTons => 1.0,
            Self::MegawattHours | Self::KiloCcf => 1000.0,
            Self::MillionGallons => 1_000_000.0,
            Self::Pounds => 1.0 / 2000.0,
        }
    }

    pub fn to_common_basis(self, value: f64) -> f64 {
        value * self.basis_factor()
    }

    pub fn from_common_basis(self, value: f64) -> f64 {
        value / self.basis_factor()
    }
}

impl std::str::FromStr for SourceUnit {
    type Err = crate::prelude::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kwh" => Ok(Self::KilowattHours),
            "mwh" => Ok(Self::MegawattHours),
            "ccf" => Ok(Self::Ccf),
            "kccf" => Ok(Self::KiloCcf),
            "gal" | "gallons" => Ok(Self::Gallons),
            "mgal" => Ok(Self::MillionGallons),
            "lbs" | "pounds" => Ok(Self::Pounds),
            "tons" => Ok(Self::ShortTons),
            _ => Err(anyhow::anyhow!("unrecognized source unit `{value}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn round_trip_all_units() {
        for unit in [
            SourceUnit::KilowattHours,
            SourceUnit::MegawattHours,
            SourceUnit::Ccf,
            SourceUnit::KiloCcf,
            SourceUnit::Gallons,
            SourceUnit::MillionGallons,
            SourceUnit::Pounds,
            SourceUnit::ShortTons,
        ] {
            let value = 1234.5678;
            assert_abs_diff_eq!(
                unit.to_common_basis(unit.from_common_basis(value)),
                value,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn megawatt_hours_to_kilowatt_hours() {
        assert_abs_diff_eq!(SourceUnit::MegawattHours.to_common_basis(5.666), 5666.0);
    }

    #[test]
    fn million_gallons_to_gallons() {
        assert_abs_diff_eq!(
            SourceUnit::MillionGallons.to_common_basis(43.259),
            43_259_000.0
        );
    }

    #[test]
    fn kilo_ccf_to_ccf() {
        assert_abs_diff_eq!(SourceUnit::KiloCcf.to_common_basis(273.0), 273_000.0);
    }

    #[test]
    fn pounds_to_tons() {
        assert_abs_diff_eq!(SourceUnit::Pounds.to_common_basis(5000.0), 2.5);
    }
}
