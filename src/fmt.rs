use std::fmt::{Display, Formatter};

use crate::quantity::cost::Dollars;

/// One-decimal rendering for table cells.
pub struct Rounded(pub f64);

impl Display for Rounded {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

pub struct Money(pub Dollars);

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_keeps_cents() {
        assert_eq!(Money(Dollars(1234.5)).to_string(), "$1234.50");
        assert_eq!(Rounded(714.567).to_string(), "714.6");
    }
}
