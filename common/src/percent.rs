//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};

/// Floating-point percentage.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided values is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Percent`] from the provided [`f64`] value, checking
    /// the same invariants as [`Percent::new()`].
    #[must_use]
    pub fn from_f64(val: f64) -> Option<Self> {
        Decimal::from_f64(val).and_then(Self::new)
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be greater than `0` and less than `100`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Returns this [`Percent`] as an [`f64`] value.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_else(|| unreachable!("in `[0..100]`"))
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    #[test]
    fn accepts_whole_range() {
        assert!(Percent::new(Decimal::ZERO).is_some());
        assert!(Percent::new(Decimal::from(100)).is_some());
        assert!(Percent::from_f64(8.5).is_some());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Percent::new(Decimal::from(-1)).is_none());
        assert!(Percent::new(Decimal::from(101)).is_none());
        assert!(Percent::from_f64(f64::NAN).is_none());
    }
}
