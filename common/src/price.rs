//! [`Price`]-related definitions.

use std::fmt;

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Amount of money in Indian Rupees.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    /// One Lakh (100 thousand) of Rupees.
    pub const LAKH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

    /// One Crore (10 million) of Rupees.
    pub const CRORE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

    /// Creates a new [`Price`] of the provided amount of Rupees.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a new [`Price`] from the provided [`f64`] amount of Rupees.
    ///
    /// [`None`] is returned if the amount is not a finite number.
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        amount
            .is_finite()
            .then(|| Decimal::from_f64_retain(amount))
            .flatten()
            .map(Self)
    }

    /// Returns the amount of Rupees of this [`Price`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount of Rupees of this [`Price`] as an [`f64`].
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns this [`Price`] divided by the provided `area`, i.e. the price
    /// of a single square foot.
    ///
    /// [`None`] is returned if the `area` is not a positive finite number.
    #[must_use]
    pub fn per_sqft(&self, area: f64) -> Option<Self> {
        if !area.is_finite() || area <= 0.0 {
            return None;
        }
        Decimal::from_f64_retain(area)
            .and_then(|a| self.0.checked_div(a))
            .map(|d| Self(d.round_dp(2)))
    }
}

impl fmt::Display for Price {
    /// Formats this [`Price`] in the Indian notation: amounts of 1 Crore and
    /// more as `₹{amount} Cr`, amounts of 1 Lakh and more as `₹{amount} Lac`,
    /// and everything below as a digit-grouped integral amount of Rupees.
    ///
    /// The unit is picked from the raw amount before any rounding, so
    /// amounts just below a unit boundary may render as a full hundred of
    /// the smaller unit (e.g. `₹9,999,999` is `₹100.00 Lac`, not `₹1.00
    /// Cr`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(amount) = self;
        if *amount >= Self::CRORE {
            let mut crores = amount / Self::CRORE;
            crores.rescale(2);
            write!(f, "₹{crores} Cr")
        } else if *amount >= Self::LAKH {
            let mut lakhs = amount / Self::LAKH;
            lakhs.rescale(2);
            write!(f, "₹{lakhs} Lac")
        } else {
            let int = amount
                .round()
                .to_i128()
                .unwrap_or_else(|| unreachable!("below 1 Lakh"));
            write!(f, "₹{}", group_digits(int))
        }
    }
}

/// Groups the digits of the provided integer by thousands.
fn group_digits(mut value: i128) -> String {
    let negative = value < 0;
    value = value.abs();

    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Price;

    fn price(amount: i64) -> Price {
        Price::new(Decimal::from(amount))
    }

    #[test]
    fn formats_crores() {
        assert_eq!(price(10_000_000).to_string(), "₹1.00 Cr");
        assert_eq!(price(25_500_000).to_string(), "₹2.55 Cr");
        assert_eq!(price(123_456_789).to_string(), "₹12.35 Cr");
    }

    #[test]
    fn formats_lakhs() {
        assert_eq!(price(100_000).to_string(), "₹1.00 Lac");
        assert_eq!(price(4_550_000).to_string(), "₹45.50 Lac");
        assert_eq!(price(9_999_999).to_string(), "₹100.00 Lac");
    }

    #[test]
    fn formats_plain_amounts() {
        assert_eq!(price(0).to_string(), "₹0");
        assert_eq!(price(999).to_string(), "₹999");
        assert_eq!(price(99_999).to_string(), "₹99,999");
    }

    #[test]
    fn respects_unit_boundaries() {
        assert!(!price(9_999_999).to_string().contains("Cr"));
        assert!(price(10_000_000).to_string().contains("Cr"));
        assert!(!price(99_999).to_string().contains("Lac"));
        assert!(price(100_000).to_string().contains("Lac"));
    }

    #[test]
    fn divides_per_sqft() {
        assert_eq!(
            price(5_000_000).per_sqft(1000.0),
            Some(price(5000)),
        );
        assert_eq!(price(5_000_000).per_sqft(0.0), None);
        assert_eq!(price(5_000_000).per_sqft(-5.0), None);
    }
}
