//! Loan amortization definitions.

use common::{Percent, Price};
use derive_more::{Display, Error};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};

/// Terms of a fixed-rate home loan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoanTerms {
    /// Borrowed principal, in Rupees.
    principal: Decimal,

    /// Annual interest rate.
    annual_rate: Percent,

    /// Term of the loan, in years.
    term_years: u16,
}

impl LoanTerms {
    /// Creates new [`LoanTerms`] out of the provided values.
    ///
    /// # Errors
    ///
    /// Errors if the `principal` is not positive, the `annual_rate` is not a
    /// valid [`Percent`], or the `term_years` is zero. Out-of-range values
    /// are rejected, never clamped.
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        term_years: u16,
    ) -> Result<Self, InvalidLoanTerms> {
        use InvalidLoanTerms as E;

        let principal = (principal.is_finite() && principal > 0.0)
            .then(|| Decimal::from_f64(principal))
            .flatten()
            .ok_or(E::NonPositivePrincipal)?;
        let annual_rate =
            Percent::from_f64(annual_rate_percent).ok_or(E::InvalidRate)?;
        if term_years == 0 {
            return Err(E::ZeroTerm);
        }

        Ok(Self {
            principal,
            annual_rate,
            term_years,
        })
    }

    /// Computes the [`Amortization`] schedule totals of these [`LoanTerms`].
    ///
    /// Standard fixed-rate amortization: with the monthly rate `r` and the
    /// number of payments `n`, the monthly payment is
    /// `principal * r * (1 + r)^n / ((1 + r)^n - 1)`, degenerating to a
    /// plain `principal / n` split when the rate is zero.
    #[expect(
        clippy::missing_panics_doc,
        reason = "payment amounts are always finite"
    )]
    #[must_use]
    pub fn amortize(&self) -> Amortization {
        let months = u32::from(self.term_years) * 12;
        let n = Decimal::from(months);

        if self.annual_rate.to_f64() == 0.0 {
            // No interest accrues, so the totals are exact by construction.
            return Amortization {
                monthly_payment: Price::new(self.principal / n),
                total_payment: Price::new(self.principal),
                total_interest: Price::new(Decimal::ZERO),
            };
        }

        let principal = self
            .principal
            .to_f64()
            .unwrap_or_else(|| unreachable!("validated finite"));
        let r = self.annual_rate.to_f64() / 12.0 / 100.0;
        let growth = (1.0 + r).powi(
            i32::try_from(months).unwrap_or_else(|_| unreachable!("<= 12960")),
        );
        let monthly = principal * r * growth / (growth - 1.0);

        let monthly = Decimal::from_f64(monthly)
            .unwrap_or_else(|| unreachable!("finite payment"))
            .round_dp(2);
        let total = monthly * n;

        Amortization {
            monthly_payment: Price::new(monthly),
            total_payment: Price::new(total),
            total_interest: Price::new(total - self.principal),
        }
    }

    /// Returns the borrowed principal of these [`LoanTerms`].
    #[must_use]
    pub const fn principal(&self) -> Decimal {
        self.principal
    }
}

/// Computed totals of a [`LoanTerms`] amortization schedule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Amortization {
    /// Fixed monthly payment (EMI).
    pub monthly_payment: Price,

    /// Total amount paid over the whole term.
    pub total_payment: Price,

    /// Interest portion of the total amount.
    pub total_interest: Price,
}

/// Error of constructing [`LoanTerms`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum InvalidLoanTerms {
    /// Annual rate is negative, above 100, or not a number.
    #[display("annual rate must be within [0, 100] percent")]
    InvalidRate,

    /// Principal is zero, negative, or not a finite number.
    #[display("principal must be a positive amount")]
    NonPositivePrincipal,

    /// Term is zero years.
    #[display("term must be at least 1 year")]
    ZeroTerm,
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{InvalidLoanTerms, LoanTerms};

    #[test]
    fn matches_standard_formula() {
        let terms = LoanTerms::new(5_000_000.0, 8.5, 20).unwrap();
        let amortization = terms.amortize();

        let monthly = amortization.monthly_payment.amount();
        assert!(
            (monthly - Decimal::from(43_391)).abs() < Decimal::ONE,
            "unexpected monthly payment: {monthly}",
        );
        assert_eq!(
            amortization.total_interest.amount(),
            amortization.total_payment.amount() - terms.principal(),
        );
    }

    #[test]
    fn zero_rate_splits_principal_evenly() {
        let terms = LoanTerms::new(5_000_000.0, 0.0, 20).unwrap();
        let amortization = terms.amortize();

        assert_eq!(
            amortization.monthly_payment.amount(),
            Decimal::from(5_000_000) / Decimal::from(240),
        );
        assert_eq!(
            amortization.total_payment.amount(),
            Decimal::from(5_000_000),
        );
        assert_eq!(amortization.total_interest.amount(), Decimal::ZERO);
    }

    #[test]
    fn rejects_invalid_terms() {
        assert!(matches!(
            LoanTerms::new(-1.0, 8.5, 20),
            Err(InvalidLoanTerms::NonPositivePrincipal),
        ));
        assert!(matches!(
            LoanTerms::new(5_000_000.0, -0.1, 20),
            Err(InvalidLoanTerms::InvalidRate),
        ));
        assert!(matches!(
            LoanTerms::new(5_000_000.0, 8.5, 0),
            Err(InvalidLoanTerms::ZeroTerm),
        ));
    }
}
