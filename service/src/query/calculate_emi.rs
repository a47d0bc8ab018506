//! [`Query`] computing a loan amortization schedule.

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        loan::{self, LoanTerms},
        Amortization,
    },
    Service,
};

use super::Query;

/// [`Query`] computing the [`Amortization`] totals of a fixed-rate home
/// loan.
///
/// Pure arithmetic over the provided terms, touching no loaded state.
#[derive(Clone, Copy, Debug)]
pub struct CalculateEmi {
    /// Borrowed principal, in Rupees.
    pub principal: f64,

    /// Annual interest rate, in percents.
    pub annual_rate_percent: f64,

    /// Term of the loan, in years.
    pub term_years: u16,
}

impl<I> Query<CalculateEmi> for Service<I> {
    type Ok = Amortization;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: CalculateEmi,
    ) -> Result<Self::Ok, Self::Err> {
        let terms = LoanTerms::new(
            query.principal,
            query.annual_rate_percent,
            query.term_years,
        )
        .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        Ok(terms.amortize())
    }
}

/// Error of [`CalculateEmi`] [`Query`] execution.
#[derive(Clone, Copy, Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided loan terms are out of range.
    #[display("Invalid loan terms: {_0}")]
    InvalidTerms(loan::InvalidLoanTerms),
}
