//! Loan-amortization HTTP API definitions.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    query::{self, calculate_emi},
    Query as _,
};

use crate::{define_error, AsError, Context, Error};

/// Request body of the EMI-calculation endpoint.
#[derive(Debug, Deserialize)]
pub struct EmiRequest {
    /// Principal of the loan, in Rupees.
    pub principal: f64,

    /// Annual interest rate, in percents.
    pub rate: f64,

    /// Term of the loan, in years.
    pub tenure: u16,
}

/// Response body of the EMI-calculation endpoint.
#[derive(Debug, Serialize)]
pub struct EmiResponse {
    /// Indicator of a successful calculation.
    pub success: bool,

    /// Fixed monthly payment (EMI), in Rupees.
    pub emi: f64,

    /// Total amount paid over the whole term, in Rupees.
    pub total_payment: f64,

    /// Interest portion of the total amount, in Rupees.
    pub total_interest: f64,
}

/// Calculates the amortization totals of a loan with the provided terms.
///
/// Possible error codes:
/// - `INVALID_LOAN_TERMS` - provided loan terms are out of range.
#[tracing::instrument(skip_all, fields(http.route = "/api/calculate-emi"))]
pub async fn calculate_emi(
    ctx: Context,
    Json(req): Json<EmiRequest>,
) -> Result<Json<EmiResponse>, Error> {
    drop(ctx.current_session().await?);

    let amortization = ctx
        .service()
        .execute(query::CalculateEmi {
            principal: req.principal,
            annual_rate_percent: req.rate,
            term_years: req.tenure,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(EmiResponse {
        success: true,
        emi: amortization.monthly_payment.to_f64(),
        total_payment: amortization.total_payment.to_f64(),
        total_interest: amortization.total_interest.to_f64(),
    }))
}

impl AsError for calculate_emi::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_LOAN_TERMS"]
                #[status = BAD_REQUEST]
                #[message = "Provided loan terms are out of range"]
                InvalidTerms,
            }
        }

        match self {
            Self::InvalidTerms(_) => Some(Error::InvalidTerms.into()),
        }
    }
}
