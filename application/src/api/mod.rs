//! HTTP API definitions.

pub mod estimate;
pub mod loan;
pub mod property;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::define_error;

/// Assembles the [`Router`] of the whole HTTP API.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/api/session", post(session::create))
        .route("/api/predict", post(estimate::predict))
        .route("/api/calculate-emi", post(loan::calculate_emi))
        .route("/api/locations", get(property::locations))
        .route("/api/search-addresses", get(property::search_addresses))
        .route("/api/heatmap-data", get(property::heatmap_data))
        .route("/api/filter-properties", get(property::filter))
        .route("/api/property/:id", get(property::by_id))
}

define_error! {
    enum InputError {
        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "Invalid input"]
        Invalid,
    }
}
