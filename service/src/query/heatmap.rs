//! [`Query`] collection related to the price heatmap.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::InfraQuery;

/// Queries up to [`read::heatmap::list::LIMIT`] heatmap points with their
/// price-scaled intensities.
pub type Points = InfraQuery<By<Vec<read::heatmap::list::Point>, ()>>;
