//! [`Query`] collection related to known locations.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::InfraQuery;

/// Queries up to [`read::location::list::LIMIT`] known locations, in
/// dataset order.
pub type List = InfraQuery<By<Vec<read::location::list::Entry>, ()>>;
