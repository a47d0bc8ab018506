//! [`Query`] collection related to [`PropertyRecord`]s listing.
//!
//! [`PropertyRecord`]: crate::domain::PropertyRecord

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::InfraQuery;

/// Queries [`PropertyRecord`]s matching a [`read::property::list::Filter`],
/// in dataset order, capped at [`read::property::list::PAGE_SIZE`].
///
/// [`PropertyRecord`]: crate::domain::PropertyRecord
pub type Filtered = InfraQuery<
    By<read::property::list::Output, read::property::list::Filter>,
>;
