//! [`Query`] collection related to address search.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::InfraQuery;

/// Queries up to [`read::address::search::LIMIT`] addresses containing a
/// [`read::address::search::Needle`], case-insensitively.
///
/// Needles shorter than [`read::address::search::MIN_NEEDLE_LEN`] match
/// nothing.
pub type Search = InfraQuery<
    By<Vec<read::address::search::Match>, read::address::search::Needle>,
>;
