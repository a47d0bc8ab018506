//! [`Query`] collection related to a single [`PropertyRecord`].

use common::operations::By;

use crate::domain::{property, PropertyRecord};
#[cfg(doc)]
use crate::Query;

use super::InfraQuery;

/// Queries a [`PropertyRecord`] by its [`property::Id`].
pub type ById = InfraQuery<By<Option<PropertyRecord>, property::Id>>;
