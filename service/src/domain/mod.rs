//! Domain definitions.

pub mod feature;
pub mod loan;
pub mod property;
pub mod user;

pub use self::{
    feature::{FeatureVector, Normalizer, PropertyFacts, Schema},
    loan::{Amortization, LoanTerms},
    property::PropertyRecord,
    user::User,
};
