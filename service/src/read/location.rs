//! Known locations read model definition.

pub mod list {
    //! Known locations list definitions.

    use crate::domain::property;

    /// Maximum number of [`Entry`]s ever returned by a single listing.
    pub const LIMIT: usize = 100;

    /// Name of a location to resolve against the known [`Entry`]s,
    /// case-insensitively.
    #[derive(Clone, Debug)]
    pub struct Name(pub String);

    /// Single known location.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Entry {
        /// [`property::Address`] naming this location.
        pub address: property::Address,

        /// [`property::Coordinates`] of this location.
        pub coordinates: property::Coordinates,
    }
}
