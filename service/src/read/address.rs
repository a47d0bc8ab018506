//! Address search read model definition.

pub mod search {
    //! Address substring search definitions.

    use crate::domain::property;

    /// Maximum number of [`Match`]es ever returned by a single search.
    pub const LIMIT: usize = 10;

    /// Minimum length of a [`Needle`], in characters, to perform a search
    /// at all.
    pub const MIN_NEEDLE_LEN: usize = 2;

    /// Substring to search [`property::Address`]es for,
    /// case-insensitively.
    #[derive(Clone, Debug)]
    pub struct Needle(pub String);

    /// Single matched [`property::Address`] along with its coordinates.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Match {
        /// Matched [`property::Address`].
        pub address: property::Address,

        /// [`property::Coordinates`] of the matched address.
        pub coordinates: property::Coordinates,
    }
}
