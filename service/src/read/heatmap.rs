//! Heatmap read model definition.

pub mod list {
    //! Heatmap points list definitions.

    use common::Price;

    use crate::domain::property;

    /// Maximum number of [`Point`]s ever returned by a single listing.
    pub const LIMIT: usize = 500;

    /// Single point of a price heatmap.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Point {
        /// [`property::Coordinates`] of this [`Point`].
        pub coordinates: property::Coordinates,

        /// Listed [`Price`] at this [`Point`].
        pub price: Price,

        /// Relative intensity of this [`Point`], as its price divided by
        /// the maximum price among the listed [`Point`]s.
        ///
        /// Always lies in `(0.0, 1.0]`.
        pub intensity: f64,
    }
}
