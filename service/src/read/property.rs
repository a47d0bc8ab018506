//! [`PropertyRecord`] read model definition.
//!
//! [`PropertyRecord`]: crate::domain::PropertyRecord

pub mod list {
    //! [`PropertyRecord`]s list definitions.

    use common::Price;

    use crate::domain::property;
    #[cfg(doc)]
    use crate::domain::PropertyRecord;

    /// Maximum number of [`PropertyRecord`]s ever returned by a single
    /// filtered listing.
    pub const PAGE_SIZE: usize = 20;

    /// Filter for [`PropertyRecord`]s listing.
    ///
    /// Every criterion is optional, and the absent ones don't narrow the
    /// listing down.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Lower bound (inclusive) of a [`PropertyRecord`]'s price.
        pub min_price: Option<Price>,

        /// Upper bound (inclusive) of a [`PropertyRecord`]'s price.
        pub max_price: Option<Price>,

        /// Exact number of bedrooms.
        pub bedrooms: Option<property::Bedrooms>,

        /// Building type (or its part) to search for, case-insensitively.
        pub building_type: Option<String>,

        /// [`property::Address`] part to search for, case-insensitively.
        pub location: Option<String>,
    }

    /// Output of a filtered [`PropertyRecord`]s listing.
    #[derive(Clone, Debug)]
    pub struct Output {
        /// Total count of the matched [`PropertyRecord`]s, before any
        /// [`PAGE_SIZE`] capping.
        pub total_count: usize,

        /// First [`PAGE_SIZE`] matched [`PropertyRecord`]s, in dataset
        /// order.
        pub records: Vec<property::PropertyRecord>,
    }
}
