//! [`PropertyRecord`] definitions.

use std::str::FromStr;

use common::Price;
use derive_more::{AsRef, Display, From, Into};

/// Single listed property of the served dataset.
///
/// Sourced from the tabular dataset at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct PropertyRecord {
    /// ID of this [`PropertyRecord`].
    pub id: Id,

    /// [`Address`] of this [`PropertyRecord`].
    pub address: Address,

    /// [`Area`] of this [`PropertyRecord`].
    pub area: Area,

    /// Geographic [`Coordinates`] of this [`PropertyRecord`].
    pub coordinates: Coordinates,

    /// Number of bedrooms.
    pub bedrooms: Bedrooms,

    /// Number of bathrooms.
    pub bathrooms: Bathrooms,

    /// Number of balconies.
    pub balconies: Balconies,

    /// Number of parking spaces.
    pub parking_spaces: ParkingSpaces,

    /// Number of lifts.
    pub lifts: Lifts,

    /// Furnishing [`Category`] (e.g. `Semi-Furnished`).
    pub furnished_status: Category,

    /// Building type [`Category`] (e.g. `Flat`).
    pub building_type: Category,

    /// Construction status [`Category`] (e.g. `Ready to Move`).
    pub construction_status: Category,

    /// Property age [`Category`] (e.g. `New Property` or `Resale`).
    pub property_age: Category,

    /// Listed [`Price`] of this [`PropertyRecord`].
    pub price: Price,
}

/// ID of a [`PropertyRecord`].
///
/// Properties are identified by their ordinal in the dataset, which is
/// stable for the process lifetime since the dataset is immutable.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq,
    PartialOrd,
)]
pub struct Id(usize);

/// Area of a [`PropertyRecord`] in square feet.
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd)]
pub struct Area(f64);

impl Area {
    /// Creates a new [`Area`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `area` is a positive finite
    /// number.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(area: f64) -> Self {
        Self(area)
    }

    /// Creates a new [`Area`] if the given `area` is valid.
    #[must_use]
    pub fn new(area: f64) -> Option<Self> {
        Self::check(area).then_some(Self(area))
    }

    /// Returns this [`Area`] as square feet.
    #[must_use]
    pub const fn sqft(self) -> f64 {
        self.0
    }

    /// Checks whether the given `area` is a valid [`Area`].
    fn check(area: f64) -> bool {
        area.is_finite() && area > 0.0
    }
}

/// Geographic coordinates of a [`PropertyRecord`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    /// Latitude, in degrees.
    pub latitude: f64,

    /// Longitude, in degrees.
    pub longitude: f64,
}

/// Number of bedrooms in a [`PropertyRecord`].
pub type Bedrooms = u16;

/// Number of bathrooms in a [`PropertyRecord`].
pub type Bathrooms = u16;

/// Number of balconies in a [`PropertyRecord`].
pub type Balconies = u16;

/// Number of parking spaces of a [`PropertyRecord`].
pub type ParkingSpaces = u16;

/// Number of lifts in a [`PropertyRecord`].
pub type Lifts = u16;

/// Full address of a [`PropertyRecord`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Categorical attribute value of a [`PropertyRecord`] (furnishing,
/// building type, construction status or property age).
///
/// Deliberately an open string rather than a closed enum: the set of valid
/// values is owned by the trained artifact's vocabulary, and values outside
/// of it are mapped by the encoder to its fallback bucket rather than
/// rejected here.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Category(String);

impl Category {
    /// Value representing an absent or unrecognized category.
    const UNKNOWN: &'static str = "Unknown";

    /// Creates a new [`Category`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `value` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Creates a new [`Category`] if the given `value` is valid.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        Self::check(&value).then_some(Self(value))
    }

    /// Returns the [`Category`] standing for an absent or unrecognized
    /// value.
    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.into())
    }

    /// Checks whether the given `value` is a valid [`Category`].
    fn check(value: impl AsRef<str>) -> bool {
        let value = value.as_ref();
        value.trim() == value && !value.is_empty() && value.len() <= 64
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::unknown()
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Area, Category};

    #[test]
    fn area_rejects_non_positive() {
        assert!(Area::new(-5.0).is_none());
        assert!(Area::new(0.0).is_none());
        assert!(Area::new(f64::NAN).is_none());
        assert!(Area::new(1350.0).is_some());
    }

    #[test]
    fn category_rejects_padded_or_empty() {
        assert!(Category::new("").is_none());
        assert!(Category::new(" Flat").is_none());
        assert!(Category::new("Ready to Move").is_some());
        assert_eq!(Category::unknown().to_string(), "Unknown");
    }
}
