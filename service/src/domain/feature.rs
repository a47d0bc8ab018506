//! Feature assembly for the trained price regressor.

use std::collections::HashMap;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::property::{
    Area, Balconies, Bathrooms, Bedrooms, Category, Coordinates, Lifts,
    ParkingSpaces,
};

/// Input manifest published alongside the trained artifact: the exact
/// ordered set of columns the regressor was fit on.
///
/// Column order is part of the artifact's contract: the produced
/// [`FeatureVector`] lays out standardized numeric columns first, followed
/// by the one-hot blocks of categorical columns, in manifest order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Schema {
    /// Numeric columns, in training order.
    pub numeric: Vec<NumericColumn>,

    /// Categorical columns, in training order.
    pub categorical: Vec<CategoricalColumn>,
}

impl Schema {
    /// Returns the total width of a [`FeatureVector`] under this [`Schema`].
    #[must_use]
    pub fn width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }
}

/// Numeric column of a [`Schema`], with its fitted standardization
/// parameters.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NumericColumn {
    /// Name of this column, as used at training time.
    pub name: String,

    /// Fitted mean subtracted during standardization.
    #[serde(default)]
    pub mean: f64,

    /// Fitted deviation divided by during standardization.
    #[serde(default = "NumericColumn::identity_deviation")]
    pub deviation: f64,
}

impl NumericColumn {
    /// Deviation leaving the raw value unscaled.
    const fn identity_deviation() -> f64 {
        1.0
    }
}

/// Categorical column of a [`Schema`], with its fitted vocabulary.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CategoricalColumn {
    /// Name of this column, as used at training time.
    pub name: String,

    /// One-hot vocabulary of this column, in encoder order.
    pub categories: Vec<String>,
}

/// Assembler of [`FeatureVector`]s for a fixed [`Schema`].
///
/// Built once at startup: the per-column value sources and the
/// category-to-offset tables are resolved here, so serving-time
/// normalization is a plain table walk with no name lookups.
#[derive(Clone, Debug)]
pub struct Normalizer {
    /// Numeric column sources with their standardization parameters.
    numeric: Vec<(NumericSource, f64, f64)>,

    /// Categorical column sources with their category-to-offset tables.
    categorical: Vec<(CategoricalSource, HashMap<String, usize>)>,

    /// Total width of produced [`FeatureVector`]s.
    width: usize,
}

impl Normalizer {
    /// Creates a new [`Normalizer`] for the provided [`Schema`].
    ///
    /// # Errors
    ///
    /// Errors if the [`Schema`] names a column this serving core cannot
    /// supply, or carries degenerate fitted parameters. Both indicate an
    /// incompatible artifact and are fatal at startup.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        use SchemaError as E;

        if schema.numeric.is_empty() && schema.categorical.is_empty() {
            return Err(E::Empty);
        }

        let numeric = schema
            .numeric
            .iter()
            .map(|col| {
                let source = NumericSource::resolve(&col.name)
                    .ok_or_else(|| E::UnknownNumericColumn(col.name.clone()))?;
                if col.deviation == 0.0 || !col.deviation.is_finite() {
                    return Err(E::DegenerateDeviation(col.name.clone()));
                }
                Ok((source, col.mean, col.deviation))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categorical = schema
            .categorical
            .iter()
            .map(|col| {
                let source =
                    CategoricalSource::resolve(&col.name).ok_or_else(|| {
                        E::UnknownCategoricalColumn(col.name.clone())
                    })?;
                if col.categories.is_empty() {
                    return Err(E::EmptyVocabulary(col.name.clone()));
                }
                let offsets = col
                    .categories
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (c.clone(), i))
                    .collect();
                Ok((source, offsets))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            numeric,
            categorical,
            width: schema.width(),
        })
    }

    /// Assembles a [`FeatureVector`] out of the provided [`PropertyFacts`].
    ///
    /// An unseen categorical value produces an all-zero one-hot block for
    /// its column, matching the training-time encoder ignoring unknowns.
    #[must_use]
    pub fn normalize(&self, facts: &PropertyFacts) -> FeatureVector {
        let mut values = Vec::with_capacity(self.width);

        for &(source, mean, deviation) in &self.numeric {
            values.push((source.value(facts) - mean) / deviation);
        }

        let mut offset = values.len();
        values.resize(self.width, 0.0);
        for (source, offsets) in &self.categorical {
            let value: &str = source.value(facts).as_ref();
            if let Some(&i) = offsets.get(value) {
                values[offset + i] = 1.0;
            }
            offset += offsets.len();
        }

        FeatureVector {
            values,
            area: facts.area,
        }
    }
}

/// Serving-side source of a numeric [`Schema`] column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NumericSource {
    /// Raw area, in square feet.
    Area,

    /// Latitude of the resolved location.
    Latitude,

    /// Longitude of the resolved location.
    Longitude,

    /// Number of bedrooms.
    Bedrooms,

    /// Number of bathrooms.
    Bathrooms,

    /// Number of balconies.
    Balconies,

    /// Number of parking spaces.
    ParkingSpaces,

    /// Number of lifts.
    Lifts,

    /// Location-zone price-per-sqft prior.
    PriceSqft,

    /// Engineered: bedrooms plus bathrooms.
    TotalRooms,

    /// Engineered: bedrooms over a floor-of-1 bathroom count.
    BedBathRatio,

    /// Engineered flag: any parking spaces.
    HasParking,

    /// Engineered flag: any lifts.
    HasLift,

    /// Engineered flag: any balconies.
    HasBalcony,
}

impl NumericSource {
    /// Resolves the training-time column `name` into its serving-side
    /// source.
    fn resolve(name: &str) -> Option<Self> {
        Some(match name {
            "area" => Self::Area,
            "latitude" => Self::Latitude,
            "longitude" => Self::Longitude,
            "Bedrooms" => Self::Bedrooms,
            "Bathrooms" => Self::Bathrooms,
            "Balcony" => Self::Balconies,
            "parking" => Self::ParkingSpaces,
            "Lift" => Self::Lifts,
            "Price_sqft" => Self::PriceSqft,
            "total_rooms" => Self::TotalRooms,
            "bed_bath_ratio" => Self::BedBathRatio,
            "has_parking" => Self::HasParking,
            "has_lift" => Self::HasLift,
            "has_balcony" => Self::HasBalcony,
            _ => return None,
        })
    }

    /// Returns the raw value of this column for the provided
    /// [`PropertyFacts`].
    fn value(self, facts: &PropertyFacts) -> f64 {
        match self {
            Self::Area => facts.area.sqft(),
            Self::Latitude => facts.coordinates.latitude,
            Self::Longitude => facts.coordinates.longitude,
            Self::Bedrooms => facts.bedrooms.into(),
            Self::Bathrooms => facts.bathrooms.into(),
            Self::Balconies => facts.balconies.into(),
            Self::ParkingSpaces => facts.parking_spaces.into(),
            Self::Lifts => facts.lifts.into(),
            Self::PriceSqft => zone_price_sqft(facts.coordinates),
            Self::TotalRooms => {
                f64::from(facts.bedrooms) + f64::from(facts.bathrooms)
            }
            Self::BedBathRatio => {
                // Floor of 1 keeps zero-bathroom inputs well-defined.
                f64::from(facts.bedrooms) / f64::from(facts.bathrooms.max(1))
            }
            Self::HasParking => f64::from(facts.parking_spaces > 0),
            Self::HasLift => f64::from(facts.lifts > 0),
            Self::HasBalcony => f64::from(facts.balconies > 0),
        }
    }
}

/// Serving-side source of a categorical [`Schema`] column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CategoricalSource {
    /// Construction status.
    ConstructionStatus,

    /// Property age.
    PropertyAge,

    /// Furnishing status.
    FurnishedStatus,

    /// Building type.
    BuildingType,
}

impl CategoricalSource {
    /// Resolves the training-time column `name` into its serving-side
    /// source.
    fn resolve(name: &str) -> Option<Self> {
        Some(match name {
            "Status" => Self::ConstructionStatus,
            "neworold" => Self::PropertyAge,
            "Furnished_status" => Self::FurnishedStatus,
            "type_of_building" => Self::BuildingType,
            _ => return None,
        })
    }

    /// Returns the [`Category`] value of this column for the provided
    /// [`PropertyFacts`].
    fn value(self, facts: &PropertyFacts) -> &Category {
        match self {
            Self::ConstructionStatus => &facts.construction_status,
            Self::PropertyAge => &facts.property_age,
            Self::FurnishedStatus => &facts.furnished_status,
            Self::BuildingType => &facts.building_type,
        }
    }
}

/// Validated raw attributes of a property being estimated.
#[derive(Clone, Debug)]
pub struct PropertyFacts {
    /// Resolved geographic [`Coordinates`].
    pub coordinates: Coordinates,

    /// [`Area`], in square feet.
    pub area: Area,

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

    /// Furnishing [`Category`].
    pub furnished_status: Category,

    /// Building type [`Category`].
    pub building_type: Category,

    /// Construction status [`Category`].
    pub construction_status: Category,

    /// Property age [`Category`].
    pub property_age: Category,
}

/// Assembled model input: standardized numerics followed by one-hot
/// blocks, in [`Schema`] order.
///
/// Ephemeral, constructed per request. Carries the originating [`Area`] so
/// per-sqft derivations use the exact value the vector was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    /// Column values, in [`Schema`] order.
    values: Vec<f64>,

    /// [`Area`] the vector was assembled from.
    area: Area,
}

impl FeatureVector {
    /// Returns the column values of this [`FeatureVector`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the [`Area`] this [`FeatureVector`] was assembled from.
    #[must_use]
    pub const fn area(&self) -> Area {
        self.area
    }
}

/// Error of building a [`Normalizer`] from a [`Schema`].
#[derive(Clone, Debug, Display, Error)]
pub enum SchemaError {
    /// Numeric column has a zero or non-finite fitted deviation.
    #[display("numeric column `{_0}` has a degenerate fitted deviation")]
    DegenerateDeviation(#[error(not(source))] String),

    /// [`Schema`] has no columns at all.
    #[display("artifact schema has no columns")]
    Empty,

    /// Categorical column has no vocabulary.
    #[display("categorical column `{_0}` has an empty vocabulary")]
    EmptyVocabulary(#[error(not(source))] String),

    /// Categorical column this serving core cannot supply.
    #[display("unknown categorical column `{_0}` in artifact schema")]
    UnknownCategoricalColumn(#[error(not(source))] String),

    /// Numeric column this serving core cannot supply.
    #[display("unknown numeric column `{_0}` in artifact schema")]
    UnknownNumericColumn(#[error(not(source))] String),
}

/// Returns the price-per-sqft prior of the location zone containing the
/// provided [`Coordinates`].
///
/// The zone table reflects Delhi NCR market tiers the regressor was trained
/// against: premium South/Central Delhi down to outer satellite towns.
fn zone_price_sqft(at: Coordinates) -> f64 {
    /// Bounding boxes of the known zones with their priors, checked in
    /// order.
    const ZONES: &[(f64, f64, f64, f64, f64)] = &[
        // South Delhi (Vasant Kunj, GK, Hauz Khas).
        (28.50, 28.60, 77.15, 77.30, 8000.0),
        // Central Delhi.
        (28.60, 28.68, 77.18, 77.25, 7500.0),
        // Gurgaon premium sectors.
        (28.35, 28.50, 76.95, 77.10, 7000.0),
        // West Delhi (Dwarka, Janakpuri).
        (28.55, 28.65, 77.00, 77.15, 5500.0),
        // North Delhi (Rohini, Model Town).
        (28.65, 28.72, 77.10, 77.25, 6000.0),
        // Noida sectors.
        (28.50, 28.62, 77.30, 77.40, 5800.0),
        // Greater Noida.
        (28.45, 28.62, 77.40, 77.55, 4500.0),
        // Ghaziabad (Vaishali, Indirapuram).
        (28.62, 28.70, 77.35, 77.45, 5200.0),
        // Faridabad.
        (28.35, 28.45, 77.25, 77.35, 4800.0),
    ];

    /// Prior for coordinates outside every known zone.
    const DEFAULT: f64 = 5000.0;

    ZONES
        .iter()
        .find(|(lat_min, lat_max, lng_min, lng_max, _)| {
            (*lat_min..=*lat_max).contains(&at.latitude)
                && (*lng_min..=*lng_max).contains(&at.longitude)
        })
        .map_or(DEFAULT, |(.., prior)| *prior)
}

#[cfg(test)]
mod spec {
    use super::{
        Area, Category, Coordinates, Normalizer, PropertyFacts, Schema,
        SchemaError,
    };

    fn schema() -> Schema {
        serde_json::from_value(serde_json::json!({
            "numeric": [
                {"name": "area", "mean": 1000.0, "deviation": 500.0},
                {"name": "Bedrooms"},
                {"name": "Bathrooms"},
                {"name": "bed_bath_ratio"},
                {"name": "total_rooms"},
                {"name": "has_parking"},
            ],
            "categorical": [
                {"name": "Furnished_status",
                 "categories": ["Furnished", "Semi-Furnished", "Unfurnished"]},
                {"name": "type_of_building",
                 "categories": ["Flat", "Individual House"]},
            ],
        }))
        .unwrap()
    }

    fn facts() -> PropertyFacts {
        PropertyFacts {
            coordinates: Coordinates {
                latitude: 28.61,
                longitude: 77.46,
            },
            area: Area::new(1500.0).unwrap(),
            bedrooms: 3,
            bathrooms: 2,
            balconies: 1,
            parking_spaces: 1,
            lifts: 0,
            furnished_status: Category::new("Semi-Furnished").unwrap(),
            building_type: Category::new("Flat").unwrap(),
            construction_status: Category::unknown(),
            property_age: Category::unknown(),
        }
    }

    #[test]
    fn preserves_schema_order_and_width() {
        let normalizer = Normalizer::new(&schema()).unwrap();
        let vector = normalizer.normalize(&facts());

        assert_eq!(vector.values().len(), 11);
        // `(1500 - 1000) / 500`.
        assert!((vector.values()[0] - 1.0).abs() < f64::EPSILON);
        assert!((vector.values()[1] - 3.0).abs() < f64::EPSILON);
        assert!((vector.values()[2] - 2.0).abs() < f64::EPSILON);
        // One-hot blocks: `Semi-Furnished`, then `Flat`.
        assert_eq!(&vector.values()[6..], &[0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_bathrooms_use_floor_of_one_divisor() {
        let normalizer = Normalizer::new(&schema()).unwrap();
        let mut facts = facts();
        facts.bathrooms = 0;

        let vector = normalizer.normalize(&facts);
        // `bed_bath_ratio = 3 / max(0, 1)`.
        assert!((vector.values()[3] - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unseen_category_yields_all_zero_block() {
        let normalizer = Normalizer::new(&schema()).unwrap();
        let mut facts = facts();
        facts.furnished_status = Category::new("Palatial").unwrap();

        let vector = normalizer.normalize(&facts);
        assert_eq!(&vector.values()[6..9], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_incompatible_schema() {
        let mut drifted = schema();
        drifted.numeric[0].name = "frontage".into();
        assert!(matches!(
            Normalizer::new(&drifted),
            Err(SchemaError::UnknownNumericColumn(_)),
        ));

        let mut empty_vocab = schema();
        empty_vocab.categorical[0].categories.clear();
        assert!(matches!(
            Normalizer::new(&empty_vocab),
            Err(SchemaError::EmptyVocabulary(_)),
        ));

        let mut degenerate = schema();
        degenerate.numeric[0].deviation = 0.0;
        assert!(matches!(
            Normalizer::new(&degenerate),
            Err(SchemaError::DegenerateDeviation(_)),
        ));
    }
}
