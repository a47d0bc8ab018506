//! Static property dataset.

use std::{collections::HashSet, io, path::Path};

use common::{
    operations::{By, Select},
    Price,
};
use derive_more::{Display, Error as StdError, From};
use rust_decimal::prelude::ToPrimitive as _;
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{property, PropertyRecord},
    infra::{self, Infra},
    read,
};

/// In-memory table of the listed properties.
///
/// Loaded from a tabular file once at startup and read-only afterwards, so
/// all queries are plain scans with no locking. The dataset is small and
/// fixed-size, which makes linear scans the right tradeoff over any index
/// structure.
#[derive(Debug)]
pub struct Dataset {
    /// Loaded [`PropertyRecord`]s, in file order.
    records: Vec<PropertyRecord>,
}

impl Dataset {
    /// Loads a [`Dataset`] from the CSV file at the given `path`.
    ///
    /// Rows missing required fields (address, area, coordinates or price)
    /// or carrying out-of-range values are skipped with a warning rather
    /// than failing the whole load.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed, or yields no usable rows at
    /// all.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Traced<LoadError>> {
        let mut reader =
            csv::Reader::from_path(path).map_err(tracerr::from_and_wrap!())?;

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<Row>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("skipping dataset row {i}: {e}");
                    continue;
                }
            };
            match row.into_record(property::Id::from(records.len())) {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!(
                        "skipping dataset row {i}: incomplete or out-of-range",
                    );
                }
            }
        }
        if records.is_empty() {
            return Err(tracerr::new!(LoadError::NoRecords));
        }

        tracing::info!(count = records.len(), "dataset loaded");
        Ok(Self { records })
    }

    /// Creates a new [`Dataset`] directly from the given `records`.
    ///
    /// Intended for tests with fabricated data.
    #[must_use]
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }

    /// Returns the unique locations of this [`Dataset`], in file order.
    fn locations(
        &self,
    ) -> impl Iterator<Item = read::location::list::Entry> + '_ {
        let mut seen = HashSet::new();
        self.records.iter().filter_map(move |r| {
            let address: &str = r.address.as_ref();
            seen.insert(address.to_owned()).then(|| {
                read::location::list::Entry {
                    address: r.address.clone(),
                    coordinates: r.coordinates,
                }
            })
        })
    }
}

/// Raw CSV row of a [`Dataset`] file.
///
/// Field names follow the dataset's headers as-is. Scraped data has holes,
/// hence everything is optional here and validated in [`Row::into_record`].
#[derive(Debug, Deserialize)]
struct Row {
    /// Full address of the property.
    #[serde(rename = "Address")]
    address: Option<String>,

    /// Area, in square feet.
    area: Option<f64>,

    /// Latitude, in degrees.
    latitude: Option<f64>,

    /// Longitude, in degrees.
    longitude: Option<f64>,

    /// Number of bedrooms.
    #[serde(rename = "Bedrooms")]
    bedrooms: Option<f64>,

    /// Number of bathrooms.
    #[serde(rename = "Bathrooms")]
    bathrooms: Option<f64>,

    /// Number of balconies.
    #[serde(rename = "Balcony")]
    balconies: Option<f64>,

    /// Number of parking spaces.
    #[serde(rename = "parking")]
    parking_spaces: Option<f64>,

    /// Number of lifts.
    #[serde(rename = "Lift")]
    lifts: Option<f64>,

    /// Furnishing category.
    #[serde(rename = "Furnished_status")]
    furnished_status: Option<String>,

    /// Building type category.
    #[serde(rename = "type_of_building")]
    building_type: Option<String>,

    /// Construction status category.
    #[serde(rename = "Status")]
    construction_status: Option<String>,

    /// Property age category.
    #[serde(rename = "neworold")]
    property_age: Option<String>,

    /// Listed price, in Rupees.
    price: Option<f64>,
}

impl Row {
    /// Converts this [`Row`] into a [`PropertyRecord`] with the given `id`,
    /// if its required fields are present and valid.
    fn into_record(self, id: property::Id) -> Option<PropertyRecord> {
        let address = property::Address::new(self.address?.trim())?;
        let area = property::Area::new(self.area?)?;
        let coordinates = property::Coordinates {
            latitude: self.latitude.filter(|l| l.is_finite())?,
            longitude: self.longitude.filter(|l| l.is_finite())?,
        };
        let price = Price::from_f64(self.price.filter(|p| *p > 0.0)?)?;

        Some(PropertyRecord {
            id,
            address,
            area,
            coordinates,
            bedrooms: count(self.bedrooms),
            bathrooms: count(self.bathrooms),
            balconies: count(self.balconies),
            parking_spaces: count(self.parking_spaces),
            lifts: count(self.lifts),
            furnished_status: category(self.furnished_status),
            building_type: category(self.building_type),
            construction_status: category(self.construction_status),
            property_age: category(self.property_age),
            price,
        })
    }
}

/// Parses an optional fractional count column into a whole count.
fn count(value: Option<f64>) -> u16 {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped beforehand"
    )]
    value.map_or(0, |v| {
        if v.is_finite() {
            v.clamp(0.0, f64::from(u16::MAX)) as u16
        } else {
            0
        }
    })
}

/// Parses an optional categorical column, falling back to the unknown
/// bucket.
fn category(value: Option<String>) -> property::Category {
    value
        .and_then(|v| property::Category::new(v.trim()))
        .unwrap_or_default()
}

impl Infra<Select<By<read::property::list::Output, read::property::list::Filter>>>
    for Dataset
{
    type Ok = read::property::list::Output;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::property::list::Output, read::property::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::list::Filter {
            min_price,
            max_price,
            bedrooms,
            building_type,
            location,
        } = by.into_inner();

        let building_type = building_type.map(|t| t.to_lowercase());
        let location = location.map(|l| l.to_lowercase());

        let mut total_count = 0;
        let mut records = Vec::new();
        for r in &self.records {
            if min_price.is_some_and(|min| r.price < min)
                || max_price.is_some_and(|max| r.price > max)
                || bedrooms.is_some_and(|b| r.bedrooms != b)
                || building_type.as_ref().is_some_and(|t| {
                    let kind: &str = r.building_type.as_ref();
                    !kind.to_lowercase().contains(t)
                })
                || location.as_ref().is_some_and(|l| {
                    let address: &str = r.address.as_ref();
                    !address.to_lowercase().contains(l)
                })
            {
                continue;
            }
            total_count += 1;
            if records.len() < read::property::list::PAGE_SIZE {
                records.push(r.clone());
            }
        }

        Ok(read::property::list::Output {
            total_count,
            records,
        })
    }
}

impl
    Infra<
        Select<By<Vec<read::address::search::Match>, read::address::search::Needle>>,
    > for Dataset
{
    type Ok = Vec<read::address::search::Match>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::address::search::Match>, read::address::search::Needle>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::address::search::Needle(needle) = by.into_inner();
        if needle.chars().count() < read::address::search::MIN_NEEDLE_LEN {
            return Ok(Vec::new());
        }
        let needle = needle.to_lowercase();

        Ok(self
            .locations()
            .filter(|l| {
                let address: &str = l.address.as_ref();
                address.to_lowercase().contains(&needle)
            })
            .take(read::address::search::LIMIT)
            .map(|l| read::address::search::Match {
                address: l.address,
                coordinates: l.coordinates,
            })
            .collect())
    }
}

impl Infra<Select<By<Vec<read::location::list::Entry>, ()>>> for Dataset {
    type Ok = Vec<read::location::list::Entry>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::location::list::Entry>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .locations()
            .take(read::location::list::LIMIT)
            .collect())
    }
}

impl
    Infra<
        Select<
            By<Option<read::location::list::Entry>, read::location::list::Name>,
        >,
    > for Dataset
{
    type Ok = Option<read::location::list::Entry>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::location::list::Entry>, read::location::list::Name>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::location::list::Name(name) = by.into_inner();
        let name = name.to_lowercase();

        // Exact match wins over a containing one.
        let mut containing = None;
        for entry in self.locations() {
            let address: &str = entry.address.as_ref();
            let address = address.to_lowercase();
            if address == name {
                return Ok(Some(entry));
            }
            if containing.is_none() && address.contains(&name) {
                containing = Some(entry);
            }
        }
        Ok(containing)
    }
}

impl Infra<Select<By<Vec<read::heatmap::list::Point>, ()>>> for Dataset {
    type Ok = Vec<read::heatmap::list::Point>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::heatmap::list::Point>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sampled = self
            .records
            .iter()
            .take(read::heatmap::list::LIMIT)
            .collect::<Vec<_>>();

        let max_price = sampled
            .iter()
            .map(|r| r.price)
            .max()
            .map(|p| p.amount().to_f64().unwrap_or(f64::INFINITY))
            .filter(|p| *p > 0.0);

        Ok(sampled
            .into_iter()
            .map(|r| read::heatmap::list::Point {
                coordinates: r.coordinates,
                price: r.price,
                intensity: max_price.map_or(0.0, |max| {
                    r.price.amount().to_f64().unwrap_or(0.0) / max
                }),
            })
            .collect())
    }
}

impl Infra<Select<By<Option<PropertyRecord>, property::Id>>> for Dataset {
    type Ok = Option<PropertyRecord>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<PropertyRecord>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.records.get(usize::from(id)).cloned())
    }
}

/// Error of loading a [`Dataset`].
#[derive(Debug, Display, From, StdError)]
pub enum LoadError {
    /// Failed to read or parse the dataset file.
    #[display("Failed to read dataset file: {_0}")]
    Csv(csv::Error),

    /// Dataset file yielded no usable rows.
    #[display("Dataset contains no usable rows")]
    NoRecords,
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Price,
    };

    use crate::{
        domain::{property, PropertyRecord},
        infra::Infra as _,
        read,
    };

    use super::Dataset;

    fn record(id: usize, address: &str, price: i64) -> PropertyRecord {
        PropertyRecord {
            id: property::Id::from(id),
            address: property::Address::new(address).unwrap(),
            area: property::Area::new(1000.0).unwrap(),
            coordinates: property::Coordinates {
                latitude: 28.59,
                longitude: 77.05,
            },
            bedrooms: 3,
            bathrooms: 2,
            balconies: 1,
            parking_spaces: 1,
            lifts: 0,
            furnished_status: property::Category::unknown(),
            building_type: property::Category::new("Flat").unwrap(),
            construction_status: property::Category::unknown(),
            property_age: property::Category::unknown(),
            price: Price::from_f64(price as f64).unwrap(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(
            (0..30)
                .map(|i| record(i, &format!("Sector {i}, Dwarka, Delhi"), 4_000_000))
                .chain([
                    record(30, "Hauz Khas, South Delhi", 12_000_000),
                    record(31, "Sector 62, Noida", 6_500_000),
                ])
                .collect(),
        )
    }

    #[tokio::test]
    async fn filters_by_location_in_dataset_order() {
        let output = dataset()
            .execute(Select(By::new(read::property::list::Filter {
                location: Some("dwarka".into()),
                ..read::property::list::Filter::default()
            })))
            .await
            .unwrap();

        assert_eq!(output.total_count, 30);
        assert_eq!(output.records.len(), read::property::list::PAGE_SIZE);
        assert!(output
            .records
            .iter()
            .all(|r| r.address.to_string().contains("Dwarka")));
        let ids = output
            .records
            .iter()
            .map(|r| usize::from(r.id))
            .collect::<Vec<_>>();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn filters_by_price_bounds_and_bedrooms() {
        let output: read::property::list::Output = dataset()
            .execute(Select(By::new(read::property::list::Filter {
                min_price: Price::from_f64(5_000_000.0),
                max_price: Price::from_f64(20_000_000.0),
                ..read::property::list::Filter::default()
            })))
            .await
            .unwrap();

        assert_eq!(output.total_count, 2);
    }

    #[tokio::test]
    async fn searches_addresses_case_insensitively() {
        let matches: Vec<read::address::search::Match> = dataset()
            .execute(Select(By::new(read::address::search::Needle(
                "hauz".into(),
            ))))
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address.to_string(), "Hauz Khas, South Delhi");
    }

    #[tokio::test]
    async fn rejects_too_short_search_needle() {
        let matches: Vec<read::address::search::Match> = dataset()
            .execute(Select(By::new(read::address::search::Needle("h".into()))))
            .await
            .unwrap();

        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn measures_needle_length_in_characters() {
        let dataset = Dataset::from_records(vec![record(
            0,
            "Café Colony, Delhi",
            4_000_000,
        )]);

        // A single 2-byte character is still just one character.
        let matches: Vec<read::address::search::Match> = dataset
            .execute(Select(By::new(read::address::search::Needle(
                "é".into(),
            ))))
            .await
            .unwrap();

        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn deduplicates_repeated_addresses() {
        let dataset = Dataset::from_records(vec![
            record(0, "Saket, South Delhi", 4_000_000),
            record(1, "Saket, South Delhi", 5_500_000),
            record(2, "Rohini, North Delhi", 3_000_000),
        ]);

        let matches: Vec<read::address::search::Match> = dataset
            .execute(Select(By::new(read::address::search::Needle(
                "saket".into(),
            ))))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address.to_string(), "Saket, South Delhi");

        let entries: Vec<read::location::list::Entry> = dataset
            .execute(Select(By::<Vec<read::location::list::Entry>, _>::new(())))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].address.to_string(), "Saket, South Delhi");
        assert_eq!(entries[1].address.to_string(), "Rohini, North Delhi");
    }

    #[tokio::test]
    async fn caps_search_results() {
        let matches: Vec<read::address::search::Match> = dataset()
            .execute(Select(By::new(read::address::search::Needle(
                "sector".into(),
            ))))
            .await
            .unwrap();

        assert_eq!(matches.len(), read::address::search::LIMIT);
    }

    #[tokio::test]
    async fn resolves_location_preferring_exact_match() {
        let entry: Option<read::location::list::Entry> = dataset()
            .execute(Select(By::new(read::location::list::Name(
                "HAUZ KHAS, SOUTH DELHI".into(),
            ))))
            .await
            .unwrap();
        assert_eq!(
            entry.unwrap().address.to_string(),
            "Hauz Khas, South Delhi",
        );

        let entry: Option<read::location::list::Entry> = dataset()
            .execute(Select(By::new(read::location::list::Name(
                "noida".into(),
            ))))
            .await
            .unwrap();
        assert_eq!(entry.unwrap().address.to_string(), "Sector 62, Noida");

        let entry: Option<read::location::list::Entry> = dataset()
            .execute(Select(By::new(read::location::list::Name(
                "Atlantis".into(),
            ))))
            .await
            .unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn scales_heatmap_intensity_by_maximum_price() {
        let points: Vec<read::heatmap::list::Point> =
            dataset()
                .execute(Select(
                    By::<Vec<read::heatmap::list::Point>, _>::new(()),
                ))
                .await
                .unwrap();

        assert_eq!(points.len(), 32);
        let max = points
            .iter()
            .map(|p| p.intensity)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((max - 1.0).abs() < f64::EPSILON);
        assert!(points.iter().all(|p| p.intensity > 0.0));
    }

    #[tokio::test]
    async fn selects_property_by_id() {
        let found: Option<PropertyRecord> = dataset()
            .execute(Select(By::new(property::Id::from(30))))
            .await
            .unwrap();
        assert_eq!(
            found.unwrap().address.to_string(),
            "Hauz Khas, South Delhi",
        );

        let missing: Option<PropertyRecord> = dataset()
            .execute(Select(By::new(property::Id::from(99))))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
