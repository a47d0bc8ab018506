//! [`Query`] estimating a property price.

use common::{
    operations::{By, Perform, Select},
    Price,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        property::{self, Category, Coordinates},
        FeatureVector, PropertyFacts,
    },
    infra::{self, Infra},
    read, Service,
};

use super::Query;

/// [`Query`] estimating the price of a property with the provided
/// attributes.
///
/// The full flow of the serving core: resolve the location, assemble a
/// [`FeatureVector`], run the trained artifact, and derive the display
/// metrics from the raw prediction.
#[derive(Clone, Debug)]
pub struct EstimatePrice {
    /// [`Location`] of the property.
    pub location: Location,

    /// [`property::Area`] of the property.
    pub area: property::Area,

    /// Number of bedrooms.
    pub bedrooms: property::Bedrooms,

    /// Number of bathrooms.
    pub bathrooms: property::Bathrooms,

    /// Number of balconies.
    pub balconies: property::Balconies,

    /// Number of parking spaces.
    pub parking_spaces: property::ParkingSpaces,

    /// Number of lifts.
    pub lifts: property::Lifts,

    /// Furnishing [`Category`].
    pub furnished_status: Category,

    /// Building type [`Category`].
    pub building_type: Category,

    /// Construction status [`Category`].
    pub construction_status: Category,

    /// Property age [`Category`].
    pub property_age: Category,
}

/// Location of a property being estimated.
#[derive(Clone, Debug, From)]
pub enum Location {
    /// Location name, to be resolved against the known locations.
    Name(String),

    /// Explicit geographic [`Coordinates`].
    Coordinates(Coordinates),
}

/// Output of [`EstimatePrice`] [`Query`]: the price estimate with its
/// derived display metrics.
#[derive(Clone, Debug)]
pub struct Output {
    /// Estimated [`Price`].
    pub price: Price,

    /// Estimated [`Price`] in the Indian Lakh/Crore display notation.
    pub display: String,

    /// Estimated [`Price`] of a single square foot, derived from the exact
    /// [`property::Area`] the estimate was produced for.
    pub per_sqft: Price,
}

impl<I> Query<EstimatePrice> for Service<I>
where
    I: Infra<
            Select<
                By<
                    Option<read::location::list::Entry>,
                    read::location::list::Name,
                >,
            >,
            Ok = Option<read::location::list::Entry>,
            Err = Traced<infra::Error>,
        > + Infra<Perform<FeatureVector>, Ok = f64, Err = Traced<infra::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: EstimatePrice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let coordinates = match query.location {
            Location::Coordinates(c) => c,
            Location::Name(name) => {
                self.infra()
                    .execute(Select(By::new(read::location::list::Name(
                        name.clone(),
                    ))))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or_else(|| E::UnknownLocation(name))
                    .map_err(tracerr::wrap!())?
                    .coordinates
            }
        };

        let facts = PropertyFacts {
            coordinates,
            area: query.area,
            bedrooms: query.bedrooms,
            bathrooms: query.bathrooms,
            balconies: query.balconies,
            parking_spaces: query.parking_spaces,
            lifts: query.lifts,
            furnished_status: query.furnished_status,
            building_type: query.building_type,
            construction_status: query.construction_status,
            property_age: query.property_age,
        };
        let vector = self.normalizer().normalize(&facts);
        let area = vector.area();

        let raw = self
            .infra()
            .execute(Perform(vector))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let price = Price::from_f64(raw)
            .ok_or(E::InvalidPrediction)
            .map_err(tracerr::wrap!())?;
        let per_sqft = price
            .per_sqft(area.sqft())
            .unwrap_or_else(|| unreachable!("`Area` is always positive"));

        Ok(Output {
            price,
            display: price.to_string(),
            per_sqft,
        })
    }
}

/// Error of [`EstimatePrice`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Infra`] error.
    #[display("`Infra` operation failed: {_0}")]
    Infra(infra::Error),

    /// Artifact produced a non-finite prediction.
    #[display("Artifact produced a non-finite prediction")]
    InvalidPrediction,

    /// Provided location is not present among the known ones.
    #[display("Unknown location: {_0}")]
    #[from(ignore)]
    UnknownLocation(#[error(not(source))] String),
}

#[cfg(test)]
mod spec {
    use common::Price;
    use secrecy::SecretBox;
    use serde_json::json;

    use crate::{
        domain::{property, user, Normalizer, PropertyRecord, Schema},
        infra::{directory::Seed, Dataset, Directory, Ensemble, Local},
        Config, Query as _, Service,
    };

    use super::{EstimatePrice, ExecutionError, Location};

    fn schema() -> Schema {
        serde_json::from_value(json!({
            "numeric": [
                {"name": "area", "mean": 1000.0, "deviation": 500.0},
                {"name": "bed_bath_ratio"},
            ],
            "categorical": [
                {"name": "type_of_building",
                 "categories": ["Flat", "Individual House"]},
            ],
        }))
        .unwrap()
    }

    fn ensemble() -> Ensemble {
        // Single stump on standardized area.
        let trees = serde_json::from_value(json!([
            {"root": {
                "feature_idx": 0,
                "threshold": 0.0,
                "left": {"value": 3_000_000.0},
                "right": {"value": 9_000_000.0},
            }},
        ]))
        .unwrap();
        Ensemble::new(schema(), trees).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![PropertyRecord {
            id: property::Id::from(0),
            address: property::Address::new("Sector 10, Dwarka, Delhi")
                .unwrap(),
            area: property::Area::new(1200.0).unwrap(),
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
            price: Price::from_f64(6_000_000.0).unwrap(),
        }])
    }

    fn service() -> Service<Local> {
        let ensemble = ensemble();
        let normalizer = Normalizer::new(ensemble.schema()).unwrap();
        let directory = Directory::new([Seed {
            email: user::Email::new("demo@example.com").unwrap(),
            name: user::Name::new("Demo User").unwrap(),
            password: SecretBox::init_with(|| {
                user::Password::new("demo123").unwrap()
            }),
            role: user::Role::Buyer,
        }]);
        let config = Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                b"test-secret",
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                b"test-secret",
            ),
            session_ttl: std::time::Duration::from_secs(30 * 60),
        };
        Service::new(
            config,
            normalizer,
            Local::new(ensemble, dataset(), directory),
        )
    }

    fn query(location: Location, area: f64) -> EstimatePrice {
        EstimatePrice {
            location,
            area: property::Area::new(area).unwrap(),
            bedrooms: 3,
            bathrooms: 2,
            balconies: 1,
            parking_spaces: 1,
            lifts: 0,
            furnished_status: property::Category::unknown(),
            building_type: property::Category::new("Flat").unwrap(),
            construction_status: property::Category::unknown(),
            property_age: property::Category::unknown(),
        }
    }

    #[tokio::test]
    async fn estimates_with_resolved_location() {
        let service = service();

        let output = service
            .execute(query(Location::Name("dwarka".into()), 1500.0))
            .await
            .unwrap();

        // Standardized area `(1500 - 1000) / 500 > 0` hits the right leaf.
        assert_eq!(output.price, Price::from_f64(9_000_000.0).unwrap());
        assert_eq!(output.display, "₹90.00 Lac");
        assert_eq!(output.per_sqft, Price::from_f64(6000.0).unwrap());
    }

    #[tokio::test]
    async fn is_deterministic() {
        let service = service();
        let q = query(Location::Name("dwarka".into()), 1500.0);

        let first = service.execute(q.clone()).await.unwrap();
        let second = service.execute(q).await.unwrap();

        assert_eq!(first.price, second.price);
    }

    #[tokio::test]
    async fn fails_on_unknown_location() {
        let service = service();

        let err = service
            .execute(query(Location::Name("Atlantis".into()), 1500.0))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UnknownLocation(l) if l == "Atlantis",
        ));
    }
}
