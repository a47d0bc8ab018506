//! Price-estimation HTTP API definitions.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    domain::property::{self, Category, Coordinates},
    query::{self, estimate_price},
    Query as _,
};

use super::InputError;
use crate::{define_error, AsError, Context, Error};

/// Request body of the price-estimation endpoint.
///
/// Field names follow the columns of the dataset the model artifact was
/// trained on.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Location name, to be resolved against the known locations.
    ///
    /// Ignored when explicit coordinates are provided.
    pub location: Option<String>,

    /// Latitude of the property, in degrees.
    pub latitude: Option<f64>,

    /// Longitude of the property, in degrees.
    pub longitude: Option<f64>,

    /// Area of the property, in square feet.
    pub area: f64,

    /// Number of bedrooms.
    #[serde(default)]
    pub bedrooms: property::Bedrooms,

    /// Number of bathrooms.
    #[serde(default)]
    pub bathrooms: property::Bathrooms,

    /// Number of balconies.
    #[serde(default)]
    pub balcony: property::Balconies,

    /// Number of parking spaces.
    #[serde(default)]
    pub parking: property::ParkingSpaces,

    /// Number of lifts.
    #[serde(default)]
    pub lift: property::Lifts,

    /// Construction status (e.g. `Ready to Move`).
    pub status: Option<String>,

    /// Property age (e.g. `New Property` or `Resale`).
    pub neworold: Option<String>,

    /// Furnishing status (e.g. `Semi-Furnished`).
    pub furnished_status: Option<String>,

    /// Building type (e.g. `Flat`).
    pub type_of_building: Option<String>,
}

/// Response body of the price-estimation endpoint.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Indicator of a successful estimation.
    pub success: bool,

    /// Estimated price, in Rupees.
    pub predicted_price: f64,

    /// Estimated price in the Indian Lakh/Crore display notation.
    pub formatted_price: String,

    /// Estimated price of a single square foot, in Rupees.
    pub price_per_sqft: f64,
}

/// Estimates the price of a property with the provided attributes.
///
/// Possible error codes:
/// - `INVALID_INPUT` - area is not positive, or no location is provided;
/// - `UNKNOWN_LOCATION` - provided location name is not a known one.
#[tracing::instrument(skip_all, fields(http.route = "/api/predict"))]
pub async fn predict(
    ctx: Context,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, Error> {
    drop(ctx.current_session().await?);

    let location = match (req.latitude, req.longitude, req.location) {
        (Some(latitude), Some(longitude), _) => {
            estimate_price::Location::Coordinates(Coordinates {
                latitude,
                longitude,
            })
        }
        (_, _, Some(name)) => estimate_price::Location::Name(name),
        (_, _, None) => return Err(InputError::Invalid.into()),
    };
    let area = property::Area::new(req.area).ok_or(InputError::Invalid)?;

    let output = ctx
        .service()
        .execute(query::EstimatePrice {
            location,
            area,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
            balconies: req.balcony,
            parking_spaces: req.parking,
            lifts: req.lift,
            furnished_status: category(req.furnished_status),
            building_type: category(req.type_of_building),
            construction_status: category(req.status),
            property_age: category(req.neworold),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(PredictResponse {
        success: true,
        predicted_price: output.price.to_f64(),
        formatted_price: output.display,
        price_per_sqft: output.per_sqft.to_f64(),
    }))
}

/// Parses an optional request field into a [`Category`], falling back to
/// [`Category::unknown()`].
fn category(value: Option<String>) -> Category {
    value.and_then(Category::new).unwrap_or_default()
}

impl AsError for estimate_price::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "UNKNOWN_LOCATION"]
                #[status = BAD_REQUEST]
                #[message = "Provided location is not a known one"]
                UnknownLocation,
            }
        }

        match self {
            Self::Infra(e) => e.try_as_error(),
            Self::InvalidPrediction => None,
            Self::UnknownLocation(_) => Some(Error::UnknownLocation.into()),
        }
    }
}
