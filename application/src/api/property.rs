//! Property-listing HTTP API definitions.

use axum::{
    extract::{Path, Query as QueryParams},
    Json,
};
use common::Price;
use serde::{Deserialize, Serialize};
use service::{
    domain::{property, PropertyRecord},
    query, read, Query as _,
};

use crate::{define_error, AsError, Context, Error};

/// Wire shape of a [`PropertyRecord`].
///
/// Field names follow the columns of the dataset.
#[derive(Debug, Serialize)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: usize,

    /// Address of this [`Property`].
    pub address: String,

    /// Area of this [`Property`], in square feet.
    pub area: f64,

    /// Latitude of this [`Property`], in degrees.
    pub latitude: f64,

    /// Longitude of this [`Property`], in degrees.
    pub longitude: f64,

    /// Number of bedrooms.
    pub bedrooms: property::Bedrooms,

    /// Number of bathrooms.
    pub bathrooms: property::Bathrooms,

    /// Number of balconies.
    pub balcony: property::Balconies,

    /// Number of parking spaces.
    pub parking: property::ParkingSpaces,

    /// Number of lifts.
    pub lift: property::Lifts,

    /// Construction status (e.g. `Ready to Move`).
    pub status: String,

    /// Property age (e.g. `New Property` or `Resale`).
    pub neworold: String,

    /// Furnishing status (e.g. `Semi-Furnished`).
    pub furnished_status: String,

    /// Building type (e.g. `Flat`).
    pub type_of_building: String,

    /// Listed price, in Rupees.
    pub price: f64,

    /// Listed price in the Indian Lakh/Crore display notation.
    pub formatted_price: String,
}

impl From<PropertyRecord> for Property {
    fn from(record: PropertyRecord) -> Self {
        Self {
            id: record.id.into(),
            address: record.address.to_string(),
            area: record.area.sqft(),
            latitude: record.coordinates.latitude,
            longitude: record.coordinates.longitude,
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            balcony: record.balconies,
            parking: record.parking_spaces,
            lift: record.lifts,
            status: record.construction_status.to_string(),
            neworold: record.property_age.to_string(),
            furnished_status: record.furnished_status.to_string(),
            type_of_building: record.building_type.to_string(),
            price: record.price.to_f64(),
            formatted_price: record.price.to_string(),
        }
    }
}

/// Query parameters of the filtered-listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    /// Lower bound (inclusive) of a [`Property`]'s price, in Rupees.
    pub min_price: Option<f64>,

    /// Upper bound (inclusive) of a [`Property`]'s price, in Rupees.
    pub max_price: Option<f64>,

    /// Exact number of bedrooms.
    pub bedrooms: Option<property::Bedrooms>,

    /// Building type (or its part) to search for, case-insensitively.
    pub property_type: Option<String>,

    /// Address part to search for, case-insensitively.
    pub location: Option<String>,
}

/// Response body of the filtered-listing endpoint.
#[derive(Debug, Serialize)]
pub struct FilterResponse {
    /// Indicator of a successful listing.
    pub success: bool,

    /// Total count of the matched [`Property`]s, before any page capping.
    pub count: usize,

    /// First page of the matched [`Property`]s, in dataset order.
    pub properties: Vec<Property>,
}

/// Lists [`Property`]s matching the provided filter, in dataset order,
/// capped at [`read::property::list::PAGE_SIZE`].
#[tracing::instrument(skip_all, fields(http.route = "/api/filter-properties"))]
pub async fn filter(
    ctx: Context,
    QueryParams(params): QueryParams<FilterParams>,
) -> Result<Json<FilterResponse>, Error> {
    drop(ctx.current_session().await?);

    let output = ctx
        .service()
        .execute(query::properties::Filtered::by(
            read::property::list::Filter {
                min_price: params.min_price.and_then(Price::from_f64),
                max_price: params.max_price.and_then(Price::from_f64),
                bedrooms: params.bedrooms,
                building_type: params.property_type,
                location: params.location,
            },
        ))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(FilterResponse {
        success: true,
        count: output.total_count,
        properties: output.records.into_iter().map(Into::into).collect(),
    }))
}

/// Response body of the single-property endpoint.
#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    /// Indicator of a successful lookup.
    pub success: bool,

    /// Found [`Property`].
    pub property: Property,
}

/// Returns a single [`Property`] by its ID.
///
/// Possible error codes:
/// - `PROPERTY_NOT_EXISTS` - no `Property` with the provided ID exists.
#[tracing::instrument(skip_all, fields(http.route = "/api/property/:id"))]
pub async fn by_id(
    ctx: Context,
    Path(id): Path<usize>,
) -> Result<Json<PropertyResponse>, Error> {
    drop(ctx.current_session().await?);

    let record = ctx
        .service()
        .execute(query::property::ById::by(id.into()))
        .await
        .map_err(AsError::into_error)?
        .ok_or(LookupError::NotExists)?;

    Ok(Json(PropertyResponse {
        success: true,
        property: record.into(),
    }))
}

/// Wire shape of a known location.
#[derive(Debug, Serialize)]
pub struct Location {
    /// Name of this [`Location`].
    pub name: String,

    /// Latitude of this [`Location`], in degrees.
    pub latitude: f64,

    /// Longitude of this [`Location`], in degrees.
    pub longitude: f64,
}

/// Response body of the known-locations endpoint.
#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    /// Indicator of a successful listing.
    pub success: bool,

    /// Known [`Location`]s, in dataset order.
    pub locations: Vec<Location>,
}

/// Lists the known locations, in dataset order, capped at
/// [`read::location::list::LIMIT`].
#[tracing::instrument(skip_all, fields(http.route = "/api/locations"))]
pub async fn locations(ctx: Context) -> Result<Json<LocationsResponse>, Error> {
    drop(ctx.current_session().await?);

    let entries = ctx
        .service()
        .execute(query::locations::List::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(LocationsResponse {
        success: true,
        locations: entries
            .into_iter()
            .map(|e| Location {
                name: e.address.to_string(),
                latitude: e.coordinates.latitude,
                longitude: e.coordinates.longitude,
            })
            .collect(),
    }))
}

/// Query parameters of the address-search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Needle to search the addresses for.
    #[serde(default)]
    pub q: String,
}

/// Wire shape of a matched address.
#[derive(Debug, Serialize)]
pub struct Address {
    /// Matched address.
    pub address: String,

    /// Latitude of the matched address, in degrees.
    pub latitude: f64,

    /// Longitude of the matched address, in degrees.
    pub longitude: f64,
}

/// Response body of the address-search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Indicator of a successful search.
    pub success: bool,

    /// Matched [`Address`]es.
    pub addresses: Vec<Address>,
}

/// Searches the distinct addresses containing the provided needle,
/// case-insensitively, capped at [`read::address::search::LIMIT`].
///
/// Needles shorter than [`read::address::search::MIN_NEEDLE_LEN`] match
/// nothing.
#[tracing::instrument(skip_all, fields(http.route = "/api/search-addresses"))]
pub async fn search_addresses(
    ctx: Context,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<SearchResponse>, Error> {
    drop(ctx.current_session().await?);

    let matches = ctx
        .service()
        .execute(query::addresses::Search::by(read::address::search::Needle(
            params.q,
        )))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SearchResponse {
        success: true,
        addresses: matches
            .into_iter()
            .map(|m| Address {
                address: m.address.to_string(),
                latitude: m.coordinates.latitude,
                longitude: m.coordinates.longitude,
            })
            .collect(),
    }))
}

/// Wire shape of a heatmap point.
#[derive(Debug, Serialize)]
pub struct HeatmapPoint {
    /// Latitude of this [`HeatmapPoint`], in degrees.
    pub latitude: f64,

    /// Longitude of this [`HeatmapPoint`], in degrees.
    pub longitude: f64,

    /// Listed price at this [`HeatmapPoint`], in Rupees.
    pub price: f64,

    /// Relative intensity of this [`HeatmapPoint`], in `(0.0, 1.0]`.
    pub intensity: f64,
}

/// Response body of the heatmap endpoint.
#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    /// Indicator of a successful listing.
    pub success: bool,

    /// Sampled [`HeatmapPoint`]s.
    pub data: Vec<HeatmapPoint>,
}

/// Lists the price heatmap points, capped at
/// [`read::heatmap::list::LIMIT`].
#[tracing::instrument(skip_all, fields(http.route = "/api/heatmap-data"))]
pub async fn heatmap_data(
    ctx: Context,
) -> Result<Json<HeatmapResponse>, Error> {
    drop(ctx.current_session().await?);

    let points = ctx
        .service()
        .execute(query::heatmap::Points::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(HeatmapResponse {
        success: true,
        data: points
            .into_iter()
            .map(|p| HeatmapPoint {
                latitude: p.coordinates.latitude,
                longitude: p.coordinates.longitude,
                price: p.price.to_f64(),
                intensity: p.intensity,
            })
            .collect(),
    }))
}

define_error! {
    enum LookupError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the provided ID does not exist"]
        NotExists,
    }
}
