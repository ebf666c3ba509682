use reqwest::Client;

use super::auth::Credentials;
use super::{endpoint, read_json};
use crate::error::Result;
use crate::models::place::{PlaceTypeDisplay, ReverseGeocodeResponse};

pub async fn reverse_geocode(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    latitude: f64,
    longitude: f64,
) -> Result<String> {
    let url = if credentials.is_authenticated() {
        endpoint(base_url, &["reverse-geocode", "authed"])?
    } else {
        endpoint(base_url, &["reverse-geocode"])?
    };
    let resp = credentials
        .guard(client.get(url))
        .query(&[("latitude", latitude), ("longitude", longitude)])
        .send()
        .await?;
    let geocoded: ReverseGeocodeResponse = read_json(resp, "address").await?;
    Ok(geocoded.address)
}

pub async fn get_place_types(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<Vec<PlaceTypeDisplay>> {
    let url = endpoint(base_url, &["places", "types"])?;
    let resp = credentials.authorize(client.get(url)).send().await?;
    read_json(resp, "place types").await
}
