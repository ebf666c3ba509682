use serde::{Deserialize, Serialize};

/// A candidate restaurant. `name` is unique within a page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub open_hours: Vec<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl PlaceDetails {
    pub fn address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .or(self.vicinity.as_deref())
    }

    /// `$` repeated `price_level` times, e.g. `$$`.
    pub fn price_label(&self) -> Option<String> {
        self.price_level
            .filter(|level| *level > 0)
            .map(|level| "$".repeat(level as usize))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceTypeDisplay {
    pub display: String,
    pub value: String,
    #[serde(rename = "canBeDefault", default)]
    pub can_be_default: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReverseGeocodeResponse {
    pub address: String,
}
