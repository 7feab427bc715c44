//! Google Places API (New) text search client

use crate::config::ProviderConfig;
use crate::search::provider::{
    PlaceSummary, PlacesProvider, ProviderError, ProviderResult, SearchPage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Only the fields needed for a contact record are requested, which keeps
/// every call in the cheapest billing tier that still returns websites
const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.nationalPhoneNumber,places.internationalPhoneNumber,places.websiteUri,nextPageToken";

/// The API never returns more than 20 places per page
const PAGE_SIZE: u32 = 20;

/// Client for `places:searchText`
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<ApiPlace>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPlace {
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    national_phone_number: Option<String>,
    international_phone_number: Option<String>,
    website_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl From<ApiPlace> for PlaceSummary {
    fn from(place: ApiPlace) -> Self {
        Self {
            place_id: place.id,
            name: place.display_name.map(|n| n.text).unwrap_or_default(),
            address: place.formatted_address.unwrap_or_default(),
            phone: place
                .national_phone_number
                .or(place.international_phone_number),
            website: place.website_uri,
        }
    }
}

impl GooglePlacesClient {
    /// Creates a client for the configured endpoint
    ///
    /// # Arguments
    ///
    /// * `config` - Provider settings (base URL, language)
    /// * `api_key` - Resolved API key
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/places:searchText", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            language_code: config.language_code.clone(),
        })
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn search(&self, query: &str, page_token: Option<&str>) -> ProviderResult<SearchPage> {
        let request = SearchTextRequest {
            text_query: query,
            page_size: PAGE_SIZE,
            page_token,
            language_code: self.language_code.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchTextResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(SearchPage {
            places: parsed.places.into_iter().map(PlaceSummary::from).collect(),
            next_page_token: parsed.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}
