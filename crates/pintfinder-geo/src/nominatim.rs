//! Nominatim-backed implementation of [`GeocodeClient`].

use reqwest::Client;
use tracing::{debug, instrument};

use crate::{
    GeocodeClient,
    error::GeocodeError,
    suggestion::{AddressSuggestion, RawPlace},
};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = concat!("pintfinder/", env!("CARGO_PKG_VERSION"));

/// Forward-geocoding client for the Nominatim search API.
///
/// Issues `GET {base_url}/search` with `format=jsonv2` and
/// `addressdetails=1` so every candidate carries the structured address
/// breakdown the suburb derivation needs.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a client against the public Nominatim endpoint.
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (self-hosted instance or a
    /// test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl GeocodeClient for NominatimClient {
    #[instrument(name = "Nominatim search", skip(self), level = "debug")]
    async fn query(
        &self,
        text: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<AddressSuggestion>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let limit = limit.to_string();
        let mut params = vec![
            ("format", "jsonv2"),
            ("addressdetails", "1"),
            ("q", text),
            ("limit", limit.as_str()),
        ];
        if let Some(country) = country {
            params.push(("countrycodes", country));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let body = response.bytes().await?;
        let suggestions = decode_places(&body)?;

        debug!(query = text, count = suggestions.len(), "geocode complete");
        Ok(suggestions)
    }
}

/// Decode a `jsonv2` search response body, dropping candidates with
/// unparsable coordinates.
fn decode_places(body: &[u8]) -> Result<Vec<AddressSuggestion>, GeocodeError> {
    let places: Vec<RawPlace> = serde_json::from_slice(body)?;
    Ok(places
        .into_iter()
        .filter_map(RawPlace::into_suggestion)
        .collect())
}
