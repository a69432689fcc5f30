//! # Kakao Local Address Search
//!
//! Resolves manufacturer addresses into coordinates and administrative
//! regions through the Kakao Local REST API.
//!
//! ## Request
//!
//! `GET /v2/local/search/address.json?query=<address>` with the header
//! `Authorization: KakaoAK <key>`. Every call consumes API quota.
//!
//! ## Response
//!
//! Only the first entry of `documents` is used: `x` is the longitude,
//! `y` the latitude, and the nested `address` object carries
//! `region_1depth_name` (province) and `region_2depth_name` (city).
//!
//! ## Configuration
//!
//! The key comes from the `[SECRET]` section of the INI config, key `kakao`.
//! Without it the crawler keeps addresses as plain strings.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::Location;
use crate::traits::Geocoder;

const KAKAO_BASE_URL: &str = "https://dapi.kakao.com";

/// Why an address could not be resolved
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("malformed response: {reason}")]
    Malformed { reason: String },

    #[error("no match for address")]
    NotFound,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    documents: Vec<SearchDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    x: String,
    y: String,
    address: Option<RegionInfo>,
}

#[derive(Debug, Deserialize)]
struct RegionInfo {
    region_1depth_name: String,
    region_2depth_name: String,
}

/// Kakao address-search client.
///
/// Holds the REST key and a reusable HTTP client. `Clone` shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct KakaoGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

impl KakaoGeocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, KAKAO_BASE_URL)
    }

    /// Points the client at another origin, used by tests.
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_search_url(&self, address: &str) -> String {
        format!(
            "{}/v2/local/search/address.json?query={}",
            self.base_url,
            urlencoding::encode(address)
        )
    }
}

#[async_trait]
impl Geocoder for KakaoGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        let response = self
            .client
            .get(self.build_search_url(address))
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Malformed {
                reason: e.to_string(),
            })?;

        let first = parsed
            .documents
            .into_iter()
            .next()
            .ok_or(GeocodeError::NotFound)?;
        let location = to_location(first)?;

        debug!(
            "Geocoded {} to {}, {} ({}, {})",
            address, location.province, location.city, location.lat, location.lng
        );
        Ok(location)
    }
}

fn to_location(document: SearchDocument) -> Result<Location, GeocodeError> {
    let region = document.address.ok_or_else(|| GeocodeError::Malformed {
        reason: "missing address block".to_string(),
    })?;
    let lat = parse_coordinate(&document.y)?;
    let lng = parse_coordinate(&document.x)?;

    Ok(Location {
        lat,
        lng,
        province: region.region_1depth_name,
        city: region.region_2depth_name,
    })
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse()
        .map_err(|_| GeocodeError::Malformed {
            reason: format!("invalid coordinate {raw:?}"),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const ADDRESS: &str = "경기도 포천시 화현면 화현리 512";

    fn kakao_body() -> serde_json::Value {
        json!({
            "documents": [
                {
                    "x": "127.25",
                    "y": "37.875",
                    "address": {
                        "region_1depth_name": "경기",
                        "region_2depth_name": "포천시"
                    }
                },
                {
                    "x": "1.0",
                    "y": "2.0",
                    "address": {
                        "region_1depth_name": "second",
                        "region_2depth_name": "second"
                    }
                }
            ],
            "meta": { "total_count": 2 }
        })
    }

    #[tokio::test]
    async fn geocode_uses_first_document() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/local/search/address.json"))
            .and(query_param("query", ADDRESS))
            .and(header("Authorization", "KakaoAK secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kakao_body()))
            .expect(1)
            .mount(&server)
            .await;

        let geocoder = KakaoGeocoder::with_base_url("secret-key", &server.uri());
        let location = geocoder.geocode(ADDRESS).await.unwrap();

        assert_eq!(
            location,
            Location {
                lat: 37.875,
                lng: 127.25,
                province: "경기".to_string(),
                city: "포천시".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn geocode_reports_not_found_on_empty_documents() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/local/search/address.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": []})))
            .mount(&server)
            .await;

        let geocoder = KakaoGeocoder::with_base_url("secret-key", &server.uri());
        let result = geocoder.geocode("없는 주소").await;

        assert!(matches!(result, Err(GeocodeError::NotFound)), "got {result:?}");
    }

    #[tokio::test]
    async fn geocode_reports_status_on_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let geocoder = KakaoGeocoder::with_base_url("wrong", &server.uri());
        let result = geocoder.geocode(ADDRESS).await;

        assert!(
            matches!(result, Err(GeocodeError::Status { status: 401 })),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn geocode_reports_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let geocoder = KakaoGeocoder::with_base_url("secret-key", &server.uri());
        let result = geocoder.geocode(ADDRESS).await;

        assert!(matches!(result, Err(GeocodeError::Malformed { .. })), "got {result:?}");
    }

    #[tokio::test]
    async fn geocode_reports_malformed_when_region_block_missing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [{ "x": "127.0", "y": "37.0", "address": null }]
            })))
            .mount(&server)
            .await;

        let geocoder = KakaoGeocoder::with_base_url("secret-key", &server.uri());
        let result = geocoder.geocode(ADDRESS).await;

        assert!(matches!(result, Err(GeocodeError::Malformed { .. })), "got {result:?}");
    }

    #[test]
    fn build_search_url_percent_encodes_query() {
        let geocoder = KakaoGeocoder::with_base_url("k", "https://dapi.kakao.com/");
        let url = geocoder.build_search_url("서울 중구");
        assert!(url.starts_with("https://dapi.kakao.com/v2/local/search/address.json?query="));
        assert!(!url.contains(' '), "query should be encoded: {url}");
        assert!(url.ends_with("%EC%84%9C%EC%9A%B8%20%EC%A4%91%EA%B5%AC"));
    }
}
