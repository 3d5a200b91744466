use futures::{FutureExt, future::BoxFuture};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{GeocoderConfig, GeocoderProvider, Geocoder, GeocodingResult, Result, providers};
use crate::error::GeocodeError;

const GOOGLE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const MAPBOX_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";
const OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Network-backed geocoder for Google, Mapbox or OpenCage.
///
/// Every call is bounded by the configured timeout. Transport errors, provider
/// errors and timeouts all resolve to [`GeocodeError::NotFound`]; nothing is
/// retried.
///
/// # Examples
///
/// ```rust,no_run
/// use wayfind_geo::{Geocoder, GeocoderConfig, GeocoderProvider, HttpGeocoder};
///
/// # async fn run() -> Result<(), wayfind_geo::GeocodeError> {
/// let geocoder = HttpGeocoder::new(GeocoderConfig::new(GeocoderProvider::Google, "api-key"))?;
/// let place = geocoder.geocode("Edison, NJ").await?;
/// println!("{}, {}", place.latitude, place.longitude);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: Client,
    config: GeocoderConfig,
}

impl HttpGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(match self.config.provider {
                GeocoderProvider::Google => GOOGLE_URL,
                GeocoderProvider::Mapbox => MAPBOX_URL,
                GeocoderProvider::OpenCage => OPENCAGE_URL,
            })
    }

    fn request_url(&self, address: &str) -> Result<Url> {
        let key = self.config.api_key.as_str();
        let endpoint = self.endpoint();
        let url = match self.config.provider {
            GeocoderProvider::Google => {
                Url::parse_with_params(endpoint, &[("address", address), ("key", key)])
            }
            GeocoderProvider::Mapbox => {
                let mut url = Url::parse(endpoint)
                    .map_err(|e| GeocodeError::InvalidEndpoint(e.to_string()))?;
                url.path_segments_mut()
                    .map_err(|()| GeocodeError::InvalidEndpoint(endpoint.to_string()))?
                    .pop_if_empty()
                    .push(&format!("{address}.json"));
                url.query_pairs_mut()
                    .append_pair("access_token", key)
                    .append_pair("country", "US")
                    .append_pair("types", "address,place,postcode");
                Ok(url)
            }
            GeocoderProvider::OpenCage => Url::parse_with_params(
                endpoint,
                &[
                    ("q", address),
                    ("key", key),
                    ("countrycode", "us"),
                    ("limit", "1"),
                ],
            ),
        };
        url.map_err(|e| GeocodeError::InvalidEndpoint(e.to_string()))
    }

    async fn fetch(&self, address: &str) -> Result<GeocodingResult> {
        let url = self.request_url(address)?;
        let body: Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let parsed = match self.config.provider {
            GeocoderProvider::Google => providers::parse_google(&body),
            GeocoderProvider::Mapbox => providers::parse_mapbox(&body),
            GeocoderProvider::OpenCage => providers::parse_opencage(&body),
        };
        parsed.ok_or(GeocodeError::NotFound)
    }

    #[instrument(name = "Geocode", level = "debug", skip(self), fields(provider = %self.config.provider))]
    async fn geocode_bounded(&self, address: &str) -> Result<GeocodingResult> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::NotFound);
        }

        match tokio::time::timeout(self.config.timeout, self.fetch(address)).await {
            Ok(Ok(result)) => {
                debug!(
                    latitude = result.latitude,
                    longitude = result.longitude,
                    "Geocoder match"
                );
                Ok(result)
            }
            Ok(Err(GeocodeError::NotFound)) => {
                debug!("Geocoder returned no match");
                Err(GeocodeError::NotFound)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Geocoder request failed, treating as not found");
                Err(GeocodeError::NotFound)
            }
            Err(_) => {
                warn!(timeout = ?self.config.timeout, "Geocoder timed out, treating as not found");
                Err(GeocodeError::NotFound)
            }
        }
    }
}

impl Geocoder for HttpGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<GeocodingResult>> {
        self.geocode_bounded(address).boxed()
    }

    fn provider(&self) -> Option<GeocoderProvider> {
        Some(self.config.provider)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use tokio::net::TcpListener;

    use super::*;
    use crate::geocoder::DEFAULT_GEOCODER_TIMEOUT;

    fn geocoder(provider: GeocoderProvider) -> HttpGeocoder {
        HttpGeocoder::new(GeocoderConfig::new(provider, "test-key")).unwrap()
    }

    #[test]
    fn test_google_url_encodes_address() {
        let url = geocoder(GeocoderProvider::Google)
            .request_url("Edison, NJ")
            .unwrap();
        assert_eq!(url.host_str(), Some("maps.googleapis.com"));
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("address".to_string(), "Edison, NJ".to_string())));
        assert!(pairs.contains(&("key".to_string(), "test-key".to_string())));
    }

    #[test]
    fn test_mapbox_url_puts_address_in_path() {
        let url = geocoder(GeocoderProvider::Mapbox)
            .request_url("Edison, NJ")
            .unwrap();
        assert!(url.path().starts_with("/geocoding/v5/mapbox.places/"));
        assert!(url.path().ends_with(".json"));
        assert!(url.path().contains("Edison"));
        assert!(
            url.query_pairs()
                .any(|(k, v)| k == "access_token" && v == "test-key")
        );
    }

    #[test]
    fn test_opencage_url() {
        let url = geocoder(GeocoderProvider::OpenCage)
            .request_url("08817")
            .unwrap();
        assert_eq!(url.host_str(), Some("api.opencagedata.com"));
        assert!(url.query_pairs().any(|(k, v)| k == "q" && v == "08817"));
        assert!(url.query_pairs().any(|(k, v)| k == "limit" && v == "1"));
    }

    #[tokio::test]
    async fn test_blank_address_short_circuits() {
        let geocoder = HttpGeocoder::new(
            GeocoderConfig::new(GeocoderProvider::Google, "test-key")
                .with_timeout(Duration::from_millis(10)),
        )
        .unwrap();
        let result = geocoder.geocode("   ").await;
        assert!(matches!(result, Err(GeocodeError::NotFound)));
        assert_eq!(geocoder.provider(), Some(GeocoderProvider::Google));
    }

    fn local_geocoder(port: u16, timeout: Duration) -> HttpGeocoder {
        HttpGeocoder::new(
            GeocoderConfig::new(GeocoderProvider::Google, "test-key")
                .with_timeout(timeout)
                .with_base_url(format!("http://127.0.0.1:{port}/geocode/json")),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_overrides_endpoint() {
        let url = local_geocoder(8080, DEFAULT_GEOCODER_TIMEOUT)
            .request_url("Edison, NJ")
            .unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
        assert!(url.query_pairs().any(|(k, v)| k == "address" && v == "Edison, NJ"));
    }

    #[tokio::test]
    async fn test_silent_server_times_out_as_not_found() {
        // Accepts the connection but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let _held = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let geocoder = local_geocoder(port, Duration::from_millis(50));
        let started = Instant::now();
        let result = geocoder.geocode("Edison, NJ").await;

        assert!(matches!(result, Err(GeocodeError::NotFound)));
        assert!(started.elapsed() < Duration::from_secs(5));
        server.abort();
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_found() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = local_geocoder(port, Duration::from_secs(2))
            .geocode("Edison, NJ")
            .await;
        assert!(matches!(result, Err(GeocodeError::NotFound)));
    }
}
