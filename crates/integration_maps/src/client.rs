//! Google Maps HTTP client

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, round_to_cents};
use moka::future::Cache;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::models::{
    DistanceMatrixResponse, GeocodeResponse, STATUS_OK, STATUS_ZERO_RESULTS, is_provider_fault,
};

/// Trait for Maps clients
#[async_trait]
pub trait MapsClient: Send + Sync {
    /// Formatted address of the first reverse geocoding candidate, trimmed
    async fn reverse_geocode(&self, coordinate: &Coordinate) -> Result<String, MapsError>;

    /// Driving distance in kilometres, rounded to two decimals
    async fn driving_distance_km(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<f64, MapsError>;
}

/// Client for the Google Maps Geocoding and Distance Matrix web services
#[derive(Debug)]
pub struct GoogleMapsClient {
    client: Client,
    config: MapsConfig,
    api_key: SecretString,
    label_cache: Option<Cache<String, String>>,
}

impl GoogleMapsClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `MapsError::MissingApiKey` if no key is configured, or
    /// `MapsError::ConnectionFailed` if the HTTP client cannot be built.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let api_key = SecretString::from(config.api_key().ok_or(MapsError::MissingApiKey)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Tollgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MapsError::ConnectionFailed(e.to_string()))?;

        let label_cache = (config.cache_ttl_secs > 0).then(|| {
            Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(Duration::from_secs(config.cache_ttl_secs))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
            label_cache,
        })
    }

    /// Issue a GET against a service endpoint and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, MapsError> {
        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MapsError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    MapsError::ConnectionFailed(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapsError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MapsError::ParseError(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| MapsError::ParseError(e.to_string()))
    }
}

fn ensure_well_formed(coordinate: &Coordinate) -> Result<(), MapsError> {
    if coordinate.is_well_formed() {
        Ok(())
    } else {
        Err(MapsError::InvalidCoordinate(coordinate.to_string()))
    }
}

fn query_value(coordinate: &Coordinate) -> String {
    format!("{},{}", coordinate.latitude(), coordinate.longitude())
}

#[async_trait]
impl MapsClient for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn reverse_geocode(&self, coordinate: &Coordinate) -> Result<String, MapsError> {
        ensure_well_formed(coordinate)?;

        let cache_key = format!("{:.6},{:.6}", coordinate.latitude(), coordinate.longitude());
        if let Some(cache) = &self.label_cache {
            if let Some(label) = cache.get(&cache_key).await {
                debug!(%cache_key, "Reverse geocoding cache hit");
                return Ok(label);
            }
        }

        let params = [("latlng", query_value(coordinate))];
        let response: GeocodeResponse = self.get_json("geocode/json", &params).await?;

        match response.status.as_str() {
            STATUS_OK => {},
            STATUS_ZERO_RESULTS => return Err(MapsError::NoResult),
            status => {
                return Err(MapsError::ApiError {
                    status: status.to_string(),
                    message: response.error_message.unwrap_or_default(),
                });
            },
        }

        let first = response.results.first().ok_or(MapsError::NoResult)?;
        let label = first
            .formatted_address
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .ok_or(MapsError::MalformedResult)?
            .to_string();

        if let Some(cache) = &self.label_cache {
            cache.insert(cache_key, label.clone()).await;
        }
        debug!(%label, "Reverse geocoded coordinate");
        Ok(label)
    }

    #[instrument(skip(self))]
    async fn driving_distance_km(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<f64, MapsError> {
        ensure_well_formed(origin)?;
        ensure_well_formed(destination)?;

        let params = [
            ("origins", query_value(origin)),
            ("destinations", query_value(destination)),
            ("mode", "driving".to_string()),
        ];
        let response: DistanceMatrixResponse =
            self.get_json("distancematrix/json", &params).await?;

        if is_provider_fault(&response.status) {
            return Err(MapsError::ApiError {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }

        let element = response.first_element();
        let element_status = element.map_or("MISSING", |e| e.status.as_str());
        let meters = element
            .filter(|e| response.status == STATUS_OK && e.status == STATUS_OK)
            .and_then(|e| e.distance_meters());

        let Some(meters) = meters else {
            warn!(
                status = %response.status,
                %element_status,
                "Distance matrix returned no usable route"
            );
            return Err(MapsError::RouteUnavailable {
                status: response.status.clone(),
                element_status: element_status.to_string(),
            });
        };

        let km = round_to_cents(meters / 1000.0);
        debug!(km, "Driving distance computed");
        Ok(km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let err = GoogleMapsClient::new(&MapsConfig::default()).unwrap_err();
        assert!(matches!(err, MapsError::MissingApiKey));
    }

    #[test]
    fn test_new_with_key() {
        let client = GoogleMapsClient::new(&MapsConfig::with_api_key("k")).unwrap();
        assert!(client.label_cache.is_some());
    }

    #[test]
    fn test_cache_disabled_with_zero_ttl() {
        let client = GoogleMapsClient::new(&MapsConfig::for_testing("http://localhost")).unwrap();
        assert!(client.label_cache.is_none());
    }

    #[test]
    fn test_query_value_format() {
        let c = Coordinate::new_unchecked(10.5, -20.25);
        assert_eq!(query_value(&c), "10.5,-20.25");
    }

    #[tokio::test]
    async fn test_invalid_coordinate_rejected_before_request() {
        let client = GoogleMapsClient::new(&MapsConfig::for_testing("http://127.0.0.1:9")).unwrap();
        let bad = Coordinate::new_unchecked(f64::NAN, 1.0);
        let good = Coordinate::new_unchecked(1.0, 1.0);

        let err = client.driving_distance_km(&bad, &good).await.unwrap_err();
        assert!(matches!(err, MapsError::InvalidCoordinate(_)));
        let err = client.reverse_geocode(&bad).await.unwrap_err();
        assert!(matches!(err, MapsError::InvalidCoordinate(_)));
    }
}
