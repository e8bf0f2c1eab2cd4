use async_trait::async_trait;
use skiload_common::{LiftRide, Result, SkiLoadError, SkiersApi};
use tracing::debug;

/// SkiLoad client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to, e.g. `http://host:8080/api`.
    pub base_url: String,
}

/// HTTP client for the skier API
#[derive(Clone)]
pub struct Client {
    pub config: ClientConfig,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// URL lift-ride writes are posted to.
    pub fn build_ride_url(&self) -> String {
        format!("{}/skiers/liftrides", self.base())
    }

    /// URL of a skier's vertical for one day at one resort.
    pub fn build_vertical_url(&self, resort_id: &str, day: u32, skier_id: u32) -> String {
        format!("{}/skiers/{}/days/{}/skiers/{}", self.base(), resort_id, day, skier_id)
    }
}

#[async_trait]
impl SkiersApi for Client {
    /// Post one lift ride; returns whatever status code the server answered with.
    async fn submit_ride(&self, ride: &LiftRide) -> Result<u16> {
        let url = self.build_ride_url();

        let response = self
            .http_client
            .post(&url)
            .json(ride)
            .send()
            .await
            .map_err(|e| SkiLoadError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        debug!(%url, status, "submit_ride");
        Ok(status)
    }

    /// Query a skier's day vertical; returns whatever status code the server answered with.
    async fn query_vertical(&self, resort_id: &str, day: u32, skier_id: u32) -> Result<u16> {
        let url = self.build_vertical_url(resort_id, day, skier_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkiLoadError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        // Drain the body so the connection goes back to the pool.
        response
            .bytes()
            .await
            .map_err(|e| SkiLoadError::Network(e.to_string()))?;

        debug!(%url, status, "query_vertical");
        Ok(status)
    }
}
