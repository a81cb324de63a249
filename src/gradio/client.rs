use super::types::{PredictEnvelope, tryon_payload};
use crate::{Error, Result, config::SpaceConfig};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

#[async_trait]
pub trait TryOnClient: Send + Sync {
    /// Runs one try-on prediction with the fixed parameter tuple.
    async fn try_on(&self, human: &[u8], garment: &[u8]) -> Result<PredictEnvelope>;
}

/// Established connection to the Space. Created once per process and shared
/// by all requests; never refreshed, even after a failed prediction.
struct SpaceConnection {
    http: reqwest::Client,
    base_url: String,
    hf_token: Option<String>,
}

impl SpaceConnection {
    async fn establish(config: &SpaceConfig) -> Result<Self> {
        debug!("Connecting to Space at {}", config.base_url);

        let http = reqwest::Client::new();

        // The Space serves its app config at /config; fetching it verifies
        // the host is reachable and the app is up.
        let mut request = http.get(format!("{}/config", config.base_url));
        if let Some(token) = &config.hf_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(format!("failed to reach Space: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::remote(format!(
                "Space config request returned {}",
                response.status()
            )));
        }

        info!("Connected to Space at {}", config.base_url);

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            hf_token: config.hf_token.clone(),
        })
    }

    async fn predict(&self, human: &[u8], garment: &[u8]) -> Result<PredictEnvelope> {
        let mut request = self
            .http
            .post(format!("{}/run/tryon", self.base_url))
            .json(&tryon_payload(human, garment));
        if let Some(token) = &self.hf_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(format!("prediction request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::remote(format!(
                "prediction returned {}",
                response.status()
            )));
        }

        response
            .json::<PredictEnvelope>()
            .await
            .map_err(|e| Error::remote(format!("unparseable prediction envelope: {e}")))
    }
}

/// Lazily-connecting client for the hosted try-on Space.
///
/// The connection is established on first use and memoized; concurrent first
/// callers converge on a single establishment attempt.
pub struct GradioTryOnClient {
    config: SpaceConfig,
    connection: OnceCell<SpaceConnection>,
}

impl GradioTryOnClient {
    pub fn new(config: SpaceConfig) -> Self {
        Self {
            config,
            connection: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<&SpaceConnection> {
        self.connection
            .get_or_try_init(|| SpaceConnection::establish(&self.config))
            .await
    }
}

#[async_trait]
impl TryOnClient for GradioTryOnClient {
    async fn try_on(&self, human: &[u8], garment: &[u8]) -> Result<PredictEnvelope> {
        let connection = self.connection().await?;

        debug!(
            human_bytes = human.len(),
            garment_bytes = garment.len(),
            "Sending try-on prediction"
        );

        connection.predict(human, garment).await
    }
}
