use reqwest::{Client, Url};
use tracing::debug;

use super::{
    BoxedDeliveryFuture, DeliveryError, DeliveryResponse, DeliveryResult, MailPayload,
    MailTransport,
};
use crate::config::{ConfigError, ContactOptions};

/// Posts payloads as JSON to `<base_url><endpoint>`.
#[derive(Clone, Debug)]
pub struct HttpMailTransport {
    client: Client,
    endpoint: Url,
}

impl HttpMailTransport {
    pub fn new(base_url: &str, options: &ContactOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let base = Url::parse(base_url).map_err(|error| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: error.to_string(),
        })?;
        let endpoint = base
            .join(&options.endpoint)
            .map_err(|error| ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: error.to_string(),
            })?;
        let client = Client::builder()
            .timeout(options.request_timeout())
            .build()
            .map_err(|error| ConfigError::HttpClient(error.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, payload: &MailPayload) -> DeliveryResult {
        debug!(endpoint = %self.endpoint, "posting contact payload");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|error| DeliveryError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<DeliveryResponse>()
            .await
            .map_err(|error| DeliveryError::Decode(error.to_string()))
    }
}

impl MailTransport for HttpMailTransport {
    fn deliver<'a>(&'a self, payload: &'a MailPayload) -> BoxedDeliveryFuture<'a> {
        Box::pin(self.post(payload))
    }
}
