use crate::core::config::PaymentConfig;
use crate::core::payment::{PayRequest, PayResponse, PaymentGateway};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, error, instrument};

const DATA_FORMAT: &str = "JSON";

/// PaymentGateway backed by the adaptive payments Pay endpoint.
pub struct PayPalGateway {
    endpoint: String,
    user_id: String,
    password: String,
    signature: String,
    application_id: String,
    client: reqwest::Client,
}

impl PayPalGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("pledge/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PayPalGateway {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            user_id: config.user_id.clone(),
            password: config.password.clone(),
            signature: config.signature.clone(),
            application_id: config.application_id.clone(),
            client,
        })
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    // Pay creates a new payKey per call, so it is sent once and never retried
    #[instrument(
        name = "PayPalPay",
        skip(self, request),
        fields(receivers = request.receiver_list.receiver.len())
    )]
    async fn pay(&self, request: &PayRequest) -> Result<PayResponse> {
        let url = format!("{}/Pay", self.endpoint);
        debug!("Sending pay request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("X-PAYPAL-SECURITY-USERID", &self.user_id)
            .header("X-PAYPAL-SECURITY-PASSWORD", &self.password)
            .header("X-PAYPAL-SECURITY-SIGNATURE", &self.signature)
            .header("X-PAYPAL-APPLICATION-ID", &self.application_id)
            .header("X-PAYPAL-REQUEST-DATA-FORMAT", DATA_FORMAT)
            .header("X-PAYPAL-RESPONSE-DATA-FORMAT", DATA_FORMAT)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;
        debug!(%status, "Received pay response");

        match serde_json::from_str::<PayResponse>(&response_text) {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(
                    error = ?e,
                    %status,
                    response = %response_text,
                    "Failed to parse pay response"
                );
                Err(e).context("Failed to parse pay response")
            }
        }
    }
}
