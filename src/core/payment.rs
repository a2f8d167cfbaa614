//! Payment provider abstractions and the Pay request/response contract

use crate::core::config::PaymentConfig;
use crate::core::split::Receiver;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverList {
    pub receiver: Vec<Receiver>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub error_language: String,
}

/// Body of a Pay request that starts a parallel payment to all receivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub return_url: String,
    pub cancel_url: String,
    pub receiver_list: ReceiverList,
    pub currency_code: String,
    pub action_type: String,
    pub reverse_all_parallel_payments_on_error: bool,
    pub request_envelope: RequestEnvelope,
}

pub fn build_pay_request(receivers: Vec<Receiver>, config: &PaymentConfig) -> PayRequest {
    PayRequest {
        return_url: config.return_url.clone(),
        cancel_url: config.cancel_url.clone(),
        receiver_list: ReceiverList {
            receiver: receivers,
        },
        currency_code: config.currency.clone(),
        action_type: "PAY".to_string(),
        reverse_all_parallel_payments_on_error: true,
        request_envelope: RequestEnvelope {
            error_language: "en_US".to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayError {
    #[serde(default)]
    pub message: Option<String>,
}

/// The parts of a Pay response this application reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayResponse {
    #[serde(rename = "payKey", default)]
    pub pay_key: Option<String>,
    #[serde(default)]
    pub error: Option<Vec<PayError>>,
}

impl PayResponse {
    pub fn pay_key(&self) -> Option<&str> {
        self.pay_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Human readable error messages, `None` when the provider reported none.
    pub fn errors(&self) -> Option<Vec<String>> {
        let errors = self.error.as_ref().filter(|errors| !errors.is_empty())?;
        Some(
            errors
                .iter()
                .map(|e| e.message.clone().unwrap_or_default())
                .collect(),
        )
    }
}

/// Where the supporter is sent to approve the payment.
pub fn checkout_url(config: &PaymentConfig, pay_key: &str) -> String {
    format!("{}{}", config.checkout_url, pay_key)
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn pay(&self, request: &PayRequest) -> Result<PayResponse>;
}
