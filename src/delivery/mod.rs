//! Wire contract of the mail-sending endpoint and the transport seam the
//! controller delivers through.

mod http;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::ContactForm;

pub use http::HttpMailTransport;

/// `Type` value the endpoint uses to report a delivered message.
pub const OK_KIND: &str = "ok";

/// JSON body posted to the endpoint.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MailPayload {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "recaptchaValue")]
    pub recaptcha_value: String,
}

impl MailPayload {
    pub fn new(form: &ContactForm, recaptcha_value: impl Into<String>) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            message: form.message.clone(),
            recaptcha_value: recaptcha_value.into(),
        }
    }
}

/// JSON body the endpoint answers with.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResponse {
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl DeliveryResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: OK_KIND.to_string(),
            message: message.into(),
        }
    }

    pub fn rejected(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.kind == OK_KIND
    }

    /// A 2xx answer whose `Type` is not `ok` is still a failure.
    pub fn into_receipt(self) -> Result<DeliveryReceipt, DeliveryError> {
        if self.is_ok() {
            Ok(DeliveryReceipt {
                message: self.message,
            })
        } else {
            Err(DeliveryError::Rejected {
                kind: self.kind,
                message: self.message,
            })
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeliveryReceipt {
    pub message: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DeliveryError {
    #[error("mail endpoint unreachable: {0}")]
    Transport(String),
    #[error("mail endpoint answered with status {status}")]
    Status { status: u16 },
    #[error("mail endpoint response could not be decoded: {0}")]
    Decode(String),
    #[error("mail endpoint reported `{kind}`: {message}")]
    Rejected { kind: String, message: String },
}

pub type DeliveryResult = Result<DeliveryResponse, DeliveryError>;

pub type BoxedDeliveryFuture<'a> = Pin<Box<dyn Future<Output = DeliveryResult> + Send + 'a>>;

/// Hands a payload to the mail endpoint. One call per submission attempt;
/// implementations must not retry on their own.
pub trait MailTransport: Send + Sync + 'static {
    fn deliver<'a>(&'a self, payload: &'a MailPayload) -> BoxedDeliveryFuture<'a>;
}

impl<F> MailTransport for F
where
    F: Fn(MailPayload) -> BoxedDeliveryFuture<'static> + Send + Sync + 'static,
{
    fn deliver<'a>(&'a self, payload: &'a MailPayload) -> BoxedDeliveryFuture<'a> {
        (self)(payload.clone())
    }
}
