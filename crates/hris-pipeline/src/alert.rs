//! Failure alerts, delivered to a webhook.

use std::time::Duration;

use serde::Serialize;

pub const ALERT_SUBJECT: &str = "HRIS Pipeline Alert";

/// The JSON body POSTed to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertPayload<'a> {
  pub subject: &'a str,
  pub text:    &'a str,
}

/// Sends alerts to an optional webhook. Delivery is best-effort: every
/// failure is logged and swallowed.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct Alerter {
  client:      reqwest::Client,
  webhook_url: Option<String>,
}

impl Alerter {
  pub fn new(webhook_url: Option<String>) -> Self {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default HTTP client");
        reqwest::Client::new()
      });
    Self { client, webhook_url }
  }

  pub async fn send(&self, text: &str) {
    tracing::error!(alert = text, "pipeline alert");

    let Some(url) = self.webhook_url.as_deref() else {
      return;
    };
    let payload = AlertPayload { subject: ALERT_SUBJECT, text };

    match self.client.post(url).json(&payload).send().await {
      Ok(resp) if resp.status().is_success() => {
        tracing::info!(url, "alert delivered");
      }
      Ok(resp) => {
        tracing::warn!(url, status = %resp.status(), "alert webhook rejected the alert");
      }
      Err(e) => {
        tracing::warn!(url, error = %e, "failed to deliver alert");
      }
    }
  }
}
