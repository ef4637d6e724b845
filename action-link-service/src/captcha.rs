use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("captcha verifier request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("captcha verifier returned HTTP {0}")]
    UnexpectedStatus(u16),
}

/// Checks a client-side CAPTCHA response with its issuer.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// # Returns
    /// * `Ok(true)` - The response is valid
    /// * `Ok(false)` - The issuer rejected the response
    /// * `Err` - The issuer could not be asked
    async fn verify(&self, response: &str, remote_ip: Option<&str>) -> Result<bool, CaptchaError>;
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifier for Cloudflare Turnstile and other `siteverify`-compatible services.
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl TurnstileVerifier {
    pub fn new(
        secret: impl Into<String>,
        verify_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CaptchaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("action-link-service/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            secret: secret.into(),
            verify_url: verify_url.into(),
        })
    }
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, response: &str, remote_ip: Option<&str>) -> Result<bool, CaptchaError> {
        let mut form = vec![("secret", self.secret.as_str()), ("response", response)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let reply = self.client.post(&self.verify_url).form(&form).send().await?;
        if !reply.status().is_success() {
            return Err(CaptchaError::UnexpectedStatus(reply.status().as_u16()));
        }

        let body: SiteVerifyResponse = reply.json().await?;
        if !body.success {
            tracing::debug!(error_codes = ?body.error_codes, "Captcha response rejected");
        }
        Ok(body.success)
    }
}
