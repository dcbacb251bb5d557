//! HTTP transport for the portal login sequence.
//!
//! The portal tracks the multi-step login through session cookies, so one
//! `PortalClient` (and its cookie jar) is scoped to one login attempt. The
//! base URL is overridable to point integration tests at a mock server.

use anyhow::{Context, Result};
use reqwest::header::REFERER;
use reqwest::{Client, Url};

use super::error::AuthError;
use super::form::FormFields;

/// Cookie-holding HTTP client for the fixed login endpoint.
pub struct PortalClient {
    client: Client,
    login_url: Url,
    resource_list_url: Url,
}

/// A successful page response: the body plus the URL it was served from
/// (after redirects), which carries the post-login redirect parameters.
#[derive(Debug)]
pub struct PageResponse {
    pub body: String,
    pub url: Url,
}

impl PortalClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://portal.nap.gsic.titech.ac.jp";

    const LOGIN_PATH: &'static str = "/GetAccess/Login";
    const RESOURCE_LIST_PATH: &'static str = "/GetAccess/ResourceList";

    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base: Url = base_url
            .parse()
            .with_context(|| format!("Invalid portal base URL: {base_url}"))?;
        let login_url = base
            .join(Self::LOGIN_PATH)
            .context("Failed to build login URL")?;
        let resource_list_url = base
            .join(Self::RESOURCE_LIST_PATH)
            .context("Failed to build resource list URL")?;

        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/145.0.0.0 Safari/537.36")
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            login_url,
            resource_list_url,
        })
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// Fallback redirect target when the final URL names none.
    pub fn resource_list_url(&self) -> &Url {
        &self.resource_list_url
    }

    /// Fetch the username/password form.
    pub async fn fetch_login_form(&self) -> Result<String, AuthError> {
        let response = self
            .client
            .get(self.login_url.clone())
            .query(&[("Template", "userpass_key"), ("AUTHMETHOD", "UserPassword")])
            .send()
            .await
            .map_err(|err| AuthError::Unexpected(err.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::InvalidStatusCode(status));
        }

        response
            .text()
            .await
            .map_err(|err| AuthError::Unexpected(err.into()))
    }

    /// POST a field map to the login endpoint, URL-encoded, with the login
    /// URL as Referer.
    pub async fn submit_login_form(&self, fields: &FormFields) -> Result<PageResponse, AuthError> {
        let response = self
            .client
            .post(self.login_url.clone())
            .header(REFERER, self.login_url.as_str())
            .form(fields.as_slice())
            .send()
            .await
            .map_err(|err| AuthError::Unexpected(err.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::InvalidStatusCode(status));
        }

        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|err| AuthError::Unexpected(err.into()))?;

        Ok(PageResponse { body, url })
    }
}
