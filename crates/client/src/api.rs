//! REST client for the Hue Oozie editor endpoints, using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};

use hue_oozie_core::WorkflowId;

use crate::backend::EditorBackend;
use crate::config::ClientConfig;
use crate::envelope::{
    parse_envelope, AddNodeRequest, AddNodeResponse, GenXmlResponse, SaveRequest, SaveResponse,
};
use crate::error::ClientError;

pub const ADD_NODE_PATH: &str = "/oozie/editor/workflow/add_node/";
pub const SAVE_PATH: &str = "/oozie/editor/workflow/save/";
pub const GEN_XML_PATH: &str = "/oozie/editor/workflow/gen_xml/";
pub const SUBMIT_PATH: &str = "/oozie/editor/workflow/submit/";

/// Header Django reads the CSRF token from.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Cookie Django compares the CSRF header against.
const CSRF_COOKIE: &str = "csrftoken";

const SESSION_COOKIE: &str = "sessionid";

/// HTTP client for a single Hue server.
#[derive(Debug)]
pub struct HueClient {
    client: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HueClient {
    /// Build a client from configuration.
    ///
    /// The session and CSRF cookies, when configured, are attached to every
    /// request.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Self::client_builder(config)?.build()?;
        Ok(Self::with_client(client, config))
    }

    /// A [`reqwest::ClientBuilder`] with the timeout and cookies of `config`.
    fn client_builder(config: &ClientConfig) -> Result<reqwest::ClientBuilder, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(cookies) = cookie_header(config) {
            let cookie = HeaderValue::from_str(&cookies)
                .map_err(|e| ClientError::InvalidConfig(format!("Invalid session cookie: {e}")))?;
            headers.insert(COOKIE, cookie);
        }

        Ok(reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST form fields and parse the JSON envelope of the answer.
    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        tracing::debug!(path, "POST editor endpoint");

        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let body = Self::ensure_success(request.send().await?)
            .await?
            .text()
            .await?;
        parse_envelope(&body)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClientError::Http`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Hue answered with an error status");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// `Cookie` header value carrying the session id and the CSRF token.
fn cookie_header(config: &ClientConfig) -> Option<String> {
    let cookies: Vec<String> = [
        (SESSION_COOKIE, &config.session_id),
        (CSRF_COOKIE, &config.csrf_token),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}={v}")))
    .collect();

    (!cookies.is_empty()).then(|| cookies.join("; "))
}

#[async_trait]
impl EditorBackend for HueClient {
    async fn add_node(&self, request: &AddNodeRequest) -> Result<AddNodeResponse, ClientError> {
        self.post_form(ADD_NODE_PATH, &request.form()).await
    }

    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, ClientError> {
        self.post_form(SAVE_PATH, &request.form()).await
    }

    async fn gen_xml(&self, request: &SaveRequest) -> Result<GenXmlResponse, ClientError> {
        self.post_form(GEN_XML_PATH, &request.form()).await
    }

    async fn submit_form(&self, workflow_id: &WorkflowId) -> Result<String, ClientError> {
        let url = self.url(&format!("{SUBMIT_PATH}{workflow_id}"));
        tracing::debug!(url = %url, "GET submission form");

        let response = self.client.get(url).send().await?;
        Ok(Self::ensure_success(response).await?.text().await?)
    }
}
