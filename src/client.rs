//! HubSpot API client.
//!
//! Low-level HTTP dispatcher that handles authentication, URL building and
//! error translation. Resource-specific operations live on the facades
//! returned by [`HubSpotClient::deals`] and [`HubSpotClient::deal_properties`].

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{DealPropertiesApi, DealsApi};
use crate::error::{HubSpotError, Result};
use crate::request::ApiRequest;
use crate::serializer::{self, SchemaMode};
use crate::traits::ListModel;

const DEFAULT_API_URL: &str = "https://api.hubapi.com";
const USER_AGENT: &str = concat!("hubapi/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const API_KEY_PARAM: &str = "hapikey";

/// How requests are authenticated. Exactly one mode is active per client.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Legacy API key, sent as the `hapikey` query parameter.
    ApiKey(String),
    /// OAuth or private-app access token, sent as a bearer header.
    OAuth(String),
}

impl Credentials {
    /// Whether this is bearer-token auth.
    pub fn is_oauth(&self) -> bool {
        matches!(self, Self::OAuth(_))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::OAuth(_) => f.write_str("OAuth(..)"),
        }
    }
}

/// Low-level HubSpot API client.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use hubapi::{Credentials, HubSpotClient};
///
/// # fn example() -> hubapi::Result<()> {
/// // Create from environment variables
/// let client = HubSpotClient::from_env()?;
///
/// // Or configure manually
/// let client = HubSpotClient::new(
///     Credentials::OAuth("pat-na1-...".to_string()),
///     "https://api.hubapi.com",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HubSpotClient {
    http: Client,
    base_url: Arc<Url>,
    credentials: Arc<Credentials>,
}

impl std::fmt::Debug for HubSpotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl HubSpotClient {
    /// Create a client from environment variables.
    ///
    /// Uses `HUBSPOT_ACCESS_TOKEN` (bearer auth) if set, otherwise
    /// `HUBSPOT_API_KEY` (`hapikey` auth). `HUBSPOT_API_URL` overrides the
    /// base URL (defaults to `https://api.hubapi.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if neither credential variable is set.
    pub fn from_env() -> Result<Self> {
        let credentials = match (env::var("HUBSPOT_ACCESS_TOKEN"), env::var("HUBSPOT_API_KEY")) {
            (Ok(token), _) => Credentials::OAuth(token),
            (Err(_), Ok(key)) => Credentials::ApiKey(key),
            (Err(_), Err(_)) => {
                return Err(HubSpotError::ConfigMissing(
                    "HUBSPOT_ACCESS_TOKEN or HUBSPOT_API_KEY environment variable not set"
                        .to_string(),
                ))
            }
        };

        let base_url =
            env::var("HUBSPOT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(credentials, &base_url)
    }

    /// Create a new client with the default transport timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(credentials: Credentials, base_url: &str) -> Result<Self> {
        Self::with_timeout(credentials, base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom transport timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn with_timeout(credentials: Credentials, base_url: &str, timeout: Duration) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()
            .map_err(HubSpotError::Http)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            credentials: Arc::new(credentials),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether requests carry a bearer token rather than an API key.
    pub fn uses_oauth(&self) -> bool {
        self.credentials.is_oauth()
    }

    /// Deal operations.
    pub fn deals(&self) -> DealsApi<'_> {
        DealsApi::new(self)
    }

    /// Deal property definition operations.
    pub fn deal_properties(&self) -> DealPropertiesApi<'_> {
        DealPropertiesApi::new(self)
    }

    /// Send a request and deserialize a single entity.
    ///
    /// An empty response body yields `T::default()`.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute<T>(&self, request: ApiRequest, mode: SchemaMode) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serializer::deserialize(&body, mode)
    }

    /// Send a request and deserialize a list wrapper.
    ///
    /// An empty response body yields `L::default()`.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute_list<L: ListModel>(&self, request: ApiRequest, mode: SchemaMode) -> Result<L> {
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            return Ok(L::default());
        }
        serializer::deserialize_list(&body, mode)
    }

    /// Send a request and discard the response body.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn execute_void(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    /// Upload a file plus form fields as `multipart/form-data`.
    ///
    /// The file part is named after `filename`. The response is parsed in
    /// plain mode; an empty body yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`HubSpotError::Validation`] if the request already carries
    /// a JSON body.
    #[tracing::instrument(skip(self, request, data, parameters), fields(method = %request.method(), path = request.path(), size = data.len()))]
    pub async fn execute_multipart<T>(
        &self,
        request: ApiRequest,
        data: Vec<u8>,
        filename: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if request.body().is_some() {
            return Err(HubSpotError::Validation(
                "multipart requests cannot carry a JSON body".to_string(),
            ));
        }

        let mut form = Form::new().part(
            filename.to_string(),
            Part::bytes(data).file_name(filename.to_string()),
        );
        for (key, value) in parameters {
            form = form.text(key.clone(), value.clone());
        }

        let url = self.url_for(&request)?;
        let builder = self
            .http
            .request(request.method().clone(), url)
            .multipart(form);

        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(HubSpotError::Http)?;

        let body = Self::check_response(response).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serializer::deserialize(&body, SchemaMode::Plain)
    }

    /// Perform one round trip and return the raw body of a 2xx response.
    async fn send(&self, request: ApiRequest) -> Result<String> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = %request.method(), path = request.path(), "sending request");

        let mut builder = self.http.request(request.method().clone(), url);
        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(HubSpotError::Http)?;

        Self::check_response(response).await
    }

    /// Base URL + path + query, with the API key appended in key mode.
    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.join(request.path().trim_start_matches('/'))?;

        let api_key = match self.credentials.as_ref() {
            Credentials::ApiKey(key) => Some(key.as_str()),
            Credentials::OAuth(_) => None,
        };

        if !request.query_params().is_empty() || api_key.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_params() {
                pairs.append_pair(key, value);
            }
            if let Some(key) = api_key {
                pairs.append_pair(API_KEY_PARAM, key);
            }
        }

        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.as_ref() {
            Credentials::OAuth(token) => builder.bearer_auth(token),
            Credentials::ApiKey(_) => builder,
        }
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<String> {
        let status = response.status();

        if status.is_success() {
            return response.text().await.map_err(HubSpotError::Http);
        }

        let description = status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string();
        let body = response
            .text()
            .await
            .ok()
            .filter(|b| !b.trim().is_empty());

        tracing::warn!(status = status.as_u16(), %description, "HubSpot request failed");

        Err(HubSpotError::Remote {
            status: status.as_u16(),
            description,
            body,
        })
    }
}
