use std::{marker::PhantomData, time::Duration};

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

mod error;
mod queries;
pub use error::*;
pub use queries::*;

pub const DEFAULT_API_URL: &str = "https://mock-api.arikmpt.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection to the remote API.
///
/// Cheap to clone, the inner [`reqwest::Client`] is reference counted.
#[derive(Debug, Clone)]
pub struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub struct Query<Data, T>
where
    Data: QueryData<T>,
{
    data: Data,
    _marker: PhantomData<T>,
}

impl<Data, T> Query<Data, T>
where
    Data: QueryData<T>,
    T: DeserializeOwned,
{
    pub fn new(data: Data) -> Self {
        Self {
            data,
            _marker: PhantomData,
        }
    }

    /// Send the request and decode the response body.
    ///
    /// `token` is attached as a bearer credential when the query requires it.
    pub async fn query(&self, api: &Api, token: Option<&str>) -> Result<T, ApiError> {
        let method = self.data.method();
        let url = self.data.builder().build(api.base_url());

        let mut request = api.client.request(method.clone(), &url);

        if self.data.requires_auth() {
            let token = token.ok_or(ApiError::MissingToken)?;
            request = request.bearer_auth(token);
        }

        if let Some(body) = self.data.body() {
            request = request.json(&body);
        }

        debug!(%method, %url, "Sending request");

        let response = request.send().await?;
        let status = response.status();
        let s = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status, &s));
        }

        decode(&s)
    }
}

/// Deserialize `s` reporting the path of the field that failed.
///
/// An empty body is treated as `null`.
pub fn decode<T: DeserializeOwned>(s: &str) -> Result<T, ApiError> {
    let s = if s.trim().is_empty() { "null" } else { s };
    let mut deserializer = serde_json::Deserializer::from_str(s);

    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ApiError::Decode {
        path: e.path().to_string(),
        message: e.into_inner().to_string(),
    })
}

pub trait QueryData<T> {
    fn method(&self) -> Method {
        Method::GET
    }

    /// Build the url.
    fn builder(&self) -> Builder;

    fn body(&self) -> Option<serde_json::Value> {
        None
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

pub struct Builder {
    path: String,
    segments: Vec<String>,
    trailing_slash: bool,
}

impl Builder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            segments: Vec::new(),
            trailing_slash: false,
        }
    }

    /// Append a path segment. The value is percent-encoded.
    #[must_use]
    pub fn add_segment(mut self, segment: impl AsRef<str>) -> Self {
        self.segments
            .push(urlencoding::encode(segment.as_ref()).into_owned());
        self
    }

    #[must_use]
    pub fn trailing_slash(mut self) -> Self {
        self.trailing_slash = true;
        self
    }

    pub fn build(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );

        for segment in &self.segments {
            if !url.ends_with('/') {
                url.push('/');
            }
            url.push_str(segment);
        }

        if self.trailing_slash && !url.ends_with('/') {
            url.push('/');
        }

        url
    }
}
