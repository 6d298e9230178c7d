//! HTTP client for the expense tracker REST API.
//!
//! [ApiClient] carries the base URL and the bearer token of the signed-in
//! user. Every authenticated request goes through [ApiClient::auth_fetch], and
//! every response goes through [check_status] so that API errors surface with
//! the `detail` message the API sent.

mod auth;
mod categories;
mod expenses;
mod persons;
mod scan;
mod users;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, token::AccessToken};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A client for the expense tracker API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<AccessToken>,
}

impl ApiClient {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:8000`.
    ///
    /// # Errors
    ///
    /// Returns [Error::HttpError] if the HTTP client cannot be initialised.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        })
    }

    /// Use `token` for authenticated requests.
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// The token of the signed-in user, if any.
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// The API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start an authenticated request to `path`.
    ///
    /// The request carries the bearer token and a JSON content type.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotLoggedIn] if the client has no token.
    pub fn auth_fetch(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        Ok(self
            .bearer_request(method, path)?
            .header(CONTENT_TYPE, "application/json"))
    }

    /// An authenticated request without a preset content type, for uploads.
    fn bearer_request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let token = self.token.as_ref().ok_or(Error::NotLoggedIn)?;
        tracing::debug!("{method} {path}");

        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(token.as_str()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request_json(Method::GET, path).await
    }

    /// Send a request without a body and parse the JSON response.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, Error> {
        let response = self.auth_fetch(method, path)?.send().await?;

        read_json(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body)?;
        let response = self.auth_fetch(method, path)?.body(body).send().await?;

        read_json(response).await
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<(), Error> {
        let response = self.auth_fetch(method, path)?.send().await?;
        check_status(response, None).await?;

        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let response = check_status(response, None).await?;

    Ok(response.json().await?)
}

/// Pass through success responses and turn the rest into an [Error].
///
/// The message is the API's `detail`, else `fallback`, else the status reason.
pub(crate) async fn check_status(
    response: Response,
    fallback: Option<&str>,
) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body)
        .or_else(|| fallback.map(str::to_owned))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_owned()
        });

    tracing::warn!("Request failed with {status}: {detail}");

    Err(Error::from_status(status, detail))
}

/// Extract the message from an error body of the form `{"detail": ...}`.
///
/// Validation errors carry a list of objects with a `msg` field, which are
/// joined into one line.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail")? {
        Value::Null => None,
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(message) => message.to_owned(),
                    None => item.to_string(),
                })
                .collect();

            Some(messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}
