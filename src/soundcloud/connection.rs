use reqwest::{
    Method,
    blocking::{Client, RequestBuilder, Response},
    header::{ACCEPT, AUTHORIZATION},
};
use serde_json::Value;

use super::SoundCloudApi;
use crate::{
    error::{Error, Result},
    types::User,
};

const JSON: &str = "application/json; charset=utf-8";

/// HTTP client bound to a single access token.
///
/// A connection never refreshes anything itself; when the token goes stale
/// the owning [`super::SoundCloudClient`] throws it away and builds a new one.
#[derive(Debug, Clone)]
pub struct Connection {
    http: Client,
    api_url: String,
    access_token: String,
}

impl Connection {
    pub fn new(http: Client, api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Fetches the authenticated user. Used as the verification call.
    pub fn me(&self) -> Result<User> {
        let value = self.request(Method::GET, "/me", &[], None)?;
        super::decode(value)
    }

    /// Sends one authenticated request and returns the decoded JSON body.
    ///
    /// An empty body (e.g. `204 No Content`) decodes to `Value::Null`.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut builder = self.authorized(method, path).query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = check(builder.send()?)?;
        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| Error::Remote {
            status: None,
            message: format!("invalid JSON from SoundCloud: {e}"),
        })
    }

    /// Opens an authenticated `GET` and hands back the streaming response.
    pub fn open(&self, path: &str) -> Result<Response> {
        check(self.authorized(Method::GET, path).send()?)
    }

    fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("OAuth {}", self.access_token))
            .header(ACCEPT, JSON)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.api_url, path.trim_start_matches('/'))
        }
    }
}

impl SoundCloudApi for Connection {
    fn get(&mut self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request(Method::GET, path, query, None)
    }

    fn put(&mut self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], Some(body))
    }

    fn post(&mut self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body))
    }

    fn delete(&mut self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], None)
    }
}

/// Turns a non-2xx response into [`Error::Remote`] carrying the body text.
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| status.to_string());
    Err(Error::Remote {
        status: Some(status.as_u16()),
        message,
    })
}
