// API client module: a small blocking HTTP client for the blog service.
// Every call is one synchronous request; the response is dropped before
// the call returns so nothing is left open between actions.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Blocking client holding the reqwest client and the normalized base URL
/// (no trailing slash). The token is not stored here; callers pass it in
/// from their `Session`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Body of `/register` and `/login`. Login sends an empty `name`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A post as sent to `/createPost` and returned by `/posts`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub content: String,
}

/// Response of `/register` and `/login`. Anything other than a string
/// `token` is ignored; a missing or non-string token decodes as `None`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    #[serde(default, deserialize_with = "string_or_none")]
    pub token: Option<String>,
}

/// Response of `GET /posts`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PostsResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub status: String,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(token)) => Some(token),
        _ => None,
    })
}

impl ApiClient {
    /// Build a client for `base_url`. A trailing `/` is dropped so paths
    /// can be appended directly.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use an already configured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /register`; succeeds only on 201.
    pub fn register(&self, user: &User) -> Result<AuthResponse, ApiError> {
        self.authenticate("/register", user, StatusCode::CREATED, "Registration failed")
    }

    /// `POST /login`; succeeds only on 200.
    pub fn login(&self, user: &User) -> Result<AuthResponse, ApiError> {
        self.authenticate("/login", user, StatusCode::OK, "Login failed")
    }

    fn authenticate(
        &self,
        path: &str,
        user: &User,
        expected: StatusCode,
        failure: &'static str,
    ) -> Result<AuthResponse, ApiError> {
        let body = serde_json::to_vec(user).map_err(ApiError::Encode)?;
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let res = self.send("POST", path, request)?;
        expect_status(&res, expected, failure)?;

        // A JSON `null` body carries no token but is not a failure.
        let text = res.text().map_err(ApiError::ReadBody)?;
        let resp: Option<AuthResponse> = serde_json::from_str(&text).map_err(ApiError::Decode)?;
        Ok(resp.unwrap_or_default())
    }

    /// `POST /createPost` with a bearer token; succeeds only on 201.
    pub fn create_post(&self, token: &str, post: &Post) -> Result<(), ApiError> {
        let path = "/createPost";
        let body = serde_json::to_vec(post).map_err(ApiError::Encode)?;
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token)
            .body(body);
        let res = self.send("POST", path, request)?;
        expect_status(&res, StatusCode::CREATED, "Post creation failed")
    }

    /// `GET /posts` with a bearer token; succeeds only on 200. The body is
    /// trimmed before decoding.
    pub fn list_posts(&self, token: &str) -> Result<PostsResponse, ApiError> {
        let path = "/posts";
        let request = self.client.get(self.url(path)).bearer_auth(token);
        let res = self.send("GET", path, request)?;
        expect_status(&res, StatusCode::OK, "Failed to fetch posts")?;

        let text = res.text().map_err(ApiError::ReadBody)?;
        serde_json::from_str(text.trim()).map_err(ApiError::Decode)
    }

    fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        debug!(method, url = %self.url(path), "sending request");
        request
            .send()
            .map_err(|source| ApiError::Transport { method, source })
    }
}

fn expect_status(
    res: &Response,
    expected: StatusCode,
    failure: &'static str,
) -> Result<(), ApiError> {
    let status = res.status();
    info!(status = status.as_u16(), expected = expected.as_u16(), "received response");
    if status != expected {
        return Err(ApiError::Status {
            failure,
            code: status.as_u16(),
        });
    }
    Ok(())
}
