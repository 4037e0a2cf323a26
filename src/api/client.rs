use super::{ApiError, ApiResult, EventRemote, Remote, TOKEN_FILE};
use crate::libs::config::ServerConfig;
use crate::libs::event::CalendarEvent;
use crate::libs::record::{Record, RecordKind};
use crate::libs::secret::Secret;
use chrono::{NaiveDate, NaiveTime};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const LOGIN_URL: &str = "auth/login";
const REGISTER_URL: &str = "auth/register";
const MONTH_URL: &str = "events/month";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthSession {
    pub access_token: String,
    pub user: User,
}

/// HTTP client for the ihsan REST API.
///
/// Every request carries the bearer token it was built with. A 401 answer
/// tears the session down: the cached token is deleted so the next command
/// asks for a fresh login.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ServerConfig, token: Option<String>) -> ApiResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.client.request(method, url).header(header::CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Maps non-success statuses to [`ApiError`]. `record` names the record
    /// a 404 refers to; without it a 404 is an ordinary server error.
    async fn check(&self, res: Response, record: Option<(RecordKind, &str)>) -> ApiResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        match (status, record) {
            (StatusCode::NOT_FOUND, Some((kind, id))) => Err(ApiError::NotFound { kind, id: id.to_string() }),
            (StatusCode::UNAUTHORIZED, _) => {
                tracing::warn!("server rejected the session token, removing it");
                if let Err(e) = Secret::new(TOKEN_FILE, "").remove() {
                    tracing::error!(error = %e, "failed to remove session token");
                }
                Err(ApiError::Unauthorized)
            }
            _ => {
                let message = res.text().await.unwrap_or_default();
                Err(ApiError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, builder: RequestBuilder, record: Option<(RecordKind, &str)>) -> ApiResult<R> {
        let res = self.check(builder.send().await?, record).await?;
        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthSession> {
        self.fetch(self.request(Method::POST, LOGIN_URL).json(credentials), None).await
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthSession> {
        self.fetch(self.request(Method::POST, REGISTER_URL).json(registration), None).await
    }
}

impl<T: Record> Remote<T> for ApiClient {
    async fn list(&self) -> ApiResult<Vec<T>> {
        self.fetch(self.request(Method::GET, T::KIND.path()), None).await
    }

    async fn get(&self, id: &str) -> ApiResult<T> {
        let path = format!("{}/{}", T::KIND.path(), id);
        self.fetch(self.request(Method::GET, &path), Some((T::KIND, id))).await
    }

    async fn create(&self, draft: &T::Draft) -> ApiResult<T> {
        self.fetch(self.request(Method::POST, T::KIND.path()).json(draft), None).await
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> ApiResult<T> {
        let path = format!("{}/{}", T::KIND.path(), id);
        self.fetch(self.request(Method::PATCH, &path).json(patch), Some((T::KIND, id))).await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let path = format!("{}/{}", T::KIND.path(), id);
        let res = self.request(Method::DELETE, &path).send().await?;
        self.check(res, Some((T::KIND, id))).await?;
        Ok(())
    }
}

impl EventRemote for ApiClient {
    async fn list_month(&self, date: NaiveDate) -> ApiResult<Vec<CalendarEvent>> {
        let date = date.and_time(NaiveTime::MIN).and_utc().to_rfc3339();
        let builder = self.request(Method::GET, MONTH_URL).query(&[("date", date)]);
        self.fetch(builder, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ServerConfig {
            api_url: "https://ihsan.example.com/api/".to_string(),
            ..Default::default()
        };
        let client = ApiClient::new(&config, None).unwrap();
        assert_eq!(client.base_url(), "https://ihsan.example.com/api");
    }

    #[test]
    fn test_auth_session_decodes() {
        let body = r#"{"access_token":"jwt","user":{"id":"u1","email":"a@b.c","firstName":"Amina"}}"#;
        let session: AuthSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.first_name.as_deref(), Some("Amina"));
    }

    #[test]
    fn test_registration_wire_names() {
        let registration = Registration {
            first_name: "Amina".to_string(),
            last_name: "K".to_string(),
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["firstName"], "Amina");
        assert_eq!(json["lastName"], "K");
    }
}
