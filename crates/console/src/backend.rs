//! The backend seam: the three endpoints the guard and the session need.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use midplat_auth::{CurrentUser, MenuItem, Permission, Platform};
use midplat_core::UserId;

use crate::config::ConsoleConfig;
use crate::error::{self, ApiError};

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `GET /api/v1/auth/userinfo`
    async fn current_user(&self, token: &str) -> Result<CurrentUser, ApiError>;

    /// `GET /api/v1/users/:id/permissions`
    async fn user_permissions(&self, token: &str, user_id: UserId) -> Result<Vec<Permission>, ApiError>;

    /// `GET /api/v1/users/menus?platform=`
    async fn user_menus(&self, token: &str, platform: Platform) -> Result<Vec<MenuItem>, ApiError>;
}

/// [`AuthBackend`] over HTTP.
///
/// No retries: every failure is terminal for the current action.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthBackend {
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::with_client(config.api_base_url.clone(), client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        tracing::debug!(%url, "backend request");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthenticated);
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error::message_from_body(&body);
            tracing::warn!(%url, status = status.as_u16(), %message, "backend request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;
        let payload = unwrap_envelope(value)?;
        serde_json::from_value(payload).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn current_user(&self, token: &str) -> Result<CurrentUser, ApiError> {
        self.get_json("/auth/userinfo", token, &[]).await
    }

    // Lists may come back as `null` when the user has none.
    async fn user_permissions(&self, token: &str, user_id: UserId) -> Result<Vec<Permission>, ApiError> {
        let list: Option<Vec<Permission>> = self
            .get_json(&format!("/users/{user_id}/permissions"), token, &[])
            .await?;
        Ok(list.unwrap_or_default())
    }

    async fn user_menus(&self, token: &str, platform: Platform) -> Result<Vec<MenuItem>, ApiError> {
        let list: Option<Vec<MenuItem>> = self
            .get_json("/users/menus", token, &[("platform", platform.as_str())])
            .await?;
        Ok(list.unwrap_or_default())
    }
}

/// Accept both a bare payload and the `{ code, message, data }` envelope.
///
/// An envelope whose `code` is neither 0 nor 200 is a failure even under HTTP
/// 200; code 401 means the token is no longer valid.
fn unwrap_envelope(value: Value) -> Result<Value, ApiError> {
    let is_envelope = value.is_object() && value.get("code").is_some_and(Value::is_number);
    if !is_envelope {
        return Ok(value);
    }

    let code = value.get("code").and_then(Value::as_i64).unwrap_or_default();
    match code {
        0 | 200 => Ok(value.get("data").cloned().unwrap_or(Value::Null)),
        401 => Err(ApiError::Unauthenticated),
        other => Err(ApiError::Api {
            status: u16::try_from(other).unwrap_or(500),
            message: error::message_from_value(&value)
                .unwrap_or_else(|| error::FALLBACK_MESSAGE.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_payload_passes_through() {
        let v = json!([{"id": 1}]);
        assert_eq!(unwrap_envelope(v.clone()).unwrap(), v);
        // An object without a numeric code is a payload, not an envelope.
        let user = json!({"id": 1, "code": "ops"});
        assert_eq!(unwrap_envelope(user.clone()).unwrap(), user);
    }

    #[test]
    fn envelope_is_unwrapped() {
        let v = json!({"code": 0, "message": "ok", "data": ["campaign:read"]});
        assert_eq!(unwrap_envelope(v).unwrap(), json!(["campaign:read"]));
    }

    #[test]
    fn null_data_reads_as_an_empty_list() {
        let payload = unwrap_envelope(json!({"code": 0, "data": null})).unwrap();
        let list: Option<Vec<Permission>> = serde_json::from_value(payload).unwrap();
        assert!(list.unwrap_or_default().is_empty());

        let payload = unwrap_envelope(json!({"code": 200, "message": "ok"})).unwrap();
        let list: Option<Vec<MenuItem>> = serde_json::from_value(payload).unwrap();
        assert!(list.unwrap_or_default().is_empty());
    }

    #[test]
    fn failing_envelope_becomes_error() {
        let v = json!({"code": 403, "msg": "brand disabled"});
        assert_eq!(
            unwrap_envelope(v).unwrap_err(),
            ApiError::Api {
                status: 403,
                message: "brand disabled".into()
            }
        );
        assert_eq!(
            unwrap_envelope(json!({"code": 401, "message": "expired"})).unwrap_err(),
            ApiError::Unauthenticated
        );
    }
}
