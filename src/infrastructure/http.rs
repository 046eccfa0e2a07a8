use crate::channel::NotificationChannel;
use crate::messaging::Redirect;
use crate::types::constants::paths;
use crate::types::{NotificationError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Scope of a user-initiated logout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoutType {
    /// End only this browser session
    Local,
    /// End every session of the user
    Complete,
    /// End every session and revoke the OAuth2 tokens
    Global,
}

impl LogoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Complete => "complete",
            Self::Global => "global",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutRequest {
    logout_type: LogoutType,
}

/// Body returned by the logout API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub expired_sessions: Option<u64>,
    #[serde(default)]
    pub token_revoked: Option<bool>,
}

/// Calls the SSO logout API on behalf of the current session
pub struct LogoutClient {
    origin: Url,
    session_cookie: Option<String>,
    http_client: reqwest::Client,
}

impl LogoutClient {
    pub fn new(origin: &str, session_cookie: Option<String>) -> Result<Self> {
        Ok(Self {
            origin: Url::parse(origin)?,
            session_cookie,
            http_client: reqwest::Client::new(),
        })
    }

    /// URL of the logout API, with the type also bound as a query parameter
    pub fn logout_url(&self, logout_type: LogoutType) -> Result<Url> {
        let mut url = self.origin.join(paths::LOGOUT_API)?;
        url.query_pairs_mut()
            .append_pair("logoutType", logout_type.as_str());
        Ok(url)
    }

    /// Sends the logout request
    pub async fn logout(&self, logout_type: LogoutType) -> Result<LogoutResponse> {
        let url = self.logout_url(logout_type)?;

        let mut request = self
            .http_client
            .post(url)
            .header("Accept", "application/json")
            .json(&LogoutRequest { logout_type });

        if let Some(cookie) = &self.session_cookie {
            request = request.header("Cookie", cookie);
        }

        tracing::info!("Requesting {} logout", logout_type.as_str());
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        interpret_response(status, &body)
    }

    /// Logs out, tears down the notification channel and returns where to go next
    pub async fn perform_logout(
        &self,
        channel: &NotificationChannel,
        logout_type: LogoutType,
    ) -> Result<Redirect> {
        let response = self.logout(logout_type).await?;
        tracing::info!(
            "Logout succeeded: expired_sessions={:?}, token_revoked={:?}",
            response.expired_sessions,
            response.token_revoked
        );
        channel.cleanup();
        Ok(Redirect::LogoutSuccess)
    }
}

fn interpret_response(status: reqwest::StatusCode, body: &str) -> Result<LogoutResponse> {
    let parsed = serde_json::from_str::<LogoutResponse>(body);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|r| r.message)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        return Err(NotificationError::Logout(message));
    }

    let response = parsed?;
    if !response.success {
        return Err(NotificationError::Logout(
            response
                .message
                .unwrap_or_else(|| "server reported failure".to_string()),
        ));
    }
    Ok(response)
}

/// Derives the logout socket endpoint from the page origin.
///
/// `https` pages use `wss`, `http` pages use `ws`.
pub fn notification_endpoint(origin: &str) -> Result<Url> {
    let mut url = Url::parse(origin)?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(NotificationError::UnsupportedScheme(other.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|_| NotificationError::UnsupportedScheme(scheme.to_string()))?;
    url.set_path(paths::LOGOUT_SOCKET);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
