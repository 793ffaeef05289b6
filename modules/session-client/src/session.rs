use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SessionError};
use crate::exchange::{ExchangeEndpoint, ExchangeResponse};
use crate::store::{SessionStore, AUTH_TOKEN_KEY, USER_KEY};

/// The signed-in user as persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    ExchangingToken,
    CheckingLocalSession,
    Authenticated(User),
}

/// Client-side session: a long-lived token plus the user it belongs to.
pub struct Session<S: SessionStore> {
    store: S,
    state: SessionState,
    token: Option<String>,
    main_app_url: String,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S, main_app_url: impl Into<String>) -> Self {
        Self {
            store,
            state: SessionState::Unauthenticated,
            token: None,
            main_app_url: main_app_url.into(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Only handed out while authenticated.
    pub fn token(&self) -> Option<&str> {
        self.current_user().and(self.token.as_deref())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Establish the session on load.
    ///
    /// With a transfer token, exchange it at `primary`, retrying at `fallback`
    /// on connection failures and server errors. When the primary cannot be
    /// reached and the fallback does not grant a session, the stored token is
    /// dropped and the session stays unauthenticated. An HTTP rejection, or no
    /// transfer token at all, resumes whatever session is persisted locally.
    pub async fn bootstrap(
        &mut self,
        transfer_token: Option<&str>,
        primary: &dyn ExchangeEndpoint,
        fallback: &dyn ExchangeEndpoint,
    ) -> Result<&SessionState> {
        if let Some(transfer_token) = transfer_token.filter(|t| !t.trim().is_empty()) {
            self.state = SessionState::ExchangingToken;
            info!("Found transfer token, exchanging");

            match exchange_with_fallback(transfer_token, primary, fallback).await {
                Exchange::Granted(response) => {
                    self.establish(response)?;
                    return Ok(&self.state);
                }
                Exchange::Rejected => {
                    warn!("Transfer token exchange failed, checking local session");
                }
                Exchange::Unreachable => {
                    warn!("Transfer token exchange unreachable, dropping stored token");
                    self.store.remove(AUTH_TOKEN_KEY)?;
                    self.token = None;
                    self.state = SessionState::Unauthenticated;
                    return Ok(&self.state);
                }
            }
        }

        self.restore()?;
        Ok(&self.state)
    }

    /// Clear persisted state and return the address to send the user to.
    pub fn logout(&mut self) -> Result<String> {
        self.clear()?;
        info!("Logged out");
        Ok(self.main_app_url.clone())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        self.token = None;
        self.state = SessionState::Unauthenticated;
        Ok(())
    }

    fn establish(&mut self, response: ExchangeResponse) -> Result<()> {
        let user = response.user.normalize();
        self.store.set(AUTH_TOKEN_KEY, &response.token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;

        info!(user_id = %user.user_id, email = %user.email, "Login successful");
        self.token = Some(response.token);
        self.state = SessionState::Authenticated(user);
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.state = SessionState::CheckingLocalSession;

        let Some(token) = self.store.get(AUTH_TOKEN_KEY)? else {
            self.state = SessionState::Unauthenticated;
            return Ok(());
        };

        match self.store.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!(email = %user.email, "Loaded user from local session");
                    self.token = Some(token);
                    self.state = SessionState::Authenticated(user);
                }
                Err(e) => {
                    warn!(error = %e, "Stored user is corrupted, purging session");
                    self.clear()?;
                }
            },
            None => {
                info!("No stored user found, clearing auth token");
                self.store.remove(AUTH_TOKEN_KEY)?;
                self.token = None;
                self.state = SessionState::Unauthenticated;
            }
        }
        Ok(())
    }
}

enum Exchange {
    Granted(ExchangeResponse),
    /// The endpoint answered with a non-success status.
    Rejected,
    /// The primary could not be reached and the fallback did not help.
    Unreachable,
}

async fn exchange_with_fallback(
    transfer_token: &str,
    primary: &dyn ExchangeEndpoint,
    fallback: &dyn ExchangeEndpoint,
) -> Exchange {
    let err = match primary.exchange(transfer_token).await {
        Ok(response) => return Exchange::Granted(response),
        Err(e) => e,
    };

    if !err.warrants_fallback() {
        warn!(error = %err, "Exchange rejected");
        return Exchange::Rejected;
    }

    warn!(error = %err, "Primary exchange unavailable, trying same-origin endpoint");
    match fallback.exchange(transfer_token).await {
        Ok(response) => {
            info!("Same-origin exchange successful");
            Exchange::Granted(response)
        }
        Err(e) => {
            warn!(error = %e, "Same-origin exchange also failed");
            if matches!(err, SessionError::Network(_)) {
                Exchange::Unreachable
            } else {
                Exchange::Rejected
            }
        }
    }
}
