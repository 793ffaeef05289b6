use std::path::{Path, PathBuf};

use anyhow::Result;
use session_client::{FileStore, HttpEndpoint, Session, User};

const SESSION_FILE: &str = "session.json";

/// `$HOME/.keyscout/session.json`, or the working directory without a home.
pub fn default_session_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".keyscout").join(SESSION_FILE),
        None => PathBuf::from(".keyscout").join(SESSION_FILE),
    }
}

fn open(session_file: &Path, main_app_url: &str) -> Session<FileStore> {
    Session::new(FileStore::new(session_file), main_app_url)
}

/// Exchange `transfer_token` if given, else resume the stored session.
///
/// `auth_origin` is the host serving `/api/auth/verify-transfer` next to this
/// tool's deployment. The keyscout API does not serve that route itself.
pub async fn login(
    session_file: &Path,
    main_app_url: &str,
    auth_origin: &str,
    transfer_token: Option<String>,
) -> Result<Option<User>> {
    let mut session = open(session_file, main_app_url);
    let primary = HttpEndpoint::primary(main_app_url);
    let fallback = HttpEndpoint::fallback(auth_origin);

    session
        .bootstrap(transfer_token.as_deref(), &primary, &fallback)
        .await?;
    Ok(session.current_user().cloned())
}

pub async fn current_user(session_file: &Path, main_app_url: &str) -> Result<Option<User>> {
    let mut session = open(session_file, main_app_url);
    // No transfer token, so neither endpoint is contacted.
    let endpoint = HttpEndpoint::primary(main_app_url);
    session.bootstrap(None, &endpoint, &endpoint).await?;
    Ok(session.current_user().cloned())
}

pub fn logout(session_file: &Path, main_app_url: &str) -> Result<String> {
    let mut session = open(session_file, main_app_url);
    Ok(session.logout()?)
}
