use url::Url;

use crate::error::{Result, SessionError};

pub const DEFAULT_MAIN_APP_URL: &str = "https://www.nichedigger.ai";

/// Query parameters the main application uses for the transfer token.
const TRANSFER_TOKEN_PARAMS: &[&str] = &["tt", "token"];

/// Split a one-time transfer token off an incoming address.
///
/// Returns the address with its query and fragment removed, so the token
/// never ends up in history or bookmarks, plus the token if one was present.
/// `tt` wins over `token` when both are set.
pub fn take_transfer_token(address: &str) -> Result<(String, Option<String>)> {
    let mut url = Url::parse(address).map_err(|e| SessionError::Address(format!("{address}: {e}")))?;

    let token = TRANSFER_TOKEN_PARAMS.iter().find_map(|name| {
        url.query_pairs()
            .find(|(k, v)| &**k == *name && !v.is_empty())
            .map(|(_, v)| v.into_owned())
    });

    url.set_query(None);
    url.set_fragment(None);
    Ok((url.to_string(), token))
}

/// Resolve the main application's origin from a configured value.
///
/// Missing, `undefined` or localhost values fall back to the production URL;
/// a bare host gets `https://`; a trailing slash is dropped.
pub fn normalize_main_app_url(raw: Option<&str>) -> String {
    let candidate = raw.map(str::trim).unwrap_or_default();
    let candidate = if candidate.is_empty()
        || candidate == "undefined"
        || candidate.contains("localhost")
    {
        DEFAULT_MAIN_APP_URL
    } else {
        candidate
    };

    let with_scheme = if candidate.starts_with("http://") || candidate.starts_with("https://") {
        candidate.to_string()
    } else {
        format!("https://{candidate}")
    };

    with_scheme.trim_end_matches('/').to_string()
}
