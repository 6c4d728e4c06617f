use serde::Deserialize;
use url::Url;

use crate::args::ViewerArgs;
use crate::error::{AppError, AppResult, FeedError, ValidationError};

/// Room wiring published by the server for casters and diagnostics.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServerSettings {
    #[serde(default)]
    pub ingress_url: String,
    #[serde(default)]
    pub ingress_key: String,
    #[serde(default)]
    pub livekit_url: String,
}

/// Derives the HTTP settings endpoint from the server base URL; ws(s)
/// schemes are coerced back to http(s).
pub(crate) fn settings_url(base: &str) -> AppResult<Url> {
    let mut url = Url::parse(base).map_err(|err| {
        AppError::validation(ValidationError::InvalidServerUrl {
            value: base.to_owned(),
            source: err,
        })
    })?;
    let target = match url.scheme() {
        "http" | "https" => None,
        "ws" => Some("http"),
        "wss" => Some("https"),
        other => {
            return Err(AppError::validation(ValidationError::InvalidServerScheme {
                scheme: other.to_owned(),
            }));
        }
    };
    if let Some(scheme) = target
        && url.set_scheme(scheme).is_err()
    {
        return Err(AppError::feed(FeedError::UnsupportedScheme {
            scheme: scheme.to_owned(),
        }));
    }
    url.set_path("/settings");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Fetches and prints the room server settings.
///
/// # Errors
///
/// Returns an error when the server URL is missing or the fetch fails.
pub(crate) async fn show_settings(args: &ViewerArgs) -> AppResult<()> {
    let server = args
        .server
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingServer))?;
    let url = settings_url(server)?;
    let settings: ServerSettings = reqwest::get(url.clone())
        .await?
        .error_for_status()?
        .json()
        .await?;

    println!("settings from {}", url);
    println!("  livekit_url: {}", settings.livekit_url);
    println!("  ingress_url: {}", settings.ingress_url);
    let key_display = if settings.ingress_key.is_empty() {
        "(none)".to_owned()
    } else {
        "(set)".to_owned()
    };
    println!("  ingress_key: {}", key_display);
    Ok(())
}
