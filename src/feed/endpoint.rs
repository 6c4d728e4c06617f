use url::Url;

use crate::error::FeedError;

/// Path of the state subscription endpoint on the room server.
const STATE_PATH: &str = "/state";
/// Path of the chat relay endpoint on the room server.
const CHAT_PATH: &str = "/chat";

/// Derives a room-scoped WebSocket endpoint from the server base URL:
/// http(s) schemes are coerced to ws(s), the path is replaced, and the room
/// identifier is attached as a query parameter.
///
/// # Errors
///
/// Returns an error when the base URL cannot be parsed or carries a scheme
/// that cannot reach a WebSocket endpoint.
pub fn room_endpoint(base: &str, path: &str, room: &str) -> Result<Url, FeedError> {
    let mut url = Url::parse(base).map_err(|err| FeedError::InvalidBaseUrl {
        value: base.to_owned(),
        source: err,
    })?;
    if url.cannot_be_a_base() {
        return Err(FeedError::BaseUrlNotABase {
            value: base.to_owned(),
        });
    }

    let target = match url.scheme() {
        "ws" | "wss" => None,
        "http" => Some("ws"),
        "https" => Some("wss"),
        other => {
            return Err(FeedError::UnsupportedScheme {
                scheme: other.to_owned(),
            });
        }
    };
    if let Some(scheme) = target
        && url.set_scheme(scheme).is_err()
    {
        return Err(FeedError::UnsupportedScheme {
            scheme: scheme.to_owned(),
        });
    }

    url.set_path(path);
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair("room", room);
    Ok(url)
}

/// State feed endpoint for a room.
///
/// # Errors
///
/// See [`room_endpoint`].
pub fn state_feed_url(base: &str, room: &str) -> Result<Url, FeedError> {
    room_endpoint(base, STATE_PATH, room)
}

/// Chat relay endpoint for a room.
///
/// # Errors
///
/// See [`room_endpoint`].
pub fn chat_relay_url(base: &str, room: &str) -> Result<Url, FeedError> {
    room_endpoint(base, CHAT_PATH, room)
}
