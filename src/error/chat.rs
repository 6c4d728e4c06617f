use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat channel is not connected.")]
    NotConnected,
    #[error("WebSocket error: {source}")]
    WebSocket {
        #[from]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("Malformed chat payload: {source}")]
    MalformedPayload {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode outbound message: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
