mod app;
mod chat;
mod config;
mod feed;
mod session;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use chat::ChatError;
pub use config::ConfigError;
pub use feed::FeedError;
pub use session::SessionError;
pub use validation::ValidationError;
