mod app;
mod args;
mod chat;
mod config;
mod entry;
mod error;
mod feed;
mod logger;
mod session;
mod shutdown;
mod shutdown_handlers;
mod timeline;
mod token;
mod ui;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
