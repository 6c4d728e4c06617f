//! Core library for the `matinee` CLI.
//!
//! This crate provides the internal building blocks used by the binary:
//! CLI argument types, configuration parsing, the state feed client, the
//! playback timeline reducer, the chat relay, and the session layer. The
//! primary user-facing interface is the `matinee` terminal application;
//! library APIs may evolve as the client grows.
pub mod args;
pub mod chat;
pub mod config;
pub mod error;
pub mod feed;
pub mod session;
pub mod shutdown;
pub mod timeline;
pub mod token;
pub mod ui;
