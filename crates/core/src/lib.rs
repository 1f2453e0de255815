//! Domain types and the script editing core for the jobdash client.
//!
//! This crate has no HTTP dependency. The API client lives in
//! `jobdash-client` and plugs in through [`backend::ScriptBackend`].

pub mod backend;
pub mod error;
pub mod listing;
pub mod runner_info;
pub mod script;
pub mod script_editor;
pub mod serde_ext;
pub mod types;
