//! HTTP client and command-line front end for the job execution API.
//!
//! [`api::DashboardApi`] talks to the REST endpoints and implements
//! [`jobdash_core::backend::ScriptBackend`], so script edit sessions from
//! `jobdash-core` run against it directly.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
