//! Core domain types and logic.

pub mod record;
pub mod collection;
pub mod view;
pub mod edit_session;
pub mod app_state;
pub mod controller;
pub mod client_config;
pub mod import;
pub mod error;
