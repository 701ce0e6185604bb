//! stockdesk: command-line client for a remote stock-record store.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`cli`] and [`shell`] are the
//! user-facing surfaces.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod shell;
