//! Port traits at the edges of the domain.

pub mod config_port;
pub mod stock_store_port;
