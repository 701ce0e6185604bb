//! Concrete adapter implementations for ports, plus the output renderers.

pub mod chart_svg;
pub mod csv_export;
pub mod file_config_adapter;
pub mod http_store_adapter;
pub mod json_import_adapter;
pub mod table_text;
