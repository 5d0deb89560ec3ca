//! Port traits for the external collaborators of the pipelines.

pub mod bar_export_port;
pub mod compiler_port;
pub mod config_port;
pub mod quick_check_port;
