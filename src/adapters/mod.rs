//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod fast_tester_adapter;
pub mod file_config_adapter;
pub mod ini_compiler_adapter;
