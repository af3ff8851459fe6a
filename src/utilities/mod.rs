//! Utility modules.

pub mod config;
pub mod errors;
pub mod string_utils;
