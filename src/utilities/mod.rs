//! Utility modules shared across the engine and the CLI.

pub mod converter;
pub mod errors;
pub mod file_handler;
pub mod printer;
pub mod string_utils;
