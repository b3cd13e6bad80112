//! Small shared helpers.
//!
//! This module provides:
//! - Static regex and CSS selector compilation
//! - Text sanitization for scraped and WHOIS-sourced strings

pub mod sanitize;
mod statics;

pub use sanitize::sanitize_text;
pub use statics::{compile_regex_unsafe, parse_selector_unsafe};
