//! Locale-aware money formatting and amount-in-words conversion

pub mod format;
pub mod words;

pub use format::*;
pub use words::*;
