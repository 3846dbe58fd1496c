//! Helper functions shared by content loading and templates

mod date;

pub use date::*;
