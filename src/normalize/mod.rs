//! Text normalization: ordered regex cleanup rules, date parsing, and the
//! PDF layout/section pass.

pub mod date;
pub mod pdf;
pub mod rules;

pub use rules::{clean_meta_title, clean_title, collapse_newlines, squash_whitespace};
