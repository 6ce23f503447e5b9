//! Terminal tracker for daily wellness numbers: record self-care hours,
//! gratitude moments and social interactions, review them in sorted lists, and
//! export the whole collection as a JSON file.
//!

pub mod app;
pub mod cli;
pub mod export;
pub mod storage;
pub mod utils;
