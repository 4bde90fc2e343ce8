#![forbid(unsafe_code)]

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod detail;
pub mod discover;
pub mod export;
pub mod fetch;
pub mod formats;
pub mod listing;
pub mod logging;
pub mod parse;
pub mod query;
pub mod run;
pub mod stage;
