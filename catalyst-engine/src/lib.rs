pub mod combo;
pub mod config;
pub mod ranking;
pub mod replacement;
pub mod report;
