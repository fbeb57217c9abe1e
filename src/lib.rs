pub mod api;
pub mod calculator;
pub mod config;
pub mod errors;
pub mod games;
pub mod notify;
pub mod theme;
