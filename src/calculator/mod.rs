pub mod calculator;
pub mod format;
pub mod parser;
