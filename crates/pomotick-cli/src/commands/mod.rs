pub mod config;
pub mod interval;
