pub mod config;
pub mod error;
pub mod proto;
pub mod proxy;
