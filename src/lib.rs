pub mod config;
pub mod dispatch;
pub mod edit;
pub mod error;
pub mod logging;
pub mod registry;
pub mod service;
pub mod status;
pub mod store;
pub mod supply;
