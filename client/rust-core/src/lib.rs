pub mod clients;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use services::AppState;
