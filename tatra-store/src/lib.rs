pub mod app_config;
pub mod json_store;

pub use json_store::JsonFileStore;
