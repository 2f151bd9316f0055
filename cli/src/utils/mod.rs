pub mod env_paths;
pub mod logging;
pub mod portal_config;
