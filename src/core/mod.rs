pub mod config;
pub mod session;
pub use config::AppConfig;
pub use session::Session;
