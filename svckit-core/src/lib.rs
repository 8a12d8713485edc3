pub mod config;
pub mod error;
pub mod ident;
pub mod telemetry;

pub use config::LogConfig;
pub use error::SvcError;
pub use ident::generate_thread_id;
