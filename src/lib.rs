pub mod config;
pub mod dictionary;
pub mod dispatch;
pub mod engine;
pub mod matcher;
pub mod server;

// Re-export main types for convenient access
pub use config::ServiceConfig;
pub use dictionary::{DictionaryError, DictionaryLoader};
pub use dispatch::{WorkHandle, WorkLost, WorkQueue};
pub use engine::{SearchEngine, SearchError};
pub use matcher::PhraseMatcher;
