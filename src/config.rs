use std::net::SocketAddr;
use std::path::PathBuf;

/// Default number of searches allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT_SEARCHES: usize = 16;

/// Explicit service configuration, assembled at startup and passed down;
/// nothing in the service reads global state.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Tab-separated dictionary source with a `category` column.
    pub dictionary_path: PathBuf,
    /// Address the HTTP listener binds on.
    pub bind_addr: SocketAddr,
    /// Upper bound on concurrently running searches.
    pub max_concurrent_searches: usize,
}
