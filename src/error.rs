// Error type for the window host and config loading.
// Every variant states *where* things went wrong. The trail engine itself never fails.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Reading a config file failed
    #[error("Config read error ({path}): {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A config file or string was not valid JSON for a config patch
    #[error("Config parse error: {0}")]
    ConfigParse(#[source] serde_json::Error),
}
