use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Request is missing a required field or carries an out-of-range value
    #[error("{0}")]
    InvalidRequest(String),

    /// Create target is not on the configured allowlist
    #[error("Target host '{0}' is not in targets.allowed_hosts")]
    TargetNotAllowed(String),

    /// Browser provider could not be launched or could not open a page
    #[error("Failed to acquire browsing session: {0}")]
    SessionAcquisition(String),

    /// Page load failed (timeout, DNS/connection failure, bad status)
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Bridge subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the bridge failed
    #[error("Bridge I/O error: {0}")]
    BridgeIo(String),

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Bridge answered a command with ok=false or an incomplete payload
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },
}

impl HarnessError {
    /// Re-tag a launch or page-open failure as fatal session acquisition.
    pub fn into_acquisition(self) -> Self {
        match self {
            HarnessError::SessionAcquisition(_) => self,
            other => HarnessError::SessionAcquisition(other.to_string()),
        }
    }
}
