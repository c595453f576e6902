use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A screen dump, script or config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("invalid command payload {payload}: {source}")]
    InvalidCommand {
        payload: String,
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        source: serde_json::Error,
    },

    #[error("replay script references unknown screen '{0}'")]
    UnknownScreen(String),

    /// The event thread is gone; nothing can be delivered to the engine.
    #[error("automation service has stopped")]
    ServiceStopped,
}
