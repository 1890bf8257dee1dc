/// Errors surfaced while building or driving the ambient scene.
///
/// Everything here is an environment or capability failure reported once at
/// construction time; a bad frame is logged and skipped rather than returned.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no suitable rendering context: {0}")]
    ContextUnavailable(String),

    #[error("shader error: {0}")]
    Shader(String),

    #[error("allocation failed: {0}")]
    Allocation(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("host error: {0}")]
    Host(String),
}
