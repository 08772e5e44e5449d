use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no object selected")]
    NoSelection,
    #[error("unknown object: {0}")]
    UnknownObject(String),
    #[error("animation already playing")]
    AlreadyPlaying,
    #[error("invalid time value: {0}")]
    InvalidTime(f64),
}
