use thiserror::Error;

/// Failures the widget can recover from locally. None of these are fatal to
/// the host page: rendering errors become inline text, audio errors degrade
/// to a silent score.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("render failed: {0}")]
    Render(String),
    #[error("audio unavailable: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
