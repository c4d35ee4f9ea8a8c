use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid figure scale: {value}")]
    InvalidScale { value: f32 },

    #[error("invalid sprite size {width}x{height} for segment '{segment}'")]
    InvalidSpriteSize {
        segment: &'static str,
        width: f32,
        height: f32,
    },

    #[cfg(feature = "json")]
    #[error("failed to parse anchor table: {message}")]
    JsonParse { message: String },
}
