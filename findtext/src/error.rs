use thiserror::Error;

/// Errors surfaced by the detection pipeline.
///
/// An empty recognition result is not represented here: the engine returning
/// no text for a region is valid output and shows up as an empty string on
/// the block instead.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable image: decoding the given path failed, or the provided
    /// buffer has no pixels.
    #[error("invalid input image: {0}")]
    Input(String),

    /// A configuration value could not be interpreted. Raised before any
    /// engine session is opened.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The OCR engine failed to initialize, bind an image, or recognize.
    /// Propagated as-is; there is no retry path.
    #[error("ocr engine failure: {0}")]
    Engine(String),
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;
