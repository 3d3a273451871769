//! Text-region location on top of an external OCR engine.
//!
//! The engine (Tesseract, through `leptess`) does the actual glyph
//! recognition; this crate normalizes inputs, walks the engine's region
//! proposals, and corrects geometry. The interesting part is deep detection:
//! detect text lines first, re-run word detection on a padded crop of each
//! line, then map the crop-local boxes back into the original image's
//! coordinate space. See [`FindText::find_words_deep`].
//!
//! Inputs are decoded to grayscale once, so both detection granularities see
//! identical pixels. Pass a custom [`Engine`] implementation if the regions
//! should come from something other than the system Tesseract install.

mod config;
mod crop;
mod detector;
mod engine;
mod error;
mod result;
mod source;

pub use config::{DEFAULT_LANG, Granularity};
pub use crop::{crop, strip};
pub use detector::FindText;
pub use engine::{Engine, RawBox, Session, TesseractEngine, TesseractSession};
pub use error::{Error, Result};
pub use result::{BoundingBox, Point, RegionBlock};
pub use source::ImageSource;
