use image::GrayImage;
use tracing::debug;

use crate::config::{DEFAULT_LANG, Granularity};
use crate::crop;
use crate::engine::{Engine, RawBox, Session, TesseractEngine};
use crate::error::Result;
use crate::result::{BoundingBox, RegionBlock};
use crate::source::ImageSource;

/// Text locator delegating recognition to an OCR engine and refining the
/// returned geometry.
///
/// Flat detection ([`find_lines`](Self::find_lines),
/// [`find_words`](Self::find_words)) passes the engine's regions through
/// unchanged. Deep detection ([`find_words_deep`](Self::find_words_deep))
/// re-runs the word pass inside each detected line and maps the results back
/// into the original image's coordinate space.
pub struct FindText<E: Engine = TesseractEngine> {
    engine: E,
    lang: String,
}

impl FindText<TesseractEngine> {
    /// Detector over the system Tesseract install, using the baseline
    /// language.
    pub fn new() -> Self {
        Self::with_engine(TesseractEngine::new(), DEFAULT_LANG)
    }

    /// Detector with an explicit recognition language (e.g. `"chi_sim"`).
    pub fn with_lang(lang: impl Into<String>) -> Self {
        Self::with_engine(TesseractEngine::new(), lang)
    }
}

impl Default for FindText<TesseractEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> FindText<E> {
    /// Detector over a custom engine implementation.
    pub fn with_engine(engine: E, lang: impl Into<String>) -> Self {
        Self {
            engine,
            lang: lang.into(),
        }
    }

    /// The recognition language passed to every session.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Flat line-level detection. Boxes are already in original-image space.
    pub fn find_lines(&self, image: impl Into<ImageSource>) -> Result<Vec<RegionBlock>> {
        let gray = image.into().into_gray()?;
        self.detect(&gray, Granularity::Line)
    }

    /// Flat word-level detection. Boxes are already in original-image space.
    pub fn find_words(&self, image: impl Into<ImageSource>) -> Result<Vec<RegionBlock>> {
        let gray = image.into().into_gray()?;
        self.detect(&gray, Granularity::Word)
    }

    /// String-configured flat detection.
    ///
    /// An unknown granularity is rejected before any engine session is
    /// opened.
    pub fn find(
        &self,
        image: impl Into<ImageSource>,
        granularity: &str,
    ) -> Result<Vec<RegionBlock>> {
        let granularity: Granularity = granularity.parse()?;
        let gray = image.into().into_gray()?;
        self.detect(&gray, granularity)
    }

    /// Hierarchical word detection: one line pass over the full image, then
    /// a word pass on each line's padded full-width strip, with every
    /// crop-space box remapped into original-image space.
    ///
    /// `vertical_offset` pads the strip above and below the line bounds so
    /// ascenders and descenders survive the crop; bounds that leave the
    /// image are clamped. A strip that ends up with no pixels contributes no
    /// word blocks and the pass moves on to the next line.
    ///
    /// Result order follows line order, and within a line the engine's word
    /// order. Any engine failure, whether in the line pass or in an inner
    /// word pass, aborts the whole call.
    pub fn find_words_deep(
        &self,
        image: impl Into<ImageSource>,
        vertical_offset: u32,
    ) -> Result<Vec<RegionBlock>> {
        let gray = image.into().into_gray()?;
        let lines = self.detect(&gray, Granularity::Line)?;
        debug!(
            lines = lines.len(),
            offset = vertical_offset,
            "deep pass over detected lines"
        );

        let mut words = Vec::new();
        for line in &lines {
            let top = i64::from(line.top_left().y) - i64::from(vertical_offset);
            let bottom = i64::from(line.bottom_right().y) + i64::from(vertical_offset);
            // The strip's real top edge after clamping is the shift every
            // crop-space coordinate needs for the trip back.
            let strip_origin = top.clamp(0, i64::from(gray.height())) as u32;
            let strip = crop::strip(&gray, top, bottom);
            if strip.height() == 0 {
                debug!(top, bottom, "strip fell outside the image, skipping line");
                continue;
            }

            let mut inner = self.detect(&strip, Granularity::Word)?;
            debug!(words = inner.len(), strip_origin, "line refined");
            for word in &mut inner {
                let b = word.bounding_box();
                word.replace_box(BoundingBox::new(
                    b.x,
                    strip_origin + b.y,
                    b.width,
                    b.height,
                ));
            }
            words.append(&mut inner);
        }
        Ok(words)
    }

    /// One engine session: bind the buffer, list regions at `granularity`,
    /// recognize each region restricted to its own box. The session is
    /// dropped before this returns, error or not.
    fn detect(&self, gray: &GrayImage, granularity: Granularity) -> Result<Vec<RegionBlock>> {
        let mut session = self.engine.open_session(&self.lang)?;
        session.load_image(gray)?;
        let raw = session.detect_regions(granularity)?;
        let mut blocks = Vec::with_capacity(raw.len());
        for region in &raw {
            let text = session.recognize_text(region)?;
            blocks.push(RegionBlock::new(to_bbox(region), &text));
        }
        Ok(blocks)
    }
}

/// Engine boxes are signed. Detected geometry stays inside the bound buffer,
/// so negative values only show up on damaged engine output; they are clamped
/// to the buffer origin.
fn to_bbox(raw: &RawBox) -> BoundingBox {
    BoundingBox::new(
        raw.x.max(0) as u32,
        raw.y.max(0) as u32,
        raw.w.max(0) as u32,
        raw.h.max(0) as u32,
    )
}
