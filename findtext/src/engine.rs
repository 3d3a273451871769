use std::io::Cursor;
use std::path::PathBuf;

use image::{GrayImage, ImageFormat};
use leptess::{LepTess, capi};

use crate::config::Granularity;
use crate::error::{Error, Result};

/// Region proposal in the engine's native form, before any entity is built.
///
/// Coordinates are relative to whatever buffer the session currently has
/// loaded; the detector is responsible for knowing which space that is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Factory for recognition sessions.
///
/// A session is scoped to one detection call: acquired at its start and
/// dropped before it returns, on success and on error alike. Two overlapping
/// detection calls never share a session.
pub trait Engine {
    type Session: Session;

    fn open_session(&self, lang: &str) -> Result<Self::Session>;
}

/// One bound recognition pass over a single buffer.
pub trait Session {
    /// Bind a pixel buffer for the subsequent calls.
    fn load_image(&mut self, buffer: &GrayImage) -> Result<()>;

    /// The engine's region proposals at the requested granularity, in engine
    /// order (typically reading order). Callers do not re-sort.
    fn detect_regions(&mut self, granularity: Granularity) -> Result<Vec<RawBox>>;

    /// Restrict recognition to `region` and return the best-effort
    /// transcription. An empty string is a valid result, not an error.
    fn recognize_text(&mut self, region: &RawBox) -> Result<String>;
}

/// Tesseract-backed engine.
///
/// Each session owns one `LepTess` handle, so the underlying API object is
/// torn down when the session drops, whichever way the detection call ends.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    data_dir: Option<PathBuf>,
}

impl TesseractEngine {
    /// Engine using Tesseract's default model lookup (`TESSDATA_PREFIX` or
    /// the build-time path).
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine reading models from an explicit tessdata directory.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }

    /// The tessdata directory consulted for models, if one can be named
    /// without asking the engine.
    pub fn data_directory(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| std::env::var_os("TESSDATA_PREFIX").map(PathBuf::from))
    }

    /// Language codes with a `.traineddata` model in the data directory,
    /// sorted. Read-only metadata, unrelated to detection itself.
    pub fn available_languages(&self) -> Result<Vec<String>> {
        let dir = self.data_directory().ok_or_else(|| {
            Error::Config("no tessdata directory configured and TESSDATA_PREFIX is unset".into())
        })?;
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| Error::Input(format!("cannot read {}: {e}", dir.display())))?;
        let mut langs = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::Input(format!("cannot read {}: {e}", dir.display())))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "traineddata") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    langs.push(stem.to_string());
                }
            }
        }
        langs.sort();
        Ok(langs)
    }
}

impl Engine for TesseractEngine {
    type Session = TesseractSession;

    fn open_session(&self, lang: &str) -> Result<TesseractSession> {
        let data_dir = self
            .data_dir
            .as_ref()
            .and_then(|p| p.to_str().map(str::to_owned));
        let api = LepTess::new(data_dir.as_deref(), lang)
            .map_err(|e| Error::Engine(format!("tesseract init failed for lang `{lang}`: {e}")))?;
        Ok(TesseractSession { api })
    }
}

/// Scoped Tesseract handle; dropping it releases the engine resources.
pub struct TesseractSession {
    api: LepTess,
}

impl Session for TesseractSession {
    fn load_image(&mut self, buffer: &GrayImage) -> Result<()> {
        let mut png = Cursor::new(Vec::new());
        buffer
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| Error::Engine(format!("failed to encode buffer for the engine: {e}")))?;
        self.api
            .set_image_from_mem(png.get_ref())
            .map_err(|e| Error::Engine(format!("engine rejected image: {e}")))?;
        // In-memory buffers carry no DPI metadata.
        self.api.set_fallback_source_resolution(70);
        Ok(())
    }

    fn detect_regions(&mut self, granularity: Granularity) -> Result<Vec<RawBox>> {
        let level = match granularity {
            Granularity::Line => capi::TessPageIteratorLevel_RIL_TEXTLINE,
            Granularity::Word => capi::TessPageIteratorLevel_RIL_WORD,
        };
        let boxes = match self.api.get_component_boxes(level, true) {
            Some(boxes) => boxes,
            None => return Ok(Vec::new()),
        };
        let mut regions = Vec::with_capacity(boxes.get_n() as usize);
        for b in &boxes {
            let v = b.get_geometry();
            regions.push(RawBox {
                x: v.x,
                y: v.y,
                w: v.w,
                h: v.h,
            });
        }
        Ok(regions)
    }

    fn recognize_text(&mut self, region: &RawBox) -> Result<String> {
        self.api
            .set_rectangle(region.x, region.y, region.w, region.h);
        self.api
            .get_utf8_text()
            .map_err(|e| Error::Engine(format!("recognition failed: {e}")))
    }
}
