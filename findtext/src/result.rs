use serde::{Deserialize, Serialize};

/// Bounding box of a detected text region.
///
/// Pixel units, origin top-left, relative to whatever buffer the region was
/// detected in (the full image for flat detection, a per-line strip during
/// the inner pass of deep detection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Pixel coordinate, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// One detected region (line or word) with its geometry and recognized text.
///
/// The corner points are derived from the bounding box and always agree with
/// it; geometry only changes through [`RegionBlock::replace_box`], which
/// recomputes box and corners in one step, so no partially-updated state is
/// ever observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionBlock {
    bbox: BoundingBox,
    top_left: Point,
    bottom_right: Point,
    text: String,
}

impl RegionBlock {
    /// Build a block from engine geometry and raw recognition output.
    ///
    /// Engine output is noisy with spacing artifacts, so all whitespace
    /// (newlines included) is stripped up front. An empty result stays an
    /// empty string.
    pub fn new(bbox: BoundingBox, raw_text: &str) -> Self {
        let (top_left, bottom_right) = corners(&bbox);
        Self {
            bbox,
            top_left,
            bottom_right,
            text: normalize_text(raw_text),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Top-left corner, `(x, y)`.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Bottom-right corner, `(x + width, y + height)`.
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    /// Recognized content. May be empty.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the geometry wholesale, recomputing both corners in the same
    /// call. This is the single mutation point, used when crop-space boxes
    /// are remapped into original-image space.
    pub fn replace_box(&mut self, bbox: BoundingBox) {
        let (top_left, bottom_right) = corners(&bbox);
        self.bbox = bbox;
        self.top_left = top_left;
        self.bottom_right = bottom_right;
    }
}

fn corners(bbox: &BoundingBox) -> (Point, Point) {
    (
        Point {
            x: bbox.x,
            y: bbox.y,
        },
        Point {
            x: bbox.x + bbox.width,
            y: bbox.y + bbox.height,
        },
    )
}

/// Strip every whitespace character from raw engine output.
fn normalize_text(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
