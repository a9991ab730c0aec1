//! Page Geometry for document export
//!
//! Pages take the A4 width and a height proportional to the captured frame,
//! so the card is placed full-bleed without letterboxing.

use serde::{Deserialize, Serialize};

pub const MM_PER_INCH: f64 = 25.4;
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageClass {
    A4,
}

impl PageClass {
    /// Portrait (width, height) in millimetres
    pub fn size_mm(&self) -> (f64, f64) {
        match self {
            PageClass::A4 => (210.0, 297.0),
        }
    }
}

/// Page dimensions for a single-image document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub class: PageClass,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSpec {
    /// Class width, height scaled to the frame's aspect ratio
    pub fn fit_width(class: PageClass, frame_width: u32, frame_height: u32) -> Self {
        let (width_mm, _) = class.size_mm();
        let height_mm = if frame_width == 0 {
            0.0
        } else {
            frame_height as f64 * width_mm / frame_width as f64
        };
        Self { class, width_mm, height_mm }
    }

    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm)
    }
}

pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_width_points() {
        let page = PageSpec::fit_width(PageClass::A4, 1000, 1000);
        assert!((page.width_pt() - 595.2756).abs() < 1e-3);
        assert_eq!(page.width_mm, page.height_mm);
    }

    #[test]
    fn test_height_follows_aspect_ratio() {
        let page = PageSpec::fit_width(PageClass::A4, 1260, 2520);
        assert_eq!(page.width_mm, 210.0);
        assert_eq!(page.height_mm, 420.0);
    }

    #[test]
    fn test_zero_width_frame() {
        let page = PageSpec::fit_width(PageClass::A4, 0, 100);
        assert_eq!(page.height_mm, 0.0);
    }
}
