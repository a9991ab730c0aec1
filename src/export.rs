//! Export Pipeline - capture, encode, assemble
//!
//! Capture and document assembly sit behind two capabilities so the session
//! never depends on how either is done. A capability that was never
//! registered yields [`ExportError::Unavailable`] instead of a fault.
//!
//! Only one export may run at a time; a second request while one is in
//! flight gets [`ExportError::Busy`].

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ExportSettings;
use crate::hashing::sha256_hex;
use crate::pdf::{single_image_pdf, JpegFrame};
use crate::print::{PageClass, PageSpec};
use crate::render::{rasterize, Card, CaptureOptions};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export unavailable, please retry ({0} not loaded)")]
    Unavailable(&'static str),

    #[error("An export is already in progress")]
    Busy,

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Document assembly failed: {0}")]
    Document(String),

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("Could not write artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Rasterize a rendered card into a bitmap
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, card: &Card, options: &CaptureOptions) -> Result<RgbaImage, ExportError>;
}

/// Wrap one encoded frame into a paged document
pub trait DocumentAssembler: Send + Sync {
    fn assemble(&self, frame: &JpegFrame, page: &PageSpec) -> Result<Vec<u8>, ExportError>;
}

/// Built-in software rasterizer
pub struct CardRasterizer;

impl Rasterizer for CardRasterizer {
    fn rasterize(&self, card: &Card, options: &CaptureOptions) -> Result<RgbaImage, ExportError> {
        if card.width <= 0.0 || card.height <= 0.0 {
            return Err(ExportError::Capture("card has no area".to_string()));
        }
        Ok(rasterize(card, options))
    }
}

/// Built-in PDF writer
pub struct PdfAssembler;

impl DocumentAssembler for PdfAssembler {
    fn assemble(&self, frame: &JpegFrame, page: &PageSpec) -> Result<Vec<u8>, ExportError> {
        if frame.data.is_empty() {
            return Err(ExportError::Document("empty frame".to_string()));
        }
        Ok(single_image_pdf(frame, page))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// A finished export, ready to be saved
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    /// Captured bitmap size in pixels
    pub size: [u32; 2],
    pub hash: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact under its filename in `dir`
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.data)?;
        info!(path = %path.display(), bytes = self.data.len(), "artifact saved");
        Ok(path)
    }
}

pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(bitmap.clone()).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

pub fn encode_jpeg(bitmap: &RgbaImage, quality: u8) -> Result<JpegFrame, ExportError> {
    let rgb = DynamicImage::ImageRgba8(bitmap.clone()).to_rgb8();
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, quality).encode_image(&rgb)?;
    Ok(JpegFrame { width: rgb.width(), height: rgb.height(), data })
}

/// Clears the in-flight flag when the capture ends, however it ends
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Exporter {
    settings: ExportSettings,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    assembler: Option<Arc<dyn DocumentAssembler>>,
    in_flight: Arc<AtomicBool>,
}

impl Exporter {
    /// An exporter with no capabilities registered yet
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            rasterizer: None,
            assembler: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// An exporter with the built-in rasterizer and PDF writer
    pub fn with_defaults(settings: ExportSettings) -> Self {
        Self::new(settings)
            .with_rasterizer(Arc::new(CardRasterizer))
            .with_assembler(Arc::new(PdfAssembler))
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn with_assembler(mut self, assembler: Arc<dyn DocumentAssembler>) -> Self {
        self.assembler = Some(assembler);
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Capture `card` and encode it as `format`
    pub async fn export(&self, card: &Card, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
        let guard = InFlight::acquire(&self.in_flight).map_err(|e| {
            warn!(?format, "export rejected, another export is running");
            e
        })?;

        let rasterizer = self.rasterizer.clone().ok_or(ExportError::Unavailable("rasterizer"))?;
        let assembler = match format {
            ExportFormat::Png => None,
            ExportFormat::Pdf => Some(self.assembler.clone().ok_or(ExportError::Unavailable("document assembler"))?),
        };

        let capture = CaptureOptions::for_card(&self.settings, card);
        let quality = self.settings.jpeg_quality;
        let card = card.clone();

        // released by the blocking task, not by this future
        let (size, data) = tokio::task::spawn_blocking(move || -> Result<([u32; 2], Vec<u8>), ExportError> {
            let _guard = guard;
            let bitmap = rasterizer.rasterize(&card, &capture)?;
            let size = [bitmap.width(), bitmap.height()];
            let data = match assembler {
                None => encode_png(&bitmap)?,
                Some(assembler) => {
                    let frame = encode_jpeg(&bitmap, quality)?;
                    let page = PageSpec::fit_width(PageClass::A4, frame.width, frame.height);
                    assembler.assemble(&frame, &page)?
                }
            };
            Ok((size, data))
        })
        .await
        .map_err(|e| ExportError::Task(e.to_string()))??;

        let filename = match format {
            ExportFormat::Png => self.settings.png_name.clone(),
            ExportFormat::Pdf => self.settings.pdf_name.clone(),
        };
        let artifact = ExportArtifact {
            format,
            filename,
            size,
            hash: sha256_hex(&data),
            data,
        };
        info!(
            ?format,
            width = size[0],
            height = size[1],
            bytes = artifact.data.len(),
            "export complete"
        );
        Ok(artifact)
    }
}
