//! Export pipeline tests: artifacts, capability gaps, in-flight guard

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use pricelist_core::{
    config::{Background, SessionConfig, Settings},
    export::{CardRasterizer, Rasterizer},
    render::{CaptureOptions, Card},
    themes::Color,
    ExportError, ExportFormat, Exporter, ProductId, Session,
};

fn session_with(exporter: Exporter) -> Session {
    Session::with_exporter(SessionConfig::default(), exporter)
}

#[tokio::test]
async fn png_export_is_named_and_scaled() {
    let session = Session::default();
    let card = session.card();
    let artifact = session.export_png().await.unwrap();

    assert_eq!(artifact.format, ExportFormat::Png);
    assert_eq!(artifact.filename, "pricelist.png");
    assert_eq!(artifact.size, [(card.width * 3.0).ceil() as u32, (card.height * 3.0).ceil() as u32]);
    assert!(artifact.data.starts_with(&[0x89, b'P', b'N', b'G']));

    let decoded = image::load_from_memory(&artifact.data).unwrap();
    assert_eq!(decoded.width(), artifact.size[0]);
}

#[tokio::test]
async fn pdf_export_is_single_page() {
    let session = Session::default();
    let artifact = session.export_pdf().await.unwrap();

    assert_eq!(artifact.filename, "pricelist.pdf");
    assert!(artifact.data.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&artifact.data);
    assert!(text.contains("/Count 1"));
    assert!(text.contains("/DCTDecode"));
}

fn media_box(pdf: &str) -> Vec<f32> {
    let start = pdf.find("/MediaBox [").unwrap() + "/MediaBox [".len();
    let end = start + pdf[start..].find(']').unwrap();
    pdf[start..end].split_whitespace().map(|n| n.parse().unwrap()).collect()
}

#[tokio::test]
async fn pdf_page_is_a4_wide_and_proportional() {
    let session = Session::default();
    let png = session.export_png().await.unwrap();
    let pdf = session.export_pdf().await.unwrap();
    assert_eq!(pdf.size, png.size);

    let [w, h] = pdf.size;
    let page = media_box(&String::from_utf8_lossy(&pdf.data));
    let width_pt = 210.0 / 25.4 * 72.0;
    let height_pt = width_pt * h as f32 / w as f32;

    assert_eq!(page.len(), 4);
    assert_eq!(&page[..2], &[0.0, 0.0]);
    assert!((page[2] - width_pt).abs() < 0.01, "width {}", page[2]);
    assert!((page[3] - height_pt).abs() < 0.01, "height {} vs {}", page[3], height_pt);
}

#[tokio::test]
async fn identical_state_exports_identical_bytes() {
    let a = Session::default().export_png().await.unwrap();
    let b = Session::default().export_png().await.unwrap();
    assert_eq!(a.hash, b.hash);

    let mut edited = Session::default();
    edited.remove_product(ProductId(2));
    let c = edited.export_png().await.unwrap();
    assert_ne!(a.hash, c.hash);
}

#[tokio::test]
async fn fixed_background_fills_corners() {
    let mut settings = Settings::default();
    settings.export.background = Background::Fixed(Color::rgb(255, 0, 0));
    settings.export.scale = 1;
    let session = Session::new(SessionConfig::editing(settings));

    let artifact = session.export_png().await.unwrap();
    let bitmap = image::load_from_memory(&artifact.data).unwrap().to_rgba8();
    assert_eq!(bitmap.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
}

#[tokio::test]
async fn missing_capabilities_are_reported() {
    let session = session_with(Exporter::new(Default::default()));
    let err = session.export_png().await.unwrap_err();
    assert!(matches!(err, ExportError::Unavailable("rasterizer")));
    assert!(err.to_string().contains("please retry"));

    let session = session_with(Exporter::new(Default::default()).with_rasterizer(Arc::new(CardRasterizer)));
    assert!(session.export_png().await.is_ok());
    let err = session.export_pdf().await.unwrap_err();
    assert!(matches!(err, ExportError::Unavailable("document assembler")));

    // a failed export must not leave the guard held
    assert!(!session.exporter().is_busy());
}

/// Blocks inside capture until the test lets it go
struct GatedRasterizer {
    release: Mutex<mpsc::Receiver<()>>,
}

impl Rasterizer for GatedRasterizer {
    fn rasterize(&self, card: &Card, _options: &CaptureOptions) -> Result<RgbaImage, ExportError> {
        let release = self.release.lock().map_err(|e| ExportError::Capture(e.to_string()))?;
        release.recv().map_err(|e| ExportError::Capture(e.to_string()))?;
        Ok(RgbaImage::from_pixel(card.width as u32, 10, Rgba([0, 0, 0, 255])))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_export_while_busy_is_rejected() {
    let (tx, rx) = mpsc::channel();
    let exporter = Exporter::new(Default::default())
        .with_rasterizer(Arc::new(GatedRasterizer { release: Mutex::new(rx) }));
    let session = session_with(exporter);

    let first = session.export_png();
    let second = async {
        tokio::task::yield_now().await;
        let result = session.export_png().await;
        let _ = tx.send(());
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(second, Err(ExportError::Busy)));
    assert!(!session.exporter().is_busy());

    // one release queued: the first export succeeds, the second sees a
    // closed channel and fails without wedging the guard
    let (tx, rx) = mpsc::channel();
    tx.send(()).unwrap();
    drop(tx);
    let session = session_with(
        Exporter::new(Default::default()).with_rasterizer(Arc::new(GatedRasterizer { release: Mutex::new(rx) })),
    );
    assert!(session.export_png().await.is_ok());
    assert!(matches!(session.export_png().await, Err(ExportError::Capture(_))));
    assert!(!session.exporter().is_busy());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelled_export_stays_busy_until_capture_ends() {
    let (tx, rx) = mpsc::channel();
    let exporter = Exporter::new(Default::default())
        .with_rasterizer(Arc::new(GatedRasterizer { release: Mutex::new(rx) }));
    let session = session_with(exporter);

    let first = tokio::time::timeout(Duration::from_millis(50), session.export_png()).await;
    assert!(first.is_err(), "capture should still be blocked");

    // the capture is still running even though its future is gone
    assert!(session.exporter().is_busy());
    assert!(matches!(session.export_png().await, Err(ExportError::Busy)));

    tx.send(()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while session.exporter().is_busy() {
        assert!(Instant::now() < deadline, "guard never released");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    tx.send(()).unwrap();
    assert!(session.export_png().await.is_ok());
}

#[tokio::test]
async fn artifact_saves_under_its_name() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = Session::default().export_pdf().await.unwrap();
    let path = artifact.save(dir.path()).unwrap();

    assert_eq!(path, dir.path().join("pricelist.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), artifact.data);
}

#[tokio::test]
async fn public_sessions_can_still_export() {
    let session = Session::new(SessionConfig::resolve(Settings::default(), "view=public"));
    assert!(session.export_png().await.is_ok());
}
