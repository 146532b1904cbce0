//! End-to-end tests against the live ezgif.com site.
//!
//! These make real uploads and depend on the site's current markup. They are
//! gated behind the `E2E_ENABLED` environment variable so they do not run in
//! CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! To restrict to a specific test:
//!   E2E_ENABLED=1 cargo test --test e2e test_webp_to_png -- --nocapture

use ezgif_convert::{
    convert, download_result, overlay, render, ClientConfig, ConversionRequest, Frame, ImageFile,
    Operation, OverlayRequest, RenderKind, RenderRequest,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

const STILL_WEBP: &str = "https://www.gstatic.com/webp/gallery/1.webp";
const ANIMATED_WEBP: &str = "https://mathiasbynens.be/demo/animated-webp-supported.webp";

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

fn live_config() -> ClientConfig {
    ClientConfig::builder()
        .timeout_secs(120)
        .build()
        .expect("default config is valid")
}

/// 1×1 red PNG.
fn tiny_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xde, 0x00, 0x00, 0x00, 0x0c, 0x49, 0x44, 0x41, 0x54, 0x08, 0xd7, 0x63, 0xf8,
        0xcf, 0xc0, 0x00, 0x00, 0x03, 0x01, 0x01, 0x00, 0x18, 0xdd, 0x8d, 0xb0, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ]
}

fn assert_result_url(url: &str, context: &str) {
    assert!(
        url.starts_with("https://"),
        "[{context}] result should be an absolute https URL, got {url:?}"
    );
    assert!(
        !url.contains('"') && !url.contains('<'),
        "[{context}] result contains markup: {url:?}"
    );
}

// ── Conversions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_webp_to_png() {
    e2e_skip_unless_enabled!();

    let url = ezgif_convert::webp_to_image(STILL_WEBP, &live_config())
        .await
        .expect("webp-png should succeed");
    println!("webp-png → {url}");
    assert_result_url(&url, "webp-png");
    assert!(url.ends_with(".png"), "expected a .png result, got {url}");
}

#[tokio::test]
async fn test_webp_to_mp4() {
    e2e_skip_unless_enabled!();

    let url = ezgif_convert::webp_to_mp4(ANIMATED_WEBP, &live_config())
        .await
        .expect("webp-mp4 should succeed");
    println!("webp-mp4 → {url}");
    assert_result_url(&url, "webp-mp4");
}

#[tokio::test]
async fn test_resize_with_file_upload_and_download() {
    e2e_skip_unless_enabled!();

    let config = live_config();
    let request = ConversionRequest::from_file(Operation::Resize, tiny_png(), "dot.png")
        .param("width", 4);
    let url = convert(request, &config).await.expect("resize should succeed");
    assert_result_url(&url, "resize");

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("resized.png");
    let written = download_result(&url, &target, &config)
        .await
        .expect("download should succeed");
    assert!(written > 0, "downloaded file is empty");
    assert!(target.exists());
}

// ── Overlay / render ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_overlay() {
    e2e_skip_unless_enabled!();

    let request = OverlayRequest::from_url(STILL_WEBP, ImageFile::new(tiny_png(), "dot.png"))
        .position(10, 10);
    let url = overlay(request, &live_config())
        .await
        .expect("overlay should succeed");
    println!("overlay → {url}");
    assert_result_url(&url, "overlay");
}

#[tokio::test]
async fn test_render_gif() {
    e2e_skip_unless_enabled!();

    let request = RenderRequest::new(
        RenderKind::Gif,
        vec![
            Frame::new(tiny_png(), "frame-1.png"),
            Frame::new(tiny_png(), "frame-2.png").with_delay(50),
        ],
    );
    let url = render(request, &live_config())
        .await
        .expect("render should succeed");
    println!("render → {url}");
    assert_result_url(&url, "render");
}
