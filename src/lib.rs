//! # ezgif-convert
//!
//! Drive the ezgif.com upload/convert workflow from Rust.
//!
//! ## Why this crate?
//!
//! ezgif.com has no API. Each tool is an HTML form: you upload a file (or a
//! URL), the site redirects you to a per-job page, you submit the tool's
//! options to that page and the result shows up as an `<img>` or `<video>`
//! in the returned HTML. This crate runs that sequence for you and hands
//! back the result URL.
//!
//! ## Workflow
//!
//! ```text
//! ConversionRequest
//!  │
//!  ├─ 1. Registry  resolve the operation to its page, params and markers
//!  ├─ 2. Form      validate payload + params (no I/O on failure)
//!  ├─ 3. Upload    multipart POST, follow redirect → job page + job id
//!  ├─ 4. Submit    POST job page ?ajax=true with defaults + job id + params
//!  └─ 5. Extract   scrape the result URL out of the HTML
//! ```
//!
//! [`overlay`] and [`render`] run the same stages twice with a workflow of
//! their own in between.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ezgif_convert::{convert, ClientConfig, ConversionRequest, Operation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let request = ConversionRequest::from_url(Operation::WebpToMp4, "https://example.com/a.webp");
//!     let url = convert(request, &config).await?;
//!     println!("{url}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ezgif` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ezgif-convert = { version = "0.1", default-features = false }
//! ```
//!
//! ## Caveat
//!
//! Results are found by splitting the HTML on literal markup. When the site
//! changes its markup, extraction fails with
//! [`EzgifError::ExtractionFailed`] until the markers are updated.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder};
pub use convert::{
    convert, convert_sync, download_result, gif_to_mp4, image_to_webp, video_to_webp,
    webp_to_image, webp_to_mp4,
};
pub use error::EzgifError;
pub use overlay::overlay;
pub use pipeline::extract::{extract, Delimiters};
pub use registry::{list_operations, lookup, Operation, OperationSpec, RenderKind};
pub use render::render;
pub use request::{ConversionRequest, Frame, ImageFile, OverlayRequest, RenderRequest};
