//! The generic conversion workflow and its shortcuts.
//!
//! One conversion is four sequential steps: validate, upload and follow the
//! redirect, submit the job parameters, scrape the result URL. A failure at
//! any step ends the call; nothing is retried.

use crate::config::ClientConfig;
use crate::error::EzgifError;
use crate::pipeline::{form, redirect, upstream};
use crate::registry::Operation;
use crate::request::ConversionRequest;
use reqwest::Url;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Run one conversion and return the URL of the result.
///
/// # Errors
/// Validation errors (`MissingPayload`, `MissingFilename`,
/// `ConflictingPayload`, `MissingRequiredParam`, `MissingEitherParam`) are
/// returned before any request is sent. After that, any HTTP failure is
/// returned as `UpstreamHttpError` / `UpstreamUnknownError`, a missing
/// redirect as `RedirectionFailed` and unexpected HTML as `ExtractionFailed`.
///
/// # Example
/// ```rust,no_run
/// use ezgif_convert::{convert, ClientConfig, ConversionRequest, Operation};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = ConversionRequest::from_url(Operation::Resize, "https://example.com/cat.gif")
///     .param("width", 320);
/// let url = convert(request, &ClientConfig::default()).await?;
/// println!("{url}");
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    request: ConversionRequest,
    config: &ClientConfig,
) -> Result<String, EzgifError> {
    let start = Instant::now();
    let operation = request.operation;
    info!("Starting conversion: {}", operation);

    // ── Step 1: Validate (no I/O) ────────────────────────────────────────
    let prepared = form::prepare(request)?;

    // ── Step 2: Upload and follow the redirect ───────────────────────────
    let client = config.http_client()?;
    let endpoint = config.endpoint(prepared.spec.path)?;
    let page = redirect::submit_and_follow(&client, &endpoint, prepared.multipart()).await?;

    // ── Step 3: Submit the job parameters ────────────────────────────────
    let params = prepared.submission(&page.job_id);
    debug!("Submitting {} params for job {}", params.len(), page.job_id);
    let body = upstream::post_params(&client, page.ajax_url(), &params).await?;

    // ── Step 4: Extract the result ───────────────────────────────────────
    let result = prepared.spec.delimiters.extract(&body)?;
    info!(
        "Conversion {} complete in {}ms: {}",
        operation,
        start.elapsed().as_millis(),
        result
    );
    Ok(result)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
///
/// # Panics
/// Panics when called from inside a running tokio runtime (tokio refuses to
/// start a runtime from within a runtime). Use [`convert`] there instead.
pub fn convert_sync(
    request: ConversionRequest,
    config: &ClientConfig,
) -> Result<String, EzgifError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| EzgifError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(request, config))
}

/// Animated WebP → MP4.
pub async fn webp_to_mp4(url: impl Into<String>, config: &ClientConfig) -> Result<String, EzgifError> {
    convert(ConversionRequest::from_url(Operation::WebpToMp4, url), config).await
}

/// WebP → PNG.
pub async fn webp_to_image(url: impl Into<String>, config: &ClientConfig) -> Result<String, EzgifError> {
    convert(ConversionRequest::from_url(Operation::WebpToPng, url), config).await
}

/// PNG → WebP.
pub async fn image_to_webp(url: impl Into<String>, config: &ClientConfig) -> Result<String, EzgifError> {
    convert(ConversionRequest::from_url(Operation::PngToWebp, url), config).await
}

/// Video → animated WebP.
pub async fn video_to_webp(url: impl Into<String>, config: &ClientConfig) -> Result<String, EzgifError> {
    convert(ConversionRequest::from_url(Operation::VideoToWebp, url), config).await
}

/// GIF → MP4.
pub async fn gif_to_mp4(url: impl Into<String>, config: &ClientConfig) -> Result<String, EzgifError> {
    convert(ConversionRequest::from_url(Operation::GifToMp4, url), config).await
}

/// Download a result URL and write it to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
/// Returns the number of bytes written.
pub async fn download_result(
    result_url: &str,
    output_path: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<u64, EzgifError> {
    let path = output_path.as_ref();
    let url = Url::parse(result_url)
        .map_err(|e| EzgifError::Internal(format!("result URL {result_url:?} is invalid: {e}")))?;

    let client = config.http_client()?;
    let response = upstream::send(client.get(url)).await?;
    let bytes = response.bytes().await.map_err(upstream::transport_failure)?;

    let write_err = |e: std::io::Error| EzgifError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".part");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    let written = match tokio::fs::write(&tmp_path, &bytes).await {
        Ok(()) => tokio::fs::rename(&tmp_path, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}
