//! Overlay workflow: place one image on top of another.
//!
//! ```text
//! base upload ──▶ job page A ──▶ overlay upload to A ──▶ job page B
//!                                                          │
//!      result URL ◀── extract ◀── POST B?ajax=true (A id, B id, posX, posY)
//! ```

use crate::config::ClientConfig;
use crate::error::EzgifError;
use crate::pipeline::extract::Delimiters;
use crate::pipeline::form::{Upload, IMAGE_FIELD, IMAGE_URL_FIELD};
use crate::pipeline::{redirect, upstream};
use crate::request::{ImageFile, OverlayRequest};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

const OVERLAY_PATH: &str = "/overlay";
const OVERLAY_FIELD: &str = "new-overlay";

/// Overlay `request.overlay` on the base image and return the result URL.
pub async fn overlay(request: OverlayRequest, config: &ClientConfig) -> Result<String, EzgifError> {
    info!("Starting overlay");

    // ── Validate (no I/O) ────────────────────────────────────────────────
    let base = Upload::resolve(request.file, request.filename, request.url)?;
    let overlay_form = overlay_form(request.overlay)?;
    let (x, y) = (request.x.unwrap_or(0), request.y.unwrap_or(0));

    let client = config.http_client()?;

    // ── Stage 1: base image ──────────────────────────────────────────────
    let endpoint = config.endpoint(OVERLAY_PATH)?;
    let base_page = redirect::submit_and_follow(
        &client,
        &endpoint,
        base.into_form(IMAGE_FIELD, IMAGE_URL_FIELD),
    )
    .await?;

    // ── Stage 2: overlay image, posted to the base job page ──────────────
    let overlay_page = redirect::submit_and_follow(&client, &base_page.url, overlay_form).await?;
    debug!(
        "Overlay job {} on base {}",
        overlay_page.job_id, base_page.job_id
    );

    // ── Stage 3: position and render ─────────────────────────────────────
    let params = vec![
        ("file".to_string(), base_page.job_id.clone()),
        ("overlay-file".to_string(), overlay_page.job_id.clone()),
        ("posX".to_string(), x.to_string()),
        ("posY".to_string(), y.to_string()),
    ];
    let body = upstream::post_params(&client, overlay_page.ajax_url(), &params).await?;
    let result = Delimiters::IMAGE.extract(&body)?;
    info!("Overlay complete: {}", result);
    Ok(result)
}

/// The second-stage upload form. Missing data or filename is rejected here,
/// before any request is made.
fn overlay_form(image: ImageFile) -> Result<Form, EzgifError> {
    if image.data.is_empty() {
        return Err(EzgifError::MissingPayload);
    }
    if image.filename.trim().is_empty() {
        return Err(EzgifError::MissingFilename);
    }
    Ok(Form::new()
        .part(OVERLAY_FIELD, Part::bytes(image.data).file_name(image.filename))
        .text("overlay", "Upload image!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_image_needs_data_and_name() {
        assert!(matches!(
            overlay_form(ImageFile::new(vec![], "o.png")),
            Err(EzgifError::MissingPayload)
        ));
        assert!(matches!(
            overlay_form(ImageFile::new(vec![1], " ")),
            Err(EzgifError::MissingFilename)
        ));
        assert!(overlay_form(ImageFile::new(vec![1], "o.png")).is_ok());
    }

    #[tokio::test]
    async fn base_is_validated_before_any_request() {
        // Nothing listens on port 9; a request would surface as UpstreamUnknownError.
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let req = OverlayRequest {
            file: None,
            filename: None,
            url: None,
            overlay: ImageFile::new(vec![1], "o.png"),
            x: None,
            y: None,
        };
        let err = overlay(req, &config).await.unwrap_err();
        assert!(matches!(err, EzgifError::MissingPayload), "got {err:?}");
    }
}
