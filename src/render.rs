//! Render workflow: assemble an animation from individual frames.
//!
//! The maker pages need two rounds. All frames are uploaded in one multipart
//! batch; the site renames them and lists them on the job page, possibly
//! reordered. That list is scraped back and submitted with the timing
//! options, so the ids sent with the job are always the site's own.

use crate::config::ClientConfig;
use crate::error::EzgifError;
use crate::pipeline::extract::{self, Delimiters};
use crate::pipeline::form::without_reserved;
use crate::pipeline::{redirect, upstream};
use crate::request::RenderRequest;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

/// Keys the workflow sets itself; never taken from `RenderRequest::params`.
const RENDER_KEYS: &[&str] = &[
    "files[]",
    "delays[]",
    "delay",
    "loop",
    "dfrom",
    "dto",
    "fader-delay",
    "fader-frames",
];

/// Render the frames and return the animation URL.
pub async fn render(request: RenderRequest, config: &ClientConfig) -> Result<String, EzgifError> {
    info!(
        "Starting render: {} frames → {}",
        request.frames.len(),
        request.kind
    );

    // ── Validate (no I/O) ────────────────────────────────────────────────
    validate_frames(&request)?;
    let delays = request.delays();

    // ── Round 1: upload the frames ───────────────────────────────────────
    let client = config.http_client()?;
    let endpoint = config.endpoint(request.kind.path())?;
    let kind = request.kind;
    let (form, options) = split_request(request);
    let page = redirect::submit_and_follow(&client, &endpoint, form).await?;

    // ── Round 2: read back the site's frame order ────────────────────────
    let html = upstream::get_page(&client, page.url.clone()).await?;
    let frame_ids = extract::frame_ids(&html)?;
    debug!("Maker page lists {} frames", frame_ids.len());

    // ── Round 3: submit ids + timing ─────────────────────────────────────
    let params = submission(&page.job_id, &frame_ids, &delays, options);
    let body = upstream::post_params(&client, page.ajax_url(), &params).await?;
    let result = Delimiters::IMAGE.extract(&body)?;
    info!("Render ({}) complete: {}", kind, result);
    Ok(result)
}

/// Every frame needs data and a name.
pub fn validate_frames(request: &RenderRequest) -> Result<(), EzgifError> {
    if request.frames.is_empty() {
        return Err(EzgifError::NoFrames);
    }
    for (index, frame) in request.frames.iter().enumerate() {
        if frame.data.is_empty() {
            return Err(EzgifError::MissingFrameData { index });
        }
        if frame.name.trim().is_empty() {
            return Err(EzgifError::MissingFrameName { index });
        }
    }
    Ok(())
}

/// Timing and extra options carried from the upload to the submission.
struct RenderOptions {
    delay: u32,
    loop_count: u32,
    dfrom: u32,
    dto: u32,
    fader_delay: u32,
    fader_frames: u32,
    extra: Vec<(String, String)>,
}

/// Consume the request into the upload form and the options for round 3.
fn split_request(request: RenderRequest) -> (Form, RenderOptions) {
    let mut form = Form::new();
    for frame in request.frames {
        form = form.part("files[]", Part::bytes(frame.data).file_name(frame.name));
    }
    let form = form
        .text("msort", "1")
        .text("upload", "Upload and make a GIF!");

    let extra = without_reserved(request.params)
        .into_iter()
        .filter(|(k, _)| !RENDER_KEYS.contains(&k.as_str()))
        .collect();
    let options = RenderOptions {
        delay: request.delay,
        loop_count: request.loop_count,
        dfrom: request.dfrom,
        dto: request.dto,
        fader_delay: request.fader_delay,
        fader_frames: request.fader_frames,
        extra,
    };
    (form, options)
}

/// Url-encoded pairs for the job page. `files[]` and `delays[]` repeat once
/// per frame, in the site's order for ids and upload order for delays.
fn submission(
    job_id: &str,
    frame_ids: &[String],
    delays: &[u32],
    options: RenderOptions,
) -> Vec<(String, String)> {
    let mut params = vec![("file".to_string(), job_id.to_string())];
    params.extend(frame_ids.iter().map(|id| ("files[]".to_string(), id.clone())));
    params.extend(delays.iter().map(|d| ("delays[]".to_string(), d.to_string())));
    params.extend([
        ("delay".to_string(), options.delay.to_string()),
        ("loop".to_string(), options.loop_count.to_string()),
        ("dfrom".to_string(), options.dfrom.to_string()),
        ("dto".to_string(), options.dto.to_string()),
        ("fader-delay".to_string(), options.fader_delay.to_string()),
        ("fader-frames".to_string(), options.fader_frames.to_string()),
    ]);
    params.extend(options.extra);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RenderKind;
    use crate::request::Frame;

    fn two_frames() -> RenderRequest {
        RenderRequest::new(
            RenderKind::Gif,
            vec![
                Frame::new(b"A".to_vec(), "f1"),
                Frame::new(b"B".to_vec(), "f2").with_delay(5),
            ],
        )
    }

    #[test]
    fn missing_frame_data_and_name() {
        let mut req = two_frames();
        req.frames[1].data.clear();
        assert!(matches!(
            validate_frames(&req),
            Err(EzgifError::MissingFrameData { index: 1 })
        ));

        let mut req = two_frames();
        req.frames[0].name = String::new();
        assert!(matches!(
            validate_frames(&req),
            Err(EzgifError::MissingFrameName { index: 0 })
        ));

        let req = RenderRequest::new(RenderKind::Webp, vec![]);
        assert!(matches!(validate_frames(&req), Err(EzgifError::NoFrames)));
    }

    #[test]
    fn submission_repeats_frame_keys_in_order() {
        let req = two_frames().delay(20).param("delay", 99).param("crossfade", 1);
        let delays = req.delays();
        let (_, options) = split_request(req);
        let ids = vec!["srv-2.png".to_string(), "srv-1.png".to_string()];
        let params = submission("job-1", &ids, &delays, options);

        let values = |key: &str| -> Vec<&str> {
            params
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .collect()
        };
        assert_eq!(values("file"), vec!["job-1"]);
        assert_eq!(values("files[]"), vec!["srv-2.png", "srv-1.png"]);
        assert_eq!(values("delays[]"), vec!["20", "5"]);
        // `delay` comes from the request field, not the extra params
        assert_eq!(values("delay"), vec!["20"]);
        assert_eq!(values("crossfade"), vec!["1"]);
        assert_eq!(values("loop"), vec!["0"]);
    }
}
