//! Error type for the ezgif-convert library.
//!
//! Every public operation returns `Result<_, EzgifError>`. The variants fall
//! into two groups:
//!
//! * **Validation** errors (`Unknown*`, `Missing*`, `ConflictingPayload`,
//!   `NoFrames`) are raised before any network I/O happens.
//! * **Upstream** errors (`RedirectionFailed`, `ExtractionFailed`,
//!   `UpstreamHttpError`, `UpstreamUnknownError`) come from talking to the
//!   site. HTTP failures are funnelled through
//!   [`crate::pipeline::upstream`] so they always surface in one of the two
//!   `Upstream*` shapes.
//!
//! Nothing is retried. The caller decides whether a failure is worth another
//! attempt.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ezgif-convert library.
#[derive(Debug, Error)]
pub enum EzgifError {
    // ── Registry errors ───────────────────────────────────────────────────
    /// No operation is registered under this id.
    #[error("Invalid conversion type \"{id}\"\nRun `ezgif list` to see the supported operations.")]
    UnknownOperation { id: String },

    /// No frame-assembly endpoint is registered under this id.
    #[error("Invalid rendering type \"{id}\" (expected gif, webp or apng)")]
    UnknownRenderKind { id: String },

    // ── Request validation ────────────────────────────────────────────────
    /// Neither a file nor a URL was supplied.
    #[error("Either file or url field is required.")]
    MissingPayload,

    /// Both a file and a URL were supplied.
    #[error("Provide either a file or a url, not both.")]
    ConflictingPayload,

    /// A file was supplied without a filename; the site needs the extension.
    #[error("Filename must be provided to upload files (with extension)")]
    MissingFilename,

    /// A parameter the operation cannot run without is absent.
    #[error("\"{param}\" is a required param.")]
    MissingRequiredParam { param: String },

    /// None of the alternative parameters was supplied.
    #[error("Either one of these params has to be provided: {}", params.join(", "))]
    MissingEitherParam { params: Vec<String> },

    /// A render request listed no frames at all.
    #[error("At least one frame is required to render an animation")]
    NoFrames,

    /// `files[index]` has an empty data buffer.
    #[error("File buffer not provided for files[{index}]")]
    MissingFrameData { index: usize },

    /// `files[index]` has an empty name.
    #[error("File name not provided for files[{index}]")]
    MissingFrameName { index: usize },

    // ── Workflow errors ───────────────────────────────────────────────────
    /// The upload did not redirect to a job page.
    #[error("Unknown error occurred during redirection (final URL: {url})")]
    RedirectionFailed { url: String },

    /// The expected markers were not found in the returned HTML.
    #[error("Failed to extract image URL: {detail}")]
    ExtractionFailed { detail: String },

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The site answered with a non-success status.
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamHttpError { status: u16, body: String },

    /// The request failed without any response (DNS, connect, timeout, ...).
    #[error("Oops, something unknown happened! :( ({detail})")]
    UpstreamUnknownError { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a downloaded result file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EzgifError {
    /// True for errors raised while validating a request, i.e. before any
    /// request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EzgifError::UnknownOperation { .. }
                | EzgifError::UnknownRenderKind { .. }
                | EzgifError::MissingPayload
                | EzgifError::ConflictingPayload
                | EzgifError::MissingFilename
                | EzgifError::MissingRequiredParam { .. }
                | EzgifError::MissingEitherParam { .. }
                | EzgifError::NoFrames
                | EzgifError::MissingFrameData { .. }
                | EzgifError::MissingFrameName { .. }
        )
    }
}
