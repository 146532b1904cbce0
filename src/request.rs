//! Request types for the three workflows.
//!
//! Requests are plain owned values: build one, hand it to [`crate::convert`],
//! [`crate::overlay`] or [`crate::render`] and it is consumed by the call.
//! Nothing here is validated on construction; validation happens in
//! [`crate::pipeline::form`] right before the first request would be sent.

use crate::registry::{Operation, RenderKind};
use std::collections::BTreeMap;

/// One conversion through the generic upload → job → result workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub operation: Operation,
    /// Raw bytes to upload. Mutually exclusive with `url`.
    pub file: Option<Vec<u8>>,
    /// Filename (with extension) the upload is sent under.
    pub filename: Option<String>,
    /// Remote file the site should fetch itself.
    pub url: Option<String>,
    /// Operation parameters forwarded with the job.
    pub params: BTreeMap<String, String>,
}

impl ConversionRequest {
    /// An empty request; add a payload before sending it.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            file: None,
            filename: None,
            url: None,
            params: BTreeMap::new(),
        }
    }

    pub fn from_url(operation: Operation, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new(operation)
        }
    }

    pub fn from_file(operation: Operation, data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            file: Some(data),
            filename: Some(filename.into()),
            ..Self::new(operation)
        }
    }

    /// Add (or replace) one operation parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }
}

/// An image uploaded as a file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub data: Vec<u8>,
    pub filename: String,
}

impl ImageFile {
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
        }
    }
}

/// Place an overlay image on top of a base image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    /// Base image bytes. Mutually exclusive with `url`.
    pub file: Option<Vec<u8>>,
    pub filename: Option<String>,
    /// Base image fetched by the site.
    pub url: Option<String>,
    pub overlay: ImageFile,
    /// Horizontal offset in pixels. Default: 0.
    pub x: Option<i64>,
    /// Vertical offset in pixels. Default: 0.
    pub y: Option<i64>,
}

impl OverlayRequest {
    pub fn from_file(data: Vec<u8>, filename: impl Into<String>, overlay: ImageFile) -> Self {
        Self {
            file: Some(data),
            filename: Some(filename.into()),
            url: None,
            overlay,
            x: None,
            y: None,
        }
    }

    pub fn from_url(url: impl Into<String>, overlay: ImageFile) -> Self {
        Self {
            file: None,
            filename: None,
            url: Some(url.into()),
            overlay,
            x: None,
            y: None,
        }
    }

    pub fn position(mut self, x: i64, y: i64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// One frame of a rendered animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub name: String,
    /// Per-frame delay in hundredths of a second. Falls back to
    /// [`RenderRequest::delay`].
    pub delay: Option<u32>,
}

impl Frame {
    pub fn new(data: Vec<u8>, name: impl Into<String>) -> Self {
        Self {
            data,
            name: name.into(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Assemble an animation from individual frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub kind: RenderKind,
    /// Frames in upload order.
    pub frames: Vec<Frame>,
    /// Global frame delay in hundredths of a second. Default: 20.
    pub delay: u32,
    /// Number of loops; 0 loops forever. Default: 0.
    pub loop_count: u32,
    /// Crossfade range start. Default: 1.
    pub dfrom: u32,
    /// Crossfade range end. Default: 5.
    pub dto: u32,
    /// Crossfade frame delay. Default: 6.
    pub fader_delay: u32,
    /// Crossfade frame count. Default: 10.
    pub fader_frames: u32,
    /// Extra maker options forwarded verbatim.
    pub params: BTreeMap<String, String>,
}

impl RenderRequest {
    pub fn new(kind: RenderKind, frames: Vec<Frame>) -> Self {
        Self {
            kind,
            frames,
            delay: 20,
            loop_count: 0,
            dfrom: 1,
            dto: 5,
            fader_delay: 6,
            fader_frames: 10,
            params: BTreeMap::new(),
        }
    }

    pub fn delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    pub fn loop_count(mut self, n: u32) -> Self {
        self.loop_count = n;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Per-frame delays in frame order.
    pub fn delays(&self) -> Vec<u32> {
        self.frames
            .iter()
            .map(|f| f.delay.unwrap_or(self.delay))
            .collect()
    }
}
