//! The link registry: every upstream operation this crate knows how to drive.
//!
//! Each [`Operation`] maps to one immutable [`OperationSpec`] describing the
//! page to upload to, which form parameters the page insists on, the
//! defaults sent with every job and the markers that delimit the result URL
//! in the returned HTML. The table is static data; nothing mutates it.
//!
//! Using a closed enum instead of a string-keyed map means a typo in an
//! operation name is caught by the compiler in library code. String ids only
//! enter through [`lookup`] / [`Operation::from_str`], which is where
//! [`EzgifError::UnknownOperation`] comes from.

use crate::error::EzgifError;
use crate::pipeline::extract::Delimiters;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Static description of one upstream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationSpec {
    pub operation: Operation,
    /// Public id, e.g. `"webp-mp4"`.
    pub id: &'static str,
    /// Upload page, relative to the configured base URL.
    pub path: &'static str,
    /// Parameters that must all be supplied.
    pub required: &'static [&'static str],
    /// If non-empty, at least one of these must be supplied.
    pub either: &'static [&'static str],
    /// Sent with every job unless the caller overrides them.
    pub defaults: &'static [(&'static str, &'static str)],
    /// Markers around the result URL in the job response.
    pub delimiters: Delimiters,
}

/// Every registered conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    WebpToMp4,
    WebpToGif,
    WebpToPng,
    WebpToJpg,
    GifToMp4,
    GifToWebp,
    GifToApng,
    ApngToGif,
    PngToWebp,
    JpgToWebp,
    VideoToGif,
    VideoToWebp,
    Resize,
    Crop,
    Rotate,
    Speed,
    Reverse,
    Optimize,
    LoopCount,
}

const NONE: &[&str] = &[];
const NO_DEFAULTS: &[(&str, &str)] = &[];

// Indexed by `Operation as usize`; `registry_is_aligned_with_enum` guards the order.
static REGISTRY: [OperationSpec; 19] = [
    OperationSpec {
        operation: Operation::WebpToMp4,
        id: "webp-mp4",
        path: "/webp-to-mp4",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::VIDEO,
    },
    OperationSpec {
        operation: Operation::WebpToGif,
        id: "webp-gif",
        path: "/webp-to-gif",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::WebpToPng,
        id: "webp-png",
        path: "/webp-to-png",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::WebpToJpg,
        id: "webp-jpg",
        path: "/webp-to-jpg",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::GifToMp4,
        id: "gif-mp4",
        path: "/gif-to-mp4",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::VIDEO,
    },
    OperationSpec {
        operation: Operation::GifToWebp,
        id: "gif-webp",
        path: "/gif-to-webp",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::GifToApng,
        id: "gif-apng",
        path: "/gif-to-apng",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::ApngToGif,
        id: "apng-gif",
        path: "/apng-to-gif",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::PngToWebp,
        id: "png-webp",
        path: "/png-to-webp",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::JpgToWebp,
        id: "jpg-webp",
        path: "/jpg-to-webp",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::VideoToGif,
        id: "video-gif",
        path: "/video-to-gif",
        required: NONE,
        either: NONE,
        defaults: &[
            ("start", "0"),
            ("end", "5"),
            ("size", "original"),
            ("fps", "10"),
            ("method", "ffmpeg"),
        ],
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::VideoToWebp,
        id: "video-webp",
        path: "/video-to-webp",
        required: NONE,
        either: NONE,
        defaults: &[("start", "0"), ("end", "5"), ("size", "original"), ("fps", "10")],
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::Resize,
        id: "resize",
        path: "/resize",
        required: NONE,
        either: &["width", "height"],
        defaults: &[("method", "gifsicle")],
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::Crop,
        id: "crop",
        path: "/crop",
        required: &["x1", "y1", "x2", "y2"],
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::Rotate,
        id: "rotate",
        path: "/rotate",
        required: &["angle"],
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::Speed,
        id: "speed",
        path: "/speed",
        required: &["percentage"],
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::Reverse,
        id: "reverse",
        path: "/reverse",
        required: NONE,
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::Optimize,
        id: "optimize",
        path: "/optimize",
        required: NONE,
        either: NONE,
        defaults: &[("method", "lossy"), ("lossy", "35")],
        delimiters: Delimiters::IMAGE,
    },
    OperationSpec {
        operation: Operation::LoopCount,
        id: "loop-count",
        path: "/loop-count",
        required: &["loopcount"],
        either: NONE,
        defaults: NO_DEFAULTS,
        delimiters: Delimiters::IMAGE,
    },
];

impl Operation {
    /// All operations in registry order.
    pub const ALL: [Operation; 19] = [
        Operation::WebpToMp4,
        Operation::WebpToGif,
        Operation::WebpToPng,
        Operation::WebpToJpg,
        Operation::GifToMp4,
        Operation::GifToWebp,
        Operation::GifToApng,
        Operation::ApngToGif,
        Operation::PngToWebp,
        Operation::JpgToWebp,
        Operation::VideoToGif,
        Operation::VideoToWebp,
        Operation::Resize,
        Operation::Crop,
        Operation::Rotate,
        Operation::Speed,
        Operation::Reverse,
        Operation::Optimize,
        Operation::LoopCount,
    ];

    pub fn spec(self) -> &'static OperationSpec {
        &REGISTRY[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl FromStr for Operation {
    type Err = EzgifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).map(|spec| spec.operation)
    }
}

/// Resolve an operation id to its spec.
pub fn lookup(id: &str) -> Result<&'static OperationSpec, EzgifError> {
    REGISTRY
        .iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| EzgifError::UnknownOperation { id: id.to_string() })
}

/// Every registered operation id. Performs no I/O.
pub fn list_operations() -> Vec<&'static str> {
    REGISTRY.iter().map(|spec| spec.id).collect()
}

// ── Frame assembly endpoints ─────────────────────────────────────────────

/// Which animation maker a [`crate::request::RenderRequest`] is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    #[default]
    Gif,
    Webp,
    Apng,
}

impl RenderKind {
    pub const ALL: [RenderKind; 3] = [RenderKind::Gif, RenderKind::Webp, RenderKind::Apng];

    pub fn id(self) -> &'static str {
        match self {
            RenderKind::Gif => "gif",
            RenderKind::Webp => "webp",
            RenderKind::Apng => "apng",
        }
    }

    /// Upload page, relative to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            RenderKind::Gif => "/maker",
            RenderKind::Webp => "/webp-maker",
            RenderKind::Apng => "/apng-maker",
        }
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RenderKind {
    type Err = EzgifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| EzgifError::UnknownRenderKind { id: s.to_string() })
    }
}
