//! Result extraction: pull values out of the site's HTML.
//!
//! The site has no API, so results are located by splitting the raw response
//! on literal markup fragments. Any upstream markup change breaks this. All
//! of that coupling is kept in this module: callers only see
//! [`Delimiters::extract`] and [`frame_ids`], so a real HTML parser can
//! replace the string splitting later without touching the workflows.

use crate::error::EzgifError;
use serde::Serialize;

/// Literal start/end markers around a value in the response HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Delimiters {
    pub start: &'static str,
    pub end: &'static str,
}

impl Delimiters {
    /// `<img src="…" style="width…` in the result block.
    pub const IMAGE: Delimiters = Delimiters {
        start: "<img src=\"",
        end: "\" style=\"width",
    };

    /// `<source src="…" type="video/mp4"` in the result `<video>` element.
    pub const VIDEO: Delimiters = Delimiters {
        start: "<source src=\"",
        end: "\" type=\"video/mp4\"",
    };

    pub fn extract(&self, body: &str) -> Result<String, EzgifError> {
        extract(body, self.start, self.end)
    }
}

/// Return the text between the first `start` and the next `end`, as an
/// absolute URL.
///
/// Scheme-relative results (`//host/…`) get an `https:` prefix; anything
/// else is returned as found.
pub fn extract(body: &str, start: &str, end: &str) -> Result<String, EzgifError> {
    let (_, rest) = body
        .split_once(start)
        .ok_or_else(|| EzgifError::ExtractionFailed {
            detail: format!("start marker {start:?} not found in response"),
        })?;
    let (value, _) = rest
        .split_once(end)
        .ok_or_else(|| EzgifError::ExtractionFailed {
            detail: format!("end marker {end:?} not found after start marker"),
        })?;

    let value = value.trim();
    if value.is_empty() {
        return Err(EzgifError::ExtractionFailed {
            detail: "empty value between markers".into(),
        });
    }
    Ok(with_https(value))
}

fn with_https(value: &str) -> String {
    if value.starts_with("//") {
        format!("https:{value}")
    } else {
        value.to_string()
    }
}

// ── Frame list (animation maker page) ────────────────────────────────────

const FRAMES_START: &str = "(drag and drop frames to change order)";
const FRAMES_END: &str = "<p class=\"options\"><strong>Toggle a range of frames:</strong>";
const FRAME_SEPARATOR: &str = "<span class=\"frame-tools\">";
const FRAME_VALUE_START: &str = "value=\"";
const FRAME_VALUE_END: &str = "\" name=\"files[]\"";

/// Frame ids in the order the maker page lists them.
///
/// The site renames uploaded frames and may reorder them, so the ids sent
/// back with the job must come from this list, not from the upload.
pub fn frame_ids(html: &str) -> Result<Vec<String>, EzgifError> {
    let (_, region) = html
        .split_once(FRAMES_START)
        .ok_or_else(|| EzgifError::ExtractionFailed {
            detail: "frame list not found on maker page".into(),
        })?;
    let region = region
        .split_once(FRAMES_END)
        .map_or(region, |(before, _)| before);

    let pieces: Vec<&str> = region.split(FRAME_SEPARATOR).collect();
    // Each frame's tools span closes its block; the trailing piece is markup
    // after the last frame.
    let frames = &pieces[..pieces.len() - 1];
    if frames.is_empty() {
        return Err(EzgifError::ExtractionFailed {
            detail: "maker page lists no frames".into(),
        });
    }

    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            // The previous frame's tools (delay inputs) lead this piece, so
            // take the last `value="` before the files[] marker.
            frame
                .split_once(FRAME_VALUE_END)
                .and_then(|(before, _)| before.rsplit_once(FRAME_VALUE_START))
                .map(|(_, id)| id.to_string())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| EzgifError::ExtractionFailed {
                    detail: format!("no id for frame {i} on maker page"),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_relative_gets_https() {
        let body = "prefix<img src=\"//x.com/a.gif\" style=\"width:1\">";
        assert_eq!(
            extract(body, "<img src=\"", "\" style=").unwrap(),
            "https://x.com/a.gif"
        );
    }

    #[test]
    fn absolute_https_not_doubled() {
        let body = "<img src=\"https://x.com/a.gif\" style=\"width:1\">";
        assert_eq!(Delimiters::IMAGE.extract(body).unwrap(), "https://x.com/a.gif");
    }

    #[test]
    fn first_start_and_next_end_win() {
        let body = concat!(
            "<source src=\"//s.ezgif.com/tmp/a.mp4\" type=\"video/mp4\">",
            "<source src=\"//s.ezgif.com/tmp/b.mp4\" type=\"video/mp4\">"
        );
        assert_eq!(
            Delimiters::VIDEO.extract(body).unwrap(),
            "https://s.ezgif.com/tmp/a.mp4"
        );
    }

    #[test]
    fn missing_start_fails() {
        let err = extract("<p>no image here</p>", "<img src=\"", "\" style=").unwrap_err();
        assert!(matches!(err, EzgifError::ExtractionFailed { .. }));
    }

    #[test]
    fn missing_end_fails() {
        let err = extract("<img src=\"//x.com/a.gif\">", "<img src=\"", "\" style=").unwrap_err();
        assert!(matches!(err, EzgifError::ExtractionFailed { .. }));
    }

    #[test]
    fn empty_match_fails() {
        let err = extract("<img src=\"\" style=\"width:1\">", "<img src=\"", "\" style=").unwrap_err();
        assert!(matches!(err, EzgifError::ExtractionFailed { .. }));
    }

    fn maker_page(ids: &[&str]) -> String {
        let mut html = String::from("<h2>Frames</h2><p>(drag and drop frames to change order)</p><div id=\"frames\">");
        for (i, id) in ids.iter().enumerate() {
            html.push_str(&format!(
                "<span class=\"frame\"><img src=\"/tmp/{id}\"><input type=\"hidden\" value=\"{id}\" name=\"files[]\">\
                 <span class=\"frame-tools\"><a href=\"#\">skip</a> <input name=\"delays[]\" value=\"{i}\"></span></span>"
            ));
        }
        html.push_str("</div><p class=\"options\"><strong>Toggle a range of frames:</strong> <input></p>");
        html
    }

    #[test]
    fn frame_ids_in_page_order() {
        let html = maker_page(&["ezgif-frame-002.png", "ezgif-frame-001.png"]);
        assert_eq!(
            frame_ids(&html).unwrap(),
            vec!["ezgif-frame-002.png", "ezgif-frame-001.png"]
        );
    }

    #[test]
    fn frame_ids_missing_region() {
        assert!(matches!(
            frame_ids("<html>upload failed</html>"),
            Err(EzgifError::ExtractionFailed { .. })
        ));
    }

    #[test]
    fn frame_ids_empty_list() {
        assert!(frame_ids(&maker_page(&[])).is_err());
    }

    #[test]
    fn frame_ids_value_outside_region_is_ignored() {
        let mut html = maker_page(&["a.png"]);
        html.push_str("<input value=\"later.png\" name=\"files[]\"><span class=\"frame-tools\">");
        assert_eq!(frame_ids(&html).unwrap(), vec!["a.png"]);
    }
}
