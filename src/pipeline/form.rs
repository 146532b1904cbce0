//! Request building and validation.
//!
//! Everything in this module is pure: it turns a caller's request into the
//! forms the site expects and rejects malformed requests before any network
//! call is made.

use crate::error::EzgifError;
use crate::registry::OperationSpec;
use crate::request::ConversionRequest;
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;

/// Keys that select the payload rather than configure the operation. They
/// are never forwarded as parameters.
pub const RESERVED_PARAMS: &[&str] = &["type", "file", "filename", "url"];

/// Multipart field names of the main upload.
pub const IMAGE_FIELD: &str = "new-image";
pub const IMAGE_URL_FIELD: &str = "new-image-url";

/// What gets uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    File { data: Vec<u8>, filename: String },
    Url(String),
}

impl Upload {
    /// Resolve the file/filename/url triple, requiring exactly one payload.
    /// Empty buffers and empty strings count as absent.
    pub fn resolve(
        file: Option<Vec<u8>>,
        filename: Option<String>,
        url: Option<String>,
    ) -> Result<Self, EzgifError> {
        let file = file.filter(|d| !d.is_empty());
        let url = url.filter(|u| !u.trim().is_empty());
        match (file, url) {
            (Some(_), Some(_)) => Err(EzgifError::ConflictingPayload),
            (None, None) => Err(EzgifError::MissingPayload),
            (None, Some(url)) => Ok(Upload::Url(url)),
            (Some(data), None) => match filename.filter(|n| !n.trim().is_empty()) {
                Some(filename) => Ok(Upload::File { data, filename }),
                None => Err(EzgifError::MissingFilename),
            },
        }
    }

    /// Multipart form carrying this upload under `file_field` / `url_field`.
    pub fn into_form(self, file_field: &'static str, url_field: &'static str) -> Form {
        match self {
            Upload::File { data, filename } => {
                Form::new().part(file_field, Part::bytes(data).file_name(filename))
            }
            Upload::Url(url) => Form::new().text(url_field, url),
        }
    }
}

/// A validated conversion, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpload {
    pub spec: &'static OperationSpec,
    pub upload: Upload,
    /// Caller parameters with the reserved keys removed.
    pub params: BTreeMap<String, String>,
}

impl PreparedUpload {
    pub fn multipart(&self) -> Form {
        self.upload.clone().into_form(IMAGE_FIELD, IMAGE_URL_FIELD)
    }

    /// Parameters for the job page: operation defaults, then the job id,
    /// then the caller's parameters on top.
    pub fn submission(&self, job_id: &str) -> Vec<(String, String)> {
        let mut merged: BTreeMap<String, String> = self
            .spec
            .defaults
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        merged.insert("file".into(), job_id.to_string());
        merged.extend(self.params.clone());
        merged.into_iter().collect()
    }
}

/// Validate a request against its operation and split it into payload and
/// parameters.
pub fn prepare(request: ConversionRequest) -> Result<PreparedUpload, EzgifError> {
    let spec = request.operation.spec();
    let upload = Upload::resolve(request.file, request.filename, request.url)?;
    let params = without_reserved(request.params);
    check_params(spec, &params)?;
    Ok(PreparedUpload {
        spec,
        upload,
        params,
    })
}

/// Fresh copy of `params` without [`RESERVED_PARAMS`].
pub fn without_reserved(params: BTreeMap<String, String>) -> BTreeMap<String, String> {
    params
        .into_iter()
        .filter(|(k, _)| !RESERVED_PARAMS.contains(&k.as_str()))
        .collect()
}

/// Required and either-of parameter checks.
pub fn check_params(
    spec: &OperationSpec,
    params: &BTreeMap<String, String>,
) -> Result<(), EzgifError> {
    if let Some(missing) = spec.required.iter().find(|p| !params.contains_key(**p)) {
        return Err(EzgifError::MissingRequiredParam {
            param: missing.to_string(),
        });
    }
    if !spec.either.is_empty() && !spec.either.iter().any(|p| params.contains_key(*p)) {
        return Err(EzgifError::MissingEitherParam {
            params: spec.either.iter().map(|p| p.to_string()).collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::Delimiters;
    use crate::registry::Operation;

    const AB: OperationSpec = OperationSpec {
        operation: Operation::Crop,
        id: "test-ab",
        path: "/test",
        required: &["a", "b"],
        either: &[],
        defaults: &[],
        delimiters: Delimiters::IMAGE,
    };

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn neither_file_nor_url() {
        let req = ConversionRequest::new(Operation::WebpToMp4);
        assert!(matches!(prepare(req), Err(EzgifError::MissingPayload)));
    }

    #[test]
    fn file_without_filename() {
        let mut req = ConversionRequest::new(Operation::WebpToPng);
        req.file = Some(vec![1, 2, 3]);
        assert!(matches!(prepare(req), Err(EzgifError::MissingFilename)));
    }

    #[test]
    fn file_and_url_conflict() {
        let mut req = ConversionRequest::from_url(Operation::WebpToPng, "https://x/a.webp");
        req.file = Some(vec![1]);
        req.filename = Some("a.webp".into());
        assert!(matches!(prepare(req), Err(EzgifError::ConflictingPayload)));
    }

    #[test]
    fn empty_values_count_as_absent() {
        assert!(matches!(
            Upload::resolve(Some(vec![]), Some("a.gif".into()), None),
            Err(EzgifError::MissingPayload)
        ));
        assert!(matches!(
            Upload::resolve(None, None, Some(String::new())),
            Err(EzgifError::MissingPayload)
        ));
        assert!(matches!(
            Upload::resolve(Some(vec![1]), Some(String::new()), None),
            Err(EzgifError::MissingFilename)
        ));
    }

    #[test]
    fn missing_required_names_the_key() {
        let err = check_params(&AB, &params(&[("a", "1")])).unwrap_err();
        match err {
            EzgifError::MissingRequiredParam { param } => assert_eq!(param, "b"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(check_params(&AB, &params(&[("a", "1"), ("b", "2")])).is_ok());
    }

    #[test]
    fn either_needs_one_of_the_set() {
        let req = ConversionRequest::from_url(Operation::Resize, "https://x/a.gif");
        match prepare(req) {
            Err(EzgifError::MissingEitherParam { params }) => {
                assert_eq!(params, vec!["width", "height"])
            }
            other => panic!("unexpected {other:?}"),
        }

        let req =
            ConversionRequest::from_url(Operation::Resize, "https://x/a.gif").param("height", 100);
        assert!(prepare(req).is_ok());
    }

    #[test]
    fn reserved_keys_do_not_satisfy_or_leak() {
        let req = ConversionRequest::from_url(Operation::Rotate, "https://x/a.gif")
            .param("url", "https://y/b.gif")
            .param("type", "rotate")
            .param("angle", 90);
        let prepared = prepare(req).unwrap();
        assert_eq!(prepared.params, params(&[("angle", "90")]));
        assert_eq!(prepared.upload, Upload::Url("https://x/a.gif".into()));
    }

    #[test]
    fn caller_file_param_cannot_replace_job_id() {
        let req = ConversionRequest::from_url(Operation::Reverse, "https://x/a.gif")
            .param("file", "evil.gif");
        let prepared = prepare(req).unwrap();
        let sub = prepared.submission("ezgif-1-ab.gif");
        assert!(sub.contains(&("file".to_string(), "ezgif-1-ab.gif".to_string())));
        assert_eq!(sub.iter().filter(|(k, _)| k == "file").count(), 1);
    }

    #[test]
    fn submission_caller_overrides_defaults() {
        let req = ConversionRequest::from_url(Operation::Optimize, "https://x/a.gif")
            .param("lossy", 80);
        let sub = prepare(req).unwrap().submission("job.gif");
        assert_eq!(
            sub,
            vec![
                ("file".to_string(), "job.gif".to_string()),
                ("lossy".to_string(), "80".to_string()),
                ("method".to_string(), "lossy".to_string()),
            ]
        );
    }
}
