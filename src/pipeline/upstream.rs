//! Error normalisation for every HTTP exchange with the site.
//!
//! All requests go through [`send`]. A request either yields a successful
//! response or exactly one of two errors:
//!
//! * [`EzgifError::UpstreamHttpError`]: the site answered with a non-2xx
//!   status; the body is kept (or replaced by a fallback hint when empty).
//! * [`EzgifError::UpstreamUnknownError`]: no response at all.

use crate::error::EzgifError;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, warn};

/// Reported instead of an empty error body.
pub const FALLBACK_BODY: &str = "Try again. If it continues, report to the creator.";

/// Send a request and normalise any failure.
pub async fn send(request: RequestBuilder) -> Result<Response, EzgifError> {
    let response = request.send().await.map_err(transport_failure)?;
    let status = response.status();
    debug!("{} {}", status.as_u16(), response.url());
    if status.is_success() {
        return Ok(response);
    }
    // A body that cannot be read is treated like an empty one.
    let body = response.text().await.unwrap_or_default();
    Err(http_failure(status, body))
}

/// Read a successful response as text.
pub async fn text(response: Response) -> Result<String, EzgifError> {
    response.text().await.map_err(transport_failure)
}

/// POST url-encoded `params` and return the response body.
pub async fn post_params(
    client: &reqwest::Client,
    url: Url,
    params: &[(String, String)],
) -> Result<String, EzgifError> {
    let response = send(client.post(url).form(params)).await?;
    text(response).await
}

/// GET a page and return its body.
pub async fn get_page(client: &reqwest::Client, url: Url) -> Result<String, EzgifError> {
    let response = send(client.get(url)).await?;
    text(response).await
}

pub fn http_failure(status: StatusCode, body: String) -> EzgifError {
    warn!("Upstream answered HTTP {}", status.as_u16());
    let body = if body.trim().is_empty() {
        FALLBACK_BODY.to_string()
    } else {
        body
    };
    EzgifError::UpstreamHttpError {
        status: status.as_u16(),
        body,
    }
}

pub fn transport_failure(err: reqwest::Error) -> EzgifError {
    warn!("Upstream request failed without a response: {}", err);
    EzgifError::UpstreamUnknownError {
        detail: err.to_string(),
    }
}
