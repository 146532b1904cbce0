//! Upload and follow the redirect to the job page.
//!
//! Every upload page answers a successful POST with a redirect to
//! `<page>/<job id>`. The HTTP client follows it; the URL of the final
//! response is the job page and its last path segment is the job id the
//! site expects back in the parameter submission.

use crate::error::EzgifError;
use crate::pipeline::upstream;
use reqwest::multipart::Form;
use reqwest::Url;
use tracing::debug;

/// The per-job page an upload redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPage {
    pub url: Url,
    pub job_id: String,
}

impl JobPage {
    /// Derive the job page from the URL that was posted to and the URL the
    /// client ended up on.
    pub fn resolve(submitted: &Url, final_url: Url) -> Result<Self, EzgifError> {
        if final_url == *submitted {
            return Err(EzgifError::RedirectionFailed {
                url: final_url.to_string(),
            });
        }
        match job_id(&final_url) {
            Some(id) => Ok(Self {
                job_id: id.to_string(),
                url: final_url,
            }),
            None => Err(EzgifError::RedirectionFailed {
                url: final_url.to_string(),
            }),
        }
    }

    /// The job page with `ajax=true`, where parameters are submitted.
    pub fn ajax_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("ajax", "true");
        url
    }
}

/// Last non-empty path segment.
pub fn job_id(url: &Url) -> Option<&str> {
    url.path_segments()?.next_back().filter(|s| !s.is_empty())
}

/// POST `form` to `url` and return the page the site redirected to.
pub async fn submit_and_follow(
    client: &reqwest::Client,
    url: &Url,
    form: Form,
) -> Result<JobPage, EzgifError> {
    debug!("Uploading to {}", url);
    let response = upstream::send(client.post(url.clone()).multipart(form)).await?;
    let page = JobPage::resolve(url, response.url().clone())?;
    debug!("Job {} at {}", page.job_id, page.url);
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn job_id_is_last_segment() {
        let page = JobPage::resolve(
            &url("https://ezgif.com/webp-to-mp4"),
            url("https://ezgif.com/webp-to-mp4/ezgif-1-2f3c.webp"),
        )
        .unwrap();
        assert_eq!(page.job_id, "ezgif-1-2f3c.webp");
    }

    #[test]
    fn no_redirect_fails() {
        let u = url("https://ezgif.com/webp-to-mp4");
        assert!(matches!(
            JobPage::resolve(&u, u.clone()),
            Err(EzgifError::RedirectionFailed { .. })
        ));
    }

    #[test]
    fn trailing_slash_has_no_job_id() {
        assert!(matches!(
            JobPage::resolve(&url("https://ezgif.com/resize"), url("https://ezgif.com/resize/")),
            Err(EzgifError::RedirectionFailed { .. })
        ));
        assert_eq!(job_id(&url("https://ezgif.com/")), None);
    }

    #[test]
    fn ajax_url_appends_flag() {
        let page = JobPage {
            url: url("https://ezgif.com/resize/ezgif-1-ab.gif"),
            job_id: "ezgif-1-ab.gif".into(),
        };
        assert_eq!(
            page.ajax_url().as_str(),
            "https://ezgif.com/resize/ezgif-1-ab.gif?ajax=true"
        );
    }
}
