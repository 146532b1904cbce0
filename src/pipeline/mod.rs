//! Pipeline stages shared by the conversion, overlay and render workflows.
//!
//! Each submodule implements exactly one step of talking to the site, so
//! each can be tested on its own and the scraping details stay out of the
//! workflows.
//!
//! ## Data Flow
//!
//! ```text
//! form ──▶ redirect ──▶ upstream (params) ──▶ extract
//! (validate,  (upload,     (POST job page       (result URL
//!  build)      job id)      ?ajax=true)          from HTML)
//! ```
//!
//! 1. [`form`]    : validate a request and build the multipart upload; no I/O
//! 2. [`redirect`]: POST the upload and follow the site's redirect to the job page
//! 3. [`upstream`]: send requests and normalise every HTTP failure
//! 4. [`extract`] : locate the result URL (or the frame list) in returned HTML

pub mod extract;
pub mod form;
pub mod redirect;
pub mod upstream;
