// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Link safety.
//!
//! Nothing in chatmark renders a clickable link unless [`is_safe_url()`]
//! accepts it first. Rejected links are not errors; they simply stay
//! visible as escaped text.

use log::trace;
use url::Url;

/// Schemes that may become clickable links.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// True if `candidate` parses as an absolute URL whose scheme is `http` or
/// `https`.
///
/// Scheme comparison is case-insensitive, so `HTTPS://example.com` is
/// accepted, but `javascript:` and `data:` URLs are rejected however they
/// are cased, and percent-encoded scheme tricks such as
/// `java%73cript:alert(1)` do not even parse as URLs.
///
/// # Examples
///
/// ```
/// use chatmark::link::is_safe_url;
/// assert!(is_safe_url("https://example.com"));
/// assert!(is_safe_url("HTTP://example.com/a?b=c"));
/// assert!(!is_safe_url("javascript:alert(1)"));
/// assert!(!is_safe_url("JaVaScRiPt:alert(1)"));
/// assert!(!is_safe_url("java%73cript:alert(1)"));
/// assert!(!is_safe_url("data:text/html,oi"));
/// assert!(!is_safe_url("not a url"));
/// ```
pub fn is_safe_url(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            let safe = ALLOWED_SCHEMES.contains(&url.scheme());
            trace!("url {candidate:?} has scheme {:?}, safe = {safe}", url.scheme());
            safe
        }
        Err(err) => {
            trace!("url {candidate:?} does not parse: {err}");
            false
        }
    }
}
