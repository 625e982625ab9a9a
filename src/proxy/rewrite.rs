//! Path rewriting for the passthrough.
//!
//! A fixed inbound prefix is swapped for a fixed upstream prefix. The rest
//! of the path and the query string are carried over verbatim.

use axum::http::Uri;
use url::Url;

/// Prefix → prefix rewrite rule bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct PathRewrite {
    base: String,
    inbound_prefix: String,
    upstream_prefix: String,
}

impl PathRewrite {
    /// Create a rewrite rule.
    ///
    /// A trailing slash on `base` is ignored.
    pub fn new(base: &Url, inbound_prefix: impl Into<String>, upstream_prefix: impl Into<String>) -> Self {
        Self {
            base: base.as_str().trim_end_matches('/').to_string(),
            inbound_prefix: inbound_prefix.into(),
            upstream_prefix: upstream_prefix.into(),
        }
    }

    /// Inbound prefix this rule applies to.
    pub fn inbound_prefix(&self) -> &str {
        &self.inbound_prefix
    }

    /// Rewrite an inbound path (with optional `?query`).
    ///
    /// Returns `None` when the path is not under the inbound prefix.
    pub fn rewrite_path(&self, path_and_query: &str) -> Option<String> {
        let rest = path_and_query.strip_prefix(&self.inbound_prefix)?;
        if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')) {
            // "/api/bad-appleX" is a different segment
            return None;
        }

        if self.upstream_prefix == "/" {
            return Some(match rest.chars().next() {
                Some('/') => rest.to_string(),
                _ => format!("/{rest}"),
            });
        }
        Some(format!("{}{}", self.upstream_prefix, rest))
    }

    /// Full upstream URL for an inbound request URI.
    pub fn target(&self, uri: &Uri) -> Option<Url> {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        let rewritten = self.rewrite_path(path_and_query)?;
        Url::parse(&format!("{}{}", self.base, rewritten)).ok()
    }
}
