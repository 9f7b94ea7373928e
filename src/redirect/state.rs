//! Per-hop redirect bookkeeping.

use crate::types::RequestSpec;

/// State of one logical call while it chases redirects.
///
/// Holds the hop count and the request for the current hop. The request keeps
/// the original method, body and headers (credential included); each hop
/// produces a fresh state rather than modifying this one. Never outlives the
/// call that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectState {
    depth: u32,
    request: RequestSpec,
}

impl RedirectState {
    /// State for the request that produced the first redirect response.
    pub fn initial(request: RequestSpec) -> Self {
        RedirectState { depth: 0, request }
    }

    /// State for the hop to `url`, one level deeper.
    #[must_use]
    pub fn next_hop(&self, url: &str) -> Self {
        RedirectState {
            depth: self.depth + 1,
            request: self.request.with_url(url),
        }
    }

    /// Hops taken so far.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Request for the current hop.
    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    /// Whether another hop would exceed `max_redirects`.
    pub fn is_exhausted(&self, max_redirects: u32) -> bool {
        self.depth >= max_redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use std::collections::BTreeMap;

    fn spec() -> RequestSpec {
        RequestSpec {
            method: Method::POST,
            url: "https://api.bentley.com/itwins".into(),
            headers: BTreeMap::from([("authorization".to_string(), "Bearer t".to_string())]),
            body: Some(bytes::Bytes::from_static(b"{\"a\":1}")),
        }
    }

    #[test]
    fn test_next_hop_increments_depth_and_keeps_original() {
        let first = RedirectState::initial(spec());
        let second = first.next_hop("https://dev-api.bentley.com/itwins");

        assert_eq!(first.depth(), 0);
        assert_eq!(second.depth(), 1);
        assert_eq!(first.request().url, "https://api.bentley.com/itwins");
        assert_eq!(second.request().url, "https://dev-api.bentley.com/itwins");
        assert_eq!(second.request().method, Method::POST);
        assert_eq!(second.request().headers["authorization"], "Bearer t");
        assert_eq!(second.request().body, first.request().body);
    }

    #[test]
    fn test_exhaustion_bound() {
        let mut state = RedirectState::initial(spec());
        for _ in 0..3 {
            assert!(!state.is_exhausted(3));
            state = state.next_hop("https://api.bentley.com/next");
        }
        assert!(state.is_exhausted(3));
        assert!(RedirectState::initial(spec()).is_exhausted(0));
    }
}
