//! URL helpers for the client.

use url::Url;

use crate::error::{ClientError, Result};

/// Loggable form of a URL: host and path only, no userinfo or query.
pub fn log_target(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => format!("{}{}", parsed.host_str().unwrap_or(""), parsed.path()),
        Err(_) => "<unparsable url>".to_string(),
    }
}

/// Join a resource path onto a base URL and append query pairs.
///
/// The path is appended to the base path rather than replacing it, so
/// `https://api.bentley.com/itwins` + `favorites` gives `.../itwins/favorites`.
///
/// # Examples
///
/// ```
/// use itwins_client::client::join_url;
///
/// let url = join_url("https://api.bentley.com/itwins", "/favorites", &[("$top", "10")]).unwrap();
/// assert_eq!(url, "https://api.bentley.com/itwins/favorites?%24top=10");
/// ```
pub fn join_url(base: &str, path: &str, query: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::Config(format!("invalid base_url {base:?}: {e}")))?;

    let path = path.trim_matches('/');
    if !path.is_empty() {
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url.to_string())
}
