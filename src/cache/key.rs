//! Request keys and blob names

use sha2::{Digest, Sha256};

/// Build the cache key for a request.
///
/// GET requests are keyed by path alone so the Request Cache and the
/// offline store agree on identity. Other methods are prefixed with the
/// method name. Query parameters are sorted so ordering does not matter.
pub fn request_key(method: &reqwest::Method, path: &str, params: &[(&str, &str)]) -> String {
    let mut key = String::new();
    if *method != reqwest::Method::GET {
        key.push_str(method.as_str());
        key.push(' ');
    }
    key.push_str(path);

    if !params.is_empty() {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        let query: Vec<String> = sorted.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        key.push('?');
        key.push_str(&query.join("&"));
    }

    key
}

/// Filesystem-safe name for a payload stored outside SQLite.
pub fn blob_name(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn test_get_key_is_path() {
        assert_eq!(request_key(&Method::GET, "/api/regions", &[]), "/api/regions");
    }

    #[test]
    fn test_non_get_key_has_method() {
        assert_eq!(
            request_key(&Method::POST, "/api/regions", &[]),
            "POST /api/regions"
        );
    }

    #[test]
    fn test_params_sorted() {
        let key1 = request_key(&Method::GET, "/api/news", &[("limit", "10"), ("page", "1")]);
        let key2 = request_key(&Method::GET, "/api/news", &[("page", "1"), ("limit", "10")]);

        assert_eq!(key1, key2);
        assert_eq!(key1, "/api/news?limit=10&page=1");
    }

    #[test]
    fn test_blob_name_deterministic() {
        let a = blob_name("/api/regions");
        let b = blob_name("/api/regions");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, blob_name("/api/markers"));
    }
}
