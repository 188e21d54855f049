//! Query string and path building for upstream URLs.

/// Build a query string from key/value pairs.
///
/// Produces exactly one url-encoded `key=value` token per pair, joined by `&`.
/// Returns an empty string when there are no pairs.
pub fn build_query_string<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Join a base URL, an endpoint and optional query parameters.
///
/// The base and endpoint are concatenated as-is; the `?` is only added
/// when there is something to put after it.
pub fn join_url<K, V>(base: &str, endpoint: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let query = build_query_string(params);
    if query.is_empty() {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}{}?{}", base, endpoint, query)
    }
}

/// Percent-encode a value for use as a single path segment.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
