/// Join base URL, API prefix and request path with exactly one slash between
/// non-empty segments.
/// `("https://forumlib.me/", "/api/forum", "/posts")` gives
/// `"https://forumlib.me/api/forum/posts"`.
pub fn join_url(base_url: &str, api_endpoint: &str, path: &str) -> String {
    let mut url = base_url.trim().trim_end_matches('/').to_string();
    for segment in [api_endpoint, path] {
        let segment = segment.trim().trim_matches('/');
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}

/// Extract the `page` query parameter from a pagination URL.
/// Works for absolute and relative URLs.
/// Example: "https://forumlib.me/api/forum/posts?discussion_id=1&page=3" -> Some(3)
pub fn page_from_url(url: &str) -> Option<i64> {
    let (_, query) = url.trim().split_once('?')?;
    let query = query.split('#').next()?;

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
