//! URL to output file path mapping.

/// Map a URL to the file path it is frozen to, relative to the destination.
///
/// The query string is dropped, directory-like URLs get `index.html`, every
/// other URL gets a `.html` suffix, and the result always starts with `/`.
///
/// ```
/// use frostline_core::url_to_path;
///
/// assert_eq!(url_to_path("/"), "/index.html");
/// assert_eq!(url_to_path("/a/b/"), "/a/b/index.html");
/// assert_eq!(url_to_path("/x?y=1"), "/x.html");
/// ```
#[must_use]
pub fn url_to_path(url: &str) -> String {
    let url = match url.find('?') {
        Some(pos) => &url[..pos],
        None => url,
    };

    let file = if url.ends_with('/') {
        format!("{url}index.html")
    } else {
        format!("{url}.html")
    };

    if file.starts_with('/') {
        file
    } else {
        format!("/{file}")
    }
}
