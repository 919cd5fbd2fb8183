/// Cheap syntactic check that a fetched body is a sitemap document
///
/// A body is a sitemap if its leading content, after whitespace (and a UTF-8
/// byte order mark), starts with `<?xml`. This rejects HTML error and
/// placeholder pages served with a 200 status; it does not check
/// well-formedness or the sitemap schema.
///
/// # Examples
///
/// ```
/// use sitemap_grabber::sitemap::is_sitemap;
///
/// assert!(is_sitemap("<?xml version=\"1.0\"?><urlset/>"));
/// assert!(!is_sitemap("<!doctype html><html lang=\"en\">"));
/// assert!(!is_sitemap(""));
/// ```
pub fn is_sitemap(content: &str) -> bool {
    content
        .trim_start()
        .trim_start_matches('\u{feff}')
        .starts_with("<?xml")
}
