//! Integration tests for sitemap discovery
//!
//! These tests drive the full discovery run against an in-memory set of
//! responses, so every request the engine makes can be inspected.

use sitemap_grabber::crawler::COMMON_SITEMAP_LOCATIONS;
use sitemap_grabber::fetch::{Fetch, FetchResult};
use sitemap_grabber::url::Site;
use sitemap_grabber::SitemapGrabber;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

const WEBSITE: &str = "https://example.com";

/// Serves fixed responses by URL; anything unknown is a 404
#[derive(Default)]
struct FixtureFetcher {
    responses: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn respond(mut self, url: &str, status_code: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), (status_code, body.to_string()));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

impl Fetch for FixtureFetcher {
    async fn get(&self, url: &str) -> FetchResult {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some((status_code, body)) if (200..300).contains(status_code) => FetchResult::Success {
                final_url: url.to_string(),
                status_code: *status_code,
                body: body.clone(),
            },
            Some((status_code, _)) => FetchResult::HttpError {
                status_code: *status_code,
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }
}

fn grabber(fetcher: &Arc<FixtureFetcher>, blacklist: Vec<String>) -> SitemapGrabber<Arc<FixtureFetcher>> {
    SitemapGrabber::new(Site::parse(WEBSITE).unwrap(), Arc::clone(fetcher), blacklist)
}

fn robots_with(sitemaps: &[&str]) -> String {
    let mut robots = "User-agent: *\nDisallow: /admin\n".to_string();
    for sitemap in sitemaps {
        robots.push_str(&format!("Sitemap: {}\n", sitemap));
    }
    robots
}

fn index(locations: &[&str]) -> String {
    let mut body = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#
    .to_string();
    for loc in locations {
        body.push_str(&format!("<sitemap>\n<loc>{}</loc>\n</sitemap>\n", loc));
    }
    body.push_str("</sitemapindex>");
    body
}

const URLSET: &str = r#"<?xml version="1.0"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">
<url><loc>https://www.example.com</loc></url>
</urlset>"#;

const HTML_PAGE: &str = r#"<!doctype html><html lang="en">"#;

#[tokio::test]
async fn test_index_with_leaf_and_html_child() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/sitemap.xml"]),
            )
            .respond(
                "https://example.com/sitemap.xml",
                200,
                &index(&[
                    "https://example.com/sitemap2.xml",
                    "https://example.com/not-a-sitemap.xml",
                ]),
            )
            .respond("https://example.com/sitemap2.xml", 200, URLSET)
            .respond("https://example.com/not-a-sitemap.xml", 200, HTML_PAGE),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/sitemap.xml",
            "https://example.com/sitemap2.xml",
        ]
    );
    assert!(report.was_visited("https://example.com/not-a-sitemap.xml"));

    let requested: HashSet<String> = fetcher.requests().into_iter().collect();
    let expected: HashSet<String> = [
        "https://example.com/robots.txt",
        "https://example.com/sitemap.xml",
        "https://example.com/sitemap2.xml",
        "https://example.com/not-a-sitemap.xml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(requested, expected);
}

#[tokio::test]
async fn test_children_expanded_in_document_order() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/index.xml"]),
            )
            .respond(
                "https://example.com/index.xml",
                200,
                &index(&["https://example.com/a.xml", "https://example.com/b.xml"]),
            )
            .respond(
                "https://example.com/a.xml",
                200,
                &index(&["https://example.com/a1.xml"]),
            )
            .respond("https://example.com/a1.xml", 200, URLSET)
            .respond("https://example.com/b.xml", 200, URLSET),
    );

    grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        fetcher.requests(),
        vec![
            "https://example.com/robots.txt",
            "https://example.com/index.xml",
            "https://example.com/a.xml",
            "https://example.com/a1.xml",
            "https://example.com/b.xml",
        ]
    );
}

#[tokio::test]
async fn test_cycle_terminates() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/a.xml"]),
            )
            .respond(
                "https://example.com/a.xml",
                200,
                &index(&["https://example.com/b.xml"]),
            )
            .respond(
                "https://example.com/b.xml",
                200,
                &index(&["https://example.com/a.xml", "https://example.com/b.xml"]),
            ),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        ["https://example.com/a.xml", "https://example.com/b.xml"]
    );
    assert_eq!(fetcher.request_count("https://example.com/a.xml"), 1);
    assert_eq!(fetcher.request_count("https://example.com/b.xml"), 1);
}

#[tokio::test]
async fn test_duplicate_seeds_fetched_once() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&[
                    "https://example.com/sitemap.xml",
                    "https://example.com/sitemap.xml",
                ]),
            )
            .respond("https://example.com/sitemap.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(report.sitemaps(), ["https://example.com/sitemap.xml"]);
    assert_eq!(fetcher.request_count("https://example.com/sitemap.xml"), 1);
}

#[tokio::test]
async fn test_fallback_probes_conventional_locations() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond("https://example.com/robots.txt", 200, "User-agent: *\nDisallow: /")
            .respond("https://example.com/sitemap.xml", 200, "<?xml version='1.0'?>")
            .respond("https://example.com/sitemap_index.xml", 200, HTML_PAGE)
            .respond(
                "https://example.com/sitemap/sitemap_index.xml",
                200,
                "<?xml version='1.0'?>",
            ),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/sitemap.xml",
            "https://example.com/sitemap/sitemap_index.xml",
        ]
    );

    // Each probe is fetched once; accepted probes are not fetched again
    let mut expected = vec!["https://example.com/robots.txt".to_string()];
    expected.extend(
        COMMON_SITEMAP_LOCATIONS
            .iter()
            .map(|location| format!("{}{}", WEBSITE, location)),
    );
    assert_eq!(fetcher.requests(), expected);
}

#[tokio::test]
async fn test_no_sitemaps_anywhere() {
    let mut fetcher = FixtureFetcher::new().respond(
        "https://example.com/robots.txt",
        200,
        "User-agent: *\nDisallow: /",
    );
    for location in COMMON_SITEMAP_LOCATIONS {
        fetcher = fetcher.respond(&format!("{}{}", WEBSITE, location), 404, "Not Found");
    }
    let fetcher = Arc::new(fetcher);

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert!(report.sitemaps().is_empty());
    assert_eq!(fetcher.requests().len(), 1 + COMMON_SITEMAP_LOCATIONS.len());
}

#[tokio::test]
async fn test_html_robots_txt_falls_back() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                "<html><body>Sitemap: https://example.com/fake.xml</body></html>",
            )
            .respond("https://example.com/sitemap.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(report.sitemaps(), ["https://example.com/sitemap.xml"]);
    assert_eq!(fetcher.request_count("https://example.com/fake.xml"), 0);
}

#[tokio::test]
async fn test_unrepairable_sitemap_recorded_without_children() {
    let broken = "<?xml version=\"1.0\"?>\n<sitemapindex>\n<sitemap><loc>https://example.com/child.xml</loc></sitemap>\n";
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/broken.xml"]),
            )
            .respond("https://example.com/broken.xml", 200, broken)
            .respond("https://example.com/child.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(report.sitemaps(), ["https://example.com/broken.xml"]);
    assert_eq!(fetcher.request_count("https://example.com/child.xml"), 0);
}

#[tokio::test]
async fn test_repaired_sitemap_children_expanded() {
    let body = "<?xml version=\"1.0\"?>\n<sitemapindex>\n<sitemap><loc>https://example.com/caf&eacute;.xml</loc></sitemap>\n</sitemapindex>";
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/index.xml"]),
            )
            .respond("https://example.com/index.xml", 200, body)
            .respond("https://example.com/caf%C3%A9.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/caf%C3%A9.xml",
            "https://example.com/index.xml",
        ]
    );
}

#[tokio::test]
async fn test_relative_locations_resolved_against_parent() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/a/index.xml"]),
            )
            .respond(
                "https://example.com/a/index.xml",
                200,
                &index(&["sub/child.xml", "/root.xml"]),
            )
            .respond("https://example.com/a/sub/child.xml", 200, URLSET)
            .respond("https://example.com/root.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/a/index.xml",
            "https://example.com/a/sub/child.xml",
            "https://example.com/root.xml",
        ]
    );
}

#[tokio::test]
async fn test_unresolvable_locations_skipped_before_visit() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/sitemap.xml"]),
            )
            .respond(
                "https://example.com/sitemap.xml",
                200,
                &index(&[
                    "mailto:webmaster@example.com",
                    "ftp://example.com/sitemap3.xml",
                    "https://example.com/sitemap2.xml",
                ]),
            )
            .respond("https://example.com/sitemap2.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/sitemap.xml",
            "https://example.com/sitemap2.xml",
        ]
    );
    assert_eq!(report.visited.len(), 2);
    assert!(!report.was_visited("mailto:webmaster@example.com"));
    assert!(!report.was_visited("ftp://example.com/sitemap3.xml"));
    assert!(fetcher
        .requests()
        .iter()
        .all(|url| url.starts_with("https://")));
}

#[tokio::test]
async fn test_failed_child_visited_not_recorded() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/index.xml"]),
            )
            .respond(
                "https://example.com/index.xml",
                200,
                &index(&[
                    "https://example.com/gone.xml",
                    "https://example.com/error.xml",
                    "https://example.com/ok.xml",
                ]),
            )
            .respond("https://example.com/error.xml", 500, "Internal Server Error")
            .respond("https://example.com/ok.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        ["https://example.com/index.xml", "https://example.com/ok.xml"]
    );
    assert!(report.was_visited("https://example.com/gone.xml"));
    assert!(report.was_visited("https://example.com/error.xml"));
}

#[tokio::test]
async fn test_unreachable_seed_does_not_abort_run() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&[
                    "https://other.example/missing.xml",
                    "https://example.com/sitemap.xml",
                ]),
            )
            .respond("https://example.com/sitemap.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(report.sitemaps(), ["https://example.com/sitemap.xml"]);
}

#[tokio::test]
async fn test_blacklisted_urls_never_fetched() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&[
                    "https://example.com/es/sitemap.xml",
                    "https://example.com/sitemap.xml",
                ]),
            )
            .respond(
                "https://example.com/sitemap.xml",
                200,
                &index(&[
                    "https://example.com/zh-hans/posts.xml",
                    "https://example.com/posts.xml",
                ]),
            )
            .respond("https://example.com/posts.xml", 200, URLSET)
            .respond("https://example.com/es/sitemap.xml", 200, URLSET)
            .respond("https://example.com/zh-hans/posts.xml", 200, URLSET),
    );

    let blacklist = vec!["/es/".to_string(), "/zh-hans/".to_string()];
    let report = grabber(&fetcher, blacklist).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/posts.xml",
            "https://example.com/sitemap.xml",
        ]
    );
    assert_eq!(fetcher.request_count("https://example.com/es/sitemap.xml"), 0);
    assert_eq!(fetcher.request_count("https://example.com/zh-hans/posts.xml"), 0);
    assert!(!report.was_visited("https://example.com/es/sitemap.xml"));
}

#[tokio::test]
async fn test_case_variants_recorded_but_fetched_once() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/index.xml"]),
            )
            .respond(
                "https://example.com/index.xml",
                200,
                &index(&["https://example.com/Posts.xml", "https://example.com/posts.xml"]),
            )
            .respond("https://example.com/Posts.xml", 200, URLSET)
            .respond("https://example.com/posts.xml", 200, URLSET),
    );

    let report = grabber(&fetcher, vec![]).get_all_sitemaps().await;

    assert_eq!(
        report.sitemaps(),
        [
            "https://example.com/Posts.xml",
            "https://example.com/index.xml",
            "https://example.com/posts.xml",
        ]
    );
    assert_eq!(fetcher.request_count("https://example.com/Posts.xml"), 1);
    assert_eq!(fetcher.request_count("https://example.com/posts.xml"), 0);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond(
                "https://example.com/robots.txt",
                200,
                &robots_with(&["https://example.com/sitemap.xml"]),
            )
            .respond(
                "https://example.com/sitemap.xml",
                200,
                &index(&["https://example.com/z.xml", "https://example.com/m.xml"]),
            )
            .respond("https://example.com/z.xml", 200, URLSET)
            .respond("https://example.com/m.xml", 200, URLSET),
    );

    let mut grabber = grabber(&fetcher, vec![]);
    let first = grabber.get_all_sitemaps().await;
    let second = grabber.get_all_sitemaps().await;

    assert_eq!(first, second);
    assert_eq!(
        first.sitemaps(),
        [
            "https://example.com/m.xml",
            "https://example.com/sitemap.xml",
            "https://example.com/z.xml",
        ]
    );
    // robots.txt comes from the well-known cache on the second run
    assert_eq!(fetcher.request_count("https://example.com/robots.txt"), 1);
    assert_eq!(fetcher.request_count("https://example.com/sitemap.xml"), 2);
}

#[tokio::test]
async fn test_well_known_files_share_grabber_cache() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .respond("https://example.com/robots.txt", 200, "User-agent: *")
            .respond("https://example.com/humans.txt", 200, "Humans: Me"),
    );

    let mut grabber = grabber(&fetcher, vec![]);
    let all = grabber.well_known().fetch_all().await;
    grabber.get_all_sitemaps().await;

    assert_eq!(all["humans.txt"], "Humans: Me");
    assert_eq!(fetcher.request_count("https://example.com/robots.txt"), 1);
}
