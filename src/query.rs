use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://www.livecareer.com";

/// The site truncates any single query at 20 result pages.
pub const PAGE_CAP: u32 = 20;

const SEARCH_PATH: &str = "/resume-search/search";

/// Experience bands (`be`..`ee`) used to partition a capped query into five
/// independently capped result sets.
const BANDS: [(u32, u32); 5] = [(0, 5), (5, 10), (15, 20), (20, 25), (25, 100)];

fn keyword_slug(keyword: &str) -> String {
    keyword.to_lowercase().replace(' ', "-")
}

fn search_url(origin: &Url) -> Url {
    let mut url = origin.clone();
    url.set_path(SEARCH_PATH);
    url
}

/// Canonical search URL for one job title.
pub fn base_url(origin: &Url, keyword: &str) -> String {
    let mut url = search_url(origin);
    url.query_pairs_mut()
        .append_pair("jt", &keyword_slug(keyword));
    url.to_string()
}

/// The five band-filtered variants of the base query.
pub fn trick_urls(origin: &Url, keyword: &str) -> Vec<String> {
    BANDS
        .iter()
        .map(|&(be, ee)| {
            let mut url = search_url(origin);
            url.query_pairs_mut()
                .append_pair("jt", &keyword_slug(keyword))
                .append_pair("be", &be.to_string())
                .append_pair("ee", &ee.to_string());
            url.to_string()
        })
        .collect()
}

/// Appends the result-page number. Query URLs always carry a query string
/// already, so `&` is correct.
pub fn page_url(query_url: &str, page: u32) -> String {
    format!("{query_url}&pg={page}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse(DEFAULT_ORIGIN).expect("parse default origin")
    }

    #[test]
    fn base_url_lowercases_and_hyphenates() {
        assert_eq!(
            base_url(&origin(), "Truck Driver"),
            "https://www.livecareer.com/resume-search/search?jt=truck-driver"
        );
    }

    #[test]
    fn trick_bands_cover_expected_ranges() {
        let urls = trick_urls(&origin(), "nurse");
        assert_eq!(urls.len(), 5);

        // 25 is the only band that does not end at start + 5.
        let expected = [(0, 5), (5, 10), (15, 20), (20, 25), (25, 100)];
        for (url, (be, ee)) in urls.iter().zip(expected) {
            assert!(url.contains("jt=nurse"), "{url}");
            assert!(url.contains(&format!("be={be}")), "{url}");
            assert!(url.ends_with(&format!("ee={ee}")), "{url}");
        }
    }

    #[test]
    fn page_url_appends_pg_parameter() {
        let base = base_url(&origin(), "nurse");
        assert_eq!(page_url(&base, 3), format!("{base}&pg=3"));
    }
}
