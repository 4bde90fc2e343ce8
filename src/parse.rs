use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::formats::SimilarResume;

pub const RESULTS_PER_PAGE: u32 = 10;

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse selector {css:?}: {err}"))
}

/// First run of digits anywhere in the text.
pub fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Cosmetic numbers (similarity age, resume score) default to 0 rather than
/// fail.
fn lenient_number(text: Option<&str>) -> u32 {
    text.and_then(leading_number).unwrap_or(0)
}

/// Total result count shown next to the search heading. A count is required
/// here; a query page without one cannot be paginated.
pub fn result_count(html: &str) -> anyhow::Result<u32> {
    let document = Html::parse_document(html);
    let heading = selector("h4.disp-table-cell")?;

    let text = document
        .select(&heading)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| anyhow::anyhow!("no result-count heading on page"))?;

    leading_number(&text)
        .ok_or_else(|| anyhow::anyhow!("no digits in result-count text {:?}", text.trim()))
}

pub fn page_count(results: u32) -> u32 {
    results.div_ceil(RESULTS_PER_PAGE)
}

/// Resume detail hrefs on a search-result page, absolutized against the site
/// origin. An empty page yields an empty list.
pub fn listing_links(html: &str, origin: &Url) -> anyhow::Result<Vec<String>> {
    let document = Html::parse_document(html);
    let anchors = selector("ul.resume-list > li > a")?;

    let mut links = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match origin.join(href) {
            Ok(url) => links.push(url.to_string()),
            Err(err) => tracing::debug!(?err, href, "skip malformed listing href"),
        }
    }
    Ok(links)
}

/// Everything extracted from one resume detail page, before it is joined
/// with the saved-HTML filename into a cache record.
#[derive(Debug)]
pub struct ResumeDetail {
    pub companies_worked: String,
    pub schools_attended: String,
    pub job_titles_held: String,
    pub degrees: String,
    pub resume_content_html: String,
    pub resume_score: u32,
    pub similar: Vec<SimilarResume>,
    head_assets: String,
}

impl ResumeDetail {
    /// Standalone document: the page's head styles and stylesheet links
    /// wrapped around the resume content block.
    pub fn standalone_document(&self) -> String {
        format!(
            "<html>\n<head>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
            self.head_assets, self.resume_content_html
        )
    }
}

/// Text nodes that are immediate children of the element. The history lists
/// put one entry per node, so descendant text would double-count nested
/// markup.
fn own_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn resume_detail(html: &str) -> anyhow::Result<ResumeDetail> {
    let document = Html::parse_document(html);

    let cards = selector(".margin-bottom > div.col-sm-4")?;
    let card_link = selector("a")?;
    let card_age = selector("p.thumbnail-info")?;
    let mut similar = Vec::new();
    for card in document.select(&cards).take(3) {
        let Some(link) = card
            .select(&card_link)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        let age_text = card
            .select(&card_age)
            .next()
            .map(|el| el.text().collect::<String>());
        similar.push(SimilarResume {
            link: link.to_owned(),
            days_since_posted: lenient_number(age_text.as_deref()),
        });
    }

    let block_selector = selector("div.font14 ul.mt10")?;
    let item_selector = selector("li")?;
    let note_selector = selector("span")?;
    let mut blocks = Vec::new();
    for block in document.select(&block_selector) {
        let mut lines: Vec<String> = block.select(&item_selector).map(own_text).collect();
        lines.extend(block.select(&note_selector).map(own_text));
        blocks.push(lines.join("\n"));
    }

    // The page renders the employment-history lists in a fixed structural
    // order; this destructuring is the only place that order is assumed.
    // Blocks past the fourth are ignored.
    blocks.truncate(4);
    let blocks: [String; 4] = blocks.try_into().map_err(|found: Vec<String>| {
        anyhow::anyhow!("expected 4 history blocks, found {}", found.len())
    })?;
    let [companies_worked, schools_attended, job_titles_held, degrees] = blocks;

    let content = selector("#document")?;
    let resume_content_html = document
        .select(&content)
        .next()
        .map(|el| el.html())
        .ok_or_else(|| anyhow::anyhow!("no #document content block"))?;

    let score = selector("h3.resume-score")?;
    let score_text = document
        .select(&score)
        .next()
        .map(|el| el.text().collect::<String>());
    let resume_score = lenient_number(score_text.as_deref());

    let styles = selector("head > style")?;
    let stylesheet_links = selector("head > link")?;
    let mut head_assets: Vec<String> = document.select(&styles).map(|el| el.html()).collect();
    head_assets.extend(document.select(&stylesheet_links).map(|el| el.html()));

    Ok(ResumeDetail {
        companies_worked,
        schools_attended,
        job_titles_held,
        degrees,
        resume_content_html,
        resume_score,
        similar,
        head_assets: head_assets.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number_finds_first_digit_run() {
        assert_eq!(leading_number("Showing 247 resumes"), Some(247));
        assert_eq!(leading_number("12 days ago"), Some(12));
        assert_eq!(leading_number("no digits here"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn result_count_requires_digits() {
        let html = r#"<html><body><h4 class="disp-table-cell">247 resumes found</h4></body></html>"#;
        assert_eq!(result_count(html).expect("count"), 247);

        let no_digits =
            r#"<html><body><h4 class="disp-table-cell">no matches</h4></body></html>"#;
        assert!(result_count(no_digits).is_err());

        let no_heading = "<html><body><p>nothing</p></body></html>";
        assert!(result_count(no_heading).is_err());
    }

    #[test]
    fn page_count_is_ceiling_of_results_over_ten() {
        assert_eq!(page_count(247), 25);
        assert_eq!(page_count(200), 20);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(0), 0);
    }

    #[test]
    fn listing_links_are_absolutized() {
        let origin = Url::parse("https://www.livecareer.com").expect("origin");
        let html = r#"
            <ul class="resume-list">
                <li><a href="/r/abc">Abc</a></li>
                <li><a href="https://other.example/r/def">Def</a></li>
                <li><a>no href</a></li>
            </ul>
        "#;

        let links = listing_links(html, &origin).expect("links");
        assert_eq!(
            links,
            vec![
                "https://www.livecareer.com/r/abc".to_owned(),
                "https://other.example/r/def".to_owned(),
            ]
        );
    }

    #[test]
    fn listing_links_empty_page_is_fine() {
        let origin = Url::parse("https://www.livecareer.com").expect("origin");
        assert!(listing_links("<html><body></body></html>", &origin)
            .expect("links")
            .is_empty());
    }

    fn detail_page(blocks: usize) -> String {
        let history: String = (0..blocks)
            .map(|i| format!(r#"<ul class="mt10"><li>entry {i}</li><span>and more</span></ul>"#))
            .collect();
        format!(
            r#"<html>
            <head>
                <title>Resume</title>
                <style>.a {{ color: red; }}</style>
                <link rel="stylesheet" href="/site.css">
            </head>
            <body>
                <div class="margin-bottom">
                    <div class="col-sm-4">
                        <a href="/r/sim-1">Similar</a>
                        <p class="thumbnail-info">Posted 12 days ago</p>
                    </div>
                    <div class="col-sm-4">
                        <a href="/r/sim-2">Similar</a>
                        <p class="thumbnail-info">no age</p>
                    </div>
                </div>
                <div class="font14">{history}</div>
                <h3 class="resume-score">Resume score: 87%</h3>
                <div id="document"><p>resume body</p></div>
            </body>
            </html>"#
        )
    }

    #[test]
    fn detail_page_extracts_all_fields() {
        let detail = resume_detail(&detail_page(4)).expect("detail");

        assert_eq!(detail.companies_worked, "entry 0\nand more");
        assert_eq!(detail.schools_attended, "entry 1\nand more");
        assert_eq!(detail.job_titles_held, "entry 2\nand more");
        assert_eq!(detail.degrees, "entry 3\nand more");
        assert_eq!(detail.resume_score, 87);
        assert!(detail.resume_content_html.contains("resume body"));

        assert_eq!(detail.similar.len(), 2);
        assert_eq!(detail.similar[0].link, "/r/sim-1");
        assert_eq!(detail.similar[0].days_since_posted, 12);
        // Lenient parse: an age without digits is 0, not an error.
        assert_eq!(detail.similar[1].days_since_posted, 0);

        let document = detail.standalone_document();
        assert!(document.contains("color: red"));
        assert!(document.contains("site.css"));
        assert!(document.contains("resume body"));
    }

    #[test]
    fn missing_history_block_is_a_structural_error() {
        assert!(resume_detail(&detail_page(3)).is_err());
    }

    #[test]
    fn extra_history_blocks_are_ignored() {
        let detail = resume_detail(&detail_page(5)).expect("detail");
        assert_eq!(detail.degrees, "entry 3\nand more");
    }

    #[test]
    fn missing_content_block_is_a_structural_error() {
        let html = detail_page(4).replace(r#"id="document""#, r#"id="other""#);
        assert!(resume_detail(&html).is_err());
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let html = detail_page(4).replace(r#"class="resume-score""#, r#"class="other""#);
        let detail = resume_detail(&html).expect("detail");
        assert_eq!(detail.resume_score, 0);
    }
}
