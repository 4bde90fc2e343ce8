use serde::{Deserialize, Serialize};

/// Structured extraction of one resume detail page, keyed by URL in the
/// crawl cache. Written once on first successful fetch; later stage runs
/// treat its presence as "done".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub url: String,
    pub companies_worked: String,
    pub schools_attended: String,
    pub job_titles_held: String,
    pub degrees: String,
    pub resume_content_html: String,
    pub resume_score: u32,
    /// Path of the saved standalone HTML document, relative to the data dir.
    pub html_filename: String,
    /// Up to three "similar resume" teasers in page order.
    pub similar: Vec<SimilarResume>,
    pub fetched_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarResume {
    pub link: String,
    pub days_since_posted: u32,
}

/// One flattened export row. Field order defines the CSV column order and
/// must stay stable; downstream consumers read by position.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub url: String,
    pub companies_worked: String,
    pub schools_attended: String,
    pub job_titles_held: String,
    pub degrees: String,
    pub resume_content_html: String,
    pub resume_score: u32,
    pub job_title_id: String,
    pub job_title_category: String,
    pub job_title_keyword: String,
    pub similar_resume_1_link: String,
    pub similar_resume_1_days_since_posted: u32,
    pub similar_resume_2_link: String,
    pub similar_resume_2_days_since_posted: u32,
    pub similar_resume_3_link: String,
    pub similar_resume_3_days_since_posted: u32,
    pub html_filename: String,
}
