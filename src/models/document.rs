use crate::constants::{ANSWER_POST_TYPE_ID, PRIMARY_POST_TYPE_ID};
use crate::types::{DocumentId, ViewCount};
use crate::utils::canonical_post_url;
use crate::Tokenizer;
use chrono::{DateTime, NaiveDate, Utc};

/// Distinguishes primary posts from replies and everything else a dump may contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostType {
    Question,
    Answer,
    /// Any other `PostTypeId`, kept verbatim (possibly empty).
    Other(String),
}

impl PostType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            PRIMARY_POST_TYPE_ID => PostType::Question,
            ANSWER_POST_TYPE_ID => PostType::Answer,
            other => PostType::Other(other.to_string()),
        }
    }

    /// Only questions are analyzed.
    pub fn is_primary(&self) -> bool {
        matches!(self, PostType::Question)
    }
}

/// One post of the corpus. Produced by the reader, inspected, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub post_type: PostType,
    pub title: String,
    pub body: String,
    /// Raw tag markup, either `|a|b|` or `<a><b>`.
    pub tags: String,
    pub view_count: ViewCount,
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn is_primary(&self) -> bool {
        self.post_type.is_primary()
    }

    pub fn canonical_url(&self) -> String {
        canonical_post_url(&self.id)
    }

    /// The title with whitespace runs collapsed, as written to reports.
    pub fn normalized_title(&self) -> String {
        Tokenizer::normalize_whitespace(&self.title)
    }

    /// Calendar date of creation, in UTC.
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.map(|created_at| created_at.date_naive())
    }
}
