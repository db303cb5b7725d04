use crate::constants::QUESTIONS_PER_PAGE;
use serde::Deserialize;

/// Raw `?page=` query. Kept as a string so junk values fall back to page 1
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
}

impl Page {
    /// `None` for page numbers below 1, which can never hold questions.
    pub fn from_query(query: &PageQuery) -> Option<Self> {
        let number = query
            .page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(1);
        (number >= 1).then_some(Self { number })
    }

    pub fn limit(&self) -> i64 {
        QUESTIONS_PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(QUESTIONS_PER_PAGE)
    }
}
