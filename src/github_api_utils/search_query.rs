use crate::trending_window::DateRange;

/// Results requested per window. Windows with more matches than this are cut
/// to the most starred ones, never paginated further.
pub const PAGE_SIZE: u32 = 25;
pub const SORT_KEY: &str = "stars";
pub const SORT_ORDER: &str = "desc";

/// Query parameters of one `GET /search/repositories` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub sort: &'static str,
    pub order: &'static str,
    pub per_page: u32,
}

impl SearchQuery {
    /// `language:<l>` for every language, then the `created:` range.
    pub fn for_window<S: AsRef<str>>(languages: &[S], range: &DateRange) -> Self {
        let mut qualifiers: Vec<String> = languages
            .iter()
            .map(|language| format!("language:{}", language.as_ref()))
            .collect();
        qualifiers.push(range.created_qualifier());
        Self {
            q: qualifiers.join(" "),
            sort: SORT_KEY,
            order: SORT_ORDER,
            per_page: PAGE_SIZE,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.q.clone()),
            ("sort", self.sort.to_owned()),
            ("order", self.order.to_owned()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}
