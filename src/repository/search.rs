//! Paged, filtered, ordered retrieval shared by every backend.
//!
//! Backends must agree on these rules exactly:
//!
//! 1. A non-empty `search` keeps categories whose name contains it, ignoring
//!    ASCII case (SQLite `LIKE` semantics).
//! 2. Results are ordered by the requested key, then by id ascending so that
//!    page boundaries are deterministic.
//! 3. `total` counts filtered rows before paging.
//! 4. A page skips `(page - 1) * per_page` rows and takes up to `per_page`.
//! 5. `page` and `per_page` are echoed back unchanged.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::ValidationError;

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    #[default]
    Asc,
    Desc,
}

impl SearchOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Display for SearchOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for SearchOrder {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::InvalidValue(format!(
                "sort direction: {other}"
            ))),
        }
    }
}

/// Field a search is ordered by.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrderBy {
    #[default]
    Name,
    Id,
    CreatedAt,
}

impl SearchOrderBy {
    /// Parses a field name, case-insensitively. Unknown or empty names order
    /// by name.
    pub fn parse(field: &str) -> Self {
        match field.trim().to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "createdat" | "created_at" => Self::CreatedAt,
            _ => Self::Name,
        }
    }
}

impl From<&str> for SearchOrderBy {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Query accepted by `CategoryReader::search_categories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    /// Free-text name filter; empty means no filter.
    pub search: String,
    pub order_by: SearchOrderBy,
    pub order: SearchOrder,
}

impl SearchInput {
    /// Builds a validated query.
    pub fn new(
        page: usize,
        per_page: usize,
        search: impl Into<String>,
        order_by: SearchOrderBy,
        order: SearchOrder,
    ) -> Result<Self, ValidationError> {
        let input = Self {
            page,
            per_page,
            search: search.into(),
            order_by,
            order,
        };
        input.validate()?;
        Ok(input)
    }

    /// Unfiltered query ordered by name ascending.
    pub fn page(page: usize, per_page: usize) -> Result<Self, ValidationError> {
        Self::new(page, per_page, "", SearchOrderBy::Name, SearchOrder::Asc)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page < 1 {
            return Err(ValidationError::InvalidValue(
                "page must be at least 1".to_string(),
            ));
        }
        if self.per_page < 1 {
            return Err(ValidationError::InvalidValue(
                "per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of matching rows that precede the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// The filter text, or `None` when the search is empty or only
    /// whitespace. A non-blank filter is used as given, untrimmed.
    pub fn filter(&self) -> Option<&str> {
        if self.search.trim().is_empty() {
            None
        } else {
            Some(self.search.as_str())
        }
    }

    /// Returns `true` when `category` passes the text filter.
    pub fn matches(&self, category: &Category) -> bool {
        match self.filter() {
            None => true,
            Some(search) => category
                .name()
                .to_ascii_lowercase()
                .contains(&search.to_ascii_lowercase()),
        }
    }

    /// Ordering of two categories under this query, id breaking ties.
    pub fn compare(&self, a: &Category, b: &Category) -> Ordering {
        let primary = match self.order_by {
            SearchOrderBy::Name => a.name().as_str().cmp(b.name().as_str()),
            SearchOrderBy::Id => a.id().cmp(&b.id()),
            SearchOrderBy::CreatedAt => a.created_at().cmp(&b.created_at()),
        };
        let primary = match self.order {
            SearchOrder::Asc => primary,
            SearchOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }

    /// Runs the full filter/order/count/page pipeline over an in-memory set.
    pub fn apply<'a, I>(&self, categories: I) -> SearchOutput<Category>
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let mut matching: Vec<&Category> =
            categories.into_iter().filter(|c| self.matches(c)).collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(self.offset())
            .take(self.per_page)
            .cloned()
            .collect();

        SearchOutput {
            page: self.page,
            per_page: self.per_page,
            total,
            items,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutput<T> {
    pub page: usize,
    pub per_page: usize,
    /// Rows matching the filter, ignoring paging.
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> SearchOutput<T> {
    /// Converts every item, keeping order and paging metadata.
    pub fn map<U, F>(self, f: F) -> SearchOutput<U>
    where
        F: FnMut(T) -> U,
    {
        SearchOutput {
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
