//! Parameters of the list endpoints (`/orders`, `/supplierorders`).

use std::fmt;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Exactly `"ASC"` is ascending. Anything else, including `"asc"`, is
    /// descending.
    pub fn parse_lenient(value: &str) -> Self {
        if value == "ASC" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paging, filtering and sorting for a list call.
///
/// ```
/// use linker_core::ListQuery;
///
/// let query = ListQuery::new()
///     .limit(50)
///     .filter("status", "new")
///     .sort("created_at", "DESC");
/// assert_eq!(query.effective_limit(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: i64,
    pub offset: u64,
    /// Sent as `filters[<key>]=<value>` in insertion order.
    pub filters: Vec<(String, String)>,
    pub sort_column: String,
    pub sort_dir: SortDirection,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: Vec::new(),
            sort_column: DEFAULT_SORT_COLUMN.to_string(),
            sort_dir: SortDirection::Asc,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// A negative limit falls back to `DEFAULT_LIMIT` when the request is built.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    pub fn sort(mut self, column: impl Into<String>, direction: &str) -> Self {
        self.sort_column = column.into();
        self.sort_dir = SortDirection::parse_lenient(direction);
        self
    }

    pub fn effective_limit(&self) -> i64 {
        if self.limit < 0 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }

    /// Query string without the leading `?` and without the API key.
    pub(crate) fn to_query_string(&self) -> String {
        let mut query = format!(
            "limit={}&offset={}&sortCol={}&sortDir={}",
            self.effective_limit(),
            self.offset,
            urlencoding::encode(&self.sort_column),
            self.sort_dir,
        );
        for (key, value) in &self.filters {
            query.push_str(&format!(
                "&filters[{}]={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }
        query
    }
}
