use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query string accepted by `GET /api/stock`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct StockQueryParams {
    pub company_name: Option<String>,
    pub symbol: Option<String>,
    pub sort_by: Option<String>,
    pub is_descending: bool,
    #[validate(range(min = 1, message = "Page number must be at least 1"))]
    pub page_number: i64,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i64,
}

impl Default for StockQueryParams {
    fn default() -> Self {
        Self {
            company_name: None,
            symbol: None,
            sort_by: None,
            is_descending: false,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Symbol,
}

impl SortField {
    /// Matches a field name case-insensitively. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        if name.trim().eq_ignore_ascii_case("symbol") {
            Some(SortField::Symbol)
        } else {
            None
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Symbol => "symbol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSort {
    pub field: SortField,
    pub descending: bool,
}

/// One page of a listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// Everything a stock listing can ask for: substring filters, an optional
/// sort and the page to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQuery {
    pub company_name: Option<String>,
    pub symbol: Option<String>,
    pub sort: Option<StockSort>,
    pub page: Page,
}

impl Default for StockQuery {
    fn default() -> Self {
        StockQueryParams::default().into()
    }
}

impl From<StockQueryParams> for StockQuery {
    fn from(params: StockQueryParams) -> Self {
        let sort = params
            .sort_by
            .as_deref()
            .and_then(SortField::parse)
            .map(|field| StockSort {
                field,
                descending: params.is_descending,
            });

        Self {
            company_name: non_blank(params.company_name),
            symbol: non_blank(params.symbol),
            sort,
            page: Page {
                number: params.page_number,
                size: params.page_size.min(MAX_PAGE_SIZE),
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with the LIKE
/// metacharacters in the needle escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
