use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Raw `page` / `limit` query parameters. Kept as strings so that junk input
/// falls back to defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A clamped page request. Only [`parse_pagination`] can build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
    skip: u64,
}

impl Pagination {
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }
}

impl Default for Pagination {
    fn default() -> Self {
        parse_pagination(&PaginationQuery::default())
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// page floors at 1, limit clamps to `1..=100`, skip is `(page - 1) * limit`.
pub fn parse_pagination(query: &PaginationQuery) -> Pagination {
    let page = parse_number(query.page.as_deref())
        .map(|p| p.max(1) as u64)
        .unwrap_or(DEFAULT_PAGE);
    let limit = parse_number(query.limit.as_deref())
        .map(|l| l.clamp(1, MAX_LIMIT as i64) as u64)
        .unwrap_or(DEFAULT_LIMIT);

    Pagination {
        page,
        limit,
        skip: (page - 1).saturating_mul(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(page: Option<&str>, limit: Option<&str>) -> (u64, u64, u64) {
        let p = parse_pagination(&PaginationQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        });
        (p.page(), p.limit(), p.skip())
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(None, None), (1, 10, 0));
        assert_eq!(Pagination::default().limit(), 10);
    }

    #[test]
    fn page_floors_at_one() {
        assert_eq!(parse(Some("0"), None).0, 1);
        assert_eq!(parse(Some("-5"), None).0, 1);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(parse(None, Some("1000")).1, 100);
        assert_eq!(parse(None, Some("0")).1, 1);
        assert_eq!(parse(None, Some("-3")).1, 1);
    }

    #[test]
    fn skip_from_page_and_limit() {
        assert_eq!(parse(Some("3"), Some("20")), (3, 20, 40));
    }

    #[test]
    fn junk_falls_back_to_defaults() {
        assert_eq!(parse(Some("abc"), Some("ten")), (1, 10, 0));
        assert_eq!(parse(Some(""), Some("2.5")), (1, 10, 0));
        assert_eq!(parse(Some(" 2 "), None), (2, 10, 10));
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let (_, _, skip) = parse(Some(&i64::MAX.to_string()), Some("100"));
        assert_eq!(skip, u64::MAX);
    }
}
