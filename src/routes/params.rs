use serde::Deserialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Returns `(page, limit, offset)` with a 1-based page.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = (page - 1).saturating_mul(limit);
        (page, limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        assert_eq!(Pagination::default().normalize(), (1, 10, 0));
    }

    #[test]
    fn computes_offset_from_page() {
        assert_eq!(Pagination::new(3, 20).normalize(), (3, 20, 40));
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Pagination::new(0, 0).normalize(), (1, 1, 0));
        assert_eq!(Pagination::new(-4, 500).normalize(), (1, MAX_LIMIT, 0));
    }

    #[test]
    fn huge_page_saturates_offset() {
        let (page, limit, offset) = Pagination::new(i64::MAX, 100).normalize();
        assert_eq!(page, i64::MAX);
        assert_eq!(limit, 100);
        assert_eq!(offset, i64::MAX);
    }
}
