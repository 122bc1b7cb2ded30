//! Page arithmetic derived from `totalResults`, `start` and `rows`.

use super::{Document, Response};

impl<D: Document> Response<D> {
    pub fn limit_value(&self) -> i64 {
        self.rows().max(0)
    }

    /// Offset of the first document; an unknown start reads as 0.
    pub fn offset_value(&self) -> i64 {
        self.start().max(0)
    }

    pub fn current_page(&self) -> i64 {
        let limit = self.limit_value();
        if limit == 0 {
            return 1;
        }
        (self.offset_value() / limit).saturating_add(1)
    }

    pub fn total_pages(&self) -> i64 {
        let limit = self.limit_value();
        if limit == 0 {
            return 0;
        }
        let total = self.total().max(0) as u64;
        total.div_ceil(limit as u64) as i64
    }

    pub fn next_page(&self) -> Option<i64> {
        let current = self.current_page();
        if current < self.total_pages() { Some(current.saturating_add(1)) } else { None }
    }

    pub fn prev_page(&self) -> Option<i64> {
        let current = self.current_page();
        if current > 1 { Some(current - 1) } else { None }
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page() == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page() >= self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use common::api_params::{ApiParams, ParamValue};

    use crate::api::response::Response;

    fn response(total: i64, start: i64, rows: i64) -> Response {
        let params: ApiParams = [("start", ParamValue::Int(start)), ("rows", ParamValue::Int(rows))]
            .into_iter()
            .collect();
        Response::new(serde_json::json!({"totalResults": total}), params)
    }

    #[test]
    fn test_middle_page() {
        let page = response(95, 21, 10);
        assert_eq!(page.offset_value(), 20);
        assert_eq!(page.current_page(), 3);
        assert_eq!(page.total_pages(), 10);
        assert_eq!(page.next_page(), Some(4));
        assert_eq!(page.prev_page(), Some(2));
        assert!(!page.is_first_page());
        assert!(!page.is_last_page());
    }

    #[test]
    fn test_first_and_last_page() {
        let first = response(95, 1, 10);
        assert!(first.is_first_page());
        assert_eq!(first.prev_page(), None);

        let last = response(95, 91, 10);
        assert!(last.is_last_page());
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn test_unknown_paging() {
        let page: Response = Response::new(serde_json::json!({"totalResults": 5}), ApiParams::new());
        assert_eq!(page.offset_value(), 0);
        assert_eq!(page.limit_value(), 0);
        assert_eq!(page.current_page(), 1);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_last_page());
    }

    #[test]
    fn test_huge_total_does_not_overflow() {
        let page = response(i64::MAX, 1, 10);
        assert_eq!(page.total_pages(), i64::MAX / 10 + 1);
        assert_eq!(page.next_page(), Some(2));

        let page = response(i64::MAX, i64::MAX, 1);
        assert_eq!(page.current_page(), i64::MAX);
        assert!(page.is_last_page());
    }

    #[test]
    fn test_malformed_echoed_start() {
        let page: Response = Response::new(
            serde_json::json!({"totalResults": 100, "params": {"start": "-9223372036854775808", "rows": "10"}}),
            ApiParams::new(),
        );
        assert_eq!(page.start(), i64::MIN);
        assert_eq!(page.offset_value(), 0);
        assert_eq!(page.current_page(), 1);
    }
}
