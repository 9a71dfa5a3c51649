//! Uniform success envelope and pagination wrapper.
//!
//! Every 2xx body is `{ success, status, message, data }`; list endpoints
//! put a `Page` into `data`. The error counterpart lives in `error.rs`.

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub status: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    /// 200 response with the standard envelope.
    pub fn ok(message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(StatusCode::OK, message, data))
    }

    /// 201 response with the standard envelope.
    pub fn created(message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::new(StatusCode::CREATED, message, data))
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };
        Self {
            items,
            page,
            limit,
            total_items,
            total_pages,
        }
    }
}

/// Page/limit query parameters shared by list endpoints.
///
/// Pages are 1-based; limit is clamped to 1..=100 so a client cannot ask
/// for the whole table at once.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_defaults() {
        let p = PageParams {
            page: None,
            limit: None,
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn page_params_clamp_limit_and_page() {
        let p = PageParams {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 100);

        let p = PageParams {
            page: Some(-3),
            limit: Some(0),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn page_params_offset() {
        let p = PageParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<i32> = Page::new(vec![], 1, 10, 31);
        assert_eq!(page.total_pages, 4);

        let page: Page<i32> = Page::new(vec![], 1, 10, 30);
        assert_eq!(page.total_pages, 3);

        let page: Page<i32> = Page::new(vec![], 1, 10, 0);
        assert_eq!(page.total_pages, 0);
    }
}
