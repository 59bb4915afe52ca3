//! pagination helpers
//!
//! page/limit walker for the list operations that report a total count.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// page selector sent with list requests; `page` is zero based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// a single page of list results
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// items of this page
    pub items: Vec<T>,
    /// total number of items across all pages
    pub total: usize,
}

/// walks pages until the reported total is reached
pub struct Paginator<T, Fetch>
where
    Fetch: FnMut(Pagination) -> Result<Page<T>>,
{
    fetch: Fetch,
    limit: u32,
    page: u32,
    seen: usize,
    done: bool,
}

impl<T, Fetch> Paginator<T, Fetch>
where
    Fetch: FnMut(Pagination) -> Result<Page<T>>,
{
    /// create a new paginator fetching `limit` items per page
    pub fn new(limit: u32, fetch: Fetch) -> Self {
        Self {
            fetch,
            limit,
            page: 0,
            seen: 0,
            done: false,
        }
    }

    /// fetch the next page of results
    pub fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        if self.limit == 0 {
            return Err(Error::validation("page size must be greater than zero"));
        }
        if self.done {
            return Ok(None);
        }

        let page = (self.fetch)(Pagination {
            page: self.page,
            limit: self.limit,
        })?;

        self.page += 1;
        self.seen += page.items.len();

        // a short page also ends the walk, in case the total is stale
        if page.items.len() < self.limit as usize || self.seen >= page.total {
            self.done = true;
        }

        Ok(Some(page.items))
    }

    /// fetch all pages and return a single collection
    pub fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page()? {
            items.extend(page);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_collect_all() {
        let mut requested = Vec::new();
        let data: Vec<i32> = (1..=5).collect();

        let paginator = Paginator::new(2, |pagination: Pagination| {
            requested.push(pagination.page);
            let start = (pagination.page * pagination.limit) as usize;
            let end = (start + pagination.limit as usize).min(data.len());
            Ok(Page {
                items: data[start..end].to_vec(),
                total: data.len(),
            })
        });

        let items = paginator.collect_all().unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(requested, vec![0, 1, 2]);
    }

    #[test]
    fn test_pagination_stops_on_exact_total() {
        let mut calls = 0;
        let paginator = Paginator::new(2, |_| {
            calls += 1;
            Ok(Page {
                items: vec!["a", "b"],
                total: 2,
            })
        });
        assert_eq!(paginator.collect_all().unwrap(), vec!["a", "b"]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_pagination_next_page_done() {
        let mut paginator = Paginator::new(10, |_| {
            Ok(Page {
                items: vec![42],
                total: 1,
            })
        });
        let page = paginator.next_page().unwrap();
        assert_eq!(page.unwrap(), vec![42]);
        let none = paginator.next_page().unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_pagination_zero_limit_is_rejected() {
        let mut paginator = Paginator::new(0, |_| -> Result<Page<i32>> {
            panic!("fetch must not run")
        });
        let err = paginator.next_page().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_pagination_propagates_fetch_error() {
        let paginator = Paginator::new(5, |_| -> Result<Page<i32>> {
            Err(Error::GraphQl {
                message: "nope".to_string(),
            })
        });
        assert!(paginator.collect_all().is_err());
    }
}
