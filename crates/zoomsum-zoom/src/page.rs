//! Pagination cursor for Zoom list endpoints.
//!
//! Zoom splits large result sets across pages linked by `next_page_token`.
//! [`PageCursor`] turns a page-fetch function into a uniform sequence of
//! pages; it is finite and consumed in a single traversal.

use std::future::Future;

use crate::error::ZoomResult;

/// One page of results from a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on this page, in API order.
    pub items: Vec<T>,
    /// Token for the next page. `None` or empty means this was the last page.
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// A page with items and no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }

    /// A page with items and a token for the next page.
    pub fn with_next(items: Vec<T>, next_page_token: impl Into<String>) -> Self {
        Self {
            items,
            next_page_token: Some(next_page_token.into()),
        }
    }
}

/// Cursor over a paginated endpoint.
///
/// `fetch` is called with the page token to request (`None` for the first
/// page) and returns the parsed page. The cursor stops when a page carries
/// no further token. An error from any page ends the traversal; pages
/// already fetched are discarded by [`PageCursor::collect_all`].
pub struct PageCursor<F> {
    fetch: F,
    next_token: Option<String>,
    done: bool,
}

impl<T, F, Fut> PageCursor<F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ZoomResult<Page<T>>>,
{
    /// Creates a cursor positioned before the first page.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            next_token: None,
            done: false,
        }
    }

    /// Fetches the next page, or `None` when the sequence is exhausted.
    pub async fn next_page(&mut self) -> ZoomResult<Option<Vec<T>>> {
        if self.done {
            return Ok(None);
        }

        let page = (self.fetch)(self.next_token.take()).await?;

        match page.next_page_token {
            Some(token) if !token.is_empty() => self.next_token = Some(token),
            _ => self.done = true,
        }

        Ok(Some(page.items))
    }

    /// Drains every remaining page into one Vec, preserving API order.
    pub async fn collect_all(mut self) -> ZoomResult<Vec<T>> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}
