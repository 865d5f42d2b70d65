//! Continuation-token pagination.
//!
//! Every list endpoint the tool calls returns a page of items plus an
//! optional `nextPageToken`. `fetch_all` drives any such source until the
//! token runs out and hands back the concatenated items.

use crate::error::ApiError;
use async_trait::async_trait;
use tracing::debug;

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    /// Token to request next, treating an empty string as "no more pages".
    fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Something that can return one page at a time.
#[async_trait]
pub trait PageSource<T: Send>: Sync {
    async fn fetch_page(&self, page_token: Option<&str>) -> Result<Page<T>, ApiError>;
}

/// Fetch every page from `source`.
///
/// A failure on any page aborts the whole fetch; partial results are never
/// returned. Items are not de-duplicated across pages.
pub async fn fetch_all<T, S>(source: &S) -> Result<Vec<T>, ApiError>
where
    T: Send,
    S: PageSource<T> + ?Sized,
{
    fetch_all_with(source, |_, _| {}).await
}

/// Like `fetch_all`, calling `on_page(pages_so_far, items_so_far)` after each page.
pub async fn fetch_all_with<T, S, F>(source: &S, mut on_page: F) -> Result<Vec<T>, ApiError>
where
    T: Send,
    S: PageSource<T> + ?Sized,
    F: FnMut(usize, usize),
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0;

    loop {
        let page = source.fetch_page(token.as_deref()).await?;
        pages += 1;

        let next = page.continuation().map(String::from);
        items.extend(page.items);
        on_page(pages, items.len());
        debug!("Fetched page {} ({} items so far)", pages, items.len());

        match next {
            Some(t) => token = Some(t),
            None => return Ok(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    /// Serves canned pages and records the tokens it was asked for.
    struct ScriptedSource {
        pages: Vec<Result<Page<u32>, u16>>,
        requested: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Page<u32>, u16>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<Option<String>> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource<u32> for ScriptedSource {
        async fn fetch_page(&self, page_token: Option<&str>) -> Result<Page<u32>, ApiError> {
            let mut requested = self.requested.lock().unwrap();
            let index = requested.len();
            requested.push(page_token.map(String::from));

            match self.pages.get(index) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(status)) => Err(ApiError::from_status(*status, "scripted failure")),
                None => panic!("source asked for page {} past the script", index),
            }
        }
    }

    fn page(items: &[u32], token: &str) -> Result<Page<u32>, u16> {
        Ok(Page::new(items.to_vec(), Some(token.to_string())))
    }

    #[tokio::test]
    async fn test_follows_tokens_until_empty() {
        let source = ScriptedSource::new(vec![
            page(&[1, 2], "a"),
            page(&[3], "b"),
            page(&[4, 5], ""),
        ]);

        let items = assert_ok!(fetch_all(&source).await);

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            source.requested(),
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_token_ends_fetch() {
        let source = ScriptedSource::new(vec![Ok(Page::new(vec![7], None))]);
        let items = assert_ok!(fetch_all(&source).await);
        assert_eq!(items, vec![7]);
        assert_eq!(source.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_pages_are_followed() {
        let source = ScriptedSource::new(vec![page(&[], "next"), page(&[9], "")]);
        let items = assert_ok!(fetch_all(&source).await);
        assert_eq!(items, vec![9]);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_without_partial_results() {
        let source = ScriptedSource::new(vec![page(&[1, 2], "a"), Err(503), page(&[3], "")]);

        let err = assert_err!(fetch_all(&source).await);

        assert!(err.is_transient());
        assert_eq!(source.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_are_kept() {
        let source = ScriptedSource::new(vec![page(&[1], "a"), page(&[1], "")]);
        let items = assert_ok!(fetch_all(&source).await);
        assert_eq!(items, vec![1, 1]);
    }

    #[tokio::test]
    async fn test_progress_callback() {
        let source = ScriptedSource::new(vec![page(&[1, 2], "a"), page(&[3], "")]);
        let mut seen = Vec::new();
        assert_ok!(fetch_all_with(&source, |pages, items| seen.push((pages, items))).await);
        assert_eq!(seen, vec![(1, 2), (2, 3)]);
    }
}
