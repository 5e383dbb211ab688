//! Object Enumerator
//!
//! Turns a paginated container listing into one lazy sequence of
//! [`ObjectDescriptor`]s. Pages are fetched only when the consumer has
//! drained the previous one, so a sweep can start working on early
//! objects while the rest of a large container is still unlisted.
//!
//! Continuation tokens never leave this module. An enumerator is single
//! pass: once exhausted (or failed) it stays that way, and a second pass
//! means building a new enumerator, which re-issues the listing from the
//! start.

use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::Arc;
use tier_core::ObjectDescriptor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::PageFetcher;
use crate::error::{EnumerationError, EnumerationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    /// Next fetch is the first page
    NotStarted,
    /// A continuation token is waiting to be followed
    HasMore,
    /// Listing exhausted
    Exhausted,
    /// Listing failed or was cancelled
    Stopped,
}

/// Pull-based cursor over a container listing
pub struct ObjectEnumerator<F: PageFetcher + ?Sized> {
    fetcher: Arc<F>,
    buffer: VecDeque<ObjectDescriptor>,
    next_token: Option<String>,
    state: CursorState,
    pages_fetched: usize,
    objects_listed: usize,
    cancel: CancellationToken,
}

impl<F: PageFetcher + ?Sized> ObjectEnumerator<F> {
    /// Start a new listing; nothing is fetched until the first `next()`
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            buffer: VecDeque::new(),
            next_token: None,
            state: CursorState::NotStarted,
            pages_fetched: 0,
            objects_listed: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop fetching pages once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Descriptors handed out so far
    pub fn objects_listed(&self) -> usize {
        self.objects_listed
    }

    /// Descriptors fetched but not handed out
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the listing ended without error
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted && self.buffer.is_empty()
    }

    /// Advance to the next descriptor
    ///
    /// Returns `None` once the listing is exhausted. A fetch failure or a
    /// cancellation is returned once as `Some(Err(_))`, after which the
    /// enumerator yields `None`. Cancellation also stops a partly consumed
    /// page unless it is the last one; what it leaves behind is counted by
    /// [`buffered`](Self::buffered).
    pub async fn next(&mut self) -> Option<EnumerationResult<ObjectDescriptor>> {
        loop {
            match self.state {
                CursorState::Stopped => return None,
                CursorState::NotStarted | CursorState::HasMore if self.cancel.is_cancelled() => {
                    debug!(buffered = self.buffer.len(), "Listing cancelled");
                    self.state = CursorState::Stopped;
                    return Some(Err(self.cancelled()));
                }
                _ => {}
            }

            if let Some(descriptor) = self.buffer.pop_front() {
                self.objects_listed += 1;
                return Some(Ok(descriptor));
            }

            if self.state == CursorState::Exhausted {
                return None;
            }

            if let Err(e) = self.fetch_next_page().await {
                self.state = CursorState::Stopped;
                return Some(Err(e));
            }
        }
    }

    /// Drain the whole listing into memory
    ///
    /// Intended for small containers and tests; sweeps use `next()`.
    pub async fn collect_all(mut self) -> EnumerationResult<Vec<ObjectDescriptor>> {
        let mut objects = Vec::new();
        while let Some(item) = self.next().await {
            objects.push(item?);
        }
        Ok(objects)
    }

    /// Adapt into a `Stream` of descriptors
    pub fn into_stream(self) -> impl Stream<Item = EnumerationResult<ObjectDescriptor>> {
        stream::unfold(self, |mut enumerator| async move {
            enumerator.next().await.map(|item| (item, enumerator))
        })
    }

    async fn fetch_next_page(&mut self) -> EnumerationResult<()> {
        let page_index = self.pages_fetched;
        let token = self.next_token.take();

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.fetcher.fetch(token.as_deref()) => Some(result),
        };

        let page = match fetched {
            None => {
                warn!(page_index, "Listing cancelled while fetching page");
                return Err(self.cancelled());
            }
            Some(Err(source)) => {
                warn!(page_index, error = %source, "Page fetch failed");
                return Err(EnumerationError::PageFetch {
                    page_index,
                    continuation_token: token,
                    objects_listed: self.objects_listed,
                    source,
                });
            }
            Some(Ok(page)) => page,
        };

        self.pages_fetched += 1;
        let is_last = page.is_last();

        debug!(
            page_index,
            batch = page.objects.len(),
            has_more = !is_last,
            "Fetched listing page"
        );

        self.buffer.extend(page.objects);
        if is_last {
            self.state = CursorState::Exhausted;
        } else {
            self.next_token = page.next_token;
            self.state = CursorState::HasMore;
        }

        Ok(())
    }

    fn cancelled(&self) -> EnumerationError {
        EnumerationError::Cancelled {
            pages_fetched: self.pages_fetched,
            objects_listed: self.objects_listed,
        }
    }
}
