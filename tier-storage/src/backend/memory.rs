//! In-Memory Container Backend
//!
//! Ordered, fixed-page-size container held in memory. Supports fault
//! injection (failing pages, failing objects) and exposes call counters,
//! which makes it the backend of choice for tests and demos.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tier_core::{AccessTier, ObjectDescriptor, TransitionAck};
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{BackendType, ObjectPage, PageFetcher, TierContainer, TierMutator};
use crate::error::{MutationError, MutationResult, StorageError, StorageResult};

const TOKEN_PREFIX: &str = "offset:";

#[derive(Debug, Clone)]
struct MemoryObject {
    descriptor: ObjectDescriptor,
    /// Set while an archived object is rehydrating
    rehydrating_to: Option<AccessTier>,
}

/// In-memory container
pub struct MemoryContainer {
    name: String,
    page_size: usize,
    objects: RwLock<Vec<MemoryObject>>,
    failing_pages: HashSet<usize>,
    failing_objects: HashSet<String>,
    mutation_latency: Option<Duration>,
    mutation_log: RwLock<Vec<(String, AccessTier)>>,
    fetch_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryContainer {
    /// Create an empty container
    pub fn new(name: &str, page_size: usize) -> Self {
        Self {
            name: name.to_string(),
            page_size: page_size.max(1),
            objects: RwLock::new(Vec::new()),
            failing_pages: HashSet::new(),
            failing_objects: HashSet::new(),
            mutation_latency: None,
            mutation_log: RwLock::new(Vec::new()),
            fetch_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a container holding `objects` in listing order
    pub fn with_objects(name: &str, page_size: usize, objects: Vec<ObjectDescriptor>) -> Self {
        let container = Self::new(name, page_size);
        let stored = objects
            .into_iter()
            .map(|descriptor| MemoryObject {
                descriptor,
                rehydrating_to: None,
            })
            .collect();
        Self {
            objects: RwLock::new(stored),
            ..container
        }
    }

    /// Fail the fetch of page `page_index` (zero-based)
    pub fn fail_page(mut self, page_index: usize) -> Self {
        self.failing_pages.insert(page_index);
        self
    }

    /// Reject every tier change on `object_name`
    pub fn fail_object(mut self, object_name: &str) -> Self {
        self.failing_objects.insert(object_name.to_string());
        self
    }

    /// Delay every tier change by `latency`
    pub fn with_mutation_latency(mut self, latency: Duration) -> Self {
        self.mutation_latency = Some(latency);
        self
    }

    /// Number of page fetches issued
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of tier changes requested
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    /// Highest number of tier changes observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Tier changes requested, in call order
    pub async fn mutation_log(&self) -> Vec<(String, AccessTier)> {
        self.mutation_log.read().await.clone()
    }

    /// Current listed tier of an object
    pub async fn tier_of(&self, object_name: &str) -> Option<AccessTier> {
        self.objects
            .read()
            .await
            .iter()
            .find(|o| o.descriptor.name == object_name)
            .map(|o| o.descriptor.current_tier)
    }

    /// Finish every rehydration in flight
    pub async fn complete_rehydrations(&self) -> usize {
        let mut objects = self.objects.write().await;
        let mut completed = 0;
        for object in objects.iter_mut() {
            if let Some(target) = object.rehydrating_to.take() {
                object.descriptor.current_tier = target;
                completed += 1;
            }
        }
        completed
    }

    fn parse_token(token: Option<&str>) -> StorageResult<usize> {
        match token {
            None | Some("") => Ok(0),
            Some(t) => t
                .strip_prefix(TOKEN_PREFIX)
                .and_then(|offset| offset.parse().ok())
                .ok_or_else(|| StorageError::InvalidContinuation(t.to_string())),
        }
    }

    async fn apply_tier(&self, object_name: &str, target: AccessTier) -> MutationResult<TransitionAck> {
        if self.failing_objects.contains(object_name) {
            return Err(MutationError::Rejected(format!(
                "injected failure for {}",
                object_name
            )));
        }

        if !target.is_stable() {
            return Err(MutationError::InvalidTarget {
                object: object_name.to_string(),
                tier: target.to_string(),
            });
        }

        let mut objects = self.objects.write().await;
        let object = objects
            .iter_mut()
            .find(|o| o.descriptor.name == object_name)
            .ok_or_else(|| MutationError::NotFound(object_name.to_string()))?;

        if object.rehydrating_to.is_some() {
            return Err(MutationError::Conflict {
                object: object_name.to_string(),
                reason: "rehydration in progress".to_string(),
            });
        }

        if object.descriptor.current_tier.is_archival() && !target.is_archival() {
            object.rehydrating_to = Some(target);
            return Ok(TransitionAck::Pending);
        }

        object.descriptor.current_tier = target;
        Ok(TransitionAck::Applied)
    }
}

#[async_trait]
impl PageFetcher for MemoryContainer {
    async fn fetch(&self, continuation: Option<&str>) -> StorageResult<ObjectPage> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let offset = Self::parse_token(continuation)?;
        let page_index = offset / self.page_size;
        if self.failing_pages.contains(&page_index) {
            return Err(StorageError::Unavailable(format!(
                "injected failure on page {}",
                page_index
            )));
        }

        let objects = self.objects.read().await;
        let end = (offset + self.page_size).min(objects.len());
        let batch: Vec<_> = objects
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|o| o.descriptor.clone())
            .collect();

        debug!(container = %self.name, offset, count = batch.len(), "Listing page");

        if end < objects.len() {
            Ok(ObjectPage::with_next(batch, format!("{}{}", TOKEN_PREFIX, end)))
        } else {
            Ok(ObjectPage::last(batch))
        }
    }
}

#[async_trait]
impl TierMutator for MemoryContainer {
    async fn set_tier(&self, object_name: &str, target: AccessTier) -> MutationResult<TransitionAck> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_log
            .write()
            .await
            .push((object_name.to_string(), target));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.mutation_latency {
            tokio::time::sleep(latency).await;
        }

        let result = self.apply_tier(object_name, target).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl TierContainer for MemoryContainer {
    fn container_name(&self) -> &str {
        &self.name
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(count: usize) -> Vec<ObjectDescriptor> {
        (0..count)
            .map(|i| ObjectDescriptor::new(format!("blob{:03}", i), AccessTier::Hot))
            .collect()
    }

    #[tokio::test]
    async fn test_paging() {
        let container = MemoryContainer::with_objects("c", 2, sample(5));

        let first = container.fetch(None).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("offset:2"));

        let last = container.fetch(Some("offset:4")).await.unwrap();
        assert_eq!(last.objects.len(), 1);
        assert!(last.is_last());
    }

    #[tokio::test]
    async fn test_empty_container_single_page() {
        let container = MemoryContainer::new("c", 10);
        let page = container.fetch(None).await.unwrap();
        assert!(page.objects.is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let container = MemoryContainer::with_objects("c", 2, sample(3));
        assert!(matches!(
            container.fetch(Some("bogus")).await,
            Err(StorageError::InvalidContinuation(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_page_failure() {
        let container = MemoryContainer::with_objects("c", 2, sample(5)).fail_page(1);
        assert!(container.fetch(None).await.is_ok());
        assert!(container.fetch(Some("offset:2")).await.is_err());
        assert_eq!(container.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_archive_exit_is_pending_until_completed() {
        let container = MemoryContainer::with_objects(
            "c",
            10,
            vec![ObjectDescriptor::new("a", AccessTier::Archive)],
        );

        let ack = container.set_tier("a", AccessTier::Hot).await.unwrap();
        assert_eq!(ack, TransitionAck::Pending);
        assert_eq!(container.tier_of("a").await, Some(AccessTier::Archive));

        // Second change while rehydrating conflicts
        assert!(matches!(
            container.set_tier("a", AccessTier::Cool).await,
            Err(MutationError::Conflict { .. })
        ));

        assert_eq!(container.complete_rehydrations().await, 1);
        assert_eq!(container.tier_of("a").await, Some(AccessTier::Hot));
    }

    #[tokio::test]
    async fn test_mutation_errors() {
        let container = MemoryContainer::with_objects("c", 10, sample(1)).fail_object("blob000");

        assert!(matches!(
            container.set_tier("blob000", AccessTier::Cool).await,
            Err(MutationError::Rejected(_))
        ));
        assert!(matches!(
            container.set_tier("missing", AccessTier::Cool).await,
            Err(MutationError::NotFound(_))
        ));
        assert_eq!(container.mutation_calls(), 2);
    }
}
