//! Local Filesystem Container Backend
//!
//! Implements [`TierContainer`] over a directory. Every regular file in
//! `<root>/<container>/` is an object; its tier is kept in a JSON sidecar
//! under `<root>/<container>/.tiers/`. A file without a sidecar has never
//! had a tier set and lists as `Unknown`.
//!
//! Moving an object out of Archive is modelled as a rehydration: the
//! sidecar records the requested tier and start time, the object keeps
//! listing as Archive until `rehydration_delay` has elapsed, and any tier
//! change requested meanwhile is rejected with a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tier_core::{AccessTier, ObjectDescriptor, TransitionAck};
use tokio::fs;
use tracing::{debug, info, warn};

use super::traits::{BackendType, ObjectPage, PageFetcher, TierContainer, TierMutator};
use crate::config::{EnvironmentConfig, DEFAULT_PAGE_SIZE};
use crate::error::{MutationError, MutationResult, StorageError, StorageResult};

/// Sidecar directory name inside a container
const TIER_DIR: &str = ".tiers";

/// Upper bound keeping the delay representable as a chrono duration
const MAX_REHYDRATION_DELAY_SECS: u64 = 365 * 24 * 3600;

/// Local container configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalContainerConfig {
    /// Storage root holding containers
    pub root: PathBuf,
    /// Container directory name under `root`
    pub container: String,
    /// Objects per listing page
    pub page_size: usize,
    /// Only list objects whose name starts with this prefix
    pub prefix: Option<String>,
    /// Time an Archive exit takes to become visible (seconds)
    pub rehydration_delay_secs: u64,
}

impl LocalContainerConfig {
    /// Create a config with default page size and a one hour rehydration
    pub fn new(root: impl Into<PathBuf>, container: &str) -> Self {
        Self {
            root: root.into(),
            container: container.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            prefix: None,
            rehydration_delay_secs: 3600,
        }
    }

    /// Build from an environment config
    pub fn from_environment(env: &EnvironmentConfig) -> StorageResult<Self> {
        Ok(Self::new(env.local_root()?, &env.container_name))
    }

    /// Set page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set listing prefix
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Set rehydration delay
    pub fn with_rehydration_delay_secs(mut self, secs: u64) -> Self {
        self.rehydration_delay_secs = secs;
        self
    }
}

/// Persisted tier state of one object
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TierRecord {
    tier: AccessTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rehydrate_to: Option<AccessTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rehydration_started_at: Option<DateTime<Utc>>,
    changed_at: DateTime<Utc>,
}

impl TierRecord {
    fn settled(tier: AccessTier) -> Self {
        Self {
            tier,
            rehydrate_to: None,
            rehydration_started_at: None,
            changed_at: Utc::now(),
        }
    }

    fn rehydrating(target: AccessTier) -> Self {
        let now = Utc::now();
        Self {
            tier: AccessTier::Archive,
            rehydrate_to: Some(target),
            rehydration_started_at: Some(now),
            changed_at: now,
        }
    }
}

/// Local filesystem container
pub struct LocalContainer {
    /// Container directory
    container_path: PathBuf,
    /// Sidecar directory
    tier_path: PathBuf,
    /// Configuration
    config: LocalContainerConfig,
}

impl LocalContainer {
    /// Open an existing container directory
    pub async fn open(config: LocalContainerConfig) -> StorageResult<Self> {
        if config.page_size == 0 {
            return Err(StorageError::Configuration(
                "page_size must be at least 1".to_string(),
            ));
        }
        validate_name(&config.container)
            .map_err(|_| StorageError::Configuration(format!("invalid container name {:?}", config.container)))?;

        let container_path = config.root.join(&config.container);
        if !fs::try_exists(&container_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(format!(
                "container {:?}",
                container_path
            )));
        }

        let tier_path = container_path.join(TIER_DIR);
        fs::create_dir_all(&tier_path).await.map_err(|e| {
            StorageError::Backend(format!("Failed to create directory {:?}: {}", tier_path, e))
        })?;

        info!("Opened local container at {:?}", container_path);

        Ok(Self {
            container_path,
            tier_path,
            config,
        })
    }

    /// Container directory
    pub fn path(&self) -> &Path {
        &self.container_path
    }

    fn rehydration_delay(&self) -> Duration {
        Duration::seconds(self.config.rehydration_delay_secs.min(MAX_REHYDRATION_DELAY_SECS) as i64)
    }

    fn object_path(&self, name: &str) -> PathBuf {
        self.container_path.join(name)
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.tier_path.join(format!("{}.json", name))
    }

    /// Sorted object names matching the prefix
    async fn object_names(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.container_path).await.map_err(|e| {
            StorageError::Unavailable(format!("Failed to list {:?}: {}", self.container_path, e))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::Unavailable(format!("Failed to read entry: {}", e)))?
        {
            // An unlistable name would otherwise drop out of every sweep unseen
            let name = entry.file_name().into_string().map_err(|raw| {
                warn!(name = %raw.to_string_lossy(), "Object name is not UTF-8");
                StorageError::Backend(format!(
                    "Object name {:?} in {:?} is not valid UTF-8",
                    raw, self.container_path
                ))
            })?;
            if name.starts_with('.') {
                continue;
            }
            if let Some(prefix) = &self.config.prefix {
                if !name.starts_with(prefix.as_str()) {
                    continue;
                }
            }
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    async fn load_record(&self, name: &str) -> StorageResult<Option<TierRecord>> {
        let path = self.record_path(name);
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Backend(format!(
                    "Failed to read tier record for {}: {}",
                    name, e
                )))
            }
        };

        serde_json::from_str(&json).map(Some).map_err(|e| {
            StorageError::Backend(format!("Failed to parse tier record for {}: {}", name, e))
        })
    }

    async fn save_record(&self, name: &str, record: &TierRecord) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(record).map_err(|e| {
            StorageError::Backend(format!("Failed to serialize tier record: {}", e))
        })?;

        fs::write(self.record_path(name), json).await.map_err(|e| {
            StorageError::Backend(format!("Failed to write tier record for {}: {}", name, e))
        })
    }

    /// Load a record, completing its rehydration if the delay has passed
    async fn current_record(&self, name: &str) -> StorageResult<Option<TierRecord>> {
        let Some(mut record) = self.load_record(name).await? else {
            return Ok(None);
        };

        if let (Some(target), Some(started)) = (record.rehydrate_to, record.rehydration_started_at) {
            if Utc::now() - started >= self.rehydration_delay() {
                debug!(object = name, tier = %target, "Rehydration complete");
                record = TierRecord::settled(target);
                self.save_record(name, &record).await?;
            }
        }

        Ok(Some(record))
    }

    async fn describe(&self, name: &str) -> StorageResult<ObjectDescriptor> {
        let tier = self
            .current_record(name)
            .await?
            .map(|r| r.tier)
            .unwrap_or(AccessTier::Unknown);

        let mut descriptor = ObjectDescriptor::new(name, tier);
        if let Ok(meta) = fs::metadata(self.object_path(name)).await {
            descriptor.size_bytes = Some(meta.len());
            descriptor.last_modified = meta.modified().ok().map(DateTime::<Utc>::from);
        }
        Ok(descriptor)
    }
}

fn validate_name(name: &str) -> MutationResult<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(MutationError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[async_trait]
impl PageFetcher for LocalContainer {
    async fn fetch(&self, continuation: Option<&str>) -> StorageResult<ObjectPage> {
        let names = self.object_names().await?;

        // Token is the last name of the previous page
        let start = match continuation.filter(|t| !t.is_empty()) {
            None => 0,
            Some(after) => names.partition_point(|n| n.as_str() <= after),
        };
        let end = (start + self.config.page_size).min(names.len());

        let mut objects = Vec::with_capacity(end.saturating_sub(start));
        for name in names.get(start..end).unwrap_or_default() {
            objects.push(self.describe(name).await?);
        }

        debug!(
            container = %self.config.container,
            start,
            count = objects.len(),
            "Listing page"
        );

        match objects.last() {
            Some(last) if end < names.len() => {
                let token = last.name.clone();
                Ok(ObjectPage::with_next(objects, token))
            }
            _ => Ok(ObjectPage::last(objects)),
        }
    }
}

#[async_trait]
impl TierMutator for LocalContainer {
    async fn set_tier(&self, object_name: &str, target: AccessTier) -> MutationResult<TransitionAck> {
        validate_name(object_name)?;

        if !target.is_stable() {
            return Err(MutationError::InvalidTarget {
                object: object_name.to_string(),
                tier: target.to_string(),
            });
        }

        if !fs::try_exists(self.object_path(object_name)).await.unwrap_or(false) {
            return Err(MutationError::NotFound(object_name.to_string()));
        }

        let record = self
            .current_record(object_name)
            .await
            .map_err(|e| MutationError::Transport(e.to_string()))?;

        if let Some(TierRecord {
            rehydrate_to: Some(pending),
            ..
        }) = &record
        {
            return Err(MutationError::Conflict {
                object: object_name.to_string(),
                reason: format!("rehydration to {} in progress", pending),
            });
        }

        let current = record.map(|r| r.tier).unwrap_or(AccessTier::Unknown);
        let leaving_archive = current.is_archival() && !target.is_archival();

        let (record, ack) = if leaving_archive && self.config.rehydration_delay_secs > 0 {
            (TierRecord::rehydrating(target), TransitionAck::Pending)
        } else {
            (TierRecord::settled(target), TransitionAck::Applied)
        };

        self.save_record(object_name, &record)
            .await
            .map_err(|e| MutationError::Transport(e.to_string()))?;

        debug!(object = object_name, from = %current, to = %target, ?ack, "Tier set");
        Ok(ack)
    }
}

impl TierContainer for LocalContainer {
    fn container_name(&self) -> &str {
        &self.config.container
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Local
    }
}
