use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use bh_core::ports::{IdentityCacheError, IdentityCachePort};
use bh_core::PackageIdentity;

/// On-disk form of the cached identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIdentity {
    pub package_id: String,
    pub entry_component: Option<String>,
    pub staged_at: DateTime<Utc>,
}

pub struct JsonIdentityCache {
    path: PathBuf,
}

impl JsonIdentityCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn load_entry(&self) -> Result<Option<CachedIdentity>, IdentityCacheError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let entry: CachedIdentity = serde_json::from_str(&content)
            .map_err(|err| IdentityCacheError::Corrupt(err.to_string()))?;
        Ok(Some(entry))
    }
}

#[async_trait]
impl IdentityCachePort for JsonIdentityCache {
    async fn load(&self) -> Result<Option<PackageIdentity>, IdentityCacheError> {
        Ok(self.load_entry().await?.and_then(|entry| {
            if entry.package_id.is_empty() {
                return None;
            }
            Some(PackageIdentity::new(entry.package_id, entry.entry_component))
        }))
    }

    async fn store(&self, identity: &PackageIdentity) -> Result<(), IdentityCacheError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let entry = CachedIdentity {
            package_id: identity.package_id.clone(),
            entry_component: identity.entry_component.clone(),
            staged_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|err| IdentityCacheError::Corrupt(err.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), package_id = %identity.package_id, "identity cached");
        Ok(())
    }

    async fn clear(&self) -> Result<(), IdentityCacheError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
