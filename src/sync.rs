//! Profile sync to a remote endpoint.
//!
//! Finishing onboarding pushes a [`ProfileSnapshot`] to the configured
//! endpoint. The push is fire-and-forget from the flow's point of view:
//! completion is already persisted locally before the request starts, and a
//! failed push never rolls it back.

use async_trait::async_trait;
use tracing::debug;

use crate::error::SyncError;
use crate::profile::ProfileSnapshot;

#[async_trait]
pub trait ProfileSync: Send + Sync {
    async fn sync_profile(&self, snapshot: &ProfileSnapshot) -> Result<(), SyncError>;
}

/// Sync target for builds with no remote configured.
pub struct NoopSync;

#[async_trait]
impl ProfileSync for NoopSync {
    async fn sync_profile(&self, _snapshot: &ProfileSnapshot) -> Result<(), SyncError> {
        debug!("Profile sync disabled, skipping push");
        Ok(())
    }
}

/// Pushes snapshots as JSON to an HTTP endpoint.
pub struct HttpProfileSync {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProfileSync {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ProfileSync for HttpProfileSync {
    async fn sync_profile(&self, snapshot: &ProfileSnapshot) -> Result<(), SyncError> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(snapshot)
            .send()
            .await
            .map_err(|e| SyncError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SyncError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint = %self.endpoint, "Profile snapshot pushed");
        Ok(())
    }
}
