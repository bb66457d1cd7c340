//! Sharing service facade.
//!
//! Ties the gateway, forest construction, subtree resolution, and batch
//! transfer together behind the three public operations. Every operation is
//! request-scoped: the forest and id sets live only for one call.

use crate::error::SharingError;
use crate::gateway::DriveGateway;
use crate::hierarchy::build_forest;
use crate::resource::{ResourceRecord, SearchHit};
use crate::subtree::resolve_descendants;
use crate::transfer::{self, TransferReport};
use crate::validation::is_valid_email;
use std::sync::Arc;
use tracing::info;

pub struct SharingService {
    gateway: Arc<dyn DriveGateway>,
}

impl SharingService {
    pub fn new(gateway: Arc<dyn DriveGateway>) -> Self {
        SharingService { gateway }
    }

    /// List the account's resources as a forest of root records.
    ///
    /// There may be multiple roots depending on the folder structure at the
    /// drive; resources without a resolvable parent anchor under synthetic
    /// roots.
    pub async fn list_files(&self) -> Result<Vec<ResourceRecord>, SharingError> {
        let records = self.gateway.list_all_resources().await?;
        Ok(build_forest(records))
    }

    /// Transfer ownership of `file_id` and its whole subtree to
    /// `new_owner_email`.
    ///
    /// Refuses to start unless the id is non-empty, the email is well-formed,
    /// and the requester owns the top-level target. Descendants owned by
    /// other users are skipped, not errors.
    pub async fn change_owner(
        &self,
        file_id: &str,
        new_owner_email: &str,
    ) -> Result<TransferReport, SharingError> {
        info!(file_id, new_owner_email, "request to change owner");

        if file_id.is_empty() {
            return Err(SharingError::InvalidArgument(
                "file id must not be empty".to_string(),
            ));
        }
        if new_owner_email.is_empty() || !is_valid_email(new_owner_email) {
            return Err(SharingError::InvalidArgument(format!(
                "invalid email address: '{}'",
                new_owner_email
            )));
        }
        if !self.gateway.is_owned_by_current_user(file_id).await? {
            return Err(SharingError::PermissionDenied(
                "not the owner of the requested resource".to_string(),
            ));
        }

        let forest = self.list_files().await?;
        let descendants = resolve_descendants(&forest, file_id);

        transfer::transfer_ownership(self.gateway.as_ref(), &descendants, new_owner_email).await
    }

    /// Search resources whose name contains `query`.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<SearchHit>, SharingError> {
        self.gateway.search_by_name(query).await
    }
}
