//! Batch ownership transfer over a resolved descendant set.
//!
//! Ownership is re-checked per resource: a descendant owned by another user
//! is skipped, never an error. Item failures reported by the provider inside
//! a successfully submitted batch do not abort sibling mutations; they are
//! logged and aggregated into the report.

use crate::error::SharingError;
use crate::gateway::{BatchItemOutcome, DriveGateway};
use crate::types::ResourceId;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{error, info};

/// Owner checks in flight at once. Checks are independent, so they are
/// issued concurrently; results stay paired with their ids.
const OWNER_CHECK_CONCURRENCY: usize = 8;

/// Aggregated outcome of one subtree ownership transfer.
///
/// The operation as a whole succeeded if this report exists at all;
/// `failed` records items the provider rejected inside the batch.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    /// Email address of the new owner.
    pub new_owner: String,

    /// Ids granted to the new owner, with the provider's permission id.
    pub transferred: Vec<TransferredItem>,

    /// Ids skipped because the requester does not own them.
    pub skipped: Vec<ResourceId>,

    /// Ids the provider rejected inside the otherwise-successful batch.
    pub failed: Vec<FailedItem>,

    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferredItem {
    pub id: ResourceId,
    pub permission_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedItem {
    pub id: ResourceId,
    pub reason: String,
}

/// Transfer ownership of every id in `ids` to `new_owner_email`.
///
/// Ids are checked for ownership individually and only enqueued once their
/// own check has passed; passing ids are submitted as one batch. Transport
/// failures during checks or submission are fatal for the whole operation.
pub async fn transfer_ownership(
    gateway: &dyn DriveGateway,
    ids: &[ResourceId],
    new_owner_email: &str,
) -> Result<TransferReport, SharingError> {
    let checks: Vec<(ResourceId, bool)> = stream::iter(ids.iter().cloned())
        .map(|id| async move {
            let owned = gateway.is_owned_by_current_user(&id).await?;
            Ok::<_, SharingError>((id, owned))
        })
        .buffered(OWNER_CHECK_CONCURRENCY)
        .try_collect()
        .await?;

    let mut eligible = Vec::new();
    let mut skipped = Vec::new();
    for (id, owned) in checks {
        if owned {
            eligible.push(id);
        } else {
            skipped.push(id);
        }
    }

    info!(
        eligible = eligible.len(),
        skipped = skipped.len(),
        "submitting ownership batch"
    );
    let outcomes = gateway
        .submit_ownership_batch(&eligible, new_owner_email)
        .await?;

    let mut transferred = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome {
            BatchItemOutcome::Granted {
                file_id,
                permission_id,
            } => {
                info!(%file_id, %permission_id, "ownership transferred");
                transferred.push(TransferredItem {
                    id: file_id,
                    permission_id,
                });
            }
            BatchItemOutcome::Failed { file_id, reason } => {
                error!(%file_id, %reason, "failure in transferring ownership");
                failed.push(FailedItem {
                    id: file_id,
                    reason,
                });
            }
        }
    }

    Ok(TransferReport {
        new_owner: new_owner_email.to_string(),
        transferred,
        skipped,
        failed,
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceRecord, SearchHit};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Gateway stub where ownership is a fixed set and batches echo a
    /// scripted failure list.
    struct ScriptedGateway {
        owned: HashSet<String>,
        failing: HashSet<String>,
        submitted: Mutex<Vec<Vec<ResourceId>>>,
    }

    impl ScriptedGateway {
        fn new(owned: &[&str], failing: &[&str]) -> Self {
            ScriptedGateway {
                owned: owned.iter().map(|s| s.to_string()).collect(),
                failing: failing.iter().map(|s| s.to_string()).collect(),
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DriveGateway for ScriptedGateway {
        async fn list_all_resources(&self) -> Result<Vec<ResourceRecord>, SharingError> {
            Ok(Vec::new())
        }

        async fn is_owned_by_current_user(&self, id: &str) -> Result<bool, SharingError> {
            Ok(self.owned.contains(id))
        }

        async fn submit_ownership_batch(
            &self,
            ids: &[ResourceId],
            _new_owner_email: &str,
        ) -> Result<Vec<BatchItemOutcome>, SharingError> {
            self.submitted.lock().unwrap().push(ids.to_vec());
            Ok(ids
                .iter()
                .map(|id| {
                    if self.failing.contains(id) {
                        BatchItemOutcome::Failed {
                            file_id: id.clone(),
                            reason: "insufficient permissions".to_string(),
                        }
                    } else {
                        BatchItemOutcome::Granted {
                            file_id: id.clone(),
                            permission_id: format!("perm-{id}"),
                        }
                    }
                })
                .collect())
        }

        async fn search_by_name(&self, _query: &str) -> Result<Vec<SearchHit>, SharingError> {
            Ok(Vec::new())
        }
    }

    fn ids(raw: &[&str]) -> Vec<ResourceId> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn only_owned_ids_are_submitted() {
        let gateway = ScriptedGateway::new(&["a", "c"], &[]);

        let report = transfer_ownership(&gateway, &ids(&["a", "b", "c"]), "new@example.com")
            .await
            .unwrap();

        let submitted = gateway.submitted.lock().unwrap();
        assert_eq!(submitted.as_slice(), &[ids(&["a", "c"])]);
        assert_eq!(report.skipped, ids(&["b"]));
        assert_eq!(report.transferred.len(), 2);
    }

    #[tokio::test]
    async fn item_failures_are_aggregated_not_fatal() {
        let gateway = ScriptedGateway::new(&["a", "b"], &["b"]);

        let report = transfer_ownership(&gateway, &ids(&["a", "b"]), "new@example.com")
            .await
            .unwrap();

        assert_eq!(report.transferred.len(), 1);
        assert_eq!(report.transferred[0].id, "a");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, "b");
        assert_eq!(report.failed[0].reason, "insufficient permissions");
    }

    #[tokio::test]
    async fn empty_eligible_set_still_reports() {
        let gateway = ScriptedGateway::new(&[], &[]);

        let report = transfer_ownership(&gateway, &ids(&["a"]), "new@example.com")
            .await
            .unwrap();

        assert!(report.transferred.is_empty());
        assert_eq!(report.skipped, ids(&["a"]));
    }

    #[tokio::test]
    async fn batch_order_follows_descendant_order() {
        let gateway = ScriptedGateway::new(&["r", "x", "y", "z"], &[]);

        transfer_ownership(&gateway, &ids(&["r", "x", "y", "z"]), "new@example.com")
            .await
            .unwrap();

        let submitted = gateway.submitted.lock().unwrap();
        assert_eq!(submitted.as_slice(), &[ids(&["r", "x", "y", "z"])]);
    }
}
