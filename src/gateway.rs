//! Storage provider gateway contract.

pub mod http;

pub use http::HttpDriveGateway;

use crate::error::SharingError;
use crate::resource::{ResourceRecord, SearchHit};
use crate::types::ResourceId;
use async_trait::async_trait;

/// Outcome of one permission mutation inside a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItemOutcome {
    /// The ownership grant was applied; carries the provider's opaque
    /// permission id.
    Granted {
        file_id: ResourceId,
        permission_id: String,
    },
    /// The provider rejected this item. Sibling items are unaffected.
    Failed { file_id: ResourceId, reason: String },
}

/// Gateway to the storage provider.
///
/// Async because every operation is a network call. Implementations page
/// through provider listings transparently and return flattened results.
#[async_trait]
pub trait DriveGateway: Send + Sync {
    /// Complete flat listing of every resource in the account.
    async fn list_all_resources(&self) -> Result<Vec<ResourceRecord>, SharingError>;

    /// Whether the authenticated user owns the resource.
    async fn is_owned_by_current_user(&self, id: &str) -> Result<bool, SharingError>;

    /// Submit one batch of ownership-transfer mutations.
    ///
    /// Returns one outcome per submitted id. An `Err` means the submission
    /// itself failed before any item outcome was known.
    async fn submit_ownership_batch(
        &self,
        ids: &[ResourceId],
        new_owner_email: &str,
    ) -> Result<Vec<BatchItemOutcome>, SharingError>;

    /// Resources whose display name contains `query`.
    async fn search_by_name(&self, query: &str) -> Result<Vec<SearchHit>, SharingError>;
}
