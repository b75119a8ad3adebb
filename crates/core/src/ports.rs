//! Port interfaces implemented by the infrastructure layer

use async_trait::async_trait;

use partsync_domain::{PropertyUpdate, ResolvedReference, Result};

/// Applies property updates to a remote part.
///
/// The single seam between the orchestrator and the signed transport;
/// tests substitute a mock, production wires the Onshape API client.
#[async_trait]
pub trait PartMetadataClient: Send + Sync {
    /// Update metadata for the referenced part.
    async fn update_part_metadata(
        &self,
        reference: &ResolvedReference,
        properties: &[PropertyUpdate],
    ) -> Result<()>;
}
