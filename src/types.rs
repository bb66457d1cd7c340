//! Core types for the drive sharing service.

/// ResourceId: Identifier assigned to a resource by the storage provider
pub type ResourceId = String;

/// Root label for resources carrying no parent reference at all
pub const SHARED_WITH_ME: &str = "Shared with me";

/// Root label for resources whose parent is absent from the listing
pub const MY_DRIVE: &str = "My Drive";
