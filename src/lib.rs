//! Driveshare: Drive Hierarchy Browsing and Subtree Ownership Transfer
//!
//! Rebuilds a remote storage account's resource hierarchy from the provider's
//! flat listing and transfers ownership of whole subtrees as a single batched
//! operation.

pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod hierarchy;
pub mod logging;
pub mod resource;
pub mod service;
pub mod subtree;
pub mod tooling;
pub mod transfer;
pub mod types;
pub mod validation;
