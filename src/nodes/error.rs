use thiserror::Error;

use super::{ExternalKey, NodeId};

/// Referential errors raised by the [`NodeRegistry`](super::NodeRegistry).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("{0} is already registered")]
    DuplicateIdentifier(ExternalKey),
}
