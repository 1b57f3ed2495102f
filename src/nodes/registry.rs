use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use crate::domain::Period;

use super::{ExternalKey, Node, NodeId, NodeKind, RegistryError};

/// Owns canonical identity and attributes for every node.
///
/// # Internal Structure
/// - `nodes`: `HashMap` from node id to its attributes
/// - `by_key`: `HashMap` from external key to node id
/// - `periods`: `BTreeMap` keeping period nodes in start-date order
///
/// There is no way to change a node's attributes once registered; a changed
/// fact is a new node.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<NodeId, Node>,
    by_key: HashMap<ExternalKey, NodeId>,
    periods: BTreeMap<Period, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registers a new node.
    ///
    /// # Errors
    ///
    /// `DuplicateIdentifier` if a node with the same external key exists.
    pub fn register(&mut self, node: Node) -> Result<NodeId, RegistryError> {
        let key = node.external_key();
        match self.by_key.entry(key) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateIdentifier(key)),
            Entry::Vacant(slot) => {
                let id = NodeId::next();
                slot.insert(id);
                if let Node::Period(period) = &node {
                    self.periods.insert(*period, id);
                }
                self.nodes.insert(id, node);
                Ok(id)
            }
        }
    }

    /// Registers `node` unless the identical fact is already present, in which
    /// case the existing id is returned.
    ///
    /// # Errors
    ///
    /// `DuplicateIdentifier` if the external key is taken by a node with
    /// different attributes.
    pub fn ensure(&mut self, node: Node) -> Result<NodeId, RegistryError> {
        let key = node.external_key();
        match self.by_key.get(&key) {
            Some(&id) if self.nodes.get(&id) == Some(&node) => Ok(id),
            Some(_) => Err(RegistryError::DuplicateIdentifier(key)),
            None => self.register(node),
        }
    }

    pub fn lookup(&self, id: NodeId) -> Result<&Node, RegistryError> {
        self.nodes.get(&id).ok_or(RegistryError::NodeNotFound(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn resolve_external_key(&self, key: &ExternalKey) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Period node ids in start-date order.
    pub fn periods(&self) -> impl Iterator<Item = (Period, NodeId)> + '_ {
        self.periods.iter().map(|(period, id)| (*period, *id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.iter().filter(move |(_, node)| node.kind() == kind)
    }

    /// Removes a node. The container checks incidence before calling this.
    pub(crate) fn remove(&mut self, id: NodeId) -> Result<Node, RegistryError> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or(RegistryError::NodeNotFound(id))?;
        self.by_key.remove(&node.external_key());
        if let Node::Period(period) = &node {
            self.periods.remove(period);
        }
        Ok(node)
    }
}
