use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::builders::{EdgeBuilder, ValidatedEdge};
use crate::config::GraphConfig;
use crate::edges::{EdgeId, EdgeKind, Hyperedge};
use crate::nodes::{Node, NodeId};

use super::{GraphError, ScheduleGraph};

/// Shared handle over one [`ScheduleGraph`]: many concurrent readers, one
/// writer at a time.
///
/// Validation runs under the read lock; the write lock is held only to
/// insert, and to retire the old edge of a replacement. If another writer
/// committed in between, the edge is stale and is validated again, up to
/// [`GraphConfig::max_commit_attempts`] times in total.
///
/// A poisoned lock means a writer panicked halfway through a mutation; the
/// graph can no longer be trusted and every accessor panics.
///
/// # Examples
///
/// ```
/// use std::thread;
///
/// use chrono::NaiveDate;
/// use schedule_hypergraph::nodes::{Node, WorkOrderNode};
/// use schedule_hypergraph::{ExcludeBuilder, SharedScheduleGraph};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
/// let graph = SharedScheduleGraph::default();
/// let period = graph.write().ingest_periods(&[start]).unwrap()[0];
/// let work_orders: Vec<_> = (0..4)
///     .map(|i| {
///         let node = Node::WorkOrder(WorkOrderNode::new(2000000000 + i, start));
///         graph.register(node).unwrap()
///     })
///     .collect();
///
/// let handles: Vec<_> = work_orders
///     .into_iter()
///     .map(|work_order| {
///         let graph = graph.clone();
///         thread::spawn(move || {
///             graph
///                 .commit(&ExcludeBuilder::new(work_order).period(period))
///                 .unwrap()
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     let edge = handle.join().unwrap();
///     assert!(graph.read().contains_edge(edge));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedScheduleGraph {
    inner: Arc<RwLock<ScheduleGraph>>,
}

impl SharedScheduleGraph {
    pub fn new(graph: ScheduleGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn with_config(config: GraphConfig) -> Result<Self, GraphError> {
        Ok(Self::new(ScheduleGraph::with_config(config)?))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ScheduleGraph> {
        self.inner.read().expect("schedule graph lock poisoned")
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ScheduleGraph> {
        self.inner.write().expect("schedule graph lock poisoned")
    }

    /// Validates `builder` and commits the edge.
    ///
    /// # Errors
    ///
    /// Any validation error, or `CommitContention` when every attempt lost
    /// the race to another writer.
    pub fn commit<B: EdgeBuilder + ?Sized>(&self, builder: &B) -> Result<EdgeId, GraphError> {
        self.commit_validated(builder.kind(), |graph| Ok(builder.build(graph)?))
    }

    /// Swaps `old` for the edge `builder` produces.
    ///
    /// Validation runs under the read lock like [`commit`](Self::commit);
    /// the write lock covers only the retire and insert.
    pub fn replace<B: EdgeBuilder + ?Sized>(
        &self,
        old: EdgeId,
        builder: &B,
    ) -> Result<EdgeId, GraphError> {
        self.commit_validated(builder.kind(), |graph| {
            graph.validate_replacement(old, builder)
        })
    }

    fn commit_validated(
        &self,
        kind: EdgeKind,
        validate: impl Fn(&ScheduleGraph) -> Result<ValidatedEdge, GraphError>,
    ) -> Result<EdgeId, GraphError> {
        let attempts = self.read().config().max_commit_attempts;
        for attempt in 1..=attempts {
            let edge = {
                let graph = self.read();
                validate(&*graph)?
            };
            match self.write().insert(edge) {
                Err(GraphError::StaleEdge { built_at, current }) => {
                    warn!(
                        attempt,
                        built_at,
                        current,
                        %kind,
                        "edge went stale before commit, revalidating"
                    );
                }
                Ok(id) => {
                    debug!(edge = %id, attempt, "edge committed");
                    return Ok(id);
                }
                Err(error) => return Err(error),
            }
        }
        Err(GraphError::CommitContention { attempts })
    }

    pub fn register(&self, node: Node) -> Result<NodeId, GraphError> {
        Ok(self.write().register(node)?)
    }

    pub fn retire(&self, id: EdgeId) -> Result<Hyperedge, GraphError> {
        self.write().retire(id)
    }
}
