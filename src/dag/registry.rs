// src/dag/registry.rs

//! Handle bookkeeping for a schedule: which tables exist, where they come
//! from, who reads them and who deletes them.

use std::collections::{BTreeMap, BTreeSet};

use crate::table::ScheduleMultiDim;
use crate::types::{HandleId, NodeId};

/// Where a handle's table comes from: `None` for a source, otherwise the
/// producing operation and the index among its results.
pub type Location = Option<(NodeId, usize)>;

/// All per-handle maps, kept in sync by the schedule.
///
/// `tables` is the id ↔ handle bijection: each handle is stored under its own
/// id. Every registered id has an entry in `locations` and `consumers`;
/// `deleters` holds at most one operation per handle.
#[derive(Debug)]
pub(crate) struct Registry<T> {
    pub(crate) tables: BTreeMap<HandleId, ScheduleMultiDim<T>>,
    pub(crate) locations: BTreeMap<HandleId, Location>,
    pub(crate) consumers: BTreeMap<HandleId, BTreeSet<NodeId>>,
    pub(crate) deleters: BTreeMap<HandleId, NodeId>,
}

impl<T> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
            locations: BTreeMap::new(),
            consumers: BTreeMap::new(),
            deleters: BTreeMap::new(),
        }
    }

    pub(crate) fn contains(&self, id: HandleId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Register a handle located at `location`. The caller guarantees the id
    /// is not yet registered.
    pub(crate) fn register(&mut self, handle: ScheduleMultiDim<T>, location: Location) {
        let id = handle.id();
        self.tables.insert(id, handle);
        self.locations.insert(id, location);
        self.consumers.insert(id, BTreeSet::new());
    }

    pub(crate) fn location(&self, id: HandleId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    pub(crate) fn producer(&self, id: HandleId) -> Option<NodeId> {
        self.location(id).flatten().map(|(node, _)| node)
    }

    pub(crate) fn deleter(&self, id: HandleId) -> Option<NodeId> {
        self.deleters.get(&id).copied()
    }

    /// Ids of the handles no operation produced, in id order.
    pub(crate) fn sources(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.locations
            .iter()
            .filter(|(_, loc)| loc.is_none())
            .map(|(id, _)| *id)
    }

    pub(crate) fn clear(&mut self) {
        self.tables.clear();
        self.locations.clear();
        self.consumers.clear();
        self.deleters.clear();
    }
}
