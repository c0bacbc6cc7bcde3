// src/table/multidim.rs

use crate::types::{HandleId, Variable, domain_size};

/// A handle on a table, either materialized or abstract.
///
/// A *source* handle is registered by the caller and must carry a table. A
/// *result* handle is created by the schedule when an operation is inserted;
/// it stays abstract (variables known, no table) until the operation is
/// completed.
///
/// `Clone` keeps the id: a clone is a distinct object standing for the same
/// table, which is what a copied schedule needs. Use [`ScheduleMultiDim::duplicate`]
/// for an independent handle with a fresh id.
#[derive(Debug, Clone)]
pub struct ScheduleMultiDim<T> {
    id: HandleId,
    variables: Vec<Variable>,
    table: Option<T>,
}

impl<T> ScheduleMultiDim<T> {
    /// A materialized handle with a fresh id.
    pub fn new(table: T, variables: Vec<Variable>) -> Self {
        Self {
            id: HandleId::fresh(),
            variables,
            table: Some(table),
        }
    }

    /// An abstract handle: shape only, no content.
    pub fn new_abstract(variables: Vec<Variable>) -> Self {
        Self::with_id(HandleId::fresh(), variables, None)
    }

    pub(crate) fn with_id(id: HandleId, variables: Vec<Variable>, table: Option<T>) -> Self {
        Self {
            id,
            variables,
            table,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn table(&self) -> Option<&T> {
        self.table.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.table.is_none()
    }

    /// Number of cells a table over these variables holds.
    pub fn domain_size(&self) -> u64 {
        domain_size(&self.variables)
    }

    pub(crate) fn set_table(&mut self, table: T) {
        self.table = Some(table);
    }

    pub(crate) fn take_table(&mut self) -> Option<T> {
        self.table.take()
    }
}

impl<T: Clone> ScheduleMultiDim<T> {
    /// An equivalent handle with a fresh id.
    pub fn duplicate(&self) -> Self {
        Self::with_id(HandleId::fresh(), self.variables.clone(), self.table.clone())
    }
}

impl<T: PartialEq> ScheduleMultiDim<T> {
    /// Structural equality: same variables in the same order and equal
    /// content. Ids are ignored.
    pub fn has_same_content(&self, other: &Self) -> bool {
        self.variables == other.variables && self.table == other.table
    }
}
