#![allow(dead_code)]

use std::collections::BTreeMap;

use tablesched::{HandleId, Schedule, ScheduleOptions, Variable};

use crate::potential::Potential;

/// Builder registering named source tables into a fresh schedule.
pub struct ScheduleBuilder {
    schedule: Schedule<Potential>,
    handles: BTreeMap<String, HandleId>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::with_options(ScheduleOptions::default())
    }

    pub fn with_options(options: ScheduleOptions) -> Self {
        Self {
            schedule: Schedule::with_options(options),
            handles: BTreeMap::new(),
        }
    }

    /// Register a counting table over `vars` under `name`.
    pub fn source(self, name: &str, vars: &[Variable]) -> Self {
        let table = Potential::counting(vars.to_vec());
        self.with_table(name, table)
    }

    pub fn with_table(mut self, name: &str, table: Potential) -> Self {
        let vars = table.vars.clone();
        let id = self
            .schedule
            .insert_table(table, vars, None)
            .expect("failed to register source table");
        self.handles.insert(name.to_string(), id);
        self
    }

    pub fn build(self) -> (Schedule<Potential>, SourceIds) {
        (self.schedule, SourceIds(self.handles))
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Name → handle id lookup returned by [`ScheduleBuilder::build`].
#[derive(Debug, Clone)]
pub struct SourceIds(BTreeMap<String, HandleId>);

impl SourceIds {
    pub fn get(&self, name: &str) -> HandleId {
        *self
            .0
            .get(name)
            .unwrap_or_else(|| panic!("no source named {name}"))
    }
}

impl std::ops::Index<&str> for SourceIds {
    type Output = HandleId;

    fn index(&self, name: &str) -> &HandleId {
        self.0
            .get(name)
            .unwrap_or_else(|| panic!("no source named {name}"))
    }
}
