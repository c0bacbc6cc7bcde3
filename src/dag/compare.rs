// src/dag/compare.rs

//! Structural equality of schedules.
//!
//! Two schedules are equal when their DAGs have the same node ids and edges
//! and, walking a common topological order, each pair of operations does the
//! same thing on equivalent arguments. Arguments produced by operations are
//! equivalent when their producers were matched earlier in the walk; source
//! arguments are matched by content the first time they are seen and must
//! then keep pairing with the same source.

use std::collections::HashMap;

use petgraph::algo::toposort;

use crate::dag::schedule::Schedule;
use crate::types::{HandleId, NodeId};

struct Matcher<'a, T> {
    left: &'a Schedule<T>,
    right: &'a Schedule<T>,
    operations: HashMap<NodeId, NodeId>,
    sources: HashMap<HandleId, HandleId>,
    sources_rev: HashMap<HandleId, HandleId>,
}

impl<'a, T: PartialEq> Matcher<'a, T> {
    fn new(left: &'a Schedule<T>, right: &'a Schedule<T>) -> Self {
        Self {
            left,
            right,
            operations: HashMap::new(),
            sources: HashMap::new(),
            sources_rev: HashMap::new(),
        }
    }

    fn match_node(&mut self, node: NodeId) -> bool {
        let (Some(op1), Some(op2)) = (
            self.left.operations.get(&node),
            self.right.operations.get(&node),
        ) else {
            return false;
        };

        if !op1.is_same_operation(op2) || op1.args().len() != op2.args().len() {
            return false;
        }

        for (a1, a2) in op1.args().iter().zip(op2.args()) {
            if !self.equivalent_args(*a1, *a2) {
                return false;
            }
        }

        self.operations.insert(node, node);
        true
    }

    fn equivalent_args(&mut self, a1: HandleId, a2: HandleId) -> bool {
        let (Some(loc1), Some(loc2)) = (
            self.left.registry.location(a1),
            self.right.registry.location(a2),
        ) else {
            return false;
        };

        match (loc1, loc2) {
            (Some((p1, i1)), Some((p2, i2))) => {
                i1 == i2 && self.operations.get(&p1) == Some(&p2)
            }
            (None, None) => match (self.sources.get(&a1), self.sources_rev.get(&a2)) {
                (Some(m1), Some(m2)) => *m1 == a2 && *m2 == a1,
                (None, None) => {
                    let same = match (
                        self.left.registry.tables.get(&a1),
                        self.right.registry.tables.get(&a2),
                    ) {
                        (Some(h1), Some(h2)) => h1.has_same_content(h2),
                        _ => false,
                    };
                    if same {
                        self.sources.insert(a1, a2);
                        self.sources_rev.insert(a2, a1);
                    }
                    same
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl<T: PartialEq> PartialEq for Schedule<T> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.dag.node_count() != other.dag.node_count() {
            return false;
        }

        let g1 = self.full_dag();
        let g2 = other.full_dag();
        if g1.node_count() != g2.node_count() || g1.edge_count() != g2.edge_count() {
            return false;
        }
        if !g1.nodes().all(|n| g2.contains_node(n)) {
            return false;
        }
        if !g1.all_edges().all(|(a, b, _)| g2.contains_edge(a, b)) {
            return false;
        }

        let Ok(order) = toposort(&g1, None) else {
            return false;
        };

        let mut matcher = Matcher::new(self, other);
        order.into_iter().all(|node| matcher.match_node(node))
    }
}
