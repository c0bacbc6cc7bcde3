//! A tiny dense table type used as schedule payload in tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use tablesched::{CombineFn, ProjectFn, Variable};

/// Dense table over an ordered list of variables. Values are stored
/// row-major: the last variable varies fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Potential {
    pub vars: Vec<Variable>,
    pub values: Vec<f64>,
}

impl Potential {
    pub fn new(vars: Vec<Variable>, values: Vec<f64>) -> Self {
        let size: usize = vars.iter().map(|v| v.domain_size).product();
        assert_eq!(size, values.len(), "value count does not match domain size");
        Self { vars, values }
    }

    /// All cells set to `value`.
    pub fn filled(vars: Vec<Variable>, value: f64) -> Self {
        let size: usize = vars.iter().map(|v| v.domain_size).product();
        Self::new(vars, vec![value; size])
    }

    /// Cells numbered 1, 2, 3, ...
    pub fn counting(vars: Vec<Variable>) -> Self {
        let size: usize = vars.iter().map(|v| v.domain_size).product();
        Self::new(vars, (1..=size).map(|i| i as f64).collect())
    }

    fn value_at(&self, assignment: &[(&Variable, usize)]) -> f64 {
        let mut offset = 0;
        for var in &self.vars {
            let pos = assignment
                .iter()
                .find(|(v, _)| *v == var)
                .map(|(_, p)| *p)
                .unwrap_or(0);
            offset = offset * var.domain_size + pos;
        }
        self.values[offset]
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Enumerate every assignment of `vars`, last variable fastest.
fn assignments(vars: &[Variable]) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new()];
    for var in vars {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                (0..var.domain_size).map(move |p| {
                    let mut next = prefix.clone();
                    next.push(p);
                    next
                })
            })
            .collect();
    }
    out
}

/// Pointwise product over the union of both variable lists.
pub fn multiply(a: &Potential, b: &Potential) -> Potential {
    let mut vars = a.vars.clone();
    for v in &b.vars {
        if !vars.contains(v) {
            vars.push(v.clone());
        }
    }

    let values = assignments(&vars)
        .into_iter()
        .map(|positions| {
            let assignment: Vec<(&Variable, usize)> = vars.iter().zip(positions).collect();
            a.value_at(&assignment) * b.value_at(&assignment)
        })
        .collect();

    Potential::new(vars, values)
}

/// Sum out `eliminated`.
pub fn sum_out(a: &Potential, eliminated: &BTreeSet<Variable>) -> Potential {
    let kept: Vec<Variable> = a
        .vars
        .iter()
        .filter(|v| !eliminated.contains(*v))
        .cloned()
        .collect();
    let removed: Vec<Variable> = a
        .vars
        .iter()
        .filter(|v| eliminated.contains(*v))
        .cloned()
        .collect();

    let values = assignments(&kept)
        .into_iter()
        .map(|kept_pos| {
            assignments(&removed)
                .into_iter()
                .map(|removed_pos| {
                    let assignment: Vec<(&Variable, usize)> = kept
                        .iter()
                        .zip(kept_pos.iter().copied())
                        .chain(removed.iter().zip(removed_pos))
                        .collect();
                    a.value_at(&assignment)
                })
                .sum::<f64>()
        })
        .collect();

    Potential::new(kept, values)
}

pub fn multiply_fn() -> CombineFn<Potential> {
    Arc::new(multiply)
}

pub fn sum_out_fn() -> ProjectFn<Potential> {
    Arc::new(sum_out)
}

pub fn var(name: &str, domain_size: usize) -> Variable {
    Variable::new(name, domain_size)
}
