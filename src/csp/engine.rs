//! Backtracking search with MRV variable ordering and LCV value ordering.
//!
//! # Algorithm
//! 1. If every variable is assigned, return the assignment.
//! 2. Select the unassigned variable with the fewest values consistent with
//!    the current partial assignment (MRV, first found on ties).
//! 3. Try its values ordered by how few options they remove from other
//!    unassigned variables (LCV).
//! 4. Recurse on each consistent extension; undo and count a backtrack on
//!    failure.
//!
//! The search is bounded only by an iteration budget. Running out of budget
//! and exhausting the space both end without an assignment, but are
//! reported as different [`SearchStatus`] values.
//!
//! # Complexity
//! LCV costs O(d² · n · c) per node, where d = domain size, n = variables,
//! c = constraints; it runs only for the decision variable at each node.
//!
//! # Reference
//! Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach", Ch. 6.3

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{Assignment, CspConstraint, VarIndex};

/// Outcome of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// A complete, consistent assignment was found.
    Solved,
    /// Every branch was explored; no assignment satisfies all constraints.
    Exhausted,
    /// The iteration budget ran out before the search finished.
    BudgetExceeded,
}

impl SearchStatus {
    /// Whether a solution was found.
    pub fn is_solved(self) -> bool {
        self == Self::Solved
    }

    /// Human-readable description.
    pub fn message(self) -> &'static str {
        match self {
            Self::Solved => "Found an assignment satisfying all constraints",
            Self::Exhausted => "No assignment satisfies all constraints",
            Self::BudgetExceeded => "Iteration budget exhausted before a solution was found",
        }
    }
}

/// Search counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search nodes visited.
    pub iterations: u64,
    /// Bindings undone after a failed subtree.
    pub backtracks: u64,
}

/// Result of [`CspEngine::backtracking_search`].
#[derive(Debug, Clone)]
pub struct SearchResult<V> {
    /// How the search ended.
    pub status: SearchStatus,
    /// Variable id → value. Present only when `status` is `Solved`.
    pub assignment: Option<HashMap<String, V>>,
    /// Counters, reported for every status.
    pub stats: SearchStats,
}

impl<V> SearchResult<V> {
    /// Whether a solution was found.
    pub fn is_solved(&self) -> bool {
        self.status.is_solved()
    }
}

enum Step {
    Found,
    Failed,
    Aborted,
}

/// A finite-domain constraint satisfaction engine.
///
/// Variables are added first, then constraints that reference them by
/// index. The engine owns its partial assignment; after a `Solved` search
/// [`assignment`](Self::assignment) holds the solution until the next run.
///
/// # Example
/// ```
/// use u_flightslot::csp::{Assignment, CspConstraint, CspEngine};
///
/// let mut engine = CspEngine::new();
/// let a = engine.add_variable("a", vec![1, 2, 3]);
/// let b = engine.add_variable("b", vec![1, 2, 3]);
/// engine.add_constraint(CspConstraint::new("a<b", vec![a, b], move |s: &Assignment<i32>| {
///     match (s.get(a), s.get(b)) {
///         (Some(x), Some(y)) => x < y,
///         _ => true,
///     }
/// }));
///
/// let result = engine.backtracking_search(100);
/// assert!(result.is_solved());
/// let solution = result.assignment.unwrap();
/// assert!(solution["a"] < solution["b"]);
/// ```
pub struct CspEngine<V> {
    variables: Vec<String>,
    domains: Vec<Vec<V>>,
    constraints: Vec<CspConstraint<V>>,
    constraints_by_var: Vec<Vec<usize>>,
    assignment: Assignment<V>,
    stats: SearchStats,
}

impl<V: Copy + PartialEq + fmt::Debug> CspEngine<V> {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            domains: Vec::new(),
            constraints: Vec::new(),
            constraints_by_var: Vec::new(),
            assignment: Assignment::new(0),
            stats: SearchStats::default(),
        }
    }

    /// Adds a variable with its candidate values, returning its index.
    pub fn add_variable(&mut self, id: impl Into<String>, domain: Vec<V>) -> VarIndex {
        let index = self.variables.len();
        self.variables.push(id.into());
        self.domains.push(domain);
        self.constraints_by_var.push(Vec::new());
        self.assignment = Assignment::new(self.variables.len());
        index
    }

    /// Adds a constraint and indexes it under each variable in its scope.
    ///
    /// Scope entries that do not name an existing variable are dropped.
    pub fn add_constraint(&mut self, constraint: CspConstraint<V>) {
        let index = self.constraints.len();
        for &var in constraint.scope() {
            match self.constraints_by_var.get_mut(var) {
                Some(list) => list.push(index),
                None => log::warn!(
                    "Constraint '{}' references unknown variable {var}",
                    constraint.name()
                ),
            }
        }
        self.constraints.push(constraint);
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Candidate values of a variable, or `None` for an unknown index.
    pub fn domain(&self, var: VarIndex) -> Option<&[V]> {
        self.domains.get(var).map(Vec::as_slice)
    }

    /// The current (partial) assignment.
    pub fn assignment(&self) -> &Assignment<V> {
        &self.assignment
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Whether every variable has a value.
    pub fn is_complete(&self) -> bool {
        self.assignment.is_complete()
    }

    /// Binds a value directly, bypassing consistency checks.
    pub fn assign(&mut self, var: VarIndex, value: V) {
        self.assignment.bind(var, value);
    }

    /// Clears a variable.
    pub fn unassign(&mut self, var: VarIndex) {
        self.assignment.unbind(var);
    }

    /// Whether `var = value` is consistent with the current assignment.
    ///
    /// Only constraints whose scope includes `var` are checked. The
    /// assignment is restored before returning.
    pub fn is_consistent(&mut self, var: VarIndex, value: V) -> bool {
        let snapshot = self.assignment.bind(var, value);
        let consistent = self.constraints_hold_for(var);
        self.assignment.restore(var, snapshot);
        consistent
    }

    /// Number of domain values of `var` consistent with the current assignment.
    pub fn filtered_domain_size(&mut self, var: VarIndex) -> usize {
        let mut count = 0;
        for i in 0..self.domains[var].len() {
            let value = self.domains[var][i];
            if self.is_consistent(var, value) {
                count += 1;
            }
        }
        count
    }

    /// Minimum-remaining-values choice among unassigned variables.
    ///
    /// Ties go to the lowest index. `None` when everything is assigned.
    pub fn select_unassigned_variable(&mut self) -> Option<VarIndex> {
        let mut best: Option<(usize, VarIndex)> = None;
        for var in 0..self.variables.len() {
            if self.assignment.is_assigned(var) {
                continue;
            }
            let size = self.filtered_domain_size(var);
            match best {
                Some((best_size, _)) if size >= best_size => {}
                _ => best = Some((size, var)),
            }
        }
        best.map(|(_, var)| var)
    }

    /// Least-constraining-value ordering of a variable's domain.
    ///
    /// Values are sorted (stably) by the number of constraint violations
    /// they cause across other unassigned variables' candidate values,
    /// counting only constraints that involve both variables.
    pub fn order_domain_values(&mut self, var: VarIndex) -> Vec<V> {
        let neighbours: Vec<(VarIndex, Vec<usize>)> = (0..self.variables.len())
            .filter(|&other| other != var && !self.assignment.is_assigned(other))
            .map(|other| {
                let shared = self.constraints_by_var[var]
                    .iter()
                    .copied()
                    .filter(|&c| self.constraints[c].involves(other))
                    .collect::<Vec<_>>();
                (other, shared)
            })
            .filter(|(_, shared)| !shared.is_empty())
            .collect();

        let mut scored: Vec<(usize, V)> = Vec::with_capacity(self.domains[var].len());
        for i in 0..self.domains[var].len() {
            let value = self.domains[var][i];
            let conflicts = self.count_conflicts(var, value, &neighbours);
            scored.push((conflicts, value));
        }
        scored.sort_by_key(|&(conflicts, _)| conflicts);
        scored.into_iter().map(|(_, value)| value).collect()
    }

    /// Runs bounded backtracking search from an empty assignment.
    pub fn backtracking_search(&mut self, max_iterations: u64) -> SearchResult<V> {
        self.stats = SearchStats::default();
        self.assignment.clear();

        let status = match self.backtrack(max_iterations) {
            Step::Found => SearchStatus::Solved,
            Step::Failed => SearchStatus::Exhausted,
            Step::Aborted => SearchStatus::BudgetExceeded,
        };

        debug!(
            "CSP search over {} variables / {} constraints: {:?} after {} iterations, {} backtracks",
            self.variables.len(),
            self.constraints.len(),
            status,
            self.stats.iterations,
            self.stats.backtracks
        );

        let assignment = status.is_solved().then(|| {
            self.assignment
                .iter_assigned()
                .map(|(var, value)| (self.variables[var].clone(), value))
                .collect()
        });

        SearchResult {
            status,
            assignment,
            stats: self.stats,
        }
    }

    /// Names of constraints violated by an assignment.
    pub fn violated_constraints(&self, assignment: &Assignment<V>) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(assignment))
            .map(CspConstraint::name)
            .collect()
    }

    fn backtrack(&mut self, max_iterations: u64) -> Step {
        if self.stats.iterations >= max_iterations {
            return Step::Aborted;
        }
        self.stats.iterations += 1;

        let Some(var) = self.select_unassigned_variable() else {
            return Step::Found;
        };

        for value in self.order_domain_values(var) {
            if !self.is_consistent(var, value) {
                continue;
            }
            trace!("{} <- {:?}", self.variables[var], value);
            self.assignment.bind(var, value);
            match self.backtrack(max_iterations) {
                Step::Found => return Step::Found,
                Step::Aborted => {
                    self.assignment.unbind(var);
                    return Step::Aborted;
                }
                Step::Failed => {
                    self.assignment.unbind(var);
                    self.stats.backtracks += 1;
                }
            }
        }

        Step::Failed
    }

    fn constraints_hold_for(&self, var: VarIndex) -> bool {
        self.constraints_by_var[var]
            .iter()
            .all(|&c| self.constraints[c].is_satisfied(&self.assignment))
    }

    fn count_conflicts(
        &mut self,
        var: VarIndex,
        value: V,
        neighbours: &[(VarIndex, Vec<usize>)],
    ) -> usize {
        let snapshot = self.assignment.bind(var, value);
        let mut conflicts = 0;
        for (other, shared) in neighbours {
            for i in 0..self.domains[*other].len() {
                let candidate = self.domains[*other][i];
                let other_snapshot = self.assignment.bind(*other, candidate);
                conflicts += shared
                    .iter()
                    .filter(|&&c| !self.constraints[c].is_satisfied(&self.assignment))
                    .count();
                self.assignment.restore(*other, other_snapshot);
            }
        }
        self.assignment.restore(var, snapshot);
        conflicts
    }
}

impl<V: Copy + PartialEq + fmt::Debug> Default for CspEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for CspEngine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CspEngine")
            .field("variables", &self.variables)
            .field("domains", &self.domains)
            .field("constraints", &self.constraints)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn not_equal(a: VarIndex, b: VarIndex) -> CspConstraint<i32> {
        CspConstraint::new(format!("x{a}!=x{b}"), vec![a, b], move |s: &Assignment<i32>| {
            match (s.get(a), s.get(b)) {
                (Some(x), Some(y)) => x != y,
                _ => true,
            }
        })
    }

    /// Triangle colouring with three colours.
    fn triangle() -> CspEngine<i32> {
        let mut e = CspEngine::new();
        for name in ["a", "b", "c"] {
            e.add_variable(name, vec![0, 1, 2]);
        }
        e.add_constraint(not_equal(0, 1));
        e.add_constraint(not_equal(1, 2));
        e.add_constraint(not_equal(0, 2));
        e
    }

    #[test]
    fn test_solve_triangle() {
        let mut e = triangle();
        let result = e.backtracking_search(1_000);
        assert_eq!(result.status, SearchStatus::Solved);
        let s = result.assignment.unwrap();
        assert_eq!(s.len(), 3);
        assert_ne!(s["a"], s["b"]);
        assert_ne!(s["b"], s["c"]);
        assert_ne!(s["a"], s["c"]);
        assert!(e.violated_constraints(e.assignment()).is_empty());
    }

    #[test]
    fn test_domain_lookup() {
        let e = triangle();
        assert_eq!(e.variable_count(), 3);
        assert!(e.domain(0).is_some_and(|d| !d.is_empty()));
        assert_eq!(e.domain(3), None);
    }

    #[test]
    fn test_exhausted() {
        let mut e = CspEngine::new();
        for name in ["a", "b", "c"] {
            e.add_variable(name, vec![0, 1]);
        }
        e.add_constraint(not_equal(0, 1));
        e.add_constraint(not_equal(1, 2));
        e.add_constraint(not_equal(0, 2));

        let result = e.backtracking_search(10_000);
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert!(result.assignment.is_none());
        assert!(result.stats.iterations > 1);
        assert!(result.stats.backtracks > 0);
    }

    #[test]
    fn test_iteration_cap_of_one() {
        let mut e = triangle();
        let result = e.backtracking_search(1);
        assert_eq!(result.status, SearchStatus::BudgetExceeded);
        assert!(result.assignment.is_none());
        assert_eq!(result.stats.iterations, 1);
        assert_eq!(result.stats.backtracks, 0);
        assert_ne!(SearchStatus::BudgetExceeded.message(), SearchStatus::Exhausted.message());
    }

    #[test]
    fn test_no_variables_is_trivially_solved() {
        let mut e: CspEngine<i32> = CspEngine::new();
        let result = e.backtracking_search(5);
        assert!(result.is_solved());
        assert_eq!(result.stats.iterations, 1);
        assert!(result.assignment.unwrap().is_empty());
    }

    #[test]
    fn test_is_consistent_has_no_side_effects() {
        let mut e = triangle();
        e.assign(0, 1);
        let before = e.assignment().clone();
        let first = e.is_consistent(1, 1);
        let second = e.is_consistent(1, 1);
        assert!(!first);
        assert_eq!(first, second);
        assert!(e.is_consistent(1, 2));
        assert_eq!(e.assignment(), &before);
    }

    #[test]
    fn test_mrv_prefers_most_constrained() {
        let mut e = CspEngine::new();
        e.add_variable("wide", vec![0, 1, 2, 3]);
        e.add_variable("narrow", vec![0, 1]);
        e.add_variable("pinned", vec![5]);
        e.add_constraint(not_equal(0, 1));
        // Nothing assigned: "pinned" has one value.
        assert_eq!(e.select_unassigned_variable(), Some(2));

        e.assign(2, 5);
        e.assign(0, 0);
        // "narrow" loses value 0 to "wide".
        assert_eq!(e.filtered_domain_size(1), 1);
        assert_eq!(e.select_unassigned_variable(), Some(1));

        e.assign(1, 1);
        assert_eq!(e.select_unassigned_variable(), None);
    }

    #[test]
    fn test_mrv_tie_goes_to_first() {
        let mut e = CspEngine::new();
        e.add_variable("a", vec![0, 1]);
        e.add_variable("b", vec![0, 1]);
        assert_eq!(e.select_unassigned_variable(), Some(0));
    }

    #[test]
    fn test_lcv_orders_by_conflicts() {
        let mut e = CspEngine::new();
        let x = e.add_variable("x", vec![1, 2, 3]);
        let y = e.add_variable("y", vec![1, 1, 3]);
        e.add_constraint(not_equal(x, y));
        // x=1 kills two of y's values, x=3 one, x=2 none.
        assert_eq!(e.order_domain_values(x), vec![2, 3, 1]);
        // Ordering leaves the assignment untouched.
        assert_eq!(e.assignment().assigned_count(), 0);
    }

    #[test]
    fn test_lcv_ignores_assigned_neighbours() {
        let mut e = CspEngine::new();
        let x = e.add_variable("x", vec![1, 2]);
        let y = e.add_variable("y", vec![1, 1]);
        e.add_constraint(not_equal(x, y));
        e.assign(y, 1);
        assert_eq!(e.order_domain_values(x), vec![1, 2]);
    }

    #[test]
    fn test_unknown_scope_variable_is_ignored() {
        let mut e: CspEngine<i32> = CspEngine::new();
        e.add_variable("a", vec![0]);
        e.add_constraint(CspConstraint::new("ghost", vec![0, 7], |_| true));
        assert_eq!(e.constraint_count(), 1);
        assert!(e.backtracking_search(10).is_solved());
    }

    proptest! {
        #[test]
        fn prop_solutions_satisfy_every_constraint(
            domains in prop::collection::vec(prop::collection::vec(0i32..6, 1..5), 1..6),
            edges in prop::collection::vec((0usize..6, 0usize..6), 0..10),
        ) {
            let mut e = CspEngine::new();
            for (i, d) in domains.iter().enumerate() {
                e.add_variable(format!("v{i}"), d.clone());
            }
            let n = domains.len();
            for (a, b) in edges {
                let (a, b) = (a % n, b % n);
                if a != b {
                    e.add_constraint(not_equal(a, b));
                }
            }
            let result = e.backtracking_search(100_000);
            if result.is_solved() {
                prop_assert!(e.assignment().is_complete());
                prop_assert!(e.violated_constraints(e.assignment()).is_empty());
                let map = result.assignment.unwrap();
                for (i, d) in domains.iter().enumerate() {
                    let key = format!("v{i}");
                    prop_assert!(d.contains(&map[&key]));
                }
            } else {
                prop_assert!(result.assignment.is_none());
            }
        }

        #[test]
        fn prop_mrv_choice_is_minimal(
            domains in prop::collection::vec(prop::collection::vec(0i32..4, 1..5), 2..6),
            fixed in 0i32..4,
        ) {
            let mut e = CspEngine::new();
            for (i, d) in domains.iter().enumerate() {
                e.add_variable(format!("v{i}"), d.clone());
            }
            for other in 1..domains.len() {
                e.add_constraint(not_equal(0, other));
            }
            e.assign(0, fixed);
            if let Some(chosen) = e.select_unassigned_variable() {
                let chosen_size = e.filtered_domain_size(chosen);
                for var in 1..domains.len() {
                    prop_assert!(chosen_size <= e.filtered_domain_size(var));
                }
            }
        }
    }
}
