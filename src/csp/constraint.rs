//! Scoped CSP constraints.

use std::fmt;

use super::{Assignment, VarIndex};

type Predicate<V> = Box<dyn Fn(&Assignment<V>) -> bool>;

/// A predicate over a (partial) assignment plus the variables it reads.
///
/// Predicates must tolerate unassigned variables in their scope: they
/// judge only what is assigned, so a partial assignment that cannot yet
/// violate the rule is accepted.
pub struct CspConstraint<V> {
    name: String,
    scope: Vec<VarIndex>,
    predicate: Predicate<V>,
}

impl<V> CspConstraint<V> {
    /// Creates a constraint. The scope is sorted and deduplicated.
    pub fn new<F>(name: impl Into<String>, mut scope: Vec<VarIndex>, predicate: F) -> Self
    where
        F: Fn(&Assignment<V>) -> bool + 'static,
    {
        scope.sort_unstable();
        scope.dedup();
        Self {
            name: name.into(),
            scope,
            predicate: Box::new(predicate),
        }
    }

    /// Constraint label (for diagnostics).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables this constraint depends on, ascending.
    pub fn scope(&self) -> &[VarIndex] {
        &self.scope
    }

    /// Whether the constraint reads the variable.
    pub fn involves(&self, var: VarIndex) -> bool {
        self.scope.binary_search(&var).is_ok()
    }

    /// Evaluates the predicate.
    pub fn is_satisfied(&self, assignment: &Assignment<V>) -> bool {
        (self.predicate)(assignment)
    }
}

impl<V> fmt::Debug for CspConstraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CspConstraint")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}
