//! Index-addressed partial assignment.

/// Index of a CSP variable.
pub type VarIndex = usize;

/// A partial assignment: one slot per variable, `None` when unassigned.
///
/// Tentative bindings during consistency checks use
/// [`bind`](Self::bind) / [`restore`](Self::restore) on the same array
/// instead of copying the whole assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<V> {
    slots: Vec<Option<V>>,
}

impl<V: Copy> Assignment<V> {
    /// Creates an empty assignment over `len` variables.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Creates a complete assignment from values in variable order.
    pub fn from_values(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
        }
    }

    /// Value bound to a variable, if any.
    #[inline]
    pub fn get(&self, var: VarIndex) -> Option<V> {
        self.slots.get(var).copied().flatten()
    }

    /// Whether a variable has a value.
    #[inline]
    pub fn is_assigned(&self, var: VarIndex) -> bool {
        self.get(var).is_some()
    }

    /// Binds a value and returns the previous slot content (the snapshot).
    pub fn bind(&mut self, var: VarIndex, value: V) -> Option<V> {
        self.slots[var].replace(value)
    }

    /// Clears a variable and returns its previous value.
    pub fn unbind(&mut self, var: VarIndex) -> Option<V> {
        self.slots[var].take()
    }

    /// Puts back a slot snapshot taken by [`bind`](Self::bind).
    pub fn restore(&mut self, var: VarIndex, snapshot: Option<V>) {
        self.slots[var] = snapshot;
    }

    /// Clears every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Number of assigned variables.
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether every variable has a value.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Iterates `(variable, value)` over assigned variables.
    pub fn iter_assigned(&self) -> impl Iterator<Item = (VarIndex, V)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|v| (i, v)))
    }

    /// Values of the given variables that are assigned, in scope order.
    pub fn values_of<'a>(&'a self, scope: &'a [VarIndex]) -> impl Iterator<Item = V> + 'a {
        scope.iter().filter_map(move |&var| self.get(var))
    }
}
