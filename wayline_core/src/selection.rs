use crate::route::RouteAlternative;

/// The alternatives of the last successful resolution plus which one is
/// active. Switching is a local mutation only; every alternative was
/// already fetched in the same provider response, so no re-fetch is ever
/// needed or performed here.
#[derive(Debug, Clone, Default)]
pub struct AlternativeSet {
    alternatives: Vec<RouteAlternative>,
    selected: usize,
}

impl AlternativeSet {
    pub fn new(alternatives: Vec<RouteAlternative>) -> AlternativeSet {
        AlternativeSet {
            alternatives,
            selected: 0,
        }
    }

    pub fn alternatives(&self) -> &[RouteAlternative] {
        &self.alternatives
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&RouteAlternative> {
        self.alternatives.get(self.selected)
    }

    /// Switches the active alternative. An out-of-range index is rejected
    /// and leaves the current selection untouched.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.alternatives.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Installs the alternatives of a fresh resolution. Selection always
    /// resets to the primary alternative.
    pub fn replace(&mut self, alternatives: Vec<RouteAlternative>) {
        self.alternatives = alternatives;
        self.selected = 0;
    }
}
