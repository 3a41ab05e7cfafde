//! Finite-state components and the systems assembled from them.

use netcheck_base::{sort_by_key_string, NetcheckError, Result, StableSet};
use std::collections::HashMap;

/// A labeled transition `(source_state, label, target_state)`.
pub type Transition = (String, String, String);

/// A finite-state component: a name, an initial state, and a set of labeled
/// transitions. Labels are unique within a component and the initial state
/// must be the source of at least one transition.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    initial_state: String,
    transitions: Vec<Transition>,
    by_label: HashMap<String, (String, String)>,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        initial_state: impl Into<String>,
        transitions: Vec<Transition>,
    ) -> Result<Self> {
        let name = name.into();
        let initial_state = initial_state.into();

        let mut by_label: HashMap<String, (String, String)> = HashMap::new();
        for (source, label, target) in &transitions {
            if by_label
                .insert(label.clone(), (source.clone(), target.clone()))
                .is_some()
            {
                return Err(NetcheckError::label_reused(&name, label));
            }
        }

        if !transitions.iter().any(|(source, _, _)| source == &initial_state) {
            return Err(NetcheckError::missing_initial_transition(&name, &initial_state));
        }

        Ok(Self {
            name,
            initial_state,
            transitions,
            by_label,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// All states mentioned as a source or target, sorted lexicographically.
    pub fn states(&self) -> Vec<String> {
        let mut set: StableSet<String> = StableSet::new();
        for (source, _, target) in &self.transitions {
            set.insert(source.clone());
            set.insert(target.clone());
        }
        set.insert(self.initial_state.clone());
        sort_by_key_string(set.into_vec(), |s| s.clone())
    }

    pub fn number_of_states(&self) -> usize {
        self.states().len()
    }

    pub fn labels(&self) -> StableSet<String> {
        StableSet::from_iter_dedup(self.by_label.keys().cloned())
    }

    pub fn number_of_labels(&self) -> usize {
        self.by_label.len()
    }

    pub fn edge_with_label(&self, label: &str) -> Option<(&str, &str)> {
        self.by_label
            .get(label)
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn source_of_label(&self, label: &str) -> Option<&str> {
        self.edge_with_label(label).map(|(source, _)| source)
    }

    pub fn target_of_label(&self, label: &str) -> Option<&str> {
        self.edge_with_label(label).map(|(_, target)| target)
    }
}

/// An ordered set of components whose transition labels are globally
/// disjoint: a label identifies at most one edge in one component.
#[derive(Debug, Clone)]
pub struct System {
    components: Vec<Component>,
    component_of_label: HashMap<String, usize>,
}

impl System {
    pub fn new(components: Vec<Component>) -> Result<Self> {
        let mut component_of_label: HashMap<String, usize> = HashMap::new();
        for (index, component) in components.iter().enumerate() {
            for label in component.labels().iter() {
                if component_of_label.insert(label.clone(), index).is_some() {
                    return Err(NetcheckError::not_disjoint_labels(label));
                }
            }
        }
        Ok(Self {
            components,
            component_of_label,
        })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Every state across every component, sorted lexicographically. States
    /// are namespaced by component, so this is a plain union (no collision
    /// detection is required at this layer, since distinct components never
    /// share a label, and state name clashes across components do not
    /// change which state set a predicate resolves to).
    pub fn states(&self) -> Vec<String> {
        let mut set: StableSet<String> = StableSet::new();
        for component in &self.components {
            set.extend(component.states());
        }
        sort_by_key_string(set.into_vec(), |s| s.clone())
    }

    pub fn component_of_label(&self, label: &str) -> Option<&Component> {
        self.component_of_label.get(label).map(|&i| &self.components[i])
    }

    pub fn edge_with_label(&self, label: &str) -> Option<(&str, &str)> {
        self.component_of_label(label)
            .and_then(|component| component.edge_with_label(label))
    }

    pub fn origin_of_label(&self, label: &str) -> Option<&str> {
        self.edge_with_label(label).map(|(source, _)| source)
    }

    pub fn target_of_label(&self, label: &str) -> Option<&str> {
        self.edge_with_label(label).map(|(_, target)| target)
    }
}
