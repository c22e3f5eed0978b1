//! Alias registry with per-context lookup and dirty tracking

use std::collections::HashMap;

use crate::codec::AliasDocument;
use crate::context::AliasContext;
use crate::models::AliasDefinition;

/// Name of the context used when nothing else was selected
pub const DEFAULT_CONTEXT: &str = "default";

/// In-memory alias state: every context plus the active one
///
/// Not synchronized; wrap it in a lock if it has to cross threads.
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    contexts: HashMap<String, AliasContext>,
    active_context: String,
    dirty: bool,
}

impl AliasRegistry {
    /// Create an empty registry with `default` as the active context
    ///
    /// No context entry exists until one is selected or an alias is added.
    pub fn new() -> Self {
        AliasRegistry {
            contexts: HashMap::new(),
            active_context: DEFAULT_CONTEXT.to_string(),
            dirty: false,
        }
    }

    /// Select the active context, creating it empty if needed
    ///
    /// Only marks the registry dirty when a context was created.
    pub fn set_active_context(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contexts.contains_key(&name) {
            self.contexts.insert(name.clone(), AliasContext::new());
            self.dirty = true;
        }
        self.active_context = name;
    }

    /// Get the active context name
    pub fn get_active_context(&self) -> &str {
        &self.active_context
    }

    /// Add an alias to the active context
    pub fn add_alias(&mut self, name: impl Into<String>, definition: AliasDefinition) -> bool {
        let added = self
            .contexts
            .entry(self.active_context.clone())
            .or_default()
            .add(name, definition);

        if added {
            self.dirty = true;
        }
        added
    }

    /// Check whether the active context contains `name`
    pub fn exists_alias(&self, name: &str) -> bool {
        self.active()
            .map(|context| context.contains(name))
            .unwrap_or(false)
    }

    /// Remove an alias from the active context
    pub fn remove_alias(&mut self, name: &str) -> bool {
        let removed = self
            .contexts
            .get_mut(&self.active_context)
            .map(|context| context.remove(name))
            .unwrap_or(false);

        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Remove a whole context
    ///
    /// Removing the active context leaves the active name pointing at nothing
    /// until [`AliasRegistry::set_active_context`] is called again.
    pub fn remove_context(&mut self, name: &str) -> bool {
        if self.contexts.remove(name).is_some() {
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Remove every alias in the active context targeting `instance`
    pub fn remove_aliases_for_instance(&mut self, instance: &str) -> Vec<String> {
        let removed = self
            .contexts
            .get_mut(&self.active_context)
            .map(|context| context.remove_for_instance(instance))
            .unwrap_or_default();

        if !removed.is_empty() {
            self.dirty = true;
        }
        removed
    }

    /// Lookup an alias in the active context
    pub fn get_alias(&self, name: &str) -> Option<&AliasDefinition> {
        self.active().and_then(|context| context.get(name))
    }

    /// The active context, if it exists
    pub fn active(&self) -> Option<&AliasContext> {
        self.contexts.get(&self.active_context)
    }

    /// Lookup a context by name
    pub fn context(&self, name: &str) -> Option<&AliasContext> {
        self.contexts.get(name)
    }

    /// Iterate over every (context name, context) pair
    pub fn contexts(&self) -> impl Iterator<Item = (&str, &AliasContext)> {
        self.contexts
            .iter()
            .map(|(name, context)| (name.as_str(), context))
    }

    /// Get number of contexts
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Check if there are no contexts
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Drop every context
    pub fn clear(&mut self) {
        if !self.contexts.is_empty() {
            self.dirty = true;
            self.contexts.clear();
        }
    }

    /// Whether anything changed since the last load or save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Prune empty contexts other than the active one
    ///
    /// Returns the names of the pruned contexts.
    pub fn sanitize(&mut self) -> Vec<String> {
        let empty: Vec<String> = self
            .contexts
            .iter()
            .filter(|(name, context)| **name != self.active_context && context.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        if !empty.is_empty() {
            self.dirty = true;
            for name in &empty {
                self.contexts.remove(name);
            }
        }
        empty
    }

    /// Replace all state with a decoded document
    ///
    /// The active context is kept when the document does not name one.
    pub fn replace_with(&mut self, document: AliasDocument) {
        self.contexts = document.contexts;
        if let Some(active) = document.active_context {
            self.active_context = active;
        }
        self.dirty = false;
    }
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self::new()
    }
}
