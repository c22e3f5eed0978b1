//! A named set of aliases

use std::collections::HashMap;

use crate::models::AliasDefinition;

/// Mapping from alias name to definition; names are unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasContext {
    aliases: HashMap<String, AliasDefinition>,
}

impl AliasContext {
    /// Create a new empty context
    pub fn new() -> Self {
        AliasContext {
            aliases: HashMap::new(),
        }
    }

    /// Insert an alias if the name is free
    ///
    /// Returns `false` and leaves the existing definition untouched when the
    /// name is already taken.
    pub fn add(&mut self, name: impl Into<String>, definition: AliasDefinition) -> bool {
        match self.aliases.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(definition);
                true
            }
        }
    }

    /// Remove an alias, returning whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove(name).is_some()
    }

    /// Lookup an alias by name
    pub fn get(&self, name: &str) -> Option<&AliasDefinition> {
        self.aliases.get(name)
    }

    /// Check whether an alias exists
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Remove every alias targeting `instance`, returning their names
    pub fn remove_for_instance(&mut self, instance: &str) -> Vec<String> {
        let removed: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, def)| def.instance == instance)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &removed {
            self.aliases.remove(name);
        }

        removed
    }

    /// Iterate over (name, definition) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AliasDefinition)> {
        self.aliases.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Get number of aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Check if context is empty
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
