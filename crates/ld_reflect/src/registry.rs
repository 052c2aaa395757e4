//! A registry of message descriptors.

use alloc::string::String;
use alloc::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::info::MessageDescriptor;

// -----------------------------------------------------------------------------
// DescriptorRegistry

/// A registry of [`MessageDescriptor`]s.
///
/// Descriptors are indexed by fully-qualified name and, where unambiguous, by
/// short name. When two registered types share a short name, that short name
/// stops resolving; the full names always resolve.
///
/// # Examples
///
/// ```
/// use ld_reflect::info::MessageDescriptor;
/// use ld_reflect::registry::DescriptorRegistry;
///
/// let mut registry = DescriptorRegistry::new();
/// registry.register(MessageDescriptor::new("a.Invoice", vec![]));
/// registry.register(MessageDescriptor::new("b.Receipt", vec![]));
///
/// assert!(registry.get_with_name("Invoice").is_some());
/// assert!(registry.get_with_full_name("b.Receipt").is_some());
/// ```
#[derive(Default)]
pub struct DescriptorRegistry {
    by_full_name: HashMap<String, Arc<MessageDescriptor>>,
    by_name: HashMap<String, Arc<MessageDescriptor>>,
    ambiguous_names: HashSet<String>,
}

impl DescriptorRegistry {
    /// Creates an empty `DescriptorRegistry`.
    #[inline]
    pub fn new() -> Self {
        Self {
            by_full_name: HashMap::new(),
            by_name: HashMap::new(),
            ambiguous_names: HashSet::new(),
        }
    }

    /// Registers a descriptor, indexing it by full and short name.
    ///
    /// Re-registering the same full name replaces the previous entry. A short
    /// name shared by two different full names becomes unresolvable.
    pub fn register(&mut self, descriptor: impl Into<Arc<MessageDescriptor>>) {
        let descriptor = descriptor.into();
        let name = String::from(descriptor.name());

        if !self.ambiguous_names.contains(&name) {
            match self.by_name.get(&name) {
                Some(existing) if existing.full_name() != descriptor.full_name() => {
                    self.by_name.remove(&name);
                    self.ambiguous_names.insert(name);
                }
                _ => {
                    self.by_name.insert(name, Arc::clone(&descriptor));
                }
            }
        }

        self.by_full_name
            .insert(String::from(descriptor.full_name()), descriptor);
    }

    /// Returns the descriptor registered under the given full name.
    #[inline]
    pub fn get_with_full_name(&self, full_name: &str) -> Option<&Arc<MessageDescriptor>> {
        self.by_full_name.get(full_name)
    }

    /// Returns the descriptor with the given short name, if unambiguous.
    #[inline]
    pub fn get_with_name(&self, name: &str) -> Option<&Arc<MessageDescriptor>> {
        self.by_name.get(name)
    }

    /// Returns the number of registered descriptors.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_full_name.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_full_name.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::DescriptorRegistry;
    use crate::info::MessageDescriptor;

    #[test]
    fn duplicate_short_names_stop_resolving() {
        let mut registry = DescriptorRegistry::new();
        registry.register(MessageDescriptor::new("a.Thing", vec![]));
        assert!(registry.get_with_name("Thing").is_some());

        registry.register(MessageDescriptor::new("b.Thing", vec![]));
        assert!(registry.get_with_name("Thing").is_none());
        assert!(registry.get_with_full_name("a.Thing").is_some());
        assert!(registry.get_with_full_name("b.Thing").is_some());
    }
}
