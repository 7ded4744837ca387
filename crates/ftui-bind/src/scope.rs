#![forbid(unsafe_code)]

// ---------------------------------------------------------------------------
// BindingScope: lifecycle management
// ---------------------------------------------------------------------------

use std::fmt;

use crate::key::ContextId;
use crate::registry::BindingRegistry;

/// Owns a fresh [`ContextId`] for a logical scope (e.g., a view).
///
/// Register bindings under [`context()`](Self::context); when the scope is
/// dropped, every binding under that context is removed from the registry.
///
/// # Usage
///
/// ```ignore
/// let scope = BindingScope::new(&registry);
/// registry.bind_one_way(scope.context(), &label, &TEXT, &vm, &TITLE)?;
/// registry.bind_command(scope.context(), &button, &save)?;
///
/// // When scope drops, all of the view's bindings are released.
/// ```
///
/// # Invariants
///
/// 1. After drop, no callback registered under this scope's context fires.
/// 2. `clear()` releases everything immediately; the scope stays usable.
pub struct BindingScope {
    registry: BindingRegistry,
    context: ContextId,
}

impl BindingScope {
    /// Create a scope with a fresh context in `registry`.
    #[must_use]
    pub fn new(registry: &BindingRegistry) -> Self {
        Self {
            registry: registry.clone(),
            context: ContextId::new(),
        }
    }

    /// Create a scope in the thread-local registry.
    #[must_use]
    pub fn global() -> Self {
        Self::new(&BindingRegistry::global())
    }

    /// Context to register this scope's bindings under.
    #[inline]
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Registry the scope releases from.
    #[must_use]
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Number of live bindings under this scope's context.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.registry.context_binding_count(self.context)
    }

    /// Release every binding now. Returns the number removed.
    pub fn clear(&self) -> usize {
        self.registry.unbind(self.context)
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.registry.unbind(self.context);
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("context", &self.context)
            .field("binding_count", &self.binding_count())
            .finish()
    }
}
