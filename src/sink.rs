use crate::{ImplementorDescriptor, ImplementorRegistry};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The consumer side of the hand-off: whatever turns registries into implementor lists.
///
/// Any `FnMut(ImplementorRegistry)` closure is a sink.
pub trait ImplementorSink: Send + Sync + 'static {
    /// Called synchronously once per delivered registry.
    fn register_implementors(&mut self, implementors: ImplementorRegistry);
}

impl<F> ImplementorSink for F
where
    F: FnMut(ImplementorRegistry) + Send + Sync + 'static,
{
    #[inline]
    fn register_implementors(&mut self, implementors: ImplementorRegistry) {
        self(implementors)
    }
}

/// A sink that keeps every registry it receives and assembles implementor lists on demand.
///
/// Cloning gives another handle to the same index, so the viewer can hold on to one clone
/// while the page's [`ImplementorBoard`](crate::ImplementorBoard) owns the other.
/// Registration only stores the registry; all list assembly happens in [`lists`](Self::lists).
#[derive(Clone, Default)]
pub struct ImplementorIndex {
    shared: Arc<RwLock<IndexState>>,
}

#[derive(Default)]
struct IndexState {
    current_crate: Option<String>,
    inlined_types: Vec<String>,
    received: Vec<ImplementorRegistry>,
}

impl ImplementorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index for a page belonging to `current_crate`.
    /// That crate's own implementors are rendered inline by the page, so they are left out of the lists.
    pub fn for_crate(current_crate: impl Into<String>) -> Self {
        let index = Self::default();
        index.write().current_crate = Some(current_crate.into());
        index
    }

    /// Types whose synthetic impls the page already shows inline.
    pub fn with_inlined_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write()
            .inlined_types
            .extend(types.into_iter().map(Into::into));
        self
    }

    /// How many registries have been handed to this index.
    pub fn deliveries(&self) -> usize {
        self.read().received.len()
    }

    /// Every registry received so far, in arrival order.
    pub fn received(&self) -> Vec<ImplementorRegistry> {
        self.read().received.clone()
    }

    /// Assembles the implementor lists from everything received so far.
    ///
    /// Explicit and synthetic impls go to separate lists. A synthetic impl is dropped when one
    /// of its types has already been seen, either inlined by the page or mentioned by an
    /// earlier synthetic impl.
    pub fn lists(&self) -> ImplementorLists {
        let state = self.read();
        let mut seen_types: HashSet<&str> =
            state.inlined_types.iter().map(String::as_str).collect();
        let mut lists = ImplementorLists::default();

        for registry in &state.received {
            for (library, implementors) in registry {
                if state.current_crate.as_deref() == Some(library) {
                    continue;
                }
                'implementors: for descriptor in implementors {
                    if descriptor.is_synthetic() {
                        for ty in descriptor.types() {
                            // Types checked before a hit stay recorded.
                            if !seen_types.insert(ty) {
                                continue 'implementors;
                            }
                        }
                    }
                    let listed = ListedImplementor {
                        library: library.to_owned(),
                        descriptor: descriptor.clone(),
                    };
                    if descriptor.is_synthetic() {
                        lists.synthetic.push(listed);
                    } else {
                        lists.implementors.push(listed);
                    }
                }
            }
        }
        lists
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexState> {
        self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.shared.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImplementorSink for ImplementorIndex {
    fn register_implementors(&mut self, implementors: ImplementorRegistry) {
        self.write().received.push(implementors);
    }
}

/// The lists a trait page shows, ready for a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementorLists {
    pub implementors: Vec<ListedImplementor>,
    pub synthetic: Vec<ListedImplementor>,
}

impl ImplementorLists {
    pub fn is_empty(&self) -> bool {
        self.implementors.is_empty() && self.synthetic.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedImplementor {
    pub library: String,
    pub descriptor: ImplementorDescriptor,
}
