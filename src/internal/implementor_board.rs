use crate::{Error, ImplementorRegistry, ImplementorSink, Result};
use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// What happens to registries that arrive before the page has a sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingPolicy {
    /// A single slot: each buffered registry replaces the previous one.
    #[default]
    LastWriteWins,
    /// A queue: every buffered registry is kept and delivered in arrival order.
    Accumulate,
}

/// Outcome of a single hand-off attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Handoff {
    /// The sink was invoked with the registry; the pending buffer was not touched.
    Delivered,
    /// No sink yet, so the registry went into the pending buffer.
    /// `displaced` counts buffered registries that were overwritten to make room.
    Buffered { displaced: usize },
}

/// Page-wide meeting point between generated fragments and the implementor sink.
///
/// Fragments and the sink may show up in any order. Until [`initialize`](Self::initialize)
/// is called, registries are held in a pending buffer; afterwards they go straight to the sink.
#[derive(Resource, Default)]
pub struct ImplementorBoard {
    state: SinkState,
    policy: PendingPolicy,
}

enum SinkState {
    Uninitialized { pending: Vec<ImplementorRegistry> },
    Initialized { sink: Box<dyn ImplementorSink> },
}

impl Default for SinkState {
    #[inline]
    fn default() -> Self {
        SinkState::Uninitialized { pending: vec![] }
    }
}

impl ImplementorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PendingPolicy) -> Self {
        Self {
            state: SinkState::default(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> PendingPolicy {
        self.policy
    }

    /// Changes how later registries are buffered.
    /// Switching to [`PendingPolicy::LastWriteWins`] keeps only the newest buffered registry.
    pub fn set_policy(&mut self, policy: PendingPolicy) {
        self.policy = policy;
        if policy == PendingPolicy::LastWriteWins {
            if let SinkState::Uninitialized { pending } = &mut self.state {
                let displaced = pending.len().saturating_sub(1);
                if displaced > 0 {
                    tracing::warn!(displaced, "dropping buffered implementors on policy change");
                    pending.drain(..displaced);
                }
            }
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, SinkState::Initialized { .. })
    }

    /// Registries waiting for a sink, oldest first.
    pub fn pending(&self) -> &[ImplementorRegistry] {
        match &self.state {
            SinkState::Uninitialized { pending } => pending,
            SinkState::Initialized { .. } => &[],
        }
    }

    /// Hands `implementors` to the sink if there is one, and buffers it otherwise.
    /// Exactly one of the two happens.
    pub fn register_implementors(&mut self, implementors: ImplementorRegistry) -> Handoff {
        match &mut self.state {
            SinkState::Initialized { sink } => {
                sink.register_implementors(implementors);
                Handoff::Delivered
            }
            SinkState::Uninitialized { pending } => {
                let displaced = match self.policy {
                    PendingPolicy::LastWriteWins => {
                        let displaced = pending.len();
                        pending.clear();
                        displaced
                    }
                    PendingPolicy::Accumulate => 0,
                };
                if displaced > 0 {
                    tracing::warn!(
                        displaced,
                        "implementors registered before the sink was initialized were overwritten"
                    );
                }
                pending.push(implementors);
                Handoff::Buffered { displaced }
            }
        }
    }

    /// Takes everything in the pending buffer, oldest first, leaving it empty.
    pub fn drain_pending(&mut self) -> Vec<ImplementorRegistry> {
        match &mut self.state {
            SinkState::Uninitialized { pending } => std::mem::take(pending),
            SinkState::Initialized { .. } => vec![],
        }
    }

    /// Binds the page's sink and delivers whatever was buffered before it existed.
    /// Returns the number of buffered registries delivered.
    ///
    /// The binding happens once per page: a second call returns
    /// [`Error::SinkAlreadyInitialized`] and delivers nothing.
    pub fn initialize(&mut self, sink: impl ImplementorSink) -> Result<usize> {
        self.initialize_boxed(Box::new(sink))
    }

    pub fn initialize_boxed(&mut self, mut sink: Box<dyn ImplementorSink>) -> Result<usize> {
        if self.is_initialized() {
            return Err(Error::SinkAlreadyInitialized);
        }
        let pending = self.drain_pending();
        let delivered = pending.len();
        for implementors in pending {
            sink.register_implementors(implementors);
        }
        self.state = SinkState::Initialized { sink };
        tracing::debug!(delivered, "implementor sink initialized");
        Ok(delivered)
    }
}
