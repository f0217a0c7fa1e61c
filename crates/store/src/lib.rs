mod reducer;
mod state;

pub use reducer::{reduce, SessionEvent};
pub use state::{CheckoutState, PaymentSession, PremiumModal};

use tokio::sync::RwLock;

/// Owner of the checkout state. All mutation goes through [`reduce`], one
/// batch of events at a time, so concurrent callers merge slice by slice
/// instead of overwriting each other's snapshots.
#[derive(Debug, Default)]
pub struct PaymentStateStore {
    state: RwLock<CheckoutState>,
}

impl PaymentStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: CheckoutState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn snapshot(&self) -> CheckoutState {
        self.state.read().await.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Applies `events` in order as one atomic update and returns the result.
    pub async fn apply<I>(&self, events: I) -> CheckoutState
    where
        I: IntoIterator<Item = SessionEvent>,
    {
        let mut guard = self.state.write().await;
        *guard = fold_events(guard.clone(), events);
        guard.clone()
    }

    /// Like [`apply`](Self::apply), but only while the session is still the
    /// one identified by `generation`. Returns `None` when the events were
    /// dropped.
    pub async fn apply_if_current<I>(&self, generation: u64, events: I) -> Option<CheckoutState>
    where
        I: IntoIterator<Item = SessionEvent>,
    {
        self.apply_if(
            |state| {
                let current = state.generation == generation;
                if !current {
                    tracing::debug!(
                        expected = generation,
                        current = state.generation,
                        "Dropping events for a session that no longer exists"
                    );
                }
                current
            },
            events,
        )
        .await
    }

    /// Applies `events` only if `guard` accepts the state they would land on.
    /// The check and the update happen under the same write lock.
    pub async fn apply_if<F, I>(&self, guard: F, events: I) -> Option<CheckoutState>
    where
        F: FnOnce(&CheckoutState) -> bool,
        I: IntoIterator<Item = SessionEvent>,
    {
        let mut state = self.state.write().await;
        if !guard(&state) {
            return None;
        }
        *state = fold_events(state.clone(), events);
        Some(state.clone())
    }

    pub async fn clear(&self) -> CheckoutState {
        self.apply([SessionEvent::Cleared]).await
    }
}

fn fold_events<I>(state: CheckoutState, events: I) -> CheckoutState
where
    I: IntoIterator<Item = SessionEvent>,
{
    events.into_iter().fold(state, |state, event| {
        tracing::trace!(event = event.name(), "Applying session event");
        reduce(state, event)
    })
}
