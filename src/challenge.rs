use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// The bot-challenge widget, seen as an opaque token source.
pub trait ChallengeProvider: Send + Sync + 'static {
    /// The current token, or `None` while the challenge is unsolved.
    fn value(&self) -> Option<String>;

    /// Discards the current token so the next attempt needs a fresh one.
    fn reset(&self);
}

/// Shareable provider whose token is pushed in by the host, e.g. from the
/// widget's "solved" callback. Clones share the same token.
#[derive(Clone, Default)]
pub struct InMemoryChallenge {
    token: Arc<RwLock<Option<String>>>,
    resets: Arc<AtomicU64>,
}

impl InMemoryChallenge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solved(token: impl Into<String>) -> Self {
        let challenge = Self::new();
        challenge.solve(token);
        challenge
    }

    pub fn solve(&self, token: impl Into<String>) {
        let mut state = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = Some(token.into());
    }

    /// How many times the controller has reset this challenge.
    pub fn reset_count(&self) -> u64 {
        self.resets.load(Ordering::SeqCst)
    }
}

impl ChallengeProvider for InMemoryChallenge {
    fn value(&self) -> Option<String> {
        let state = match self.token.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.clone()
    }

    fn reset(&self) {
        let mut state = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = None;
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_token_and_reset() {
        let challenge = InMemoryChallenge::new();
        let widget = challenge.clone();
        assert_eq!(challenge.value(), None);

        widget.solve("captchaString");
        assert_eq!(challenge.value().as_deref(), Some("captchaString"));

        challenge.reset();
        assert_eq!(widget.value(), None);
        assert_eq!(widget.reset_count(), 1);
    }
}
