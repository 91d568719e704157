//! Per-session UI state: the resume wizard and the onboarding form.
//!
//! Keyed by session token so nothing crosses browser sessions. Locks are
//! never held across an `.await`. A slot disappears once it holds neither a
//! wizard nor a form, and `spawn_sweeper` evicts slots left idle longer than
//! the configured limit, so abandoned browser sessions do not accumulate.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::onboarding::OnboardingForm;
use crate::wizard::controller::WizardController;

/// Upper bound on how often the sweeper wakes up.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct SessionSlot {
    wizard: Option<WizardController>,
    onboarding: Option<OnboardingForm>,
    last_touched: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            wizard: None,
            onboarding: None,
            last_touched: Instant::now(),
        }
    }

    fn is_empty(&self) -> bool {
        self.wizard.is_none() && self.onboarding.is_none()
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    slots: Arc<RwLock<HashMap<String, SessionSlot>>>,
}

impl SessionStore {
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionSlot>> {
        self.slots.write().unwrap_or_else(|err| err.into_inner())
    }

    fn touch<'a>(slots: &'a mut HashMap<String, SessionSlot>, key: &str) -> &'a mut SessionSlot {
        let slot = slots.entry(key.to_string()).or_insert_with(SessionSlot::new);
        slot.last_touched = Instant::now();
        slot
    }

    /// Runs `f` on the session's wizard, starting a fresh one if needed.
    pub fn with_wizard<R>(&self, key: &str, f: impl FnOnce(&mut WizardController) -> R) -> R {
        let mut slots = self.write();
        let slot = Self::touch(&mut slots, key);
        f(slot.wizard.get_or_insert_with(WizardController::default))
    }

    /// Runs `f` only if the session still has a wizard. Results arriving
    /// after a discard are dropped.
    pub fn with_existing_wizard<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut WizardController) -> R,
    ) -> Option<R> {
        let mut slots = self.write();
        let slot = slots.get_mut(key)?;
        let wizard = slot.wizard.as_mut()?;
        slot.last_touched = Instant::now();
        Some(f(wizard))
    }

    pub fn take_wizard(&self, key: &str) -> Option<WizardController> {
        let mut slots = self.write();
        let slot = slots.get_mut(key)?;
        let wizard = slot.wizard.take();
        if slot.is_empty() {
            slots.remove(key);
        }
        wizard
    }

    pub fn with_onboarding<R>(&self, key: &str, f: impl FnOnce(&mut OnboardingForm) -> R) -> R {
        let mut slots = self.write();
        let slot = Self::touch(&mut slots, key);
        f(slot.onboarding.get_or_insert_with(OnboardingForm::default))
    }

    pub fn clear_onboarding(&self, key: &str) {
        let mut slots = self.write();
        let Some(slot) = slots.get_mut(key) else {
            return;
        };
        slot.onboarding = None;
        if slot.is_empty() {
            slots.remove(key);
        }
    }

    /// Forgets everything held for the session.
    pub fn end_session(&self, key: &str) {
        self.write().remove(key);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.write().len()
    }

    /// Drops every slot untouched for longer than `max_idle`. Returns how
    /// many were removed.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut slots = self.write();
        let before = slots.len();
        slots.retain(|_, slot| slot.last_touched.elapsed() <= max_idle);
        before - slots.len()
    }

    /// Sweeps idle slots in the background for as long as the runtime lives.
    pub fn spawn_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = max_idle.min(MAX_SWEEP_PERIOD).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = store.sweep_idle(max_idle);
                if removed > 0 {
                    debug!("Evicted {} idle session slot(s)", removed);
                }
            }
        })
    }
}
