//! One-at-a-time alert carousel with confirmation and delayed auto-dismiss.
//!
//! Alerts are never removed from the base list; dismissal only hides them.
//! The visible queue is recomputed on every read: dismissed alerts filtered
//! out, the rest stably ordered by severity.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use shared::{domain::AlertId, error::DashboardError};
use tokio::{runtime::Handle, sync::broadcast, task::JoinHandle};
use tracing::{debug, info};

use crate::alerts::Alert;

pub const DEFAULT_AUTO_DISMISS_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselConfig {
    pub auto_dismiss_after: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_after: DEFAULT_AUTO_DISMISS_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    User,
    AutoDismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEvent {
    AlertConfirmed {
        alert_id: AlertId,
    },
    AlertDismissed {
        alert_id: AlertId,
        reason: DismissReason,
        remaining: usize,
    },
}

/// The alert in front of the user and its 1-based position in the queue.
#[derive(Debug, Clone)]
pub struct Slide {
    pub alert: Alert,
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub enum CarouselView {
    Empty,
    Viewing(Slide),
    Confirming(Slide),
    Confirmed(Slide),
}

impl CarouselView {
    pub fn slide(&self) -> Option<&Slide> {
        match self {
            CarouselView::Empty => None,
            CarouselView::Viewing(slide)
            | CarouselView::Confirming(slide)
            | CarouselView::Confirmed(slide) => Some(slide),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CarouselView::Empty)
    }
}

struct CarouselState {
    alerts: Vec<Alert>,
    dismissed: HashSet<AlertId>,
    confirmed: HashSet<AlertId>,
    current_index: usize,
    pending_confirmation: Option<AlertId>,
    auto_dismiss_timers: HashMap<AlertId, JoinHandle<()>>,
    shut_down: bool,
}

impl CarouselState {
    fn active_alerts(&self) -> Vec<Alert> {
        let mut active: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|alert| !self.dismissed.contains(&alert.id))
            .cloned()
            .collect();
        active.sort_by_key(|alert| alert.severity.rank());
        active
    }

    fn total(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| !self.dismissed.contains(&alert.id))
            .count()
    }

    fn active_alert(&self, alert_id: &AlertId) -> Option<&Alert> {
        if self.dismissed.contains(alert_id) {
            return None;
        }
        self.alerts.iter().find(|alert| &alert.id == alert_id)
    }

    fn clamp_index(&mut self) {
        let total = self.total();
        if total == 0 {
            self.current_index = 0;
        } else if self.current_index >= total {
            self.current_index = total - 1;
        }
    }

    /// Returns `false` when the alert is unknown or already dismissed.
    fn dismiss(&mut self, alert_id: &AlertId) -> bool {
        if !self.alerts.iter().any(|alert| &alert.id == alert_id) {
            return false;
        }
        if !self.dismissed.insert(alert_id.clone()) {
            return false;
        }
        if self.pending_confirmation.as_ref() == Some(alert_id) {
            self.pending_confirmation = None;
        }
        self.clamp_index();
        true
    }
}

fn lock(state: &Mutex<CarouselState>) -> MutexGuard<'_, CarouselState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct AlertCarousel {
    state: Arc<Mutex<CarouselState>>,
    runtime: Handle,
    config: CarouselConfig,
    events: broadcast::Sender<CarouselEvent>,
}

impl AlertCarousel {
    /// Builds a carousel bound to the current tokio runtime, which runs the
    /// auto-dismiss timers.
    pub fn new(alerts: Vec<Alert>, config: CarouselConfig) -> Result<Self, DashboardError> {
        let runtime =
            Handle::try_current().map_err(|err| DashboardError::RuntimeUnavailable(err.to_string()))?;
        Ok(Self::with_runtime(alerts, config, runtime))
    }

    pub fn with_runtime(alerts: Vec<Alert>, config: CarouselConfig, runtime: Handle) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Arc::new(Mutex::new(CarouselState {
                alerts,
                dismissed: HashSet::new(),
                confirmed: HashSet::new(),
                current_index: 0,
                pending_confirmation: None,
                auto_dismiss_timers: HashMap::new(),
                shut_down: false,
            })),
            runtime,
            config,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CarouselEvent> {
        self.events.subscribe()
    }

    /// Replaces the base alert list, e.g. after the incident snapshot changed.
    /// Dismissed and confirmed ids are kept.
    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        let mut state = lock(&self.state);
        state.alerts = alerts;
        if let Some(pending) = state.pending_confirmation.clone() {
            if state.active_alert(&pending).is_none() {
                state.pending_confirmation = None;
            }
        }
        state.clamp_index();
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        lock(&self.state).active_alerts()
    }

    pub fn total_alerts(&self) -> usize {
        lock(&self.state).total()
    }

    /// Alerts still waiting for the user.
    pub fn remaining(&self) -> usize {
        self.total_alerts()
    }

    /// Cursor into [`active_alerts`](Self::active_alerts); `None` when empty.
    pub fn current_index(&self) -> Option<usize> {
        let state = lock(&self.state);
        (state.total() > 0).then_some(state.current_index)
    }

    pub fn current_alert(&self) -> Option<Alert> {
        let state = lock(&self.state);
        state.active_alerts().into_iter().nth(state.current_index)
    }

    pub fn pending_confirmation(&self) -> Option<AlertId> {
        lock(&self.state).pending_confirmation.clone()
    }

    pub fn is_dismissed(&self, alert_id: &AlertId) -> bool {
        lock(&self.state).dismissed.contains(alert_id)
    }

    pub fn is_confirmed(&self, alert_id: &AlertId) -> bool {
        lock(&self.state).confirmed.contains(alert_id)
    }

    pub fn view(&self) -> CarouselView {
        let state = lock(&self.state);
        let active = state.active_alerts();
        let total = active.len();
        let Some(alert) = active.into_iter().nth(state.current_index) else {
            return CarouselView::Empty;
        };

        let confirmed = state.confirmed.contains(&alert.id);
        let confirming = state.pending_confirmation.as_ref() == Some(&alert.id);
        let slide = Slide {
            alert,
            position: state.current_index + 1,
            total,
        };
        if confirmed {
            CarouselView::Confirmed(slide)
        } else if confirming {
            CarouselView::Confirming(slide)
        } else {
            CarouselView::Viewing(slide)
        }
    }

    pub fn go_to_previous(&self) {
        let mut state = lock(&self.state);
        let total = state.total();
        if total == 0 {
            return;
        }
        state.current_index = (state.current_index + total - 1) % total;
    }

    pub fn go_to_next(&self) {
        let mut state = lock(&self.state);
        let total = state.total();
        if total == 0 {
            return;
        }
        state.current_index = (state.current_index + 1) % total;
    }

    pub fn select_index(&self, index: usize) {
        let mut state = lock(&self.state);
        if index < state.total() {
            state.current_index = index;
        } else {
            debug!(index, "select ignored: index out of range");
        }
    }

    /// Asks for confirmation before running the alert's action. Alerts
    /// without an action have nothing to confirm.
    pub fn request_action(&self, alert_id: &AlertId) {
        let mut state = lock(&self.state);
        let has_action = state
            .active_alert(alert_id)
            .is_some_and(|alert| alert.has_action());
        if has_action {
            state.pending_confirmation = Some(alert_id.clone());
        }
    }

    pub fn cancel_confirmation(&self) {
        lock(&self.state).pending_confirmation = None;
    }

    /// Marks the alert confirmed, runs its action once and arms the
    /// auto-dismiss timer. Confirming twice does nothing.
    pub fn confirm_action(&self, alert_id: &AlertId) {
        let action = {
            let mut state = lock(&self.state);
            if state.shut_down {
                return;
            }
            let Some(alert) = state.active_alert(alert_id) else {
                debug!(alert_id = %alert_id, "confirm ignored: alert not active");
                return;
            };
            let action = alert.on_action.clone();
            if !state.confirmed.insert(alert_id.clone()) {
                debug!(alert_id = %alert_id, "confirm ignored: already confirmed");
                return;
            }
            state.pending_confirmation = None;
            action
        };

        info!(alert_id = %alert_id, "alert action confirmed");
        if let Some(action) = action {
            action();
        }
        let _ = self.events.send(CarouselEvent::AlertConfirmed {
            alert_id: alert_id.clone(),
        });

        self.schedule_auto_dismiss(alert_id);
    }

    /// Hides the alert for good. Also cancels its pending auto-dismiss.
    pub fn dismiss(&self, alert_id: &AlertId) {
        let remaining = {
            let mut state = lock(&self.state);
            if let Some(timer) = state.auto_dismiss_timers.remove(alert_id) {
                timer.abort();
            }
            if !state.dismiss(alert_id) {
                return;
            }
            state.total()
        };

        info!(alert_id = %alert_id, remaining, "alert dismissed");
        let _ = self.events.send(CarouselEvent::AlertDismissed {
            alert_id: alert_id.clone(),
            reason: DismissReason::User,
            remaining,
        });
    }

    /// Tears the carousel down: every pending auto-dismiss is cancelled and
    /// later confirmations no longer arm timers.
    pub fn shutdown(&self) {
        let mut state = lock(&self.state);
        state.shut_down = true;
        for (alert_id, timer) in state.auto_dismiss_timers.drain() {
            debug!(alert_id = %alert_id, "auto-dismiss cancelled");
            timer.abort();
        }
    }

    fn schedule_auto_dismiss(&self, alert_id: &AlertId) {
        let mut state = lock(&self.state);
        if state.shut_down || state.dismissed.contains(alert_id) {
            return;
        }

        let weak: Weak<Mutex<CarouselState>> = Arc::downgrade(&self.state);
        let events = self.events.clone();
        let delay = self.config.auto_dismiss_after;
        let id = alert_id.clone();
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(state) = weak.upgrade() else {
                return;
            };
            let remaining = {
                let mut state = lock(&state);
                if state.shut_down {
                    return;
                }
                state.auto_dismiss_timers.remove(&id);
                if !state.dismiss(&id) {
                    return;
                }
                state.total()
            };
            info!(alert_id = %id, remaining, "alert auto-dismissed");
            let _ = events.send(CarouselEvent::AlertDismissed {
                alert_id: id,
                reason: DismissReason::AutoDismiss,
                remaining,
            });
        });

        if let Some(previous) = state.auto_dismiss_timers.insert(alert_id.clone(), timer) {
            previous.abort();
        }
    }
}

impl Drop for AlertCarousel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "tests/carousel_tests.rs"]
mod tests;
