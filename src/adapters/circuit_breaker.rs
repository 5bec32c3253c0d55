use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSettings {
    pub failure_threshold: u32,
    pub recovery_timeout: Duration,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

/// Lock-free breaker guarding one remote service.
///
/// Closed counts consecutive failures and opens at the threshold. Open rejects
/// calls until the recovery timeout has passed, then lets a single trial call
/// through as HalfOpen. The trial's outcome closes or re-opens the circuit.
/// A trial call that never reports back is replaced by a new one once another
/// recovery timeout has passed.
#[derive(Debug)]
pub struct CircuitBreaker {
    service: String,
    state: AtomicU8,
    failures: AtomicU32,
    opened_at_ms: AtomicU64,
    trial_started_ms: AtomicU64,
    settings: BreakerSettings,
    started: Instant,
}

impl CircuitBreaker {
    pub fn new(service: &str, settings: BreakerSettings) -> Self {
        Self {
            service: service.to_string(),
            state: AtomicU8::new(CircuitState::Closed.to_u8()),
            failures: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            trial_started_ms: AtomicU64::new(0),
            settings,
            started: Instant::now(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn failure_count(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn recovery_ms(&self) -> u64 {
        u64::try_from(self.settings.recovery_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Whether a call may go out now. May move Open to HalfOpen.
    pub fn is_allowed(&self) -> bool {
        let now = self.elapsed_ms();
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                let started = self.trial_started_ms.load(Ordering::SeqCst);
                if now.saturating_sub(started) < self.recovery_ms() {
                    return false;
                }
                let retry = self
                    .trial_started_ms
                    .compare_exchange(started, now, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok();
                if retry {
                    tracing::warn!(service = %self.service, "Trial call never reported back, sending another");
                }
                retry
            }
            CircuitState::Open => {
                let opened = self.opened_at_ms.load(Ordering::SeqCst);
                if now.saturating_sub(opened) < self.recovery_ms() {
                    return false;
                }
                self.trial_started_ms.store(now, Ordering::SeqCst);
                let trial = self
                    .state
                    .compare_exchange(
                        CircuitState::Open.to_u8(),
                        CircuitState::HalfOpen.to_u8(),
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok();
                if trial {
                    tracing::info!(service = %self.service, "Circuit half-open, sending trial call");
                }
                trial
            }
        }
    }

    pub fn record_success(&self) {
        self.failures.store(0, Ordering::SeqCst);
        let previous = self
            .state
            .swap(CircuitState::Closed.to_u8(), Ordering::SeqCst);
        if CircuitState::from_u8(previous) != CircuitState::Closed {
            tracing::info!(service = %self.service, "Circuit closed");
        }
    }

    pub fn record_failure(&self) {
        let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
        let tripped = self.state() == CircuitState::HalfOpen
            || failures >= self.settings.failure_threshold;
        if tripped {
            self.opened_at_ms.store(self.elapsed_ms(), Ordering::SeqCst);
            self.state.store(CircuitState::Open.to_u8(), Ordering::SeqCst);
            tracing::warn!(
                service = %self.service,
                failures,
                "Circuit opened"
            );
        }
    }
}
