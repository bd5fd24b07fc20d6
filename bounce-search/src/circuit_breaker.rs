//! Per-provider circuit breaker.
//!
//! Tracks consecutive failures per provider label and stops calling a
//! provider that keeps failing. After a cooldown the circuit goes
//! half-open and exactly one probe call decides whether the provider is
//! restored or tripped again.
//!
//! # State Machine
//!
//! ```text
//! ┌────────┐  N failures   ┌────────┐  cooldown   ┌──────────┐
//! │ Closed ├──────────────►│  Open  ├────────────►│ HalfOpen │
//! └───▲────┘               └───▲────┘             └────┬─────┘
//!     │                        │   probe failure       │
//!     │  probe success         └───────────────────────┤
//!     └────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Circuit state for a single provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Provider is healthy; every call goes through.
    Closed,
    /// Provider failed too often; calls are skipped until the cooldown ends.
    Open,
    /// Cooldown elapsed; one probe call is in flight.
    HalfOpen,
}

/// Configuration for circuit breaker behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that trip the circuit to Open.
    pub failure_threshold: u32,
    /// Seconds to stay Open before allowing a probe.
    pub cooldown_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
struct ProviderHealth {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

impl Default for ProviderHealth {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at: None,
        }
    }
}

/// Health of every provider the breaker has seen, keyed by label.
///
/// Not internally synchronised; the aggregator owns it behind a mutex
/// and never holds the lock across a provider call.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    providers: HashMap<String, ProviderHealth>,
}

impl CircuitBreaker {
    /// Create a breaker with the given configuration.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            providers: HashMap::new(),
        }
    }

    /// Decide whether `provider` should be called now.
    ///
    /// - Closed: always `true`
    /// - Open: `true` once the cooldown has elapsed, moving to HalfOpen
    /// - HalfOpen: `false` while the probe is in flight; a probe that never
    ///   reported back is replaced after another cooldown
    pub fn should_attempt(&mut self, provider: &str) -> bool {
        let cooldown = Duration::from_secs(self.config.cooldown_secs);
        let health = self.providers.entry(provider.to_owned()).or_default();

        if health.state == CircuitState::Closed {
            return true;
        }
        let cooled = health.opened_at.is_none_or(|t| t.elapsed() >= cooldown);
        if cooled {
            health.state = CircuitState::HalfOpen;
            health.opened_at = Some(Instant::now());
        }
        cooled
    }

    /// Record a successful call; closes the circuit.
    pub fn record_success(&mut self, provider: &str) {
        let health = self.providers.entry(provider.to_owned()).or_default();
        health.state = CircuitState::Closed;
        health.consecutive_failures = 0;
        health.opened_at = None;
    }

    /// Record a failed call.
    ///
    /// A failed half-open probe re-opens immediately; otherwise the
    /// circuit opens once consecutive failures reach the threshold.
    pub fn record_failure(&mut self, provider: &str) {
        let threshold = self.config.failure_threshold;
        let health = self.providers.entry(provider.to_owned()).or_default();
        health.consecutive_failures = health.consecutive_failures.saturating_add(1);

        let trip = health.state == CircuitState::HalfOpen || health.consecutive_failures >= threshold;
        if trip {
            if health.state != CircuitState::Open {
                tracing::warn!(provider, failures = health.consecutive_failures, "circuit opened");
            }
            health.state = CircuitState::Open;
            health.opened_at = Some(Instant::now());
        }
    }

    /// Current state of `provider`; unseen providers are Closed.
    pub fn state(&self, provider: &str) -> CircuitState {
        self.providers
            .get(provider)
            .map_or(CircuitState::Closed, |h| h.state)
    }

    /// `(label, state, consecutive_failures)` for every tracked provider,
    /// sorted by label.
    pub fn health_report(&self) -> Vec<(String, CircuitState, u32)> {
        let mut report: Vec<_> = self
            .providers
            .iter()
            .map(|(label, h)| (label.clone(), h.state, h.consecutive_failures))
            .collect();
        report.sort_by(|a, b| a.0.cmp(&b.0));
        report
    }
}
