//! Adaptive scaling strategy.
//!
//! The auto-scaler watches tick utilization and proposes scaling-factor
//! adjustments that keep the coordinator near a target load. It is a pure
//! strategy object: the embedder samples
//! [`PerformanceMetrics::tick_utilization`](crate::PerformanceMetrics) at
//! its own cadence, feeds it to [`AutoScaler::observe`], and applies any
//! proposed factor via
//! [`TickCoordinator::set_scaling_factor`](crate::TickCoordinator).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

/// Auto-scaler tuning knobs.
#[derive(Debug, Clone)]
pub struct AutoScalerConfig {
    /// Tick utilization the scaler steers toward.
    pub target_utilization: f64,
    /// Dead band around the target within which no adjustment happens.
    pub tolerance: f64,
    /// Utilization sample window length.
    pub window: usize,
    /// Maximum standard deviation of the window for it to count as stable.
    pub stability_stddev: f64,
    /// Relative step per adjustment (0.10 = ±10%).
    pub step_ratio: f64,
    /// Lower clamp for proposed scaling factors.
    pub min_scaling: f64,
    /// Upper clamp for proposed scaling factors.
    pub max_scaling: f64,
    /// Minimum wall-clock time between adjustments.
    pub cooldown: Duration,
}

impl Default for AutoScalerConfig {
    fn default() -> Self {
        Self {
            target_utilization: 0.70,
            tolerance: 0.05,
            window: 10,
            stability_stddev: 0.10,
            step_ratio: 0.10,
            min_scaling: 0.01,
            max_scaling: 100.0,
            cooldown: Duration::from_secs(5),
        }
    }
}

/// Utilization-driven scaling-factor strategy.
///
/// Adjusts only when the recent utilization window is stable (low
/// standard deviation), the current value sits outside the dead band,
/// and the cooldown has expired. Overloaded (utilization above target)
/// proposes a slower simulation; underloaded proposes a faster one.
#[derive(Debug)]
pub struct AutoScaler {
    config: AutoScalerConfig,
    samples: VecDeque<f64>,
    last_adjustment: Option<Instant>,
}

impl AutoScaler {
    /// Create a scaler with the given configuration.
    pub fn new(config: AutoScalerConfig) -> Self {
        let capacity = config.window;
        Self { config, samples: VecDeque::with_capacity(capacity), last_adjustment: None }
    }

    /// Feed one utilization sample; returns a proposed scaling factor when
    /// an adjustment is warranted.
    ///
    /// `now` is injected so the cooldown is testable without sleeping.
    pub fn observe(&mut self, utilization: f64, current_scaling: f64, now: Instant) -> Option<f64> {
        if !utilization.is_finite() {
            return None;
        }
        self.samples.push_back(utilization);
        if self.samples.len() > self.config.window {
            self.samples.pop_front();
        }
        if self.samples.len() < self.config.window {
            return None;
        }
        if self.stddev() >= self.config.stability_stddev {
            return None;
        }

        let deviation = utilization - self.config.target_utilization;
        if deviation.abs() <= self.config.tolerance {
            return None;
        }
        if let Some(last) = self.last_adjustment {
            if now.duration_since(last) < self.config.cooldown {
                return None;
            }
        }

        // Above target: the loop is too loaded, slow the simulation down.
        let step = if deviation > 0.0 {
            1.0 - self.config.step_ratio
        } else {
            1.0 + self.config.step_ratio
        };
        let proposed =
            (current_scaling * step).clamp(self.config.min_scaling, self.config.max_scaling);
        if proposed == current_scaling {
            return None;
        }

        self.last_adjustment = Some(now);
        debug!(utilization, current_scaling, proposed, "auto-scaler adjustment");
        Some(proposed)
    }

    fn stddev(&self) -> f64 {
        let n = self.samples.len() as f64;
        let mean = self.samples.iter().sum::<f64>() / n;
        let variance =
            self.samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
        variance.sqrt()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(scaler: &mut AutoScaler, value: f64, current: f64, now: Instant) -> Option<f64> {
        let mut out = None;
        for _ in 0..scaler.config.window {
            out = scaler.observe(value, current, now);
        }
        out
    }

    #[test]
    fn no_proposal_until_window_is_full() {
        let mut scaler = AutoScaler::new(AutoScalerConfig::default());
        let now = Instant::now();
        for _ in 0..9 {
            assert_eq!(scaler.observe(0.95, 1.0, now), None);
        }
        // Tenth stable overloaded sample triggers a slow-down.
        let proposed = scaler.observe(0.95, 1.0, now).unwrap();
        assert!(proposed < 1.0);
    }

    #[test]
    fn overload_slows_underload_speeds_up() {
        let now = Instant::now();

        let mut scaler = AutoScaler::new(AutoScalerConfig::default());
        let slower = filled(&mut scaler, 0.90, 2.0, now).unwrap();
        assert!((slower - 1.8).abs() < 1e-12);

        let mut scaler = AutoScaler::new(AutoScalerConfig::default());
        let faster = filled(&mut scaler, 0.40, 2.0, now).unwrap();
        assert!((faster - 2.2).abs() < 1e-12);
    }

    #[test]
    fn dead_band_suppresses_adjustment() {
        let mut scaler = AutoScaler::new(AutoScalerConfig::default());
        assert_eq!(filled(&mut scaler, 0.72, 1.0, Instant::now()), None);
    }

    #[test]
    fn unstable_window_suppresses_adjustment() {
        let mut scaler = AutoScaler::new(AutoScalerConfig::default());
        let now = Instant::now();
        // Alternating extremes: mean is near target but stddev is large.
        for i in 0..scaler.config.window {
            let sample = if i % 2 == 0 { 0.2 } else { 1.2 };
            assert_eq!(scaler.observe(sample, 1.0, now), None);
        }
    }

    #[test]
    fn cooldown_limits_adjustment_rate() {
        let mut scaler = AutoScaler::new(AutoScalerConfig::default());
        let t0 = Instant::now();
        assert!(filled(&mut scaler, 0.95, 1.0, t0).is_some());
        // Same overload immediately after: still cooling down.
        assert_eq!(scaler.observe(0.95, 0.9, t0 + Duration::from_secs(1)), None);
        // After the cooldown the next stable overload adjusts again.
        assert!(scaler.observe(0.95, 0.9, t0 + Duration::from_secs(6)).is_some());
    }

    #[test]
    fn proposals_clamp_to_configured_range() {
        let config = AutoScalerConfig { min_scaling: 0.5, ..Default::default() };
        let mut scaler = AutoScaler::new(config);
        let proposed = filled(&mut scaler, 0.95, 0.5, Instant::now());
        // Already at the clamp: nothing to propose.
        assert_eq!(proposed, None);
    }
}
