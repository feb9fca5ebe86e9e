use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_PRELOAD_SETTLE_MS: u64 = 100;
const DEFAULT_COMMIT_DELAY_MS: u64 = 20;
const DEFAULT_ANIMATION_TIMEOUT_MS: u64 = 2_000;

/// Delays and bounds used by the navigation controller.
///
/// `preload_settle` and `commit_delay` only raise the odds that prefetched
/// content is ready when the swap runs. Nothing depends on them for
/// correctness. `animation_timeout` and `safety_margin` bound how long the
/// transition lock can be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    pub preload_settle: Duration,
    pub commit_delay: Duration,
    pub animation_timeout: Duration,
    pub safety_margin: Duration,
}

impl TransitionTimings {
    /// Time after lock acquisition at which the safety guard force-releases.
    pub fn lock_deadline(&self) -> Duration {
        self.animation_timeout.saturating_add(self.safety_margin)
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        TimingSettings::default().into()
    }
}

/// Millisecond form of [`TransitionTimings`] as it appears in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub preload_settle_ms: u64,
    pub commit_delay_ms: u64,
    pub animation_timeout_ms: u64,
    /// Defaults to a tenth of the animation timeout when absent.
    pub safety_margin_ms: Option<u64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            preload_settle_ms: DEFAULT_PRELOAD_SETTLE_MS,
            commit_delay_ms: DEFAULT_COMMIT_DELAY_MS,
            animation_timeout_ms: DEFAULT_ANIMATION_TIMEOUT_MS,
            safety_margin_ms: None,
        }
    }
}

impl From<TimingSettings> for TransitionTimings {
    fn from(value: TimingSettings) -> Self {
        let safety_margin_ms = value
            .safety_margin_ms
            .unwrap_or(value.animation_timeout_ms / 10);
        Self {
            preload_settle: Duration::from_millis(value.preload_settle_ms),
            commit_delay: Duration::from_millis(value.commit_delay_ms),
            animation_timeout: Duration::from_millis(value.animation_timeout_ms),
            safety_margin: Duration::from_millis(safety_margin_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let timings = TransitionTimings::default();
        assert_eq!(timings.preload_settle, Duration::from_millis(100));
        assert_eq!(timings.commit_delay, Duration::from_millis(20));
        assert_eq!(timings.animation_timeout, Duration::from_secs(2));
        assert_eq!(timings.safety_margin, Duration::from_millis(200));
        assert_eq!(timings.lock_deadline(), Duration::from_millis(2_200));
    }

    #[test]
    fn partial_settings_keep_remaining_defaults() {
        let settings: TimingSettings =
            toml::from_str("animation_timeout_ms = 500").expect("parse");
        let timings = TransitionTimings::from(settings);
        assert_eq!(timings.animation_timeout, Duration::from_millis(500));
        assert_eq!(timings.safety_margin, Duration::from_millis(50));
        assert_eq!(timings.preload_settle, Duration::from_millis(100));
    }

    #[test]
    fn explicit_safety_margin_wins() {
        let settings = TimingSettings {
            safety_margin_ms: Some(5),
            ..TimingSettings::default()
        };
        assert_eq!(
            TransitionTimings::from(settings).safety_margin,
            Duration::from_millis(5)
        );
    }
}
