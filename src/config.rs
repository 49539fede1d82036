//! Engine configuration with environment overrides.

use std::time::Duration;

const DEFAULT_FINDINGS_CAP: usize = 128;
const DEFAULT_DEBOUNCE_MS: u64 = 600;

/// Tunables for one engine instance.
///
/// The findings cap is a hard lifetime limit: once the counter reaches it,
/// scanning permanently stops for the page. Severity assignment is a fixed
/// per-detector lookup and intentionally not configurable.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Lifetime cap on total findings across all scan cycles.
    pub findings_cap: usize,
    /// Quiet period before a mutation burst triggers one rescan.
    pub debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            findings_cap: DEFAULT_FINDINGS_CAP,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl EngineConfig {
    /// Defaults, overridable via `MURK_FINDINGS_CAP` and `MURK_DEBOUNCE_MS`.
    pub fn from_env() -> Self {
        Self {
            findings_cap: read_env_usize("MURK_FINDINGS_CAP", DEFAULT_FINDINGS_CAP).max(1),
            debounce: Duration::from_millis(read_env_u64("MURK_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)),
        }
    }
}

fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_value)
}

fn read_env_usize(name: &str, default_value: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.findings_cap, 128);
        assert_eq!(cfg.debounce, Duration::from_millis(600));
    }
}
