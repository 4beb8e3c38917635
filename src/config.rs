//! Tunables for roster limits and wheel feel

use serde::{Deserialize, Serialize};

pub const MIN_NAMES: usize = 2;
pub const MAX_NAMES: usize = 20;
pub const MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelConfig {
    pub min_names: usize,
    pub max_names: usize,
    pub max_name_length: usize,
    /// Inclusive range of extra full turns added to every spin
    pub min_extra_rotations: u32,
    pub max_extra_rotations: u32,
    /// Max landing offset from the segment center, as a fraction of the segment
    pub landing_jitter: f64,
    pub spin_duration_min_ms: u64,
    pub spin_duration_max_ms: u64,
    pub celebration_ms: u64,
    /// Confetti runs a little longer when the last participant is picked without a spin
    pub last_pick_celebration_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            min_names: MIN_NAMES,
            max_names: MAX_NAMES,
            max_name_length: MAX_NAME_LENGTH,
            min_extra_rotations: 5,
            max_extra_rotations: 10,
            landing_jitter: 0.25,
            spin_duration_min_ms: 4000,
            spin_duration_max_ms: 6000,
            celebration_ms: 2500,
            last_pick_celebration_ms: 3000,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl WheelConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            min_names: env_parse("WHEEL_MIN_NAMES").unwrap_or(defaults.min_names),
            max_names: env_parse("WHEEL_MAX_NAMES").unwrap_or(defaults.max_names),
            max_name_length: env_parse("WHEEL_MAX_NAME_LENGTH")
                .unwrap_or(defaults.max_name_length),
            min_extra_rotations: env_parse("WHEEL_MIN_ROTATIONS")
                .unwrap_or(defaults.min_extra_rotations),
            max_extra_rotations: env_parse("WHEEL_MAX_ROTATIONS")
                .unwrap_or(defaults.max_extra_rotations),
            spin_duration_min_ms: env_parse("WHEEL_SPIN_MIN_MS")
                .unwrap_or(defaults.spin_duration_min_ms),
            spin_duration_max_ms: env_parse("WHEEL_SPIN_MAX_MS")
                .unwrap_or(defaults.spin_duration_max_ms),
            ..defaults
        };

        let config = config.normalized();
        tracing::info!(
            "Wheel config: {}..={} names, {}..={} extra rotations",
            config.min_names,
            config.max_names,
            config.min_extra_rotations,
            config.max_extra_rotations
        );
        config
    }

    /// Repair inverted ranges and out-of-bounds values
    pub fn normalized(mut self) -> Self {
        self.min_names = self.min_names.max(1);
        if self.max_names < self.min_names {
            tracing::warn!(
                "max_names {} below min_names {}, raising it",
                self.max_names,
                self.min_names
            );
            self.max_names = self.min_names;
        }
        self.max_name_length = self.max_name_length.max(1);

        // At least one full turn keeps the target strictly ahead of the current rotation
        self.min_extra_rotations = self.min_extra_rotations.max(1);
        if self.max_extra_rotations < self.min_extra_rotations {
            self.max_extra_rotations = self.min_extra_rotations;
        }

        if !(0.0..0.5).contains(&self.landing_jitter) {
            self.landing_jitter = 0.25;
        }

        if self.spin_duration_max_ms < self.spin_duration_min_ms {
            self.spin_duration_max_ms = self.spin_duration_min_ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "WHEEL_MIN_NAMES",
            "WHEEL_MAX_NAMES",
            "WHEEL_MAX_NAME_LENGTH",
            "WHEEL_MIN_ROTATIONS",
            "WHEEL_MAX_ROTATIONS",
            "WHEEL_SPIN_MIN_MS",
            "WHEEL_SPIN_MAX_MS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        assert_eq!(WheelConfig::from_env(), WheelConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("WHEEL_MAX_NAMES", "12");
        std::env::set_var("WHEEL_MIN_ROTATIONS", "3");
        std::env::set_var("WHEEL_MAX_ROTATIONS", "4");

        let config = WheelConfig::from_env();
        assert_eq!(config.max_names, 12);
        assert_eq!(config.min_extra_rotations, 3);
        assert_eq!(config.max_extra_rotations, 4);
        assert_eq!(config.min_names, MIN_NAMES);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env();
        std::env::set_var("WHEEL_MAX_NAMES", "lots");
        assert_eq!(WheelConfig::from_env().max_names, MAX_NAMES);
        clear_env();
    }

    #[test]
    fn test_normalized_repairs_ranges() {
        let config = WheelConfig {
            min_names: 0,
            max_names: 0,
            min_extra_rotations: 0,
            max_extra_rotations: 0,
            landing_jitter: 0.9,
            spin_duration_min_ms: 5000,
            spin_duration_max_ms: 100,
            ..WheelConfig::default()
        }
        .normalized();

        assert_eq!(config.min_names, 1);
        assert_eq!(config.max_names, 1);
        assert_eq!(config.min_extra_rotations, 1);
        assert_eq!(config.max_extra_rotations, 1);
        assert_eq!(config.landing_jitter, 0.25);
        assert_eq!(config.spin_duration_max_ms, 5000);
    }
}
