//! Tests for the kernel configuration builder.

use super::*;

/// Ensures the default snapshot mirrors the named constants.
#[test]
fn default_config_matches_constants() {
    let cfg = KernelConfig::default();
    assert_eq!(cfg.epsilon, EPSILON);
    assert_eq!(cfg.default_resolution_2d, DEFAULT_RESOLUTION_2D);
    assert_eq!(cfg.default_resolution_3d, DEFAULT_RESOLUTION_3D);
    assert!(!cfg.debug_assertions);
}

/// Validates the builder rejects invalid values.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        KernelConfig::new(0.0, 32, 12, false).unwrap_err(),
        ConfigError::InvalidEpsilon(0.0)
    );
    assert_eq!(
        KernelConfig::new(1e-5, 2, 12, false).unwrap_err(),
        ConfigError::InvalidResolution(2)
    );
    assert_eq!(
        KernelConfig::new(1e-5, 32, 1, false).unwrap_err(),
        ConfigError::InvalidResolution(1)
    );
    assert!(KernelConfig::new(f64::NAN, 32, 12, false).is_err());
}

#[test]
fn with_debug_assertions_toggles_flag() {
    let cfg = KernelConfig::default().with_debug_assertions(true);
    assert!(cfg.debug_assertions);
    assert_eq!(cfg.epsilon, EPSILON);
}

#[test]
fn error_messages_name_the_value() {
    let message = ConfigError::InvalidResolution(2).to_string();
    assert!(message.contains('2'));
    assert!(message.contains(">= 3"));
}
