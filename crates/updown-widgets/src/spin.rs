//! Spin controller: valid directions and step targets.
//!
//! A spin is an increment or decrement request coming from the spinner
//! buttons, the Up/Down keys or the mouse wheel. This module decides which
//! directions are currently allowed and what value a step lands on.

use crate::bounds::Bounds;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Directions in which a spin is currently allowed.
    ///
    /// The empty set disables both spinner buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ValidSpinDirections: u8 {
        /// Increase is allowed.
        const INCREASE = 1;
        /// Decrease is allowed.
        const DECREASE = 1 << 1;
    }
}

/// Direction of a single spin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinDirection {
    /// Step up by the increment
    Increase,
    /// Step down by the increment
    Decrease,
}

impl SpinDirection {
    /// The direction bit that must be set for this request to be honored.
    #[must_use]
    pub const fn flag(self) -> ValidSpinDirections {
        match self {
            Self::Increase => ValidSpinDirections::INCREASE,
            Self::Decrease => ValidSpinDirections::DECREASE,
        }
    }
}

/// Payload of a spin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinEventArgs {
    /// Requested direction
    pub direction: SpinDirection,
    /// Whether the request came from the mouse wheel
    pub used_mouse_wheel: bool,
}

impl SpinEventArgs {
    /// Spin request from a button or key.
    #[must_use]
    pub const fn new(direction: SpinDirection) -> Self {
        Self {
            direction,
            used_mouse_wheel: false,
        }
    }

    /// Spin request from the mouse wheel.
    #[must_use]
    pub const fn wheel(direction: SpinDirection) -> Self {
        Self {
            direction,
            used_mouse_wheel: true,
        }
    }
}

/// Compute which spin directions are allowed for the given state.
///
/// A zero increment or a read-only widget disables spinning outright. An
/// absent or NaN value allows both directions so the user can spin out of
/// it; otherwise a direction is allowed while the value has room to move.
#[must_use]
pub fn compute_valid_directions(
    value: Option<f64>,
    minimum: f64,
    maximum: f64,
    increment: f64,
    is_read_only: bool,
) -> ValidSpinDirections {
    if increment == 0.0 || is_read_only {
        return ValidSpinDirections::empty();
    }

    let mut dirs = ValidSpinDirections::empty();
    match value {
        None => dirs |= ValidSpinDirections::all(),
        Some(v) => {
            if v.is_nan() {
                dirs |= ValidSpinDirections::all();
            }
            if v < maximum {
                dirs |= ValidSpinDirections::INCREASE;
            }
            if v > minimum {
                dirs |= ValidSpinDirections::DECREASE;
            }
        }
    }
    dirs
}

/// Value a single spin step lands on, clamped into `bounds`.
///
/// An absent or NaN value is seeded from the bound on the side the step
/// leaves from (the explicit minimum when increasing, the explicit maximum
/// when decreasing), or zero when that bound was never set.
#[must_use]
pub fn step_target(
    direction: SpinDirection,
    value: Option<f64>,
    increment: f64,
    bounds: &Bounds,
) -> f64 {
    let target = match (value.filter(|v| !v.is_nan()), direction) {
        (Some(v), SpinDirection::Increase) => v + increment,
        (Some(v), SpinDirection::Decrease) => v - increment,
        (None, SpinDirection::Increase) => bounds.explicit_minimum().unwrap_or(0.0),
        (None, SpinDirection::Decrease) => bounds.explicit_maximum().unwrap_or(0.0),
    };
    bounds.clamp(target)
}

/// Whether a spin request should act, given where it came from.
///
/// Wheel spins only act while the text field has keyboard focus; button
/// and key spins always act.
#[must_use]
pub const fn should_spin(used_mouse_wheel: bool, text_focused: bool) -> bool {
    !used_mouse_wheel || text_focused
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounded(min: f64, max: f64) -> Bounds {
        let mut b = Bounds::new();
        b.set_minimum(min);
        b.set_maximum(max);
        b
    }

    // =========================================================================
    // compute_valid_directions Tests
    // =========================================================================

    #[test]
    fn test_absent_value_allows_both() {
        let dirs = compute_valid_directions(None, 0.0, 10.0, 1.0, false);
        assert_eq!(dirs, ValidSpinDirections::all());
    }

    #[test]
    fn test_at_maximum_allows_decrease_only() {
        let dirs = compute_valid_directions(Some(5.0), 0.0, 5.0, 1.0, false);
        assert_eq!(dirs, ValidSpinDirections::DECREASE);
    }

    #[test]
    fn test_at_minimum_allows_increase_only() {
        let dirs = compute_valid_directions(Some(0.0), 0.0, 5.0, 1.0, false);
        assert_eq!(dirs, ValidSpinDirections::INCREASE);
    }

    #[test]
    fn test_zero_increment_disables() {
        assert!(compute_valid_directions(Some(3.0), 0.0, 5.0, 0.0, false).is_empty());
        assert!(compute_valid_directions(None, 0.0, 5.0, 0.0, false).is_empty());
    }

    #[test]
    fn test_read_only_disables() {
        assert!(compute_valid_directions(Some(3.0), 0.0, 5.0, 1.0, true).is_empty());
    }

    #[test]
    fn test_nan_allows_both() {
        let dirs = compute_valid_directions(Some(f64::NAN), 0.0, 0.0, 1.0, false);
        assert_eq!(dirs, ValidSpinDirections::all());
    }

    #[test]
    fn test_degenerate_range_disables_both() {
        assert!(compute_valid_directions(Some(2.0), 2.0, 2.0, 1.0, false).is_empty());
    }

    // =========================================================================
    // step_target Tests
    // =========================================================================

    #[test]
    fn test_step_from_finite_value() {
        let b = bounded(0.0, 10.0);
        assert_eq!(step_target(SpinDirection::Increase, Some(4.0), 1.5, &b), 5.5);
        assert_eq!(step_target(SpinDirection::Decrease, Some(4.0), 1.5, &b), 2.5);
    }

    #[test]
    fn test_step_clamps_into_bounds() {
        let b = bounded(0.0, 10.0);
        assert_eq!(step_target(SpinDirection::Increase, Some(9.5), 1.0, &b), 10.0);
        assert_eq!(step_target(SpinDirection::Decrease, Some(0.5), 1.0, &b), 0.0);
    }

    #[test]
    fn test_step_from_nan_seeds_from_minimum() {
        let b = bounded(3.0, 10.0);
        assert_eq!(step_target(SpinDirection::Increase, Some(f64::NAN), 1.0, &b), 3.0);
        assert_eq!(step_target(SpinDirection::Decrease, Some(f64::NAN), 1.0, &b), 10.0);
    }

    #[test]
    fn test_step_from_absent_without_bounds_seeds_zero() {
        let b = Bounds::new();
        assert_eq!(step_target(SpinDirection::Increase, None, 1.0, &b), 0.0);
        assert_eq!(step_target(SpinDirection::Decrease, None, 1.0, &b), 0.0);
    }

    #[test]
    fn test_step_seed_is_clamped() {
        // Only a maximum below zero is set; the zero seed lands on it.
        let mut b = Bounds::new();
        b.set_maximum(-5.0);
        assert_eq!(step_target(SpinDirection::Increase, None, 1.0, &b), -5.0);
    }

    // =========================================================================
    // Arbitration Tests
    // =========================================================================

    #[test]
    fn test_should_spin() {
        assert!(should_spin(false, false));
        assert!(should_spin(false, true));
        assert!(should_spin(true, true));
        assert!(!should_spin(true, false));
    }

    #[test]
    fn test_spin_args_constructors() {
        assert!(!SpinEventArgs::new(SpinDirection::Increase).used_mouse_wheel);
        assert!(SpinEventArgs::wheel(SpinDirection::Decrease).used_mouse_wheel);
        assert_eq!(SpinDirection::Decrease.flag(), ValidSpinDirections::DECREASE);
    }

    proptest! {
        #[test]
        fn prop_zero_increment_always_empty(v in prop::option::of(-1.0e6f64..1.0e6), ro in any::<bool>()) {
            prop_assert!(compute_valid_directions(v, -10.0, 10.0, 0.0, ro).is_empty());
        }

        #[test]
        fn prop_interior_value_allows_both(v in -9.0f64..9.0) {
            prop_assert_eq!(
                compute_valid_directions(Some(v), -10.0, 10.0, 1.0, false),
                ValidSpinDirections::all()
            );
        }

        #[test]
        fn prop_step_stays_in_bounds(v in -100.0f64..100.0, inc in 0.0f64..50.0, up in any::<bool>()) {
            let b = bounded(-20.0, 20.0);
            let dir = if up { SpinDirection::Increase } else { SpinDirection::Decrease };
            let t = step_target(dir, Some(v), inc, &b);
            prop_assert!((-20.0..=20.0).contains(&t));
        }
    }
}
