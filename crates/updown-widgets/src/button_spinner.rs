//! `ButtonSpinner`: increase/decrease buttons plus key and wheel spin input.

use crate::spin::{SpinDirection, SpinEventArgs, ValidSpinDirections};
use serde::{Deserialize, Serialize};
use std::any::Any;
use updown_core::{
    widget::AccessibleRole, Dispatcher, Event, Key, MouseButton, Point, Rect, TypeId, Widget,
};

/// Side of the text box the spinner buttons sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ButtonSpinnerLocation {
    /// Buttons left of the text
    Left,
    /// Buttons right of the text
    #[default]
    Right,
}

/// Spin control that turns clicks, Up/Down keys and wheel motion into
/// [`SpinEventArgs`] messages.
///
/// The buttons are enabled per [`ValidSpinDirections`]; keys and the wheel
/// are not filtered here, the receiver guards those.
#[derive(Debug)]
pub struct ButtonSpinner {
    valid_spin_directions: ValidSpinDirections,
    allow_spin: bool,
    show_button_spinner: bool,
    location: ButtonSpinnerLocation,
    increase_bounds: Rect,
    decrease_bounds: Rect,
    pressed: Option<SpinDirection>,
    pointer_captured: bool,
    deferred: Dispatcher<Self>,
    test_id_value: Option<String>,
}

impl Default for ButtonSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonSpinner {
    /// Create a spinner with both directions disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            valid_spin_directions: ValidSpinDirections::empty(),
            allow_spin: true,
            show_button_spinner: true,
            location: ButtonSpinnerLocation::Right,
            increase_bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
            decrease_bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
            pressed: None,
            pointer_captured: false,
            deferred: Dispatcher::new(),
            test_id_value: None,
        }
    }

    /// Allow or block all spin input.
    #[must_use]
    pub const fn allow_spin(mut self, allow: bool) -> Self {
        self.allow_spin = allow;
        self
    }

    /// Show or hide the buttons.
    #[must_use]
    pub const fn show_button_spinner(mut self, show: bool) -> Self {
        self.show_button_spinner = show;
        self
    }

    /// Place the buttons.
    #[must_use]
    pub const fn location(mut self, location: ButtonSpinnerLocation) -> Self {
        self.location = location;
        self
    }

    /// Set the button area; the upper half increases, the lower half decreases.
    #[must_use]
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.set_bounds(bounds);
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Enabled directions.
    #[must_use]
    pub const fn valid_spin_directions(&self) -> ValidSpinDirections {
        self.valid_spin_directions
    }

    /// Whether spin input is accepted at all.
    #[must_use]
    pub const fn is_spin_allowed(&self) -> bool {
        self.allow_spin
    }

    /// Whether the buttons are shown.
    #[must_use]
    pub const fn is_button_spinner_shown(&self) -> bool {
        self.show_button_spinner
    }

    /// Where the buttons sit.
    #[must_use]
    pub const fn get_location(&self) -> ButtonSpinnerLocation {
        self.location
    }

    /// Whether the increase button is enabled.
    #[must_use]
    pub const fn is_increase_enabled(&self) -> bool {
        self.valid_spin_directions.contains(ValidSpinDirections::INCREASE)
    }

    /// Whether the decrease button is enabled.
    #[must_use]
    pub const fn is_decrease_enabled(&self) -> bool {
        self.valid_spin_directions.contains(ValidSpinDirections::DECREASE)
    }

    /// Whether the spinner holds the pointer.
    #[must_use]
    pub const fn has_pointer_capture(&self) -> bool {
        self.pointer_captured
    }

    /// Number of operations waiting for [`flush_deferred`](Self::flush_deferred).
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.pending_count()
    }

    /// Enable exactly these directions.
    pub fn set_valid_spin_directions(&mut self, dirs: ValidSpinDirections) {
        self.valid_spin_directions = dirs;
    }

    /// Allow or block all spin input at runtime.
    pub fn set_allow_spin(&mut self, allow: bool) {
        self.allow_spin = allow;
    }

    /// Show or hide the buttons at runtime.
    pub fn set_show_button_spinner(&mut self, show: bool) {
        self.show_button_spinner = show;
    }

    /// Place the buttons at runtime.
    pub fn set_location(&mut self, location: ButtonSpinnerLocation) {
        self.location = location;
    }

    /// Set the button area at runtime.
    pub fn set_bounds(&mut self, bounds: Rect) {
        let half = bounds.height / 2.0;
        self.increase_bounds = Rect::new(bounds.x, bounds.y, bounds.width, half);
        self.decrease_bounds = Rect::new(bounds.x, bounds.y + half, bounds.width, half);
    }

    /// Run operations deferred until the current input event is processed.
    pub fn flush_deferred(&mut self) {
        for op in self.deferred.drain() {
            op(self);
        }
    }

    fn button_at(&self, position: &Point) -> Option<SpinDirection> {
        if !self.show_button_spinner {
            return None;
        }
        if self.is_increase_enabled() && self.increase_bounds.contains_point(position) {
            Some(SpinDirection::Increase)
        } else if self.is_decrease_enabled() && self.decrease_bounds.contains_point(position) {
            Some(SpinDirection::Decrease)
        } else {
            None
        }
    }

    fn spin(args: SpinEventArgs) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(args))
    }
}

impl Widget for ButtonSpinner {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if !self.allow_spin {
            return None;
        }

        match event {
            Event::KeyDown { key: Key::Up } => Self::spin(SpinEventArgs::new(SpinDirection::Increase)),
            Event::KeyDown { key: Key::Down } => {
                Self::spin(SpinEventArgs::new(SpinDirection::Decrease))
            }
            Event::Scroll { delta_y, .. } if *delta_y > 0.0 => {
                Self::spin(SpinEventArgs::wheel(SpinDirection::Increase))
            }
            Event::Scroll { delta_y, .. } if *delta_y < 0.0 => {
                Self::spin(SpinEventArgs::wheel(SpinDirection::Decrease))
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                let direction = self.button_at(position)?;
                self.pressed = Some(direction);
                // Capture after the press has finished dispatching.
                self.deferred.post(|spinner: &mut Self| {
                    if spinner.pressed.is_some() {
                        spinner.pointer_captured = true;
                    }
                });
                Self::spin(SpinEventArgs::new(direction))
            }
            Event::MouseUp {
                button: MouseButton::Left,
                ..
            } => {
                self.pressed = None;
                self.pointer_captured = false;
                None
            }
            Event::MouseLeave if !self.pointer_captured => {
                self.pressed = None;
                None
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        self.allow_spin
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Button
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spinner() -> ButtonSpinner {
        let mut s = ButtonSpinner::new().bounds(Rect::new(100.0, 0.0, 20.0, 20.0));
        s.set_valid_spin_directions(ValidSpinDirections::all());
        s
    }

    fn args(msg: Option<Box<dyn Any + Send>>) -> Option<SpinEventArgs> {
        msg.and_then(|m| m.downcast::<SpinEventArgs>().ok()).map(|b| *b)
    }

    fn press(at: Point) -> Event {
        Event::MouseDown {
            position: at,
            button: MouseButton::Left,
        }
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_spinner_defaults() {
        let s = ButtonSpinner::default();
        assert!(s.is_spin_allowed());
        assert!(s.is_button_spinner_shown());
        assert_eq!(s.get_location(), ButtonSpinnerLocation::Right);
        assert!(!s.is_increase_enabled());
        assert!(!s.is_decrease_enabled());
    }

    #[test]
    fn test_spinner_builder() {
        let s = ButtonSpinner::new()
            .allow_spin(false)
            .show_button_spinner(false)
            .location(ButtonSpinnerLocation::Left)
            .with_test_id("spin");
        assert!(!s.is_spin_allowed());
        assert!(!s.is_button_spinner_shown());
        assert_eq!(s.get_location(), ButtonSpinnerLocation::Left);
        assert_eq!(Widget::test_id(&s), Some("spin"));
    }

    // =========================================================================
    // Key and Wheel Tests
    // =========================================================================

    #[test]
    fn test_arrow_keys_spin() {
        let mut s = spinner();
        assert_eq!(
            args(s.event(&Event::KeyDown { key: Key::Up })),
            Some(SpinEventArgs::new(SpinDirection::Increase))
        );
        assert_eq!(
            args(s.event(&Event::KeyDown { key: Key::Down })),
            Some(SpinEventArgs::new(SpinDirection::Decrease))
        );
    }

    #[test]
    fn test_wheel_spins_by_sign() {
        let mut s = spinner();
        let up = args(s.event(&Event::Scroll { delta_x: 0.0, delta_y: 1.0 }));
        assert_eq!(up, Some(SpinEventArgs::wheel(SpinDirection::Increase)));
        let down = args(s.event(&Event::Scroll { delta_x: 0.0, delta_y: -3.0 }));
        assert_eq!(down, Some(SpinEventArgs::wheel(SpinDirection::Decrease)));
        assert!(s.event(&Event::Scroll { delta_x: 2.0, delta_y: 0.0 }).is_none());
    }

    #[test]
    fn test_disallowed_spin_is_silent() {
        let mut s = spinner().allow_spin(false);
        assert!(s.event(&Event::KeyDown { key: Key::Up }).is_none());
        assert!(s.event(&press(Point::new(110.0, 5.0))).is_none());
    }

    // =========================================================================
    // Button Tests
    // =========================================================================

    #[test]
    fn test_buttons_hit_halves() {
        let mut s = spinner();
        assert_eq!(
            args(s.event(&press(Point::new(110.0, 5.0)))).map(|a| a.direction),
            Some(SpinDirection::Increase)
        );
        assert_eq!(
            args(s.event(&press(Point::new(110.0, 15.0)))).map(|a| a.direction),
            Some(SpinDirection::Decrease)
        );
        assert!(s.event(&press(Point::new(10.0, 5.0))).is_none());
    }

    #[test]
    fn test_disabled_button_does_not_fire() {
        let mut s = spinner();
        s.set_valid_spin_directions(ValidSpinDirections::DECREASE);
        assert!(s.event(&press(Point::new(110.0, 5.0))).is_none());
        assert!(s.event(&press(Point::new(110.0, 15.0))).is_some());
    }

    #[test]
    fn test_hidden_buttons_do_not_fire() {
        let mut s = spinner().show_button_spinner(false);
        assert!(s.event(&press(Point::new(110.0, 5.0))).is_none());
        assert!(s.event(&Event::KeyDown { key: Key::Up }).is_some());
    }

    // =========================================================================
    // Pointer Capture Tests
    // =========================================================================

    #[test]
    fn test_capture_is_deferred() {
        let mut s = spinner();
        s.event(&press(Point::new(110.0, 5.0)));
        assert!(!s.has_pointer_capture());
        assert_eq!(s.pending_deferred(), 1);
        s.flush_deferred();
        assert!(s.has_pointer_capture());
        assert_eq!(s.pending_deferred(), 0);
    }

    #[test]
    fn test_release_before_flush_skips_capture() {
        let mut s = spinner();
        s.event(&press(Point::new(110.0, 5.0)));
        s.event(&Event::MouseUp {
            position: Point::new(110.0, 5.0),
            button: MouseButton::Left,
        });
        s.flush_deferred();
        assert!(!s.has_pointer_capture());
    }

    #[test]
    fn test_release_drops_capture() {
        let mut s = spinner();
        s.event(&press(Point::new(110.0, 5.0)));
        s.flush_deferred();
        s.event(&Event::MouseUp {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Left,
        });
        assert!(!s.has_pointer_capture());
    }
}
