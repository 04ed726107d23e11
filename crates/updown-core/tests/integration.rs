//! Integration tests for updown-core.
//!
//! These tests verify the public API works correctly end-to-end.

use std::any::Any;
use std::sync::{Arc, Mutex};
use updown_core::{
    AccessibleRole, Dispatcher, Event, Key, Observers, Point, Rect, TypeId, ValidationResult,
    Widget,
};

// =============================================================================
// Widget Integration Tests
// =============================================================================

/// Minimal counter widget exercising the trait, observers and dispatcher together.
struct Counter {
    count: i32,
    bounds: Rect,
    changed: Observers<i32>,
    deferred: Dispatcher<Self>,
    captured: bool,
}

impl Counter {
    fn new() -> Self {
        Self {
            count: 0,
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            changed: Observers::new(),
            deferred: Dispatcher::new(),
            captured: false,
        }
    }

    fn flush(&mut self) {
        for op in self.deferred.drain() {
            op(self);
        }
    }
}

impl Widget for Counter {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::KeyDown { key: Key::Up } => self.count += 1,
            Event::KeyDown { key: Key::Down } => self.count -= 1,
            Event::MouseDown { position, .. } if self.bounds.contains_point(position) => {
                self.deferred.post(|c: &mut Self| c.captured = true);
                return None;
            }
            _ => return None,
        }
        self.changed.notify(&self.count);
        Some(Box::new(self.count))
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::SpinButton
    }
}

#[test]
fn test_widget_event_produces_message_and_notification() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut counter = Counter::new();
    let sink = Arc::clone(&seen);
    counter.changed.subscribe(move |v| sink.lock().unwrap().push(*v));

    let msg = counter.event(&Event::KeyDown { key: Key::Up });
    let value = msg.and_then(|m| m.downcast::<i32>().ok());

    assert_eq!(value.as_deref(), Some(&1));
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(counter.accessible_role(), AccessibleRole::SpinButton);
    assert!(counter.is_focusable());
}

#[test]
fn test_deferred_operation_runs_after_event() {
    let mut counter = Counter::new();
    counter.event(&Event::MouseDown {
        position: Point::new(5.0, 5.0),
        button: updown_core::MouseButton::Left,
    });

    assert!(!counter.captured);
    counter.flush();
    assert!(counter.captured);
}

// =============================================================================
// Validation Integration Tests
// =============================================================================

#[test]
fn test_validation_result_from_parse() {
    let parsed: Result<f64, std::num::ParseFloatError> = "x1".parse::<f64>();
    let marker = ValidationResult::from(&parsed);
    assert!(marker.is_invalid());
    assert!(marker.error().is_some());
}
