//! Integration tests for updown-widgets.
//!
//! These tests drive the public API end-to-end: the sync engine directly,
//! and the `NumericUpDown` widget through input events.

use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use updown_core::{Event, Key, Widget};
use updown_widgets::{
    compute_valid_directions, NumberFormat, NumericError, NumericState, NumericUpDown,
    NumericUpDownOptions, Property, RadixConverter, Reconciler, SpinDirection,
    ValidSpinDirections, ValueChanged,
};

fn engine(min: f64, max: f64) -> NumericState {
    let mut state = NumericState::new().with_minimum(min).with_maximum(max);
    state.initialize().expect("no preset value");
    state
}

// =============================================================================
// Bounds Policy
// =============================================================================

#[test]
fn test_maximum_below_minimum_coerces_to_minimum() {
    let mut state = engine(5.0, 10.0);
    state.set_maximum(2.0).unwrap();
    assert_eq!(state.bounds().maximum(), 5.0);

    state.set_minimum(8.0).unwrap();
    assert_eq!(state.bounds().minimum(), 5.0);
}

#[test]
fn test_clip_clamps_and_no_clip_rejects() {
    let mut clipping = NumericState::new()
        .with_minimum(0.0)
        .with_maximum(10.0)
        .with_clip_value_to_min_max(true);
    clipping.initialize().unwrap();
    clipping.set_value(Some(-3.0)).unwrap();
    assert_eq!(clipping.value(), Some(0.0));

    let mut strict = engine(0.0, 10.0);
    let err = strict.set_value(Some(-3.0)).unwrap_err();
    assert_eq!(
        err,
        NumericError::Range {
            value: -3.0,
            minimum: 0.0,
            maximum: 10.0
        }
    );
}

// =============================================================================
// Spin Controller
// =============================================================================

#[test]
fn test_valid_direction_table() {
    assert_eq!(
        compute_valid_directions(None, 0.0, 10.0, 1.0, false),
        ValidSpinDirections::INCREASE | ValidSpinDirections::DECREASE
    );
    assert_eq!(
        compute_valid_directions(Some(5.0), 0.0, 5.0, 1.0, false),
        ValidSpinDirections::DECREASE
    );
    assert!(compute_valid_directions(Some(5.0), 0.0, 10.0, 0.0, false).is_empty());
    assert!(compute_valid_directions(Some(f64::NAN), 0.0, 10.0, 0.0, true).is_empty());
}

#[test]
fn test_increase_from_nan_lands_on_minimum() {
    let mut state = engine(3.0, 100.0);
    state.set_value(Some(f64::NAN)).unwrap();
    assert_eq!(state.text(), Some("NaN"));
    assert!(state.spin(SpinDirection::Increase).unwrap());
    assert_eq!(state.value(), Some(3.0));
}

// =============================================================================
// Parser
// =============================================================================

#[test]
fn test_degree_suffix_recovery() {
    let mut state = engine(0.0, 360.0);
    state.set_format_string("0°").unwrap();
    state.set_value(Some(45.0)).unwrap();
    assert_eq!(state.text(), Some("45°"));

    assert_eq!(state.reconcile(true, Some("90°"), true), Ok(true));
    assert_eq!(state.value(), Some(90.0));
    assert_eq!(state.text(), Some("90°"));

    assert_eq!(state.reconcile(true, Some("90%"), false), Ok(false));
    assert_eq!(state.value(), Some(90.0));
}

#[test]
fn test_nan_token_parses_and_renders() {
    let mut state = engine(0.0, 1.0);
    assert_eq!(state.reconcile(true, Some("  NAN\t"), true), Ok(true));
    assert!(state.value().is_some_and(f64::is_nan));
    assert_eq!(state.text(), Some("NaN"));
}

#[test]
fn test_percent_format_parses_hundredths() {
    let mut state = NumericState::new()
        .with_format_string("P1")
        .with_number_format(NumberFormat::en_us());
    state.initialize().unwrap();
    state.set_text(Some("12.5%".into())).unwrap();
    assert_eq!(state.value(), Some(0.125));
    state.commit_input().unwrap();
    assert_eq!(state.text(), Some("12.5%"));
}

#[test]
fn test_german_culture_round_trip() {
    let mut state = NumericState::new()
        .with_format_string("N2")
        .with_number_format(NumberFormat::de_de());
    state.initialize().unwrap();
    state.set_text(Some("1.234,5".into())).unwrap();
    assert_eq!(state.value(), Some(1234.5));
    state.commit_input().unwrap();
    assert_eq!(state.text(), Some("1.234,50"));
}

#[test]
fn test_radix_converter_bypasses_builtin_rules() {
    let mut state =
        NumericState::new().with_text_converter(Arc::new(RadixConverter::binary().min_width(4)));
    state.initialize().unwrap();
    state.set_text(Some("101".into())).unwrap();
    assert_eq!(state.value(), Some(5.0));
    state.commit_input().unwrap();
    assert_eq!(state.text(), Some("0101"));
    assert!(!state.set_text(Some("NaN".into())).unwrap());
}

// =============================================================================
// Widget
// =============================================================================

#[test]
fn test_widget_from_json_options() {
    let options: NumericUpDownOptions = serde_json::from_str(
        r#"{
            "minimum": 0.0,
            "maximum": 50.0,
            "increment": 5.0,
            "format_string": "0 'kg'",
            "value": 10.0
        }"#,
    )
    .unwrap();
    let mut w = NumericUpDown::from_options(options);
    w.initialize().unwrap();
    assert_eq!(w.get_text(), Some("10 kg"));

    w.event(&Event::KeyDown { key: Key::Up });
    assert_eq!(w.get_value(), Some(15.0));
    assert_eq!(w.text_box().text(), "15 kg");
}

#[test]
fn test_options_serialize_round_trip() {
    let options = NumericUpDownOptions {
        minimum: Some(1.0),
        clip_value_to_min_max: true,
        number_format: NumberFormat::de_de(),
        ..NumericUpDownOptions::default()
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: NumericUpDownOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn test_value_changed_stream_from_typing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut w = NumericUpDown::new().value(1.0);
    w.initialize().unwrap();
    let sink = Arc::clone(&seen);
    w.subscribe_value_changed(move |c: &ValueChanged| sink.lock().unwrap().push(c.new));

    w.event(&Event::FocusIn);
    w.event(&Event::TextInput { text: "2".into() });
    w.event(&Event::TextInput { text: "x".into() });
    w.event(&Event::KeyDown {
        key: Key::Backspace,
    });

    assert_eq!(*seen.lock().unwrap(), vec![Some(12.0)]);
    assert!(w.validation().is_valid());
}

#[test]
fn test_runtime_converter_change_rerenders() {
    let mut w = NumericUpDown::new().value(255.0);
    w.initialize().unwrap();
    w.on_property_changed(Property::TextConverter(Some(Arc::new(
        RadixConverter::hexadecimal(true),
    ))))
    .unwrap();
    assert_eq!(w.get_text(), Some("FF"));
    w.on_property_changed(Property::TextConverter(None)).unwrap();
    assert_eq!(w.get_text(), Some("255"));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_text_reconciles_to_parsed_value(v in -1.0e9f64..1.0e9) {
        let mut state = engine(f64::MIN, f64::MAX);
        let text = v.to_string();
        prop_assert_eq!(state.reconcile(true, Some(&text), false), Ok(true));
        prop_assert_eq!(state.value(), Some(v));
    }

    #[test]
    fn prop_rendered_text_is_stable(v in -1.0e6f64..1.0e6, decimals in 0usize..6) {
        let mut state = NumericState::new().with_format_string(format!("F{decimals}"));
        state.initialize().unwrap();
        state.set_value(Some(v)).unwrap();

        let rendered = state.text().unwrap().to_string();
        let mut fresh = NumericState::new().with_format_string(format!("F{decimals}"));
        fresh.initialize().unwrap();
        prop_assert_eq!(fresh.reconcile(true, Some(&rendered), true), Ok(true));
        let settled = fresh.value();
        let text = fresh.text().map(str::to_string);

        let mut again = NumericState::new().with_format_string(format!("F{decimals}"));
        again.initialize().unwrap();
        again.reconcile(true, text.as_deref(), true).unwrap();
        prop_assert_eq!(again.value(), settled);
        prop_assert_eq!(again.text().map(str::to_string), text);
    }

    #[test]
    fn prop_spin_never_leaves_bounds(start in -50.0f64..50.0, steps in prop::collection::vec(any::<bool>(), 1..30)) {
        let mut state = NumericState::new()
            .with_minimum(-10.0)
            .with_maximum(10.0)
            .with_clip_value_to_min_max(true)
            .with_value(Some(start))
            .with_increment(3.0);
        state.initialize().unwrap();
        for up in steps {
            let dir = if up { SpinDirection::Increase } else { SpinDirection::Decrease };
            state.spin(dir).unwrap();
            let v = state.value().unwrap();
            prop_assert!((-10.0..=10.0).contains(&v));
        }
    }
}
