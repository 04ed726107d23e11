//! `NumericUpDown`: a text box plus spinner bound to an optional number.
//!
//! The widget routes input to its parts (the [`TextInput`] and the
//! [`ButtonSpinner`]), feeds the results into the [`NumericState`] engine and
//! applies the engine's effects back to the parts and to subscribers.
//!
//! # Example
//!
//! ```
//! use updown_core::{Event, Key, Widget};
//! use updown_widgets::{NumericUpDown, ValueChanged};
//!
//! let mut spin = NumericUpDown::new().minimum(0.0).maximum(10.0).value(4.0);
//! spin.initialize().unwrap();
//! assert_eq!(spin.get_text(), Some("4"));
//!
//! let msg = spin.event(&Event::KeyDown { key: Key::Up }).unwrap();
//! let change = msg.downcast::<ValueChanged>().unwrap();
//! assert_eq!(change.new, Some(5.0));
//! assert_eq!(spin.get_text(), Some("5"));
//! ```

use crate::button_spinner::{ButtonSpinner, ButtonSpinnerLocation};
use crate::converter::TextConverter;
use crate::error::NumericError;
use crate::number_style::{NumberFormat, NumberStyles};
use crate::spin::{should_spin, SpinEventArgs, ValidSpinDirections};
use crate::sync::{Effect, NumericState, Reconciler, ValueChanged};
use crate::text_input::{TextChanged, TextInput, TextSubmitted};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use updown_core::{
    widget::AccessibleRole, Event, Key, Observers, Rect, SubscriptionId, TypeId,
    ValidationResult, Widget,
};

/// Width reserved for the spinner buttons when laying out the parts.
const SPINNER_WIDTH: f32 = 20.0;

/// Horizontal placement of the text inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    /// Flush left
    #[default]
    Left,
    /// Centered
    Center,
    /// Flush right
    Right,
    /// Fill the box
    Stretch,
}

/// Vertical placement of the text inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticalAlignment {
    /// Top edge
    Top,
    /// Centered
    #[default]
    Center,
    /// Bottom edge
    Bottom,
    /// Fill the box
    Stretch,
}

// =============================================================================
// Options
// =============================================================================

/// Serializable configuration for a [`NumericUpDown`].
///
/// Missing fields take their defaults. `minimum` and `maximum` count as
/// explicitly set only when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericUpDownOptions {
    /// Accept spin input
    pub allow_spin: bool,
    /// Show the spinner buttons
    pub show_button_spinner: bool,
    /// Side of the spinner buttons
    pub button_spinner_location: ButtonSpinnerLocation,
    /// Clamp instead of rejecting out-of-range values
    pub clip_value_to_min_max: bool,
    /// Culture symbols
    pub number_format: NumberFormat,
    /// Standard, custom or composite format string
    pub format_string: String,
    /// Spin step
    pub increment: f64,
    /// Block user edits and spinning
    pub is_read_only: bool,
    /// Upper bound (`f64::MAX` when absent)
    pub maximum: Option<f64>,
    /// Lower bound (`f64::MIN` when absent)
    pub minimum: Option<f64>,
    /// Styles accepted when parsing typed text
    pub parsing_number_style: NumberStyles,
    /// Initial value
    pub value: Option<f64>,
    /// Initial text, parsed when no value is given
    pub text: Option<String>,
    /// Hint shown while the text is empty
    pub watermark: Option<String>,
    /// Horizontal text placement
    pub horizontal_content_alignment: HorizontalAlignment,
    /// Vertical text placement
    pub vertical_content_alignment: VerticalAlignment,
    /// Decoration left of the text
    pub inner_left_content: Option<String>,
    /// Decoration right of the text
    pub inner_right_content: Option<String>,
}

impl Default for NumericUpDownOptions {
    fn default() -> Self {
        Self {
            allow_spin: true,
            show_button_spinner: true,
            button_spinner_location: ButtonSpinnerLocation::Right,
            clip_value_to_min_max: false,
            number_format: NumberFormat::invariant(),
            format_string: String::new(),
            increment: 1.0,
            is_read_only: false,
            maximum: None,
            minimum: None,
            parsing_number_style: NumberStyles::ANY,
            value: None,
            text: None,
            watermark: None,
            horizontal_content_alignment: HorizontalAlignment::Left,
            vertical_content_alignment: VerticalAlignment::Center,
            inner_left_content: None,
            inner_right_content: None,
        }
    }
}

// =============================================================================
// Property
// =============================================================================

/// A property change, carrying the new value.
#[derive(Clone)]
pub enum Property {
    /// Numeric value
    Value(Option<f64>),
    /// Display text
    Text(Option<String>),
    /// Lower bound
    Minimum(f64),
    /// Upper bound
    Maximum(f64),
    /// Spin step
    Increment(f64),
    /// Read-only mode
    IsReadOnly(bool),
    /// Clamping policy
    ClipValueToMinMax(bool),
    /// Format string
    FormatString(String),
    /// Culture symbols
    NumberFormat(NumberFormat),
    /// Parse styles
    ParsingNumberStyle(NumberStyles),
    /// Custom converter
    TextConverter(Option<Arc<dyn TextConverter>>),
    /// Spin input allowed
    AllowSpin(bool),
    /// Spinner buttons shown
    ShowButtonSpinner(bool),
    /// Spinner side
    ButtonSpinnerLocation(ButtonSpinnerLocation),
    /// Empty-text hint
    Watermark(Option<String>),
    /// Horizontal text placement
    HorizontalContentAlignment(HorizontalAlignment),
    /// Vertical text placement
    VerticalContentAlignment(VerticalAlignment),
    /// Left decoration
    InnerLeftContent(Option<String>),
    /// Right decoration
    InnerRightContent(Option<String>),
}

impl Property {
    /// Property name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Value(_) => "Value",
            Self::Text(_) => "Text",
            Self::Minimum(_) => "Minimum",
            Self::Maximum(_) => "Maximum",
            Self::Increment(_) => "Increment",
            Self::IsReadOnly(_) => "IsReadOnly",
            Self::ClipValueToMinMax(_) => "ClipValueToMinMax",
            Self::FormatString(_) => "FormatString",
            Self::NumberFormat(_) => "NumberFormat",
            Self::ParsingNumberStyle(_) => "ParsingNumberStyle",
            Self::TextConverter(_) => "TextConverter",
            Self::AllowSpin(_) => "AllowSpin",
            Self::ShowButtonSpinner(_) => "ShowButtonSpinner",
            Self::ButtonSpinnerLocation(_) => "ButtonSpinnerLocation",
            Self::Watermark(_) => "Watermark",
            Self::HorizontalContentAlignment(_) => "HorizontalContentAlignment",
            Self::VerticalContentAlignment(_) => "VerticalContentAlignment",
            Self::InnerLeftContent(_) => "InnerLeftContent",
            Self::InnerRightContent(_) => "InnerRightContent",
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// NumericUpDown
// =============================================================================

/// Numeric input with a text box and increase/decrease buttons.
pub struct NumericUpDown {
    state: NumericState,
    text_box: TextInput,
    spinner: ButtonSpinner,
    horizontal_content_alignment: HorizontalAlignment,
    vertical_content_alignment: VerticalAlignment,
    inner_left_content: Option<String>,
    inner_right_content: Option<String>,
    validation: ValidationResult,
    value_changed: Observers<ValueChanged>,
    spinned: Observers<SpinEventArgs>,
    last_change: Option<ValueChanged>,
    accessible_name_value: Option<String>,
    test_id_value: Option<String>,
}

impl Default for NumericUpDown {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NumericUpDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericUpDown")
            .field("state", &self.state)
            .field("text_box", &self.text_box)
            .field("spinner", &self.spinner)
            .field("validation", &self.validation)
            .field("value_changed", &self.value_changed.len())
            .field("spinned", &self.spinned.len())
            .finish_non_exhaustive()
    }
}

impl NumericUpDown {
    /// Create an uninitialized widget with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: NumericState::new(),
            text_box: TextInput::new(),
            spinner: ButtonSpinner::new(),
            horizontal_content_alignment: HorizontalAlignment::default(),
            vertical_content_alignment: VerticalAlignment::default(),
            inner_left_content: None,
            inner_right_content: None,
            validation: ValidationResult::Valid,
            value_changed: Observers::new(),
            spinned: Observers::new(),
            last_change: None,
            accessible_name_value: None,
            test_id_value: None,
        }
    }

    /// Build an uninitialized widget from serialized options.
    #[must_use]
    pub fn from_options(options: NumericUpDownOptions) -> Self {
        let mut state = NumericState::new()
            .with_value(options.value)
            .with_text(options.text)
            .with_increment(options.increment)
            .with_read_only(options.is_read_only)
            .with_clip_value_to_min_max(options.clip_value_to_min_max)
            .with_format_string(options.format_string)
            .with_number_format(options.number_format)
            .with_parsing_number_style(options.parsing_number_style);
        if let Some(minimum) = options.minimum {
            state = state.with_minimum(minimum);
        }
        if let Some(maximum) = options.maximum {
            state = state.with_maximum(maximum);
        }

        let mut text_box = TextInput::new().read_only(options.is_read_only);
        text_box.set_watermark(options.watermark);

        Self {
            state,
            text_box,
            spinner: ButtonSpinner::new()
                .allow_spin(options.allow_spin)
                .show_button_spinner(options.show_button_spinner)
                .location(options.button_spinner_location),
            horizontal_content_alignment: options.horizontal_content_alignment,
            vertical_content_alignment: options.vertical_content_alignment,
            inner_left_content: options.inner_left_content,
            inner_right_content: options.inner_right_content,
            ..Self::new()
        }
    }

    /// Snapshot the current configuration as options.
    #[must_use]
    pub fn options(&self) -> NumericUpDownOptions {
        let bounds = self.state.bounds();
        let formatter = self.state.formatter();
        NumericUpDownOptions {
            allow_spin: self.spinner.is_spin_allowed(),
            show_button_spinner: self.spinner.is_button_spinner_shown(),
            button_spinner_location: self.spinner.get_location(),
            clip_value_to_min_max: self.state.clip_value_to_min_max(),
            number_format: formatter.number_format.clone(),
            format_string: formatter.format_string.clone(),
            increment: self.state.increment(),
            is_read_only: self.state.is_read_only(),
            maximum: bounds.explicit_maximum(),
            minimum: bounds.explicit_minimum(),
            parsing_number_style: formatter.parsing_number_style,
            value: self.state.value(),
            text: self.state.text().map(str::to_string),
            watermark: self.text_box.get_watermark().map(str::to_string),
            horizontal_content_alignment: self.horizontal_content_alignment,
            vertical_content_alignment: self.vertical_content_alignment,
            inner_left_content: self.inner_left_content.clone(),
            inner_right_content: self.inner_right_content.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    /// Set the initial value.
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.state = self.state.with_value(Some(value));
        self
    }

    /// Set the initial text, parsed on initialization when no value is set.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.state = self.state.with_text(Some(text.into()));
        self
    }

    /// Set the lower bound.
    #[must_use]
    pub fn minimum(mut self, minimum: f64) -> Self {
        self.state = self.state.with_minimum(minimum);
        self
    }

    /// Set the upper bound.
    #[must_use]
    pub fn maximum(mut self, maximum: f64) -> Self {
        self.state = self.state.with_maximum(maximum);
        self
    }

    /// Set the spin step.
    #[must_use]
    pub fn increment(mut self, increment: f64) -> Self {
        self.state = self.state.with_increment(increment);
        self
    }

    /// Clamp out-of-range values instead of rejecting them.
    #[must_use]
    pub fn clip_value_to_min_max(mut self, clip: bool) -> Self {
        self.state = self.state.with_clip_value_to_min_max(clip);
        self
    }

    /// Set the format string.
    #[must_use]
    pub fn format_string(mut self, format_string: impl Into<String>) -> Self {
        self.state = self.state.with_format_string(format_string);
        self
    }

    /// Set the culture symbols.
    #[must_use]
    pub fn number_format(mut self, number_format: NumberFormat) -> Self {
        self.state = self.state.with_number_format(number_format);
        self
    }

    /// Set the styles accepted when parsing typed text.
    #[must_use]
    pub fn parsing_number_style(mut self, styles: NumberStyles) -> Self {
        self.state = self.state.with_parsing_number_style(styles);
        self
    }

    /// Install a custom converter.
    #[must_use]
    pub fn text_converter(mut self, converter: impl TextConverter + 'static) -> Self {
        self.state = self.state.with_text_converter(Arc::new(converter));
        self
    }

    /// Block user edits and spinning.
    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.state = self.state.with_read_only(read_only);
        self.text_box = self.text_box.read_only(read_only);
        self
    }

    /// Accept or ignore spin input.
    #[must_use]
    pub fn allow_spin(mut self, allow: bool) -> Self {
        self.spinner = self.spinner.allow_spin(allow);
        self
    }

    /// Show or hide the spinner buttons.
    #[must_use]
    pub fn show_button_spinner(mut self, show: bool) -> Self {
        self.spinner = self.spinner.show_button_spinner(show);
        self
    }

    /// Place the spinner buttons.
    #[must_use]
    pub fn button_spinner_location(mut self, location: ButtonSpinnerLocation) -> Self {
        self.spinner = self.spinner.location(location);
        self
    }

    /// Set the hint shown while the text is empty.
    #[must_use]
    pub fn watermark(mut self, text: impl Into<String>) -> Self {
        self.text_box = self.text_box.watermark(text);
        self
    }

    /// Set the widget area; the spinner takes a strip on its side.
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

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current value.
    #[must_use]
    pub const fn get_value(&self) -> Option<f64> {
        self.state.value()
    }

    /// Current text.
    #[must_use]
    pub fn get_text(&self) -> Option<&str> {
        self.state.text()
    }

    /// Lower bound.
    #[must_use]
    pub const fn get_minimum(&self) -> f64 {
        self.state.bounds().minimum()
    }

    /// Upper bound.
    #[must_use]
    pub const fn get_maximum(&self) -> f64 {
        self.state.bounds().maximum()
    }

    /// Spin step.
    #[must_use]
    pub const fn get_increment(&self) -> f64 {
        self.state.increment()
    }

    /// Whether edits and spinning are blocked.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.state.is_read_only()
    }

    /// Directions the spinner currently allows.
    #[must_use]
    pub const fn valid_spin_directions(&self) -> ValidSpinDirections {
        self.state.valid_spin_directions()
    }

    /// Data-validation marker for the text/value pair.
    #[must_use]
    pub const fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Horizontal text placement.
    #[must_use]
    pub const fn get_horizontal_content_alignment(&self) -> HorizontalAlignment {
        self.horizontal_content_alignment
    }

    /// Vertical text placement.
    #[must_use]
    pub const fn get_vertical_content_alignment(&self) -> VerticalAlignment {
        self.vertical_content_alignment
    }

    /// Decoration left of the text.
    #[must_use]
    pub fn get_inner_left_content(&self) -> Option<&str> {
        self.inner_left_content.as_deref()
    }

    /// Decoration right of the text.
    #[must_use]
    pub fn get_inner_right_content(&self) -> Option<&str> {
        self.inner_right_content.as_deref()
    }

    /// The sync engine.
    #[must_use]
    pub const fn state(&self) -> &NumericState {
        &self.state
    }

    /// The text box part.
    #[must_use]
    pub const fn text_box(&self) -> &TextInput {
        &self.text_box
    }

    /// The spinner part.
    #[must_use]
    pub const fn spinner(&self) -> &ButtonSpinner {
        &self.spinner
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Subscribe to value changes.
    pub fn subscribe_value_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ValueChanged) + Send + Sync + 'static,
    {
        self.value_changed.subscribe(callback)
    }

    /// Subscribe to performed spins.
    pub fn subscribe_spinned<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&SpinEventArgs) + Send + Sync + 'static,
    {
        self.spinned.subscribe(callback)
    }

    /// Remove a value-change subscriber.
    pub fn unsubscribe_value_changed(&mut self, id: SubscriptionId) -> bool {
        self.value_changed.unsubscribe(id)
    }

    /// Remove a spin subscriber.
    pub fn unsubscribe_spinned(&mut self, id: SubscriptionId) -> bool {
        self.spinned.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Lifecycle and commands
    // -------------------------------------------------------------------------

    /// Finish configuration and reconcile text and value for the first time.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] if the configured value is out of
    /// range and clipping is disabled.
    pub fn initialize(&mut self) -> Result<bool, NumericError> {
        let result = self.state.initialize();
        self.settle(result)
    }

    /// Commit the text: parse it and re-render it from the value.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] if the text parses to an out-of-range
    /// value and clipping is disabled.
    pub fn commit_input(&mut self) -> Result<bool, NumericError> {
        let result = self.state.commit_input();
        self.settle(result)
    }

    /// Reconcile text and value through the engine.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`].
    pub fn reconcile(
        &mut self,
        update_value_from_text: bool,
        text: Option<&str>,
        force_text_rerender: bool,
    ) -> Result<bool, NumericError> {
        let result = self
            .state
            .reconcile(update_value_from_text, text, force_text_rerender);
        self.settle(result)
    }

    /// Handle a spin request from the spinner.
    ///
    /// The request is honored only if spinning is allowed, the widget is not
    /// read-only, wheel requests arrive while the text box has focus, and the
    /// direction is enabled. Returns whether a spin was performed.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::MissingSpinArgs`] if `message` is absent or is
    /// not a [`SpinEventArgs`].
    pub fn on_spinner_spin(
        &mut self,
        message: Option<Box<dyn Any + Send>>,
    ) -> Result<bool, NumericError> {
        let Some(args) = message
            .and_then(|m| m.downcast::<SpinEventArgs>().ok())
            .map(|args| *args)
        else {
            log::warn!("spin request without SpinEventArgs");
            return Err(NumericError::MissingSpinArgs);
        };

        if !self.spinner.is_spin_allowed() || self.state.is_read_only() {
            return Ok(false);
        }
        if !should_spin(args.used_mouse_wheel, self.text_box.is_focused()) {
            return Ok(false);
        }

        let result = self.state.spin(args.direction);
        self.apply_effects();
        let performed = match result {
            Ok(performed) => performed,
            Err(err) => {
                self.validation = ValidationResult::invalid(&err);
                return Err(err);
            }
        };
        if performed {
            self.validation = ValidationResult::Valid;
            self.spinned.notify(&args);
        }
        Ok(performed)
    }

    /// Run operations deferred during the last event, such as pointer capture.
    ///
    /// Hosts call this after dispatching each event.
    pub fn run_deferred(&mut self) {
        self.spinner.flush_deferred();
    }

    // -------------------------------------------------------------------------
    // Property changes
    // -------------------------------------------------------------------------

    /// Apply a property change and run its reaction.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] when the change commits an
    /// out-of-range value with clipping disabled.
    pub fn on_property_changed(&mut self, property: Property) -> Result<(), NumericError> {
        log::trace!("property changed: {property:?}");
        match property {
            Property::Value(value) => {
                let result = self.state.set_value(value).map(|()| true);
                self.settle(result).map(drop)
            }
            Property::Text(text) => {
                let result = self.state.set_text(text);
                self.settle(result).map(drop)
            }
            Property::FormatString(format_string) => {
                let result = self.state.set_format_string(format_string).map(|()| true);
                self.settle(result).map(drop)
            }
            Property::NumberFormat(number_format) => {
                let result = self.state.set_number_format(number_format).map(|()| true);
                self.settle(result).map(drop)
            }
            Property::ParsingNumberStyle(styles) => {
                let result = self.state.set_parsing_number_style(styles).map(|()| true);
                self.settle(result).map(drop)
            }
            Property::TextConverter(converter) => {
                let result = self.state.set_text_converter(converter).map(|()| true);
                self.settle(result).map(drop)
            }
            Property::Minimum(minimum) => {
                let result = self.state.set_minimum(minimum);
                self.apply_effects();
                result
            }
            Property::Maximum(maximum) => {
                let result = self.state.set_maximum(maximum);
                self.apply_effects();
                result
            }
            Property::ClipValueToMinMax(clip) => {
                let result = self.state.set_clip_value_to_min_max(clip);
                self.apply_effects();
                result
            }
            Property::Increment(increment) => {
                self.state.set_increment(increment);
                self.apply_effects();
                Ok(())
            }
            Property::IsReadOnly(read_only) => {
                self.state.set_read_only(read_only);
                self.text_box.set_read_only(read_only);
                self.apply_effects();
                Ok(())
            }
            Property::AllowSpin(allow) => {
                self.spinner.set_allow_spin(allow);
                Ok(())
            }
            Property::ShowButtonSpinner(show) => {
                self.spinner.set_show_button_spinner(show);
                Ok(())
            }
            Property::ButtonSpinnerLocation(location) => {
                self.spinner.set_location(location);
                Ok(())
            }
            Property::Watermark(watermark) => {
                self.text_box.set_watermark(watermark);
                Ok(())
            }
            Property::HorizontalContentAlignment(alignment) => {
                self.horizontal_content_alignment = alignment;
                Ok(())
            }
            Property::VerticalContentAlignment(alignment) => {
                self.vertical_content_alignment = alignment;
                Ok(())
            }
            Property::InnerLeftContent(content) => {
                self.inner_left_content = content;
                Ok(())
            }
            Property::InnerRightContent(content) => {
                self.inner_right_content = content;
                Ok(())
            }
        }
    }

    /// Set the value.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] for an out-of-range value when
    /// clipping is disabled; the value is left unchanged.
    pub fn set_value(&mut self, value: Option<f64>) -> Result<(), NumericError> {
        self.on_property_changed(Property::Value(value))
    }

    /// Set the text.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] if the text parses to an out-of-range
    /// value and clipping is disabled.
    pub fn set_text(&mut self, text: Option<String>) -> Result<(), NumericError> {
        self.on_property_changed(Property::Text(text))
    }

    /// Set the lower bound.
    ///
    /// # Errors
    ///
    /// See [`on_property_changed`](Self::on_property_changed).
    pub fn set_minimum(&mut self, minimum: f64) -> Result<(), NumericError> {
        self.on_property_changed(Property::Minimum(minimum))
    }

    /// Set the upper bound.
    ///
    /// # Errors
    ///
    /// See [`on_property_changed`](Self::on_property_changed).
    pub fn set_maximum(&mut self, maximum: f64) -> Result<(), NumericError> {
        self.on_property_changed(Property::Maximum(maximum))
    }

    /// Set the format string.
    ///
    /// # Errors
    ///
    /// See [`on_property_changed`](Self::on_property_changed).
    pub fn set_format_string(&mut self, format_string: impl Into<String>) -> Result<(), NumericError> {
        self.on_property_changed(Property::FormatString(format_string.into()))
    }

    /// Set the widget area at runtime.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if !self.spinner.is_button_spinner_shown() {
            self.text_box.set_bounds(bounds);
            return;
        }
        let strip = SPINNER_WIDTH.min(bounds.width);
        let text_width = bounds.width - strip;
        let (text_x, spinner_x) = match self.spinner.get_location() {
            ButtonSpinnerLocation::Left => (bounds.x + strip, bounds.x),
            ButtonSpinnerLocation::Right => (bounds.x, bounds.x + text_width),
        };
        self.text_box
            .set_bounds(Rect::new(text_x, bounds.y, text_width, bounds.height));
        self.spinner
            .set_bounds(Rect::new(spinner_x, bounds.y, strip, bounds.height));
    }

    // -------------------------------------------------------------------------
    // Effects
    // -------------------------------------------------------------------------

    fn apply_effects(&mut self) {
        for effect in self.state.drain_effects() {
            match effect {
                Effect::PushText(text) => {
                    self.text_box.set_text(text.as_deref().unwrap_or_default());
                }
                Effect::SetSpinDirections(dirs) => self.spinner.set_valid_spin_directions(dirs),
                Effect::ValueChanged(change) => {
                    self.value_changed.notify(&change);
                    self.last_change = Some(change);
                }
            }
        }
    }

    /// Apply effects and update the validation marker from a text/value result.
    fn settle(&mut self, result: Result<bool, NumericError>) -> Result<bool, NumericError> {
        self.apply_effects();
        self.validation = match &result {
            Ok(true) => ValidationResult::Valid,
            Ok(false) => {
                ValidationResult::invalid(NumericError::format(self.state.text().unwrap_or_default()))
            }
            Err(err) => ValidationResult::invalid(err),
        };
        result
    }

    fn on_text_box_message(&mut self, message: Box<dyn Any + Send>) {
        let result = match message.downcast::<TextChanged>() {
            Ok(changed) => {
                let result = self.state.set_text_from_ui(Some(changed.text));
                self.settle(result)
            }
            Err(other) => {
                if other.downcast::<TextSubmitted>().is_err() {
                    return;
                }
                self.commit_input()
            }
        };
        if let Err(err) = result {
            log::debug!("edit not committed: {err}");
        }
    }

    fn on_spin_message(&mut self, message: Option<Box<dyn Any + Send>>) {
        if let Err(err) = self.on_spinner_spin(message) {
            log::debug!("spin not performed: {err}");
        }
    }
}

impl Widget for NumericUpDown {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        self.last_change = None;

        match event {
            Event::KeyDown {
                key: Key::Up | Key::Down,
            }
            | Event::Scroll { .. } => {
                if let Some(msg) = self.spinner.event(event) {
                    self.on_spin_message(Some(msg));
                }
            }
            Event::MouseDown { .. } => {
                if let Some(msg) = self.spinner.event(event) {
                    self.on_spin_message(Some(msg));
                } else {
                    self.text_box.event(event);
                }
            }
            Event::MouseUp { .. } | Event::MouseLeave => {
                self.spinner.event(event);
            }
            Event::FocusOut => {
                self.text_box.event(event);
                if let Err(err) = self.commit_input() {
                    log::debug!("input not committed on focus loss: {err}");
                }
            }
            _ => {
                if let Some(msg) = self.text_box.event(event) {
                    self.on_text_box_message(msg);
                }
            }
        }

        self.last_change
            .take()
            .map(|change| Box::new(change) as Box<dyn Any + Send>)
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::SpinButton
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }
}
