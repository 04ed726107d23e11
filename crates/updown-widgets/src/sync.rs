//! Text/value synchronization engine.
//!
//! [`NumericState`] owns the value, the display text, the bounds and the
//! formatting rules of a numeric input, and keeps text and value consistent
//! after every change to either. The widget shell drives it through the
//! [`Reconciler`] trait and the property setters, and applies the
//! [`Effect`]s it produces to the visual parts (text box, spinner) and to
//! its subscribers.
//!
//! Three [`ScopedFlag`]s track the engine's own activity:
//!
//! - `syncing` is held for the duration of a reconciliation; a nested call
//!   returns immediately.
//! - `internal_value_set` marks a value committed by the engine itself, so
//!   the value reaction does not re-render the text a second time.
//! - `text_changed_from_ui` marks text typed by the user, which is never
//!   overwritten mid-edit.

use crate::bounds::Bounds;
use crate::converter::{TextConverter, ValueFormatter};
use crate::error::NumericError;
use crate::number_style::{NumberFormat, NumberStyles};
use crate::spin::{compute_valid_directions, step_target, SpinDirection, ValidSpinDirections};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// =============================================================================
// Scoped flags
// =============================================================================

/// A boolean flag set for the lifetime of a [`FlagGuard`].
///
/// Shared through an `Arc` so the guard can outlive the `&self` borrow that
/// created it; the engine itself is single-threaded.
#[derive(Debug, Default)]
pub struct ScopedFlag(Arc<AtomicBool>);

impl ScopedFlag {
    /// Create a cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the flag is currently held.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Take the flag if it is clear. Returns `None` if it is already held.
    #[must_use]
    pub fn acquire(&self) -> Option<FlagGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlagGuard {
                flag: Arc::clone(&self.0),
                previous: false,
            })
    }

    /// Set the flag until the guard drops, then restore its previous state.
    #[must_use]
    pub fn hold(&self) -> FlagGuard {
        let previous = self.0.swap(true, Ordering::AcqRel);
        FlagGuard {
            flag: Arc::clone(&self.0),
            previous,
        }
    }
}

/// Releases a [`ScopedFlag`] when dropped, on every exit path.
#[derive(Debug)]
pub struct FlagGuard {
    flag: Arc<AtomicBool>,
    previous: bool,
}

impl Drop for FlagGuard {
    fn drop(&mut self) {
        self.flag.store(self.previous, Ordering::Release);
    }
}

// =============================================================================
// Engine output
// =============================================================================

/// Notification raised when the value changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueChanged {
    /// Value before the change
    pub old: Option<f64>,
    /// Value after the change
    pub new: Option<f64>,
}

/// Requests the engine makes of the widget shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show this text in the visual text field.
    PushText(Option<String>),
    /// Enable exactly these spinner directions.
    SetSpinDirections(ValidSpinDirections),
    /// The value changed; tell subscribers.
    ValueChanged(ValueChanged),
}

/// Capability the widget shell calls to reconcile text and value.
pub trait Reconciler {
    /// Make text and value consistent.
    ///
    /// With `update_value_from_text` the candidate `text` is parsed and, if
    /// valid and different, committed as the value. With
    /// `force_text_rerender` the text is re-rendered from the value (unless
    /// the user is typing). Returns `Ok(false)` exactly when parsing failed.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] when the parsed value is out of range
    /// and clipping is disabled. Parse failures are not errors.
    fn reconcile(
        &mut self,
        update_value_from_text: bool,
        text: Option<&str>,
        force_text_rerender: bool,
    ) -> Result<bool, NumericError>;
}

// =============================================================================
// NumericState
// =============================================================================

/// Value, text and policy of a numeric input.
///
/// Setters called before [`initialize`](Self::initialize) only store (bounds
/// are still coerced); afterwards they trigger the matching reaction.
#[derive(Debug)]
pub struct NumericState {
    value: Option<f64>,
    text: Option<String>,
    bounds: Bounds,
    increment: f64,
    is_read_only: bool,
    clip_value_to_min_max: bool,
    formatter: ValueFormatter,
    valid_spin_directions: ValidSpinDirections,
    initialized: bool,
    syncing: ScopedFlag,
    internal_value_set: ScopedFlag,
    text_changed_from_ui: ScopedFlag,
    effects: Vec<Effect>,
}

impl Default for NumericState {
    fn default() -> Self {
        Self {
            value: None,
            text: None,
            bounds: Bounds::default(),
            increment: 1.0,
            is_read_only: false,
            clip_value_to_min_max: false,
            formatter: ValueFormatter::default(),
            valid_spin_directions: ValidSpinDirections::empty(),
            initialized: false,
            syncing: ScopedFlag::new(),
            internal_value_set: ScopedFlag::new(),
            text_changed_from_ui: ScopedFlag::new(),
            effects: Vec::new(),
        }
    }
}

impl NumericState {
    /// Create an uninitialized state with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Builders (configuration before initialize)
    // -------------------------------------------------------------------------

    /// Preset the value.
    #[must_use]
    pub const fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self
    }

    /// Preset the text.
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    /// Preset the lower bound (coerced to at most the maximum).
    #[must_use]
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.bounds.set_minimum(minimum);
        self
    }

    /// Preset the upper bound (coerced to at least the minimum).
    #[must_use]
    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.bounds.set_maximum(maximum);
        self
    }

    /// Preset the spin step.
    #[must_use]
    pub const fn with_increment(mut self, increment: f64) -> Self {
        self.increment = increment;
        self
    }

    /// Preset read-only mode.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.is_read_only = read_only;
        self
    }

    /// Preset clamping.
    #[must_use]
    pub const fn with_clip_value_to_min_max(mut self, clip: bool) -> Self {
        self.clip_value_to_min_max = clip;
        self
    }

    /// Preset the format string.
    #[must_use]
    pub fn with_format_string(mut self, format_string: impl Into<String>) -> Self {
        self.formatter.format_string = format_string.into();
        self
    }

    /// Preset the culture symbols.
    #[must_use]
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.formatter.number_format = number_format;
        self
    }

    /// Preset the styles accepted by the direct parse.
    #[must_use]
    pub const fn with_parsing_number_style(mut self, styles: NumberStyles) -> Self {
        self.formatter.parsing_number_style = styles;
        self
    }

    /// Preset a custom converter.
    #[must_use]
    pub fn with_text_converter(mut self, converter: Arc<dyn TextConverter>) -> Self {
        self.formatter.text_converter = Some(converter);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Current display text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Current bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Spin step.
    #[must_use]
    pub const fn increment(&self) -> f64 {
        self.increment
    }

    /// Whether the value can only be changed programmatically.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.is_read_only
    }

    /// Whether out-of-range values are clamped instead of rejected.
    #[must_use]
    pub const fn clip_value_to_min_max(&self) -> bool {
        self.clip_value_to_min_max
    }

    /// Formatting and parsing rules.
    #[must_use]
    pub const fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    /// Directions last computed for the spinner.
    #[must_use]
    pub const fn valid_spin_directions(&self) -> ValidSpinDirections {
        self.valid_spin_directions
    }

    /// Whether [`initialize`](Self::initialize) has run.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a reconciliation is in progress.
    #[must_use]
    pub fn is_reconciling(&self) -> bool {
        self.syncing.is_set()
    }

    /// Render the current value with the current rules.
    #[must_use]
    pub fn rendered_text(&self) -> Option<String> {
        self.formatter.format(self.value)
    }

    /// Take the effects produced since the last call.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Run the initialization-complete reconciliation.
    ///
    /// A preset value goes through the range policy. If only a text was
    /// configured it is parsed into the value; otherwise the text is rendered
    /// from the value. Calling this twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] if the preset value (or the value
    /// parsed from the preset text) is out of range and clipping is disabled.
    pub fn initialize(&mut self) -> Result<bool, NumericError> {
        if self.initialized {
            return Ok(true);
        }
        self.initialized = true;

        if let Some(v) = self.value {
            self.value = Some(self.constrain(v)?);
        }

        if self.value.is_none() && self.text.as_deref().is_some_and(|t| !t.is_empty()) {
            let text = self.text.clone();
            let valid = self.reconcile(true, text.as_deref(), false)?;
            if valid {
                self.reconcile(false, None, true)?;
            }
            Ok(valid)
        } else {
            self.reconcile(false, None, true)
        }
    }

    // -------------------------------------------------------------------------
    // Value and text
    // -------------------------------------------------------------------------

    /// Assign the value from outside the engine.
    ///
    /// The range policy applies: with clipping the value is clamped,
    /// otherwise an out-of-range value is rejected and nothing changes.
    /// Before initialization the value is stored as given and checked by
    /// [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] for an out-of-range value when
    /// clipping is disabled.
    pub fn set_value(&mut self, value: Option<f64>) -> Result<(), NumericError> {
        if !self.initialized {
            self.value = value;
            return Ok(());
        }
        let value = value.map(|v| self.constrain(v)).transpose()?;
        self.assign_value(value)
    }

    /// Assign the text. After initialization it is parsed into the value.
    ///
    /// Returns the parse validity.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] when the text parses to an
    /// out-of-range value and clipping is disabled.
    pub fn set_text(&mut self, text: Option<String>) -> Result<bool, NumericError> {
        if text == self.text {
            return Ok(true);
        }
        self.text = text;
        if !self.initialized {
            return Ok(true);
        }
        let text = self.text.clone();
        self.reconcile(true, text.as_deref(), false)
    }

    /// Assign text typed by the user.
    ///
    /// Same as [`set_text`](Self::set_text), but the text is left as typed
    /// and invalid input disables spinning.
    ///
    /// # Errors
    ///
    /// See [`set_text`](Self::set_text).
    pub fn set_text_from_ui(&mut self, text: Option<String>) -> Result<bool, NumericError> {
        let _typing = self.text_changed_from_ui.hold();
        self.set_text(text)
    }

    /// Commit pending input: parse the text and re-render it from the value.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Range`] as for [`set_text`](Self::set_text).
    pub fn commit_input(&mut self) -> Result<bool, NumericError> {
        let text = self.text.clone();
        self.reconcile(true, text.as_deref(), true)
    }

    // -------------------------------------------------------------------------
    // Bounds and spin configuration
    // -------------------------------------------------------------------------

    /// Set the lower bound (coerced to at most the maximum).
    ///
    /// # Errors
    ///
    /// Propagates errors from re-rendering a clamped value.
    pub fn set_minimum(&mut self, minimum: f64) -> Result<(), NumericError> {
        if self.bounds.set_minimum(minimum) {
            self.on_bounds_changed()?;
        }
        Ok(())
    }

    /// Set the upper bound (coerced to at least the minimum).
    ///
    /// # Errors
    ///
    /// Propagates errors from re-rendering a clamped value.
    pub fn set_maximum(&mut self, maximum: f64) -> Result<(), NumericError> {
        if self.bounds.set_maximum(maximum) {
            self.on_bounds_changed()?;
        }
        Ok(())
    }

    /// Set the spin step. Zero disables spinning.
    pub fn set_increment(&mut self, increment: f64) {
        self.increment = increment;
        if self.initialized {
            self.update_spin_directions();
        }
    }

    /// Set read-only mode. Read-only disables spinning.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.is_read_only = read_only;
        if self.initialized {
            self.update_spin_directions();
        }
    }

    /// Enable or disable clamping. Enabling it clamps the current value.
    ///
    /// # Errors
    ///
    /// Propagates errors from re-rendering a clamped value.
    pub fn set_clip_value_to_min_max(&mut self, clip: bool) -> Result<(), NumericError> {
        let enabling = clip && !self.clip_value_to_min_max;
        self.clip_value_to_min_max = clip;
        if enabling && self.initialized {
            self.clamp_current_value()?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Formatting configuration
    // -------------------------------------------------------------------------

    /// Set the format string and re-render.
    ///
    /// # Errors
    ///
    /// Propagates errors from the re-render reconciliation.
    pub fn set_format_string(&mut self, format_string: impl Into<String>) -> Result<(), NumericError> {
        self.formatter.format_string = format_string.into();
        self.on_format_changed()
    }

    /// Set the culture symbols and re-render.
    ///
    /// # Errors
    ///
    /// Propagates errors from the re-render reconciliation.
    pub fn set_number_format(&mut self, number_format: NumberFormat) -> Result<(), NumericError> {
        self.formatter.number_format = number_format;
        self.on_format_changed()
    }

    /// Set the styles accepted by the direct parse.
    ///
    /// # Errors
    ///
    /// Propagates errors from the re-render reconciliation.
    pub fn set_parsing_number_style(&mut self, styles: NumberStyles) -> Result<(), NumericError> {
        self.formatter.parsing_number_style = styles;
        self.on_format_changed()
    }

    /// Install or remove a custom converter and re-render.
    ///
    /// # Errors
    ///
    /// Propagates errors from the re-render reconciliation.
    pub fn set_text_converter(
        &mut self,
        converter: Option<Arc<dyn TextConverter>>,
    ) -> Result<(), NumericError> {
        self.formatter.text_converter = converter;
        self.on_format_changed()
    }

    // -------------------------------------------------------------------------
    // Spin
    // -------------------------------------------------------------------------

    /// Step the value once in `direction`.
    ///
    /// Does nothing and returns `Ok(false)` unless the direction is currently
    /// enabled.
    ///
    /// # Errors
    ///
    /// Propagates errors from re-rendering the new value.
    pub fn spin(&mut self, direction: SpinDirection) -> Result<bool, NumericError> {
        if !self.valid_spin_directions.contains(direction.flag()) {
            log::trace!("spin {direction:?} ignored; enabled: {:?}", self.valid_spin_directions);
            return Ok(false);
        }
        let target = step_target(direction, self.value, self.increment, &self.bounds);
        self.assign_value(Some(target))?;
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Reactions
    // -------------------------------------------------------------------------

    fn on_value_changed(&mut self, old: Option<f64>, new: Option<f64>) -> Result<(), NumericError> {
        if self.initialized && !self.internal_value_set.is_set() {
            self.reconcile(false, None, true)?;
        }
        self.update_spin_directions();
        self.effects.push(Effect::ValueChanged(ValueChanged { old, new }));
        Ok(())
    }

    fn on_bounds_changed(&mut self) -> Result<(), NumericError> {
        if !self.initialized {
            return Ok(());
        }
        self.update_spin_directions();
        if self.clip_value_to_min_max {
            self.clamp_current_value()?;
        }
        Ok(())
    }

    fn on_format_changed(&mut self) -> Result<(), NumericError> {
        if self.initialized {
            self.reconcile(false, None, true)?;
        }
        Ok(())
    }

    fn update_spin_directions(&mut self) {
        let dirs = compute_valid_directions(
            self.value,
            self.bounds.minimum(),
            self.bounds.maximum(),
            self.increment,
            self.is_read_only,
        );
        self.set_spin_directions(dirs);
    }

    fn set_spin_directions(&mut self, dirs: ValidSpinDirections) {
        self.valid_spin_directions = dirs;
        self.effects.push(Effect::SetSpinDirections(dirs));
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Apply the range policy, logging what it did.
    fn constrain(&self, value: f64) -> Result<f64, NumericError> {
        match self.bounds.apply(value, self.clip_value_to_min_max) {
            Ok(v) => {
                if !same_value(Some(v), Some(value)) {
                    log::debug!("clamped {value} to {v}");
                }
                Ok(v)
            }
            Err(err) => {
                log::debug!("{err}");
                Err(err)
            }
        }
    }

    fn clamp_current_value(&mut self) -> Result<(), NumericError> {
        match self.value {
            Some(v) => self.assign_value(Some(self.bounds.clamp(v))),
            None => Ok(()),
        }
    }

    /// Store a value set from outside the engine.
    fn assign_value(&mut self, value: Option<f64>) -> Result<(), NumericError> {
        if same_value(value, self.value) {
            return Ok(());
        }
        let old = std::mem::replace(&mut self.value, value);
        if self.initialized {
            self.on_value_changed(old, value)?;
        }
        Ok(())
    }

    /// Store a value produced by reconciliation.
    fn commit_internal(&mut self, value: Option<f64>) -> Result<(), NumericError> {
        let _internal = self.internal_value_set.hold();
        let old = std::mem::replace(&mut self.value, value);
        self.on_value_changed(old, value)
    }
}

impl Reconciler for NumericState {
    fn reconcile(
        &mut self,
        update_value_from_text: bool,
        text: Option<&str>,
        force_text_rerender: bool,
    ) -> Result<bool, NumericError> {
        let Some(_syncing) = self.syncing.acquire() else {
            log::trace!("reconcile re-entered; skipping");
            return Ok(true);
        };
        log::trace!(
            "reconcile update_value_from_text={update_value_from_text} text={text:?} force_text_rerender={force_text_rerender}"
        );

        let mut valid = true;
        if update_value_from_text {
            let rendered = self.formatter.format(self.value);
            if rendered.as_deref() != text {
                match self.formatter.parse(rendered.as_deref(), text) {
                    Ok(parsed) => {
                        let candidate = parsed.map(|v| self.constrain(v)).transpose()?;
                        if !same_value(candidate, self.value) {
                            self.commit_internal(candidate)?;
                        }
                    }
                    Err(err) if err.is_parse_failure() => {
                        log::debug!("{err}");
                        valid = false;
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        let typing = self.text_changed_from_ui.is_set();
        if !typing && force_text_rerender {
            let new_text = self.formatter.format(self.value);
            if new_text != self.text {
                self.set_text(new_text)?;
            }
        }
        self.effects.push(Effect::PushText(self.text.clone()));

        if typing && !valid {
            self.set_spin_directions(ValidSpinDirections::empty());
        } else {
            self.update_spin_directions();
        }
        Ok(valid)
    }
}

/// Value equality where NaN equals NaN.
fn same_value(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
        (None, None) => true,
        _ => false,
    }
}
