//! Numeric up/down input widget.
//!
//! [`NumericUpDown`] binds a text box to an optional `f64` value with
//! bounds, custom formatting and increment/decrement ("spin") input. The
//! text/value reconciliation lives in [`sync`]; the widget shell only routes
//! events and applies the engine's effects.

pub mod bounds;
pub mod button_spinner;
pub mod converter;
pub mod error;
pub mod format;
pub mod number_style;
pub mod numeric_up_down;
pub mod spin;
pub mod sync;
pub mod text_input;

pub use bounds::Bounds;
pub use button_spinner::{ButtonSpinner, ButtonSpinnerLocation};
pub use converter::{FnConverter, RadixConverter, TextConverter, ValueFormatter};
pub use error::NumericError;
pub use format::{format_composite, format_number, is_percent, NAN_TOKEN};
pub use number_style::{parse_number, NumberFormat, NumberStyles, PercentPattern};
pub use numeric_up_down::{
    HorizontalAlignment, NumericUpDown, NumericUpDownOptions, Property, VerticalAlignment,
};
pub use spin::{
    compute_valid_directions, should_spin, step_target, SpinDirection, SpinEventArgs,
    ValidSpinDirections,
};
pub use sync::{Effect, FlagGuard, NumericState, Reconciler, ScopedFlag, ValueChanged};
pub use text_input::{TextChanged, TextInput, TextSubmitted};
