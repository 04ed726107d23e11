//! Core types and traits for the updown numeric input widgets.
//!
//! This crate provides the toolkit-neutral pieces widgets are built on:
//! - Input events: [`Event`], [`Key`], [`MouseButton`]
//! - Hit-testing geometry: [`Point`], [`Rect`]
//! - The [`Widget`] trait and accessibility metadata
//! - Data-validation markers: [`ValidationResult`]
//! - Per-instance notifications: [`Observers`]
//! - Deferred operations: [`Dispatcher`]

mod dispatch;
mod event;
mod geometry;
mod observer;
mod validation;
pub mod widget;

pub use dispatch::{DeferredOp, Dispatcher};
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect};
pub use observer::{Observers, SubscriptionId};
pub use validation::ValidationResult;
pub use widget::{AccessibleRole, TypeId, Widget};
