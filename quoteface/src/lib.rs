//! Watchface core for the PineTime quote face.
//!
//! Everything in here is free of hardware access so it can run on the host:
//! the inbox dictionary codec, the typed message model and its dispatcher,
//! the display state, label formatting and the controller that ties the
//! system events together.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod battery;
pub mod config;
pub mod dictionary;
pub mod dispatcher;
pub mod display;
pub mod label;
pub mod message;
pub mod time;
pub mod watchface;

pub use battery::BatteryInfo;
pub use config::WatchfaceConfig;
pub use dispatcher::{dispatch, Peek, SystemStatus};
pub use display::{DisplayState, Field, FieldSet, FieldUpdate};
pub use message::{Message, MessageKey, Toggle};
pub use watchface::Watchface;
