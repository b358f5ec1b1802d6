//! Typed inbox messages
//!
//! Raw [`Tuple`]s are validated here before anything touches the display:
//! the key has to be one of [`MessageKey`] and the value has to have the
//! shape that key expects.

use crate::dictionary::{Tuple, Value};

/// Keys sent by the companion app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum MessageKey {
    Quote = 0,
    ShowQuote = 1,
    ShowBt = 2,
    ShowBattery = 3,
}

impl MessageKey {
    /// Map a raw key, `None` for keys this watchface does not know.
    pub fn from_raw(key: u32) -> Option<Self> {
        match key {
            0 => Some(Self::Quote),
            1 => Some(Self::ShowQuote),
            2 => Some(Self::ShowBt),
            3 => Some(Self::ShowBattery),
            _ => None,
        }
    }
}

/// Visibility switch carried by the `Show*` keys.
///
/// The exact string `"false"` hides the field, any other string shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Toggle {
    Hidden,
    Shown,
}

impl Toggle {
    pub fn from_text(text: &str) -> Self {
        if text == "false" {
            Self::Hidden
        } else {
            Self::Shown
        }
    }

    pub fn is_shown(self) -> bool {
        self == Self::Shown
    }
}

/// A validated inbox message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message<'a> {
    /// New quote text
    Quote(&'a str),
    ShowQuote(Toggle),
    ShowBt(Toggle),
    ShowBattery(Toggle),
}

impl<'a> Message<'a> {
    /// Validate a raw tuple.
    ///
    /// Returns `Ok(None)` for unknown keys, which are dropped without error.
    pub fn from_tuple(tuple: &Tuple<'a>) -> Result<Option<Self>, Error> {
        let Some(key) = MessageKey::from_raw(tuple.key) else {
            return Ok(None);
        };
        let Value::Text(text) = tuple.value else {
            return Err(Error::TypeMismatch(key));
        };

        Ok(Some(match key {
            MessageKey::Quote => Self::Quote(text),
            MessageKey::ShowQuote => Self::ShowQuote(Toggle::from_text(text)),
            MessageKey::ShowBt => Self::ShowBt(Toggle::from_text(text)),
            MessageKey::ShowBattery => Self::ShowBattery(Toggle::from_text(text)),
        }))
    }

    pub fn key(&self) -> MessageKey {
        match self {
            Self::Quote(_) => MessageKey::Quote,
            Self::ShowQuote(_) => MessageKey::ShowQuote,
            Self::ShowBt(_) => MessageKey::ShowBt,
            Self::ShowBattery(_) => MessageKey::ShowBattery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Every known key carries a string
    TypeMismatch(MessageKey),
}
