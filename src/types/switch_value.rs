// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch value type for relay outlets.
//!
//! Hosts drive outlets through a generic "writable switch" interface whose
//! values are floating point. A relay only knows on and off, so the range is
//! fixed to `[0.0, 1.0]` with a step of `1.0`.

use std::fmt;

/// A switch value clamped to `[0.0, 1.0]`.
///
/// # Examples
///
/// ```
/// use dlpdu_lib::types::SwitchValue;
///
/// assert_eq!(SwitchValue::clamped(-5.0).value(), 0.0);
/// assert_eq!(SwitchValue::clamped(5.0).value(), 1.0);
/// assert_eq!(SwitchValue::clamped(0.5).value(), 0.5);
///
/// assert!(SwitchValue::ON.is_on());
/// assert!(!SwitchValue::clamped(0.5).is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SwitchValue(f64);

impl SwitchValue {
    /// Off.
    pub const OFF: Self = Self(0.0);

    /// On.
    pub const ON: Self = Self(1.0);

    /// Lowest accepted value.
    pub const MINIMUM: f64 = 0.0;

    /// Highest accepted value.
    pub const MAXIMUM: f64 = 1.0;

    /// Step between meaningful values.
    pub const STEP: f64 = 1.0;

    /// Creates a switch value, clamping to `[0.0, 1.0]`.
    ///
    /// NaN is stored as `0.0`.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::OFF;
        }
        Self(value.clamp(Self::MINIMUM, Self::MAXIMUM))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns `true` if the value is within `f64::EPSILON` of `1.0`.
    ///
    /// Anything else, including intermediate values, means off when written
    /// to the device.
    #[must_use]
    pub fn is_on(&self) -> bool {
        (self.0 - Self::MAXIMUM).abs() < f64::EPSILON
    }
}

impl From<bool> for SwitchValue {
    fn from(on: bool) -> Self {
        if on { Self::ON } else { Self::OFF }
    }
}

impl From<SwitchValue> for f64 {
    fn from(value: SwitchValue) -> Self {
        value.0
    }
}

impl fmt::Display for SwitchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn clamps_into_range() {
        assert_eq!(SwitchValue::clamped(-5.0).value(), 0.0);
        assert_eq!(SwitchValue::clamped(5.0).value(), 1.0);
        assert_eq!(SwitchValue::clamped(0.5).value(), 0.5);
        assert_eq!(SwitchValue::clamped(f64::INFINITY).value(), 1.0);
        assert_eq!(SwitchValue::clamped(f64::NEG_INFINITY).value(), 0.0);
    }

    #[test]
    fn nan_becomes_off() {
        assert_eq!(SwitchValue::clamped(f64::NAN), SwitchValue::OFF);
    }

    #[test]
    fn only_one_is_on() {
        assert!(SwitchValue::clamped(1.0).is_on());
        assert!(!SwitchValue::clamped(0.999).is_on());
        assert!(!SwitchValue::OFF.is_on());
    }

    #[test]
    fn from_bool() {
        assert_eq!(SwitchValue::from(true), SwitchValue::ON);
        assert_eq!(SwitchValue::from(false), SwitchValue::OFF);
    }
}
