// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet addressing.
//!
//! Outlets are numbered from 1 in every public API, matching the labels on
//! the device. The REST API addresses them by zero-based index, so the
//! wire index is always `number - 1`.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// One-based number of a relay outlet.
///
/// # Examples
///
/// ```
/// use dlpdu_lib::types::OutletNumber;
///
/// let outlet = OutletNumber::new(5).unwrap();
/// assert_eq!(outlet.value(), 5);
/// assert_eq!(outlet.wire_index(), 4);
///
/// // Zero and negative numbers never reach the device
/// assert!(OutletNumber::new(0).is_err());
/// assert!(OutletNumber::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutletNumber(u32);

impl OutletNumber {
    /// The first outlet on a device.
    pub const FIRST: Self = Self(1);

    /// Creates an outlet number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidOutletNumber` if `number` is below 1.
    pub fn new(number: i64) -> Result<Self, ValueError> {
        match u32::try_from(number) {
            Ok(n) if n >= 1 => Ok(Self(n)),
            _ => Err(ValueError::InvalidOutletNumber(number)),
        }
    }

    /// Creates the outlet number for a zero-based position in the device's
    /// outlet list.
    #[must_use]
    pub const fn from_position(position: u32) -> Self {
        Self(position.saturating_add(1))
    }

    /// Returns the one-based outlet number.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns the zero-based index used in REST paths.
    #[must_use]
    pub const fn wire_index(&self) -> u32 {
        self.0 - 1
    }
}

impl Default for OutletNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for OutletNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for OutletNumber {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutletNumber> for u32 {
    fn from(outlet: OutletNumber) -> Self {
        outlet.0
    }
}

/// Parses user input the way the outlet number field validates it: the
/// text must be an integer, and the integer must be at least 1.
impl FromStr for OutletNumber {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: i64 = s
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidInteger(s.to_string()))?;
        Self::new(number)
    }
}
