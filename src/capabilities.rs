// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capabilities.
//!
//! A home automation device carries any subset of the capability blocks in
//! [`Capability`]. The set of blocks that are actually present on a parsed
//! [`Device`](crate::model::Device) is reported as a [`CapabilitySet`], so
//! callers can test membership without inspecting each optional block.
//!
//! # Examples
//!
//! ```
//! use fritzbox_lib::{Capability, CapabilitySet};
//!
//! let mut caps = CapabilitySet::empty();
//! caps.insert(Capability::Switch);
//! caps.insert(Capability::Powermeter);
//!
//! assert!(caps.contains(Capability::Switch));
//! assert!(!caps.contains(Capability::Thermostat));
//! assert_eq!(caps.len(), 2);
//! ```

use std::fmt;

/// One optional feature block of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Switchable outlet.
    Switch,
    /// Temperature sensor.
    Temperature,
    /// Energy meter.
    Powermeter,
    /// Plain on/off unit.
    SimpleOnOff,
    /// Dimmable unit.
    LevelControl,
    /// Color light.
    ColorControl,
    /// Radiator thermostat (HKR).
    Thermostat,
    /// Alarm sensor.
    Alert,
    /// Push button(s).
    Button,
    /// ETSI unit metadata.
    UnitInfo,
}

impl Capability {
    /// All capabilities in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Switch,
        Self::Temperature,
        Self::Powermeter,
        Self::SimpleOnOff,
        Self::LevelControl,
        Self::ColorControl,
        Self::Thermostat,
        Self::Alert,
        Self::Button,
        Self::UnitInfo,
    ];

    /// Returns the router's element name for this block.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Temperature => "temperature",
            Self::Powermeter => "powermeter",
            Self::SimpleOnOff => "simpleonoff",
            Self::LevelControl => "levelcontrol",
            Self::ColorControl => "colorcontrol",
            Self::Thermostat => "hkr",
            Self::Alert => "alert",
            Self::Button => "button",
            Self::UnitInfo => "etsiunitinfo",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// A set of [`Capability`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds a capability to the set.
    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    /// Returns whether the set contains the capability.
    #[must_use]
    pub const fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Returns the number of capabilities in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the capabilities in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::empty();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for capability in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{capability}")?;
            first = false;
        }
        Ok(())
    }
}
