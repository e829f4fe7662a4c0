// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Known switch commands and their parameters.
//!
//! The table is read-only and shared by every client. The executor does not
//! consult it; it exists so callers can validate a request or prompt for
//! parameters before sending it.

use crate::error::Error;

/// Command name to required parameter names, in the router's order.
///
/// `device` and `template` are carried as the `ain` query parameter.
static SWITCH_COMMANDS: &[(&str, &[&str])] = &[
    ("getswitchlist", &["device"]),
    ("setswitchon", &["device"]),
    ("setswitchoff", &["device"]),
    ("setswitchtoggle", &["device"]),
    ("getswitchstate", &["device"]),
    ("getswitchpresent", &["device"]),
    ("getswitchpower", &["device"]),
    ("getswitchenergy", &["device"]),
    ("getswitchname", &["device"]),
    ("getdevicelistinfos", &[]),
    ("gettemperature", &["device"]),
    ("gethkrtsoll", &["device"]),
    ("gethkrkomfort", &["device"]),
    ("gethkrabsenk", &["device"]),
    ("sethkrtsoll", &["device", "param"]),
    ("getbasicdevicestats", &["device"]),
    ("gettemplatelistinfos", &[]),
    ("applytemplate", &["template"]),
    ("setsimpleonoff", &["device", "onoff"]),
    ("setlevel", &["device", "level"]),
    ("setlevelpercentage", &["device", "level"]),
    ("setcolor", &["device", "hue", "saturation", "duration"]),
    ("setcolortemperature", &["device", "temperature", "duration"]),
    ("getcolordefaults", &["device"]),
    ("sethkrboost", &["device", "endtimestamp"]),
    ("sethkrwindowopen", &["device"]),
    ("setblind", &["device", "target"]),
    ("setname", &["device", "name"]),
    ("startulesubscription", &["device"]),
    ("getsubscriptionstate", &["device"]),
    ("getdeviceinfos", &["device"]),
];

/// Returns the required parameters of a command.
///
/// # Errors
///
/// Returns `Error::UnknownCommand` if the command is not in the catalog.
///
/// # Examples
///
/// ```
/// use fritzbox_lib::command::catalog;
///
/// assert_eq!(catalog::required_params("setlevel").unwrap(), ["device", "level"]);
/// assert!(catalog::required_params("selfdestruct").is_err());
/// ```
pub fn required_params(command: &str) -> Result<&'static [&'static str], Error> {
    SWITCH_COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, params)| *params)
        .ok_or_else(|| Error::UnknownCommand(command.to_string()))
}

/// Returns whether the command is in the catalog.
#[must_use]
pub fn is_known(command: &str) -> bool {
    SWITCH_COMMANDS.iter().any(|(name, _)| *name == command)
}

/// Iterates over all known commands with their parameters.
pub fn switch_commands() -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    SWITCH_COMMANDS.iter().copied()
}

/// Returns whether a parameter is carried as the request's AIN.
pub(crate) fn is_ain_param(param: &str) -> bool {
    matches!(param, "device" | "template")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_command() {
        assert_eq!(
            required_params("setcolor").unwrap(),
            ["device", "hue", "saturation", "duration"]
        );
        assert!(required_params("getdevicelistinfos").unwrap().is_empty());
    }

    #[test]
    fn lookup_unknown_command() {
        assert!(matches!(
            required_params("reboot"),
            Err(Error::UnknownCommand(name)) if name == "reboot"
        ));
        assert!(!is_known("reboot"));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = switch_commands().map(|(name, _)| name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 31);
    }
}
