// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Templates: named groups of devices a command can be applied to at once.

use serde::{Deserialize, Serialize};

use super::device::DeviceList;

/// A template configured on the router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    /// Template AIN, used with `applytemplate`.
    pub identifier: String,
    /// Internal id.
    pub id: String,
    /// User-assigned name.
    pub name: String,
    /// Devices the template applies to. Usually only their AINs are set.
    pub devices: DeviceList,
}

/// Templates in the order the router returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateList {
    templates: Vec<Template>,
}

impl TemplateList {
    /// Creates a list from templates.
    #[must_use]
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Returns the templates.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Finds a template by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Returns the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl IntoIterator for TemplateList {
    type Item = Template;
    type IntoIter = std::vec::IntoIter<Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.into_iter()
    }
}
