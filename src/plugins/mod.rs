// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Admission plugins module.

pub mod chaosvalidation;

use crate::admission::Plugins;

/// All plugins in execution order.
pub const ALL_ORDERED_PLUGINS: &[&str] = &[chaosvalidation::PLUGIN_NAME];

/// Register all admission plugins.
pub fn register_all_admission_plugins(plugins: &Plugins) {
    chaosvalidation::register(plugins);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_admission_plugins() {
        let plugins = Plugins::new();
        register_all_admission_plugins(&plugins);
        for name in ALL_ORDERED_PLUGINS {
            assert!(plugins.is_registered(name), "{} is not registered", name);
        }
    }
}
