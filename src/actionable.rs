//! Capability flags that drive external toolbar state.
//!
//! Modes toggle these flags to tell the host which editor actions currently
//! make sense (deleting the selection, combining features, ...). The host is
//! notified only when the aggregate set actually changes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while applying an [`ActionPatch`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Invalid action type: {0}")]
    InvalidActionType(String),

    #[error("Invalid value for action '{name}': expected a boolean, got {value}")]
    InvalidActionValue { name: String, value: String },

    #[error("Action patch must be a JSON object")]
    NotAnObject,
}

/// The predeclared capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Trash,
    CombineFeatures,
    UncombineFeatures,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Trash,
        Capability::CombineFeatures,
        Capability::UncombineFeatures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Trash => "trash",
            Capability::CombineFeatures => "combineFeatures",
            Capability::UncombineFeatures => "uncombineFeatures",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.as_str() == s)
            .ok_or_else(|| ActionError::InvalidActionType(s.to_string()))
    }
}

/// Current value of every capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionState {
    pub trash: bool,
    pub combine_features: bool,
    pub uncombine_features: bool,
}

impl ActionState {
    pub fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::Trash => self.trash,
            Capability::CombineFeatures => self.combine_features,
            Capability::UncombineFeatures => self.uncombine_features,
        }
    }

    fn slot(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::Trash => &mut self.trash,
            Capability::CombineFeatures => &mut self.combine_features,
            Capability::UncombineFeatures => &mut self.uncombine_features,
        }
    }

    /// Applies `patch`, returning whether any flag flipped.
    ///
    /// Every name is validated before anything is written, so a patch with
    /// one unknown name leaves the state untouched.
    pub fn apply(&mut self, patch: &ActionPatch) -> Result<bool, ActionError> {
        let resolved = patch
            .entries
            .iter()
            .map(|(name, value)| name.parse::<Capability>().map(|cap| (cap, *value)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut changed = false;
        for (capability, value) in resolved {
            let slot = self.slot(capability);
            if *slot != value {
                changed = true;
            }
            *slot = value;
        }
        Ok(changed)
    }
}

/// A partial update of capability flags, keyed by flag name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionPatch {
    entries: BTreeMap<String, bool>,
}

impl ActionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a predeclared capability.
    pub fn set(mut self, capability: Capability, value: bool) -> Self {
        self.entries.insert(capability.as_str().to_string(), value);
        self
    }

    /// Sets a flag by name; unknown names are reported when the patch is applied.
    pub fn set_named(mut self, name: impl Into<String>, value: bool) -> Self {
        self.entries.insert(name.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a patch from a JSON object, rejecting non-boolean values.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ActionError> {
        let object = value.as_object().ok_or(ActionError::NotAnObject)?;
        let mut entries = BTreeMap::new();
        for (name, value) in object {
            let flag = value
                .as_bool()
                .ok_or_else(|| ActionError::InvalidActionValue {
                    name: name.clone(),
                    value: value.to_string(),
                })?;
            entries.insert(name.clone(), flag);
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut state = ActionState::default();
        assert!(!state.apply(&ActionPatch::new()).unwrap());
        assert_eq!(state, ActionState::default());
    }

    #[test]
    fn test_matching_values_report_no_change() {
        let mut state = ActionState::default();
        let patch = ActionPatch::new()
            .set(Capability::Trash, false)
            .set(Capability::CombineFeatures, false);
        assert!(!state.apply(&patch).unwrap());
    }

    #[test]
    fn test_flipped_value_reports_change() {
        let mut state = ActionState::default();
        let patch = ActionPatch::new().set(Capability::Trash, true);
        assert!(state.apply(&patch).unwrap());
        assert!(state.trash);
        assert!(!state.combine_features);
    }

    #[test]
    fn test_unknown_name_leaves_state_untouched() {
        let mut state = ActionState::default();
        let patch = ActionPatch::new()
            .set(Capability::Trash, true)
            .set_named("unknownFlag", true);

        let err = state.apply(&patch).unwrap_err();
        assert_eq!(err, ActionError::InvalidActionType("unknownFlag".to_string()));
        assert_eq!(state, ActionState::default());
    }

    #[test]
    fn test_from_json_requires_booleans() {
        let patch = ActionPatch::from_json(&json!({ "trash": true })).unwrap();
        assert_eq!(patch, ActionPatch::new().set(Capability::Trash, true));

        let err = ActionPatch::from_json(&json!({ "trash": "yes" })).unwrap_err();
        assert!(matches!(err, ActionError::InvalidActionValue { .. }));

        assert_eq!(
            ActionPatch::from_json(&json!([true])).unwrap_err(),
            ActionError::NotAnObject
        );
    }

    #[test]
    fn test_state_serializes_with_wire_names() {
        let state = ActionState {
            trash: true,
            combine_features: false,
            uncombine_features: true,
        };
        assert_eq!(
            serde_json::to_value(state).unwrap(),
            json!({ "trash": true, "combineFeatures": false, "uncombineFeatures": true })
        );
    }
}
