//! Tri-state checkbox status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Checked status of a node.
///
/// The numeric codes (`0`, `1`, `2`) are the ones accepted in construction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    /// Some but not all descendants are checked. Only ever derived, never set directly.
    Indeterminate,
}

impl CheckState {
    pub const fn code(self) -> u8 {
        match self {
            CheckState::Unchecked => 0,
            CheckState::Checked => 1,
            CheckState::Indeterminate => 2,
        }
    }

    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(CheckState::Unchecked),
            1 => Some(CheckState::Checked),
            2 => Some(CheckState::Indeterminate),
            _ => None,
        }
    }

    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }

    /// Terminal marker: `[ ]`, `[x]` or `[-]`.
    pub fn marker(self) -> &'static str {
        match self {
            CheckState::Unchecked => "[ ]",
            CheckState::Checked => "[x]",
            CheckState::Indeterminate => "[-]",
        }
    }
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckState::Unchecked => "unchecked",
            CheckState::Checked => "checked",
            CheckState::Indeterminate => "indeterminate",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_bool_when_converting_then_maps_to_settable_states() {
        assert_eq!(CheckState::from(true), CheckState::Checked);
        assert_eq!(CheckState::from(false), CheckState::Unchecked);
    }

    #[test]
    fn given_codes_when_decoding_then_matches_numeric_scheme() {
        for state in [
            CheckState::Unchecked,
            CheckState::Checked,
            CheckState::Indeterminate,
        ] {
            assert_eq!(CheckState::from_code(u64::from(state.code())), Some(state));
        }
        assert_eq!(CheckState::from_code(3), None);
    }
}
