use annokit_core::constants::MAX_TABS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display group a tab shows annotations from.
///
/// The four lettered groups are shared by every tab that selects them;
/// `Tab` gives the tab its own selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayGroup {
    A,
    B,
    C,
    D,
    #[default]
    Tab,
}

impl DisplayGroup {
    fn shared_index(&self) -> Option<usize> {
        match self {
            Self::A => Some(0),
            Self::B => Some(1),
            Self::C => Some(2),
            Self::D => Some(3),
            Self::Tab => None,
        }
    }
}

impl fmt::Display for DisplayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
            Self::Tab => write!(f, "Tab"),
        }
    }
}

/// Whether an annotation is shown, per shared group and per tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGroupSelection {
    shared: [bool; 4],
    tabs: [bool; MAX_TABS],
}

impl Default for DisplayGroupSelection {
    fn default() -> Self {
        Self {
            shared: [true; 4],
            tabs: [true; MAX_TABS],
        }
    }
}

impl DisplayGroupSelection {
    /// Tab indices past the last tab are never displayed
    pub fn is_selected(&self, group: DisplayGroup, tab_index: usize) -> bool {
        match group.shared_index() {
            Some(i) => self.shared[i],
            None => self.tabs.get(tab_index).copied().unwrap_or(false),
        }
    }

    pub fn set_selected(&mut self, group: DisplayGroup, tab_index: usize, selected: bool) {
        match group.shared_index() {
            Some(i) => self.shared[i] = selected,
            None => {
                if let Some(flag) = self.tabs.get_mut(tab_index) {
                    *flag = selected;
                }
            }
        }
    }

    pub fn set_all(&mut self, selected: bool) {
        self.shared.fill(selected);
        self.tabs.fill(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_groups_ignore_tab() {
        let mut selection = DisplayGroupSelection::default();
        selection.set_selected(DisplayGroup::B, 3, false);
        assert!(!selection.is_selected(DisplayGroup::B, 0));
        assert!(!selection.is_selected(DisplayGroup::B, 7));
        assert!(selection.is_selected(DisplayGroup::A, 7));
        assert!(selection.is_selected(DisplayGroup::Tab, 3));
    }

    #[test]
    fn test_tab_group_is_per_tab() {
        let mut selection = DisplayGroupSelection::default();
        selection.set_selected(DisplayGroup::Tab, 2, false);
        assert!(!selection.is_selected(DisplayGroup::Tab, 2));
        assert!(selection.is_selected(DisplayGroup::Tab, 1));
        assert!(!selection.is_selected(DisplayGroup::Tab, MAX_TABS));

        selection.set_all(true);
        assert!(selection.is_selected(DisplayGroup::Tab, 2));
    }
}
