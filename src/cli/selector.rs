//! Open/closed state of a currency picker.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Closed,
    Open,
}

/// A picker that is either showing its options or not.
///
/// Toggling flips the state, choosing an option while open emits it and
/// closes, and any interaction elsewhere while open closes without a choice.
#[derive(Debug, Default)]
pub struct Selector {
    state: SelectorState,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SelectorState::Open
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            SelectorState::Closed => SelectorState::Open,
            SelectorState::Open => SelectorState::Closed,
        };
    }

    /// Emits `code` if the picker is open. A closed picker ignores the choice.
    pub fn select(&mut self, code: &str) -> Option<String> {
        match self.state {
            SelectorState::Open => {
                self.state = SelectorState::Closed;
                Some(code.to_string())
            }
            SelectorState::Closed => None,
        }
    }

    /// Interaction outside the picker.
    pub fn dismiss(&mut self) {
        self.state = SelectorState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_state() {
        let mut selector = Selector::new();
        assert_eq!(selector.state(), SelectorState::Closed);
        selector.toggle();
        assert!(selector.is_open());
        selector.toggle();
        assert_eq!(selector.state(), SelectorState::Closed);
    }

    #[test]
    fn test_select_emits_and_closes() {
        let mut selector = Selector::new();
        selector.toggle();
        assert_eq!(selector.select("EUR"), Some("EUR".to_string()));
        assert_eq!(selector.state(), SelectorState::Closed);
    }

    #[test]
    fn test_select_while_closed_is_ignored() {
        let mut selector = Selector::new();
        assert_eq!(selector.select("EUR"), None);
        assert_eq!(selector.state(), SelectorState::Closed);
    }

    #[test]
    fn test_dismiss_closes_without_selection() {
        let mut selector = Selector::new();
        selector.toggle();
        selector.dismiss();
        assert_eq!(selector.state(), SelectorState::Closed);
        selector.dismiss();
        assert_eq!(selector.state(), SelectorState::Closed);
    }
}
