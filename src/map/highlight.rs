/// The single highlighted feature of a map.
///
/// At most one feature is highlighted; setting a new id replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    id: Option<String>,
}

impl HighlightState {
    /// Highlights `id`. `None` or an empty id clears the highlight.
    pub fn set(&mut self, id: Option<&str>) {
        self.id = id.filter(|id| !id.is_empty()).map(str::to_owned);
    }

    pub fn clear(&mut self) {
        self.id = None;
    }

    pub fn get(&self) -> Option<&str> {
        self.id.as_ref().map(String::as_str)
    }

    pub fn is_highlighted(&self, id: Option<&str>) -> bool {
        match (&self.id, id) {
            (Some(current), Some(id)) => current == id,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_keep_a_single_highlight() {
        let mut state = HighlightState::default();
        state.set(Some("1"));
        state.set(Some("2"));
        assert_eq!(state.get(), Some("2"));
        assert!(!state.is_highlighted(Some("1")));
        assert!(state.is_highlighted(Some("2")));
    }

    #[test]
    fn it_should_clear_on_empty_ids() {
        let mut state = HighlightState::default();
        state.set(Some("1"));
        state.set(Some(""));
        assert_eq!(state.get(), None);

        state.set(Some("1"));
        state.set(None);
        assert_eq!(state.get(), None);
    }

    #[test]
    fn it_should_never_match_features_without_id() {
        let state = HighlightState::default();
        assert!(!state.is_highlighted(None));
        assert!(!state.is_highlighted(Some("1")));
    }
}
