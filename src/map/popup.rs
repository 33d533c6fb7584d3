use crate::model::ParcelFromMap;

/// Floating info panel anchored to a map coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Popup {
    position: Option<(f64, f64)>,
    content: String,
    closer_focused: bool,
}

impl Popup {
    pub fn show(&mut self, coordinate: (f64, f64), parcel: &ParcelFromMap) {
        self.content = format!(
            "<p><b>Parcel {}</b></p> <p>APN: {}</p>",
            parcel.id,
            parcel.apn.as_ref().map(String::as_str).unwrap_or("undefined")
        );
        self.position = Some(coordinate);
    }

    /// Hides the popup and takes focus away from its close control.
    pub fn hide(&mut self) {
        self.position = None;
        self.closer_focused = false;
    }

    /// The close control received focus (it was tabbed to or pressed).
    pub fn focus_closer(&mut self) {
        self.closer_focused = true;
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_closer_focused(&self) -> bool {
        self.closer_focused
    }
}
