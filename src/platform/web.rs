//! Browser HUD backed by DOM elements

use web_sys::Document;

use super::{DisplayField, Hud};

/// Writes counters into elements looked up by id
pub struct DomHud {
    document: Option<Document>,
}

impl DomHud {
    pub fn new() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            log::warn!("No document - HUD disabled");
        }
        Self { document }
    }
}

impl Default for DomHud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud for DomHud {
    fn set_text(&mut self, field: DisplayField, value: &str) {
        let Some(document) = &self.document else { return };
        if let Some(el) = document.get_element_by_id(field.element_id()) {
            el.set_text_content(Some(value));
        }
    }

    fn set_menu_visible(&mut self, visible: bool) {
        let Some(document) = &self.document else { return };
        if let Some(menu) = document.get_element_by_id("menu_wrapper") {
            let class = if visible { "visible" } else { "" };
            let _ = menu.set_attribute("class", class);
        }
    }
}
