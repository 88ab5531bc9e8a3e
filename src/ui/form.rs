//! Settings form reader

use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement};

use super::Dom;
use crate::settings::RawSettings;

/// Current value of a `<select>` or `<input>`; empty if missing
fn field_value(dom: &Dom, id: &str) -> String {
    let Some(el) = dom.element(id) else {
        return String::new();
    };
    if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    log::warn!("#{} is not a form field", id);
    String::new()
}

/// Snapshot the form; validation happens in `RawSettings::resolve`
pub fn read_settings(dom: &Dom) -> RawSettings {
    RawSettings {
        difficulty: field_value(dom, "difficulty"),
        mode: field_value(dom, "mode"),
        limit: field_value(dom, "limit"),
        speed: field_value(dom, "speed"),
        multiplier_mode: field_value(dom, "multiplier-mode"),
        fixed_multiplier: field_value(dom, "fixed-multiplier"),
    }
}
