//! Helpers shared by list views: sort indicators, row click filtering and
//! stale-response guards.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

/// Elements that handle their own clicks inside a table row.
const INTERACTIVE_SELECTOR: &str = "input, a, button, label, select, .table__cell--checkbox";

/// Sort indicator for a column header
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// CSS class of the sort indicator
pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Whether a click on `target` should open the row.
///
/// Clicks landing on (or inside) a checkbox, link or button are left to
/// that control.
pub fn is_row_navigation_target(target: Option<EventTarget>) -> bool {
    let Some(element) = target.and_then(|t| t.dyn_into::<Element>().ok()) else {
        return true;
    };
    match element.closest(INTERACTIVE_SELECTOR) {
        Ok(Some(_)) => false,
        Ok(None) => true,
        Err(e) => {
            log::warn!("Invalid row click selector: {:?}", e);
            true
        }
    }
}

/// Numbers async requests so only the newest one may apply its result.
#[derive(Clone, Copy)]
pub struct LatestRequest(StoredValue<u64>);

impl LatestRequest {
    pub fn new() -> Self {
        Self(StoredValue::new(0))
    }

    /// Starts a request; every earlier one becomes stale.
    pub fn begin(&self) -> u64 {
        self.0.update_value(|n| *n += 1);
        self.0.get_value()
    }

    /// False once a newer request began or the owning view is gone.
    pub fn is_current(&self, seq: u64) -> bool {
        self.0.try_get_value() == Some(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("date", "date", true), " ▲");
        assert_eq!(get_sort_indicator("date", "date", false), " ▼");
        assert_eq!(get_sort_indicator("date", "barcode", true), " ⇅");
    }

    #[test]
    fn test_sort_class() {
        assert!(get_sort_class("qty", "qty").ends_with("--active"));
        assert_eq!(get_sort_class("", "qty"), "table__sort-indicator");
    }

    #[test]
    fn test_missing_target_navigates() {
        assert!(is_row_navigation_target(None));
    }

    #[test]
    fn test_checkbox_cell_is_interactive() {
        let selectors: Vec<&str> = INTERACTIVE_SELECTOR.split(',').map(str::trim).collect();
        assert!(selectors.contains(&".table__cell--checkbox"));
        assert!(selectors.contains(&"input"));
    }

    #[test]
    fn test_only_latest_request_is_current() {
        let requests = LatestRequest::new();
        let older = requests.begin();
        let newer = requests.begin();
        assert!(!requests.is_current(older));
        assert!(requests.is_current(newer));
    }
}
