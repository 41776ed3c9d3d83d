//! "Select all" checkbox of the table header.
//!
//! The selection may span pages, so the state is computed by the caller
//! instead of from the rows on screen.

use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxState {
    Unchecked,
    Checked,
    Indeterminate,
}

#[component]
pub fn TableHeaderCheckbox(
    #[prop(into)]
    state: Signal<CheckboxState>,

    /// Disables the box while a select-all is running
    #[prop(optional, into)]
    busy: Signal<bool>,

    /// `true` = select all, `false` = clear
    on_change: Callback<bool>,
) -> impl IntoView {
    let checkbox_ref = NodeRef::<leptos::html::Input>::new();

    // indeterminate is a DOM property only
    Effect::new(move |_| {
        let indeterminate = state.get() == CheckboxState::Indeterminate;
        if let Some(input) = checkbox_ref.get() {
            if let Some(input_el) = input.dyn_ref::<web_sys::HtmlInputElement>() {
                input_el.set_indeterminate(indeterminate);
            }
        }
    });

    view! {
        <TableHeaderCell class="table__cell--checkbox">
            <input
                node_ref=checkbox_ref
                type="checkbox"
                class="table__checkbox"
                title="全選所有頁面"
                prop:checked=move || state.get() == CheckboxState::Checked
                prop:disabled=move || busy.get()
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </TableHeaderCell>
    }
}

/// Header state: checked after a select-all, indeterminate while some
/// other selection exists.
pub fn header_state(all_selected: bool, selected_count: usize) -> CheckboxState {
    if all_selected && selected_count > 0 {
        CheckboxState::Checked
    } else if selected_count > 0 {
        CheckboxState::Indeterminate
    } else {
        CheckboxState::Unchecked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_state() {
        assert_eq!(header_state(false, 0), CheckboxState::Unchecked);
        assert_eq!(header_state(false, 3), CheckboxState::Indeterminate);
        assert_eq!(header_state(true, 10), CheckboxState::Checked);
        // select-all over an empty result set
        assert_eq!(header_state(true, 0), CheckboxState::Unchecked);
    }
}
