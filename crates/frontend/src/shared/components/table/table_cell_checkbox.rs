//! Row selection checkbox
//!
//! ```rust,ignore
//! <TableCellCheckbox
//!     item_id=row.id.clone()
//!     selected=selection.selected()
//!     on_change=Callback::new(move |(id, checked)| selection.set(id, checked))
//! />
//! ```

use leptos::prelude::*;
use std::collections::BTreeSet;
use thaw::*;

/// Checkbox cell of one row.
///
/// Row click handlers skip this cell through `is_row_navigation_target`.
#[component]
pub fn TableCellCheckbox(
    #[prop(into)]
    item_id: String,

    #[prop(into)]
    selected: Signal<BTreeSet<String>>,

    /// Called with `(item_id, checked)`
    on_change: Callback<(String, bool)>,
) -> impl IntoView {
    let item_id_for_checked = item_id.clone();
    let item_id_for_change = item_id;

    view! {
        <TableCell class="table__cell--checkbox">
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || selected.with(|s| s.contains(&item_id_for_checked))
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    on_change.run((item_id_for_change.clone(), checked));
                }
            />
        </TableCell>
    }
}
