use crate::shared::icons::icon;
use leptos::prelude::*;

/// Pages the user may jump to from `current` (1-based).
pub fn can_go_back(current: usize) -> bool {
    current > 1
}

pub fn can_go_forward(current: usize, total_pages: usize) -> bool {
    current < total_pages
}

/// PaginationControls component - first/previous/next/last buttons
///
/// Pages are 1-based, as the backend counts them. The page size is fixed by
/// the backend, so there is no size selector.
#[component]
pub fn PaginationControls(
    /// Current page (1-based)
    #[prop(into)]
    current_page: Signal<usize>,

    #[prop(into)]
    total_pages: Signal<usize>,

    /// Disables navigation while a page is loading
    #[prop(optional, into)]
    disabled: Signal<bool>,

    on_page_change: Callback<usize>,
) -> impl IntoView {
    let back_disabled = move || disabled.get() || !can_go_back(current_page.get());
    let forward_disabled =
        move || disabled.get() || !can_go_forward(current_page.get(), total_pages.get());

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(1)
                disabled=back_disabled
                title="第一頁"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get_untracked();
                    if can_go_back(page) {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=back_disabled
                title="上一頁"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {}", current_page.get(), total_pages.get().max(1))}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get_untracked();
                    if can_go_forward(page, total_pages.get_untracked()) {
                        on_page_change.run(page + 1);
                    }
                }
                disabled=forward_disabled
                title="下一頁"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let total = total_pages.get_untracked();
                    if total > 0 {
                        on_page_change.run(total);
                    }
                }
                disabled=forward_disabled
                title="最後一頁"
            >
                {icon("chevrons-right")}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_bounds() {
        assert!(!can_go_back(1));
        assert!(can_go_back(2));
        assert!(can_go_forward(1, 3));
        assert!(!can_go_forward(3, 3));
        assert!(!can_go_forward(1, 0));
    }
}
