mod state;

use contracts::domain::a001_product::Product;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use state::{create_state, persist_state};
use thaw::*;

use super::action_bar::ProductActionBar;
use super::export_menu::ExportMenu;
use crate::domain::a001_product::api::HttpProductGateway;
use crate::domain::a001_product::bulk::use_refresh;
use crate::domain::a001_product::cache::use_product_cache;
use crate::domain::a001_product::coordinator::{
    load_counts, load_page, select_all_across_pages, InventoryCounts, CLIENT_SORTED_FIELD,
};
use crate::domain::a001_product::selection::use_selection;
use crate::layout::global_context::use_app_context;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table::{
    header_state, SortableHeaderCell, TableCellCheckbox, TableHeaderCheckbox,
};
use crate::shared::date_utils::{format_date, today_iso};
use crate::shared::icons::icon;
use crate::shared::list_utils::{is_row_navigation_target, LatestRequest};
use crate::shared::message::use_messages;

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Sortable columns: (label, backend field)
const COLUMNS: [(&str, &str); 10] = [
    ("ID", "id"),
    ("Number", "number"),
    ("SO", "so_number"),
    ("Barcode", "barcode"),
    ("Qty", "qty"),
    ("Date", "date"),
    ("Vendor", "vender"),
    ("Client", "client"),
    ("Category", "category"),
    ("Status", CLIENT_SORTED_FIELD),
];

/// Status and category text of a table row; unknown statuses show raw.
fn row_labels(product: &Product) -> (String, &'static str) {
    let status = product
        .status()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| product.current_status.clone().unwrap_or_default());
    (status, product.category_kind().label())
}

#[component]
fn ProductListHeader(
    #[prop(into)] counts: Signal<InventoryCounts>,
    #[prop(into)] page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] is_loading: Signal<bool>,
    on_refresh: Callback<()>,
) -> impl IntoView {
    let stat = |label: &'static str, value: Signal<String>| {
        view! {
            <div class="stat-card">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{move || value.get()}</div>
            </div>
        }
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                {icon("products")}
                <h1 class="page__title">"Inventory"</h1>
            </div>

            <div class="page__header-right">
                {stat("總產品數", Signal::derive(move || counts.get().total.to_string()))}
                {stat("SSD-大", Signal::derive(move || counts.get().ssd_large.to_string()))}
                {stat("SSD-顆", Signal::derive(move || counts.get().ssd_chip.to_string()))}
                {stat("RAM", Signal::derive(move || counts.get().ram.to_string()))}
                {stat(
                    "當前頁面",
                    Signal::derive(move || format!("{} / {}", page.get(), total_pages.get().max(1))),
                )}
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_refresh.run(())
                    disabled=is_loading
                >
                    {icon("refresh")}
                    {move || if is_loading.get() { " 載入中..." } else { " 重新整理" }}
                </Button>
            </div>
        </div>
    }
}

#[component]
pub fn ProductList() -> impl IntoView {
    let ctx = use_app_context();
    let selection = use_selection();
    let cache = use_product_cache();
    let messages = use_messages();
    let refresh = use_refresh();
    let gateway = HttpProductGateway::new();

    let state = create_state(&today_iso());

    let (items, set_items) = signal(Vec::<Product>::new());
    let (counts, set_counts) = signal(InventoryCounts::default());
    let (is_loading, set_is_loading) = signal(false);
    let (is_selecting_all, set_is_selecting_all) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    // the newest request wins; older responses are dropped
    let load_seq = LatestRequest::new();

    let load = move || {
        let seq = load_seq.begin();
        set_is_loading.set(true);
        set_error.set(None);

        let st = state.get_untracked();
        let known_total = st.is_loaded.then_some(st.total_pages);

        spawn_local(async move {
            let result = load_page(&gateway, &st.search, st.page as i64, &st.sort, known_total).await;
            if !load_seq.is_current(seq) {
                return;
            }
            match result {
                Ok(snapshot) => {
                    cache.absorb(&snapshot.products);
                    set_items.set(snapshot.products);
                    state.update(|s| {
                        s.page = snapshot.page;
                        s.total_pages = snapshot.total_pages;
                        s.is_loaded = true;
                    });
                    persist_state(state);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_is_loading.set(false);
        });
    };

    let counts_seq = LatestRequest::new();
    let load_header_counts = move || {
        let seq = counts_seq.begin();
        let search = state.with_untracked(|s| s.search.clone());
        spawn_local(async move {
            let result = load_counts(&gateway, &search).await;
            if !counts_seq.is_current(seq) {
                return;
            }
            match result {
                Ok(c) => set_counts.set(c),
                Err(e) => log::error!("Failed to count products: {}", e),
            }
        });
    };

    // initial load, then every refresh request
    Effect::new(move |_| {
        refresh.track();
        load();
        load_header_counts();
    });

    // search input -> state.search (debounced), back to page 1
    let search_input = RwSignal::new(state.get_untracked().search);
    let search_seq = LatestRequest::new();
    let search_first_run = StoredValue::new(true);
    Effect::new(move |_| {
        let value = search_input.get();
        if search_first_run.get_value() {
            search_first_run.set_value(false);
            return;
        }
        let seq = search_seq.begin();
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            if !search_seq.is_current(seq) {
                return;
            }
            state.update(|s| {
                s.search = value.trim().to_string();
                s.page = 1;
                s.is_loaded = false;
                s.all_selected = false;
            });
            persist_state(state);
            load();
            load_header_counts();
        });
    });

    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        persist_state(state);
        load();
    };

    let toggle_sort = move |field: String| {
        state.update(|s| s.sort.toggle(&field));
        persist_state(state);
        load();
    };

    let select_row = move |(id, checked): (String, bool)| {
        selection.set(id, checked);
        state.update(|s| s.all_selected = false);
    };

    let select_all = move |checked: bool| {
        if !checked {
            selection.clear();
            state.update(|s| s.all_selected = false);
            return;
        }
        let (search, total_pages) = state.with_untracked(|s| (s.search.clone(), s.total_pages));
        set_is_selecting_all.set(true);
        spawn_local(async move {
            let shared = cache.cache();
            let result = select_all_across_pages(&gateway, &search, total_pages, |page| {
                shared.borrow_mut().absorb(page)
            })
            .await;
            cache.touch();
            match result {
                Ok(ids) => {
                    selection.set_all(ids);
                    state.update(|s| s.all_selected = true);
                }
                Err(e) => messages.error(format!("Failed to select all products: {}", e)),
            }
            set_is_selecting_all.set(false);
        });
    };

    let header_checkbox = Signal::derive(move || {
        header_state(state.with(|s| s.all_selected), selection.count())
    });
    let current_sort_field = Signal::derive(move || state.with(|s| s.sort.field_name().to_string()));
    let sort_ascending = Signal::derive(move || state.with(|s| s.sort.order.is_ascending()));

    view! {
        <div class="page page--wide">
            <ProductListHeader
                counts=counts
                page=Signal::derive(move || state.with(|s| s.page))
                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                is_loading=is_loading
                on_refresh=Callback::new(move |_| refresh.trigger())
            />

            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="filter-panel">
                <div class="filter-panel-header">
                    <div class="filter-panel-header__left">
                        <Input value=search_input placeholder="搜尋產品 (日期、SO、條碼...)" />
                    </div>

                    <div class="filter-panel-header__center">
                        <PaginationControls
                            current_page=Signal::derive(move || state.with(|s| s.page))
                            total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                            disabled=is_loading
                            on_page_change=Callback::new(go_to_page)
                        />
                    </div>

                    <div class="filter-panel-header__right">
                        <ProductActionBar />
                        <ExportMenu search=Signal::derive(move || state.with(|s| s.search.clone())) />
                    </div>
                </div>
            </div>

            <div class="page-content">
                <div style="width: 100%; overflow-x: auto;">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCheckbox
                                    state=header_checkbox
                                    busy=is_selecting_all
                                    on_change=Callback::new(select_all)
                                />
                                {COLUMNS
                                    .into_iter()
                                    .map(|(label, field)| {
                                        view! {
                                            <SortableHeaderCell
                                                label=label
                                                sort_field=field
                                                current_sort_field=current_sort_field
                                                sort_ascending=sort_ascending
                                                on_sort=Callback::new(toggle_sort)
                                            />
                                        }
                                    })
                                    .collect_view()}
                                <TableHeaderCell>"Actions"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <Show
                                when=move || !items.with(|i| i.is_empty())
                                fallback=move || view! {
                                    <TableRow>
                                        <TableCell attr:colspan="12">
                                            <TableCellLayout>
                                                <span class="text-muted">
                                                    {move || if is_loading.get() { "載入中…" } else { "沒有資料" }}
                                                </span>
                                            </TableCellLayout>
                                        </TableCell>
                                    </TableRow>
                                }
                            >
                                <For
                                    each=move || items.get()
                                    key=|p| p.id.clone()
                                    children=move |product| {
                                        let id = product.id.clone();
                                        let id_for_row = id.clone();
                                        let id_for_edit = id.clone();
                                        let (status, category) = row_labels(&product);
                                        view! {
                                            <TableRow
                                                class="table__row--clickable"
                                                on:click=move |ev| {
                                                    if is_row_navigation_target(ev.target()) {
                                                        ctx.show_edit(id_for_row.clone());
                                                    }
                                                }
                                            >
                                                <TableCellCheckbox
                                                    item_id=id.clone()
                                                    selected=selection.selected()
                                                    on_change=Callback::new(select_row)
                                                />
                                                <TableCell><TableCellLayout>{id}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{product.number}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{product.so_number}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{product.barcode}</TableCellLayout></TableCell>
                                                <TableCell class="table__cell--right"><TableCellLayout>{product.qty}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{format_date(&product.date)}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout truncate=true>{product.vender}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout truncate=true>{product.client}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{category}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{status}</TableCellLayout></TableCell>
                                                <TableCell>
                                                    <button
                                                        class="button button--icon"
                                                        title="Edit Product"
                                                        on:click=move |_| ctx.show_edit(id_for_edit.clone())
                                                    >
                                                        {icon("edit")}
                                                    </button>
                                                </TableCell>
                                            </TableRow>
                                        }
                                    }
                                />
                            </Show>
                        </TableBody>
                    </Table>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::ProductCategory;

    fn product(status: Option<&str>, category: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "current_status": status,
            "category": category,
        }))
        .unwrap()
    }

    #[test]
    fn test_row_labels() {
        let (status, category) = row_labels(&product(Some("1"), "2"));
        assert_eq!(status, "出貨");
        assert_eq!(category, ProductCategory::Ram.label());

        let (status, _) = row_labels(&product(Some("9"), "1"));
        assert_eq!(status, "9");
        assert_eq!(row_labels(&product(None, "")).0, "");
    }
}
