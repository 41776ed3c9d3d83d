//! Export buttons: PDF documents and the spreadsheet for the current search.

use contracts::domain::a001_product::ProductCategory;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_product::api::HttpProductGateway;
use crate::domain::a001_product::export::{export_for_query, DocumentKind};
use crate::shared::components::AlertDialog;
use crate::shared::icons::icon;
use crate::shared::message::use_messages;

/// Category filter value meaning "every category"
const ALL_CATEGORIES: &str = "0";

fn category_filter(value: &str) -> Vec<String> {
    if value.is_empty() || value == ALL_CATEGORIES {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

#[component]
pub fn ExportMenu(
    /// Search of the product table; exports cover every matching product
    #[prop(into)]
    search: Signal<String>,
) -> impl IntoView {
    let messages = use_messages();
    let gateway = HttpProductGateway::new();

    let (is_open, set_is_open) = signal(false);
    let category = RwSignal::new(ALL_CATEGORIES.to_string());
    // label of the export in progress
    let (running, set_running) = signal(Option::<&'static str>::None);
    let (alert, set_alert) = signal(Option::<Vec<String>>::None);

    let start = move |kind: Option<DocumentKind>| {
        if running.get_untracked().is_some() {
            return;
        }
        let label = kind.map(|k| k.label()).unwrap_or("CSV");
        let search = search.get_untracked();
        let categories = category_filter(&category.get_untracked());
        set_running.set(Some(label));

        spawn_local(async move {
            let result = export_for_query(&gateway, kind, &search, &categories).await;
            if !result.success {
                log::error!("{} export failed: {}", label, result.message);
            }
            messages.settle(result.success, result.message, set_alert);
            set_running.set(None);
        });
    };

    view! {
        <div class="export-menu">
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| set_is_open.update(|o| *o = !*o)
            >
                {icon("download")}
                {move || match running.get() {
                    Some(label) => format!(" {} 匯出中...", label),
                    None => " 匯出".to_string(),
                }}
            </Button>

            <Show when=move || is_open.get()>
                <div class="export-menu__panel">
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"類別"</Label>
                        <Select value=category>
                            <option value=ALL_CATEGORIES>"全部"</option>
                            {[ProductCategory::SsdLarge, ProductCategory::Ram, ProductCategory::SsdChip]
                                .into_iter()
                                .map(|c| view! { <option value=c.code()>{c.label()}</option> })
                                .collect_view()}
                        </Select>

                        {DocumentKind::all()
                            .into_iter()
                            .map(|kind| {
                                view! {
                                    <button
                                        class="export-menu__item"
                                        disabled=move || running.get().is_some()
                                        on:click=move |_| start(Some(kind))
                                    >
                                        {kind.label()}
                                    </button>
                                }
                            })
                            .collect_view()}
                        <button
                            class="export-menu__item"
                            disabled=move || running.get().is_some()
                            on:click=move |_| start(None)
                        >
                            "Excel (CSV)"
                        </button>
                    </Flex>
                </div>
            </Show>

            {move || alert.get().map(|lines| view! {
                <AlertDialog
                    title="匯出失敗"
                    lines=lines
                    on_close=Callback::new(move |_| set_alert.set(None))
                />
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter() {
        assert!(category_filter("0").is_empty());
        assert!(category_filter("").is_empty());
        assert_eq!(category_filter("2"), vec!["2".to_string()]);
    }
}
