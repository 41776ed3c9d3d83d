use contracts::domain::a001_product::{ProductCategory, ProductForm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use web_sys::File;

use super::fields::{take_picked_files, ProductFields};
use super::{
    accept_new_photos, create_summary, field_label, next_entry, validation_lines, StagedBatch,
};
use crate::domain::a001_product::api::{create_product_with_photos, create_products};
use crate::domain::a001_product::bulk::use_refresh;
use crate::layout::global_context::use_app_context;
use crate::shared::components::{AlertDialog, ConfirmDialog};
use crate::shared::date_utils::today_iso;
use crate::shared::error::ApiError;
use crate::shared::icons::icon;
use crate::shared::message::use_messages;

fn blank_form() -> ProductForm {
    ProductForm {
        date: today_iso(),
        category: ProductCategory::Unassigned.code().to_string(),
        current_status: "0".to_string(),
        ..Default::default()
    }
}

#[component]
pub fn ProductCreate() -> impl IntoView {
    let ctx = use_app_context();
    let messages = use_messages();
    let refresh = use_refresh();

    let form = RwSignal::new(blank_form());
    let batch = RwSignal::new(StagedBatch::default());
    let photos = RwSignal::new_local(Vec::<File>::new());
    let (alert, set_alert) = signal(Option::<Vec<String>>::None);
    let (confirming, set_confirming) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);

    let add_row = move |_: leptos::ev::MouseEvent| {
        let current = form.get_untracked();
        let mut result = Ok(());
        batch.update(|b| result = b.add(&current));
        match result {
            Ok(()) => form.set(next_entry(&current)),
            Err(missing) => set_alert.set(Some(validation_lines(&missing))),
        }
    };

    let pick_photos = move |ev: leptos::ev::Event| {
        let files = take_picked_files(&ev);
        let incoming: Vec<(String, f64)> = files.iter().map(|f| (f.name(), f.size())).collect();
        let staged: Vec<(String, f64)> =
            photos.with_untracked(|p| p.iter().map(|f| (f.name(), f.size())).collect());
        match accept_new_photos(&[], &staged, &incoming) {
            Ok(accepted) => photos.update(|p| {
                p.extend(accepted.into_iter().filter_map(|i| files.get(i).cloned()))
            }),
            Err(message) => set_alert.set(Some(vec![message])),
        }
    };

    // a single product with photos goes out as multipart, a batch as JSON
    let request_submit = move |_: leptos::ev::MouseEvent| {
        if batch.with_untracked(|b| b.is_empty()) {
            let current = form.get_untracked();
            if photos.with_untracked(|p| p.is_empty()) {
                set_alert.set(Some(vec!["請至少新增一項產品".to_string()]));
                return;
            }
            if let Err(missing) = current.validate() {
                set_alert.set(Some(validation_lines(&missing)));
                return;
            }
        }
        set_confirming.set(true);
    };

    let submit = move || {
        set_confirming.set(false);
        set_is_submitting.set(true);
        let forms = batch.with_untracked(|b| b.forms());
        let single = form.get_untracked();
        let files = photos.get_untracked();

        spawn_local(async move {
            let result = if forms.is_empty() {
                create_product_with_photos(&single, &files).await
            } else {
                create_products(&forms).await
            };
            set_is_submitting.set(false);
            match result {
                Ok(response) => {
                    let (success, message) = create_summary(&response);
                    messages.settle(success, message, set_alert);
                    refresh.trigger();
                    if success {
                        batch.update(|b| b.clear());
                        photos.set(Vec::new());
                        form.set(blank_form());
                        ctx.show_list();
                    }
                }
                Err(ApiError::Validation(missing)) => set_alert.set(Some(
                    missing
                        .iter()
                        .map(|f| format!("{} 為必填欄位", field_label(f)))
                        .collect(),
                )),
                Err(e) => {
                    log::error!("Failed to create products: {}", e);
                    messages.settle(false, e.to_string(), set_alert);
                }
            }
        });
    };

    view! {
        <div class="page page--narrow">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("plus")}
                    <h1 class="page__title">"新增產品"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.show_list()>
                        "返回列表"
                    </Button>
                </div>
            </div>

            <ProductFields form=form />

            <div class="form-group">
                <label>"Photos"</label>
                <input type="file" accept="image/*" multiple=true on:change=pick_photos />
                <ul class="photo-list">
                    {move || {
                        photos.with(|p| {
                            p.iter()
                                .enumerate()
                                .map(|(index, file)| {
                                    view! {
                                        <li>
                                            {file.name()}
                                            <button
                                                class="button button--icon"
                                                on:click=move |_| photos.update(|p| {
                                                    if index < p.len() {
                                                        p.remove(index);
                                                    }
                                                })
                                            >
                                                {icon("x")}
                                            </button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        })
                    }}
                </ul>
            </div>

            <Flex gap=FlexGap::Small>
                <Button appearance=ButtonAppearance::Secondary on_click=add_row>
                    {icon("plus")}
                    " 加入清單"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=request_submit
                    disabled=is_submitting
                >
                    {move || if is_submitting.get() { "送出中..." } else { "送出" }}
                </Button>
            </Flex>

            <div class="staged-batch">
                <div class="staged-batch__summary">
                    {move || batch.with(|b| format!(
                        "待建立 {} 筆 (SSD {} / RAM {})",
                        b.len(),
                        b.ssd_count(),
                        b.ram_count()
                    ))}
                </div>
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"SO"</TableHeaderCell>
                            <TableHeaderCell>"Number"</TableHeaderCell>
                            <TableHeaderCell>"Barcode"</TableHeaderCell>
                            <TableHeaderCell>"Qty"</TableHeaderCell>
                            <TableHeaderCell>"Date"</TableHeaderCell>
                            <TableHeaderCell>"Category"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || batch.with(|b| b.rows().to_vec())
                            key=|row| row.key
                            children=move |row| {
                                let key = row.key;
                                let category = ProductCategory::from_code(&row.form.category).label();
                                view! {
                                    <TableRow>
                                        <TableCell><TableCellLayout>{row.form.so_number}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{row.form.number}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{row.form.barcode}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{row.form.qty}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{row.form.date}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{category}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <button
                                                class="button button--icon"
                                                title="移除"
                                                on:click=move |_| batch.update(|b| b.remove(key))
                                            >
                                                {icon("delete")}
                                            </button>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>

            {move || alert.get().map(|lines| view! {
                <AlertDialog
                    title="提示"
                    lines=lines
                    on_close=Callback::new(move |_| set_alert.set(None))
                />
            })}

            <Show when=move || confirming.get()>
                <ConfirmDialog
                    title="確認送出"
                    message=format!(
                        "確定要建立 {} 筆產品嗎？",
                        batch.with_untracked(|b| b.len()).max(1)
                    )
                    on_confirm=Callback::new(move |_| submit())
                    on_cancel=Callback::new(move |_| set_confirming.set(false))
                />
            </Show>
        </div>
    }
}
