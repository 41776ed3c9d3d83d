use contracts::domain::a001_product::{Photo, ProductForm, ProductStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use web_sys::File;

use super::fields::{take_picked_files, ProductFields};
use super::{accept_new_photos, field_label, photo_url, validation_lines, MAX_PHOTOS};
use crate::domain::a001_product::api::{fetch_product, update_product};
use crate::domain::a001_product::bulk::use_refresh;
use crate::domain::a001_product::cache::use_product_cache;
use crate::domain::a002_cargo::ui::picker::CargoSelect;
use crate::layout::global_context::use_app_context;
use crate::shared::api_utils::api_base;
use crate::shared::components::AlertDialog;
use crate::shared::error::ApiError;
use crate::shared::icons::icon;
use crate::shared::message::use_messages;

#[component]
pub fn ProductEdit(id: String) -> impl IntoView {
    let ctx = use_app_context();
    let messages = use_messages();
    let refresh = use_refresh();
    let cache = use_product_cache();
    let product_id = StoredValue::new(id);

    let form = RwSignal::new(ProductForm::default());
    let cargo = RwSignal::new(Option::<String>::None);
    let existing_photos = RwSignal::new(Vec::<Photo>::new());
    let removed_photo_ids = RwSignal::new(Vec::<String>::new());
    let new_photos = RwSignal::new_local(Vec::<File>::new());
    let (is_loading, set_is_loading) = signal(true);
    let (is_saving, set_is_saving) = signal(false);
    let (load_error, set_load_error) = signal(Option::<String>::None);
    let (alert, set_alert) = signal(Option::<Vec<String>>::None);

    spawn_local(async move {
        let id = product_id.get_value();
        match fetch_product(&id).await {
            Ok(product) => {
                form.set(ProductForm::from(&product));
                cargo.set(product.cargo.clone());
                existing_photos.set(product.photos.clone());
                cache.absorb(std::slice::from_ref(&product));
            }
            Err(e) => {
                log::error!("Failed to load product {}: {}", id, e);
                set_load_error.set(Some(e.to_string()));
            }
        }
        set_is_loading.set(false);
    });

    // picker -> form
    Effect::new(move |_| {
        let selected = cargo.get();
        form.update(|f| f.cargo = selected);
    });

    let kept_photos = move || {
        let removed = removed_photo_ids.get();
        existing_photos.with(|photos| {
            photos
                .iter()
                .filter(|p| !removed.contains(&p.id))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let pick_photos = move |ev: leptos::ev::Event| {
        let files = take_picked_files(&ev);
        let incoming: Vec<(String, f64)> = files.iter().map(|f| (f.name(), f.size())).collect();
        let staged: Vec<(String, f64)> =
            new_photos.with_untracked(|p| p.iter().map(|f| (f.name(), f.size())).collect());
        let kept = untrack(kept_photos);
        match accept_new_photos(&kept, &staged, &incoming) {
            Ok(accepted) => {
                if accepted.len() < incoming.len() {
                    set_alert.set(Some(vec![format!(
                        "最多只能上傳 {} 張圖片，已加入前 {} 張",
                        MAX_PHOTOS,
                        accepted.len()
                    )]));
                }
                new_photos.update(|p| {
                    p.extend(accepted.into_iter().filter_map(|i| files.get(i).cloned()))
                });
            }
            Err(message) => set_alert.set(Some(vec![message])),
        }
    };

    let save = move |_: leptos::ev::MouseEvent| {
        let current = form.get_untracked();
        if let Err(missing) = current.validate() {
            set_alert.set(Some(validation_lines(&missing)));
            return;
        }
        let id = product_id.get_value();
        let files = new_photos.get_untracked();
        let removed = removed_photo_ids.get_untracked();
        set_is_saving.set(true);

        spawn_local(async move {
            match update_product(&id, &current, &files, &removed).await {
                Ok(product) => {
                    cache.absorb(std::slice::from_ref(&product));
                    messages.success(format!("產品 {} 已更新", product.id));
                    refresh.trigger();
                    ctx.show_list();
                }
                Err(ApiError::Validation(missing)) => set_alert.set(Some(
                    missing
                        .iter()
                        .map(|f| format!("{} 為必填欄位", field_label(f)))
                        .collect(),
                )),
                Err(e) => {
                    log::error!("Failed to update product {}: {}", id, e);
                    messages.settle(false, e.to_string(), set_alert);
                }
            }
            set_is_saving.set(false);
        });
    };

    let base = api_base().unwrap_or_default();

    view! {
        <div class="page page--narrow">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("edit")}
                    <h1 class="page__title">
                        {move || format!("編輯產品 #{}", product_id.get_value())}
                    </h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.show_list()>
                        "返回列表"
                    </Button>
                </div>
            </div>

            {move || load_error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <Show
                when=move || !is_loading.get() && load_error.get().is_none()
                fallback=move || view! {
                    <div class="text-muted">
                        {move || if is_loading.get() { "載入中…" } else { "" }}
                    </div>
                }
            >
                <ProductFields form=form />

                <div class="form-grid">
                    <div class="form-group">
                        <label>"Status"</label>
                        <select
                            prop:value=move || form.with(|f| f.current_status.clone())
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.current_status = value);
                            }
                        >
                            {[ProductStatus::Stored, ProductStatus::Shipped]
                                .into_iter()
                                .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-group">
                        <label>"Ship Date"</label>
                        <input
                            type="date"
                            prop:value=move || form.with(|f| f.ex_date.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| {
                                    f.ex_date = (!value.trim().is_empty()).then_some(value)
                                });
                            }
                        />
                    </div>
                    <div class="form-group">
                        <label>"Cargo"</label>
                        <CargoSelect value=cargo disabled=is_saving />
                    </div>
                </div>

                <div class="form-group">
                    <label>
                        {move || format!(
                            "Photos ({}/{})",
                            kept_photos().len() + new_photos.with(|p| p.len()),
                            MAX_PHOTOS
                        )}
                    </label>
                    <div class="photo-grid">
                        {
                            let base = base.clone();
                            move || {
                                let base = base.clone();
                                kept_photos()
                                    .into_iter()
                                    .map(|photo| {
                                        let photo_id = photo.id.clone();
                                        view! {
                                            <div class="photo-grid__item">
                                                <img src=photo_url(&base, &photo.path) alt=photo.path.clone() />
                                                <button
                                                    class="button button--icon"
                                                    title="移除"
                                                    on:click=move |_| {
                                                        let id = photo_id.clone();
                                                        removed_photo_ids.update(|ids| ids.push(id));
                                                    }
                                                >
                                                    {icon("delete")}
                                                </button>
                                            </div>
                                        }
                                    })
                                    .collect_view()
                            }
                        }
                    </div>
                    <ul class="photo-list">
                        {move || {
                            new_photos.with(|p| {
                                p.iter()
                                    .enumerate()
                                    .map(|(index, file)| view! {
                                        <li>
                                            {file.name()}
                                            <button
                                                class="button button--icon"
                                                on:click=move |_| new_photos.update(|p| {
                                                    if index < p.len() {
                                                        p.remove(index);
                                                    }
                                                })
                                            >
                                                {icon("x")}
                                            </button>
                                        </li>
                                    })
                                    .collect_view()
                            })
                        }}
                    </ul>
                    <input type="file" accept="image/*" multiple=true on:change=pick_photos />
                </div>

                <Flex gap=FlexGap::Small>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=save
                        disabled=is_saving
                    >
                        {icon("save")}
                        {move || if is_saving.get() { " 儲存中..." } else { " 儲存" }}
                    </Button>
                </Flex>
            </Show>

            {move || alert.get().map(|lines| view! {
                <AlertDialog
                    title="提示"
                    lines=lines
                    on_close=Callback::new(move |_| set_alert.set(None))
                />
            })}
        </div>
    }
}
