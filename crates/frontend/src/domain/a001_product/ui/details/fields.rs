use contracts::domain::a001_product::{ProductCategory, ProductForm};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement};

/// Text input bound to one field of the form
#[component]
pub fn FormText(
    label: &'static str,
    form: RwSignal<ProductForm>,
    get: fn(&ProductForm) -> String,
    set: fn(&mut ProductForm, String),
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label>
                {label}
                {required.then_some(view! { <span class="form-group__required">" *"</span> })}
            </label>
            <input
                type=input_type.unwrap_or("text")
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </div>
    }
}

/// Fields shared by the create and edit screens
#[component]
pub fn ProductFields(form: RwSignal<ProductForm>) -> impl IntoView {
    view! {
        <div class="form-grid">
            <FormText
                label="SO Number"
                form=form
                required=true
                get=|f| f.so_number.clone()
                set=|f, v| f.so_number = v
            />
            <FormText
                label="Number"
                form=form
                get=|f| f.number.clone()
                set=|f, v| f.number = v
            />
            <FormText
                label="Barcode"
                form=form
                required=true
                get=|f| f.barcode.clone()
                set=|f, v| f.barcode = v
            />
            <FormText
                label="Qty"
                form=form
                input_type="number"
                get=|f| f.qty.to_string()
                set=|f, v| f.qty = v.trim().parse().unwrap_or_default()
            />
            <FormText
                label="Weight"
                form=form
                input_type="number"
                get=|f| f.weight.map(|w| w.to_string()).unwrap_or_default()
                set=|f, v| f.weight = v.trim().parse().ok()
            />
            <FormText
                label="Date"
                form=form
                input_type="date"
                required=true
                get=|f| f.date.clone()
                set=|f, v| f.date = v
            />
            <FormText
                label="Vendor"
                form=form
                get=|f| f.vender.clone()
                set=|f, v| f.vender = v
            />
            <FormText
                label="Client"
                form=form
                get=|f| f.client.clone()
                set=|f, v| f.client = v
            />

            <div class="form-group">
                <label>"Category"</label>
                <select
                    prop:value=move || form.with(|f| f.category.clone())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.category = value);
                    }
                >
                    {ProductCategory::selectable()
                        .into_iter()
                        .map(|c| view! { <option value=c.code()>{format!("{}: {}", c.code(), c.label())}</option> })
                        .collect_view()}
                </select>
            </div>

            <div class="form-group form-group--wide">
                <label>"Note"</label>
                <textarea
                    prop:value=move || form.with(|f| f.noted.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.noted = value);
                    }
                />
            </div>
        </div>
    }
}

/// Files picked in a file input; the input is reset so the same file can
/// be picked again.
pub fn take_picked_files(ev: &leptos::ev::Event) -> Vec<File> {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return Vec::new();
    };
    let mut files = Vec::new();
    if let Some(list) = input.files() {
        for i in 0..list.length() {
            if let Some(file) = list.get(i) {
                files.push(file);
            }
        }
    }
    input.set_value("");
    files
}
