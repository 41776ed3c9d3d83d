use crate::domain::a002_cargo::api::fetch_cargos;
use crate::shared::icons::icon;
use contracts::domain::a002_cargo::Cargo;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Searchable select for the product's cargo (shipping method)
#[component]
pub fn CargoSelect(
    /// Selected cargo id
    value: RwSignal<Option<String>>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let (cargos, set_cargos) = signal::<Vec<Cargo>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (is_open, set_is_open) = signal(false);
    let search = RwSignal::new(String::new());

    spawn_local(async move {
        match fetch_cargos().await {
            Ok(items) => set_cargos.set(items),
            Err(e) => {
                log::error!("Failed to load cargos: {}", e);
                set_error.set(Some(e.to_string()));
            }
        }
    });

    let display_value = move || {
        let id = value.get();
        cargos.with(|list| {
            id.and_then(|id| list.iter().find(|c| c.id == id).map(|c| c.name.clone()))
                .unwrap_or_default()
        })
    };

    let filtered = move || {
        let term = search.get();
        cargos.with(|list| list.iter().filter(|c| c.matches(&term)).cloned().collect::<Vec<_>>())
    };

    let choose = move |id: Option<String>| {
        value.set(id);
        search.set(String::new());
        set_is_open.set(false);
    };

    view! {
        <div class="searchable-select">
            <div
                class="searchable-select__control"
                class:searchable-select__control--disabled=move || disabled.get()
                on:click=move |_| {
                    if !disabled.get_untracked() {
                        set_is_open.update(|o| *o = !*o);
                    }
                }
            >
                <span class="searchable-select__value">
                    {move || {
                        let text = display_value();
                        if text.is_empty() { "-- Select --".to_string() } else { text }
                    }}
                </span>
                <Show when=move || value.get().is_some() && !disabled.get()>
                    <button
                        type="button"
                        class="searchable-select__clear"
                        on:click=move |e| {
                            e.stop_propagation();
                            choose(None);
                        }
                    >
                        {icon("x")}
                    </button>
                </Show>
                {icon("chevron-down")}
            </div>

            <Show when=move || is_open.get()>
                <div class="searchable-select__dropdown">
                    <input
                        type="text"
                        class="searchable-select__search"
                        placeholder="搜尋..."
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <ul class="searchable-select__options">
                        {move || {
                            let items = filtered();
                            if items.is_empty() {
                                view! { <li class="searchable-select__empty">"No results"</li> }.into_any()
                            } else {
                                items
                                    .into_iter()
                                    .map(|cargo| {
                                        let id = cargo.id.clone();
                                        let selected = value.get().as_deref() == Some(cargo.id.as_str());
                                        view! {
                                            <li
                                                class="searchable-select__option"
                                                class:searchable-select__option--selected=selected
                                                on:click=move |_| choose(Some(id.clone()))
                                            >
                                                {cargo.name}
                                            </li>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </ul>
                </div>
            </Show>
        </div>
    }
}
