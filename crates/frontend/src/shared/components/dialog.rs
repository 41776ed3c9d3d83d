//! Blocking dialogs: confirmation before destructive actions and alerts for
//! validation errors.

use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

#[component]
fn DialogFrame(
    #[prop(into)]
    title: String,
    on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    let stop_propagation = move |ev: ev::MouseEvent| ev.stop_propagation();

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal modal--dialog" on:click=stop_propagation>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                    <button class="button button--icon modal__close" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                {children()}
            </div>
        </div>
    }
}

/// Asks before running an action; `on_confirm` runs only on "確定".
#[component]
pub fn ConfirmDialog(
    #[prop(into)]
    title: String,
    #[prop(into)]
    message: String,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <DialogFrame title=title on_close=on_cancel>
            <div class="modal-body">
                <p>{message}</p>
            </div>
            <div class="modal-footer">
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    "取消"
                </button>
                <button class="button button--primary" on:click=move |_| on_confirm.run(())>
                    "確定"
                </button>
            </div>
        </DialogFrame>
    }
}

/// Shows a list of problems with a single dismiss button.
#[component]
pub fn AlertDialog(
    #[prop(into)]
    title: String,
    #[prop(into)]
    lines: Vec<String>,
    on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <DialogFrame title=title on_close=on_close>
            <div class="modal-body">
                <ul class="modal-body__list">
                    {lines.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ul>
            </div>
            <div class="modal-footer">
                <button class="button button--primary" on:click=move |_| on_close.run(())>
                    "確定"
                </button>
            </div>
        </DialogFrame>
    }
}
