//! Top navigation bar: app title, screen switching, user and logout.

use crate::layout::global_context::{use_app_context, AppView};
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, set_auth_state) = use_auth();

    let is_list = move || ctx.view.get() == AppView::List;
    let is_create = move || ctx.view.get() == AppView::Create;

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                {icon("products")}
                <span class="top-header__title">"倉儲管理系統"</span>
            </div>

            <nav class="top-header__nav">
                <button
                    class="top-header__nav-item"
                    class:top-header__nav-item--active=is_list
                    on:click=move |_| ctx.show_list()
                >
                    {icon("products")}
                    " 產品列表"
                </button>
                <button
                    class="top-header__nav-item"
                    class:top-header__nav-item--active=is_create
                    on:click=move |_| ctx.show_create()
                >
                    {icon("plus")}
                    " 新增產品"
                </button>
            </nav>

            <div class="top-header__actions">
                <div class="top-header__user">
                    <span>{move || auth_state.get().username.unwrap_or_default()}</span>
                </div>
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| do_logout(set_auth_state)
                    title="登出"
                >
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
