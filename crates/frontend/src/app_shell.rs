//! Application shell: the auth gate and the main layout.
//!
//! - `AppShell` shows `LoginPage` until a token is present
//! - `MainLayout` renders the screen selected in [`AppGlobalContext`]

use crate::domain::a001_product::ui::details::create::ProductCreate;
use crate::domain::a001_product::ui::details::edit::ProductEdit;
use crate::domain::a001_product::ui::list::ProductList;
use crate::layout::global_context::{use_app_context, AppView};
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

#[component]
fn MainLayout() -> impl IntoView {
    let ctx = use_app_context();

    // Initialize router integration. This runs once when the component is created.
    ctx.init_router_integration();

    view! {
        <Shell>
            {move || match ctx.view.get() {
                AppView::List => view! { <ProductList /> }.into_any(),
                AppView::Create => view! { <ProductCreate /> }.into_any(),
                AppView::Edit(id) => view! { <ProductEdit id=id /> }.into_any(),
            }}
        </Shell>
    }
}

#[component]
pub fn AppShell() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().access_token.is_some()
            fallback=|| view! { <LoginPage /> }
        >
            <MainLayout />
        </Show>
    }
}
