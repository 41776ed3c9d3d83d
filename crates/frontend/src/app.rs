use crate::app_shell::AppShell;
use crate::domain::a001_product::bulk::RefreshTrigger;
use crate::domain::a001_product::cache::CacheService;
use crate::domain::a001_product::selection::SelectionService;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::message::MessageService;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    provide_context(AppGlobalContext::new());

    let selection = SelectionService::new();
    // other tabs write the same storage key
    selection.listen_cross_tab();
    provide_context(selection);

    provide_context(CacheService::new());
    provide_context(MessageService::new());
    provide_context(RefreshTrigger::new());

    view! {
        <AuthProvider>
            <AppShell />
        </AuthProvider>
    }
}
