pub mod global_context;
pub mod header;

use header::TopHeader;
use leptos::prelude::*;

use crate::shared::message::MessageBanner;

/// Main application shell: top bar, message banner, then the current screen.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <TopHeader />
            <main class="app-main">
                <MessageBanner />
                {children()}
            </main>
        </div>
    }
}
