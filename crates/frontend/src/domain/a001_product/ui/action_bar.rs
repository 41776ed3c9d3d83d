//! Bulk action buttons for the current selection.

use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_product::api::HttpProductGateway;
use crate::domain::a001_product::bulk::{run_bulk_action, use_refresh, BulkAction};
use crate::domain::a001_product::cache::{use_product_cache, BulkAvailability};
use crate::domain::a001_product::selection::use_selection;
use crate::layout::global_context::use_app_context;
use crate::shared::components::{AlertDialog, ConfirmDialog};
use crate::shared::date_utils::today_iso;
use crate::shared::icons::icon;
use crate::shared::message::use_messages;

#[component]
pub fn ProductActionBar() -> impl IntoView {
    let ctx = use_app_context();
    let selection = use_selection();
    let cache = use_product_cache();
    let messages = use_messages();
    let refresh = use_refresh();
    let gateway = HttpProductGateway::new();

    let (pending, set_pending) = signal(Option::<BulkAction>::None);
    let (is_running, set_is_running) = signal(false);
    let (alert, set_alert) = signal(Option::<Vec<String>>::None);

    let availability = Memo::new(move |_| selection.selected().with(|ids| cache.availability(ids)));

    let run = move |action: BulkAction| {
        set_pending.set(None);
        set_is_running.set(true);
        spawn_local(async move {
            let store = selection.store();
            let shared_cache = cache.cache();
            let outcome = run_bulk_action(&gateway, &*store, &*shared_cache, action, &today_iso()).await;
            cache.touch();
            if let Some(outcome) = outcome {
                messages.settle(outcome.success, outcome.message, set_alert);
                if outcome.refresh {
                    refresh.trigger();
                }
            }
            set_is_running.set(false);
        });
    };

    let action_button = move |action: BulkAction, enabled: fn(&BulkAvailability) -> bool| {
        let appearance = if action == BulkAction::Delete {
            ButtonAppearance::Secondary
        } else {
            ButtonAppearance::Primary
        };
        let icon_name = match action {
            BulkAction::ShipOut => "shipments",
            BulkAction::ReceiveIn => "inbound",
            BulkAction::Delete => "delete",
        };
        view! {
            <Button
                appearance=appearance
                disabled=Signal::derive(move || is_running.get() || !enabled(&availability.get()))
                on_click=move |_| set_pending.set(Some(action))
            >
                {icon(icon_name)}
                {format!(" {}", action.label())}
            </Button>
        }
    };

    view! {
        <div class="action-bar">
            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                <span>{move || format!("已選取 {} 項", selection.count())}</span>
            </Badge>

            {action_button(BulkAction::ShipOut, |a| a.ship_out)}
            {action_button(BulkAction::ReceiveIn, |a| a.receive_in)}
            {action_button(BulkAction::Delete, |a| a.delete)}

            <Button
                appearance=ButtonAppearance::Subtle
                disabled=Signal::derive(move || is_running.get() || selection.count() == 0)
                on_click=move |_| selection.clear()
            >
                "清除選取"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=move |_| ctx.show_create()>
                {icon("plus")}
                " 新增產品"
            </Button>

            {move || {
                pending.get().map(|action| {
                    view! {
                        <ConfirmDialog
                            title=action.label()
                            message=action.confirm_message(selection.count())
                            on_confirm=Callback::new(move |_| run(action))
                            on_cancel=Callback::new(move |_| set_pending.set(None))
                        />
                    }
                })
            }}

            {move || alert.get().map(|lines| view! {
                <AlertDialog
                    title="操作失敗"
                    lines=lines
                    on_close=Callback::new(move |_| set_alert.set(None))
                />
            })}
        </div>
    }
}
