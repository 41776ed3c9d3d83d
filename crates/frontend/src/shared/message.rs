use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::config::config;
use crate::shared::icons::icon;
use crate::shared::list_utils::LatestRequest;

/// Where an action's outcome is shown.
///
/// Successes go to the banner; failures block in an alert dialog until the
/// user dismisses them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Banner(String),
    Alert(Vec<String>),
}

impl Feedback {
    pub fn of(success: bool, text: impl Into<String>) -> Self {
        let text = text.into();
        if success {
            return Feedback::Banner(text);
        }
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            Feedback::Alert(vec!["操作失敗".to_string()])
        } else {
            Feedback::Alert(lines)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// One-line status banner shared by the whole app.
///
/// A shown message hides itself after `ui.message_hide_ms`; a newer message
/// restarts the countdown.
#[derive(Clone, Copy)]
pub struct MessageService {
    current: RwSignal<Option<Message>>,
    generation: LatestRequest,
}

impl MessageService {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            generation: LatestRequest::new(),
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text.into(), false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text.into(), true);
    }

    /// Banner for a success, `alert` for a failure.
    pub fn settle(
        &self,
        success: bool,
        text: impl Into<String>,
        alert: WriteSignal<Option<Vec<String>>>,
    ) {
        match Feedback::of(success, text) {
            Feedback::Banner(text) => self.success(text),
            Feedback::Alert(lines) => alert.set(Some(lines)),
        }
    }

    pub fn dismiss(&self) {
        self.current.set(None);
    }

    pub fn current(&self) -> Signal<Option<Message>> {
        self.current.into()
    }

    fn show(&self, text: String, is_error: bool) {
        if text.is_empty() {
            return;
        }
        let shown = self.generation.begin();
        self.current.set(Some(Message { text, is_error }));

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(config().ui.message_hide_ms).await;
            if this.generation.is_current(shown) {
                this.current.try_set(None);
            }
        });
    }
}

pub fn use_messages() -> MessageService {
    use_context::<MessageService>().expect("MessageService not found in context")
}

/// Dismissable banner showing the current message
#[component]
pub fn MessageBanner() -> impl IntoView {
    let messages = use_messages();

    move || {
        messages.current().get().map(|message| {
            let class = if message.is_error {
                "alert alert--error"
            } else {
                "alert alert--success"
            };
            view! {
                <div class=class role="status">
                    <span>{message.text}</span>
                    <button
                        class="button button--icon alert__close"
                        title="關閉"
                        on:click=move |_| messages.dismiss()
                    >
                        {icon("x")}
                    </button>
                </div>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_goes_to_banner() {
        assert_eq!(Feedback::of(true, "已建立 2 筆產品"), Feedback::Banner("已建立 2 筆產品".into()));
    }

    #[test]
    fn test_failure_goes_to_alert() {
        assert_eq!(
            Feedback::of(false, "Export failed\n  too much data "),
            Feedback::Alert(vec!["Export failed".into(), "too much data".into()])
        );
        assert_eq!(Feedback::of(false, ""), Feedback::Alert(vec!["操作失敗".into()]));
    }
}
