use leptos::prelude::Effect;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

/// Screen shown in the main area
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AppView {
    #[default]
    List,
    Create,
    Edit(String),
}

/// URL form of [`AppView`]: `?view=edit&id=42`
#[derive(Debug, Default, Serialize, Deserialize)]
struct ViewQuery {
    #[serde(default)]
    view: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl AppView {
    /// Parses a location search string; anything unknown falls back to the list.
    pub fn from_query(search: &str) -> Self {
        let query: ViewQuery =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        match (query.view.as_str(), query.id) {
            ("create", _) => AppView::Create,
            ("edit", Some(id)) if !id.trim().is_empty() => AppView::Edit(id),
            _ => AppView::List,
        }
    }

    pub fn to_query(&self) -> String {
        let query = match self {
            AppView::List => ViewQuery {
                view: "list".to_string(),
                id: None,
            },
            AppView::Create => ViewQuery {
                view: "create".to_string(),
                id: None,
            },
            AppView::Edit(id) => ViewQuery {
                view: "edit".to_string(),
                id: Some(id.clone()),
            },
        };
        format!("?{}", serde_qs::to_string(&query).unwrap_or_default())
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub view: RwSignal<AppView>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            view: RwSignal::new(AppView::List),
        }
    }

    /// Restores the view from the URL and keeps the URL in sync afterwards.
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        self.view.set(AppView::from_query(&search));

        let this = *self;
        Effect::new(move |_| {
            let new_url = this.view.get().to_query();
            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();

            // Only update URL if it actually changed
            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }

    pub fn show_list(&self) {
        self.view.set(AppView::List);
    }

    pub fn show_create(&self) {
        self.view.set(AppView::Create);
    }

    pub fn show_edit(&self, id: impl Into<String>) {
        self.view.set(AppView::Edit(id.into()));
    }
}

pub fn use_app_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_query() {
        assert_eq!(AppView::from_query("?view=edit&id=42"), AppView::Edit("42".into()));
        assert_eq!(AppView::from_query("view=create"), AppView::Create);
        assert_eq!(AppView::from_query(""), AppView::List);
        assert_eq!(AppView::from_query("?view=edit"), AppView::List);
        assert_eq!(AppView::from_query("?active=a012"), AppView::List);
    }

    #[test]
    fn test_view_to_query() {
        assert_eq!(AppView::Edit("7".into()).to_query(), "?view=edit&id=7");
        assert_eq!(AppView::List.to_query(), "?view=list");
    }
}
