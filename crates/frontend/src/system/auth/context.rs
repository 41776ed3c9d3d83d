use leptos::prelude::*;

use super::{api, storage};
use crate::shared::error::ApiError;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub username: Option<String>,
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    // Restore session from localStorage
    let (auth_state, set_auth_state) = signal(AuthState {
        access_token: storage::get_access_token(),
        username: storage::get_username(),
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Helper: Perform login
pub async fn do_login(
    username: String,
    password: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    let tokens = api::obtain_token(username.clone(), password).await?;

    storage::save_session(&tokens.access, tokens.refresh.as_deref(), &username);
    log::info!("Logged in as {}", username);

    set_auth_state.set(AuthState {
        access_token: Some(tokens.access),
        username: Some(username),
    });

    Ok(())
}

/// Helper: Perform logout
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
