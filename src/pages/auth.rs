use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{use_api, AuthGrant, LoginRequest, RegisterRequest};
use crate::components::{bind_text, INPUT_CLASS};
use crate::config::TOKEN_KEY;
use crate::error::ApiError;
use crate::session::{SessionAction, SessionContext};
use crate::storage;
use crate::toast::use_notifier;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self, is_login: bool) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Email and password are required");
        }
        if !is_login && self.username.trim().is_empty() {
            return Err("Username is required");
        }
        Ok(())
    }
}

#[function_component(AuthScreen)]
pub fn auth_screen() -> Html {
    let api = use_api();
    let session = use_context::<SessionContext>();
    let notifier = use_notifier();
    let is_login = use_state(|| true);
    let form = use_state(Credentials::default);
    let loading = use_state(|| false);

    let on_submit = {
        let is_login = is_login.clone();
        let form = form.clone();
        let loading = loading.clone();
        let notifier = notifier.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let login = *is_login;
            let creds = (*form).clone();
            if let Err(msg) = creds.validate(login) {
                notifier.error(msg);
                return;
            }

            let api = api.clone();
            let session = session.clone();
            let loading = loading.clone();
            let notifier = notifier.clone();
            loading.set(true);
            spawn_local(async move {
                let result = if login {
                    api.login(&LoginRequest {
                        email: creds.email.trim().to_string(),
                        password: creds.password,
                    })
                    .await
                } else {
                    api.register(&RegisterRequest {
                        username: creds.username.trim().to_string(),
                        email: creds.email.trim().to_string(),
                        password: creds.password,
                    })
                    .await
                };
                loading.set(false);
                match result {
                    Ok(AuthGrant { username, token }) => {
                        storage::save_string(TOKEN_KEY, &token);
                        log::info!("signed in as {username}");
                        notifier.success(if login {
                            "Login successful!"
                        } else {
                            "Registration successful!"
                        });
                        if let Some(session) = session {
                            session.dispatch(SessionAction::SignedIn { username, token });
                        }
                    }
                    Err(ApiError::Rejected(message)) => notifier.error(message),
                    Err(err) => {
                        log::warn!("auth request failed: {err}");
                        notifier.error(if login {
                            "Login failed. Try again."
                        } else {
                            "Registration failed. Try again."
                        });
                    }
                }
            });
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        Callback::from(move |_| is_login.set(!*is_login))
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-white rounded-2xl shadow-lg p-8 text-[#173E63]">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold">{ if *is_login { "Login" } else { "Register" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if *is_login { "Sign in to continue." } else { "Start tracking your purchases and sales." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    if !*is_login {
                        <input
                            class={INPUT_CLASS}
                            placeholder="Username"
                            value={form.username.clone()}
                            oninput={bind_text(&form, |f: &mut Credentials, v| f.username = v)}
                        />
                    }
                    <input
                        type="email"
                        class={INPUT_CLASS}
                        placeholder="Email"
                        value={form.email.clone()}
                        oninput={bind_text(&form, |f: &mut Credentials, v| f.email = v)}
                    />
                    <input
                        type="password"
                        class={INPUT_CLASS}
                        placeholder="Password"
                        value={form.password.clone()}
                        oninput={bind_text(&form, |f: &mut Credentials, v| f.password = v)}
                    />
                    <button
                        type="submit"
                        class="w-full bg-[#173E63] text-white py-2 rounded-[10px] font-semibold disabled:opacity-50"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else if *is_login { "Login" } else { "Register" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if *is_login { "No account?" } else { "Already have an account?" } }
                    <button class="ml-2 text-[#1D617A] font-semibold" onclick={toggle_mode}>
                        { if *is_login { "Register" } else { "Login" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(username: &str, email: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn login_needs_email_and_password() {
        assert!(creds("", "a@b.c", "pw").validate(true).is_ok());
        assert_eq!(
            creds("", " ", "pw").validate(true),
            Err("Email and password are required")
        );
    }

    #[test]
    fn register_also_needs_a_username() {
        assert_eq!(
            creds(" ", "a@b.c", "pw").validate(false),
            Err("Username is required")
        );
        assert!(creds("wish", "a@b.c", "pw").validate(false).is_ok());
    }
}
