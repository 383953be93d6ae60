mod api;
mod components;
mod config;
mod error;
mod format;
mod forms;
mod guard;
mod models;
mod pages;
mod paging;
mod poller;
mod review;
mod session;
mod stats;
mod storage;
mod toast;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use api::ApiClient;
use components::layout::{Layout, Page};
use config::{AppConfig, TOKEN_KEY};
use pages::auth::AuthScreen;
use pages::dashboard::DashboardPage;
use pages::home::HomePage;
use pages::items::ItemsPage;
use pages::purchases::PurchasesPage;
use pages::sales::SalesPage;
use pages::tiktok::TikTokPage;
use session::{Session, SessionAction, SessionContext, TokenCheck};
use toast::{Notifier, ToastHost, ToastList};

#[function_component(App)]
fn app() -> Html {
    let config = use_memo(|_| AppConfig::from_build_env(), ());
    let session = use_reducer(|| Session::with_stored_token(storage::load_string(TOKEN_KEY)));
    let checking = use_state(|| session.token.is_some());
    let active_page = use_state(|| Page::Home);
    let toasts = use_reducer(ToastList::default);
    let notifier = Notifier::new(toasts);

    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    // Any 401 on an authenticated call ends the session.
    let api = {
        let token = session.token.clone();
        let session = session.clone();
        let notifier = notifier.clone();
        let config = config.clone();
        use_memo(
            move |token: &Option<String>| {
                let on_unauthorized = Callback::from(move |_| {
                    storage::remove(TOKEN_KEY);
                    log::warn!("session rejected by the backend");
                    session.dispatch(SessionAction::SignedOut);
                    notifier.error("Session expired, please log in again");
                });
                ApiClient::new(&config, token.clone(), on_unauthorized)
            },
            token,
        )
    };

    {
        let session = session.clone();
        let checking = checking.clone();
        let api = (*api).clone();
        use_effect_with_deps(
            move |_| {
                if let Some(token) = session.token.clone() {
                    spawn_local(async move {
                        match TokenCheck::from_result(api.check_auth(&token).await) {
                            TokenCheck::Valid { username } => {
                                log::info!("stored session verified");
                                session.dispatch(SessionAction::Verified { username });
                            }
                            TokenCheck::Invalid => {
                                log::info!("stored token rejected");
                                storage::remove(TOKEN_KEY);
                                session.dispatch(SessionAction::SignedOut);
                            }
                            TokenCheck::Unknown => log::warn!("could not verify stored session"),
                        }
                        checking.set(false);
                    });
                }
                || ()
            },
            (),
        );
    }

    let content = match *active_page {
        Page::Home => html! { <HomePage /> },
        Page::Dashboard => html! { <DashboardPage /> },
        Page::Purchases => html! { <PurchasesPage /> },
        Page::Sales => html! { <SalesPage /> },
        Page::Items => html! { <ItemsPage /> },
        Page::TikTok => html! { <TikTokPage /> },
    };

    let screen = if *checking {
        html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Checking session..."}
            </div>
        }
    } else if !session.logged_in {
        html! { <AuthScreen /> }
    } else {
        html! {
            <Layout active_page={*active_page} on_select={on_select}>
                { content }
            </Layout>
        }
    };

    html! {
        <ContextProvider<AppConfig> context={(*config).clone()}>
            <ContextProvider<Notifier> context={notifier}>
                <ContextProvider<SessionContext> context={session}>
                    <ContextProvider<ApiClient> context={(*api).clone()}>
                        <ToastHost />
                        { screen }
                    </ContextProvider<ApiClient>>
                </ContextProvider<SessionContext>>
            </ContextProvider<Notifier>>
        </ContextProvider<AppConfig>>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    yew::Renderer::<App>::new().render();
}
