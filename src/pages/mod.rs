pub mod auth;
pub mod dashboard;
pub mod home;
pub mod items;
pub mod purchases;
pub mod sales;
pub mod tiktok;

use std::future::Future;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{use_api, ApiClient};
use crate::config::use_config;
use crate::error::ApiError;
use crate::paging::Paging;
use crate::toast::use_notifier;

/// Rows fetched so far plus the controls a list page needs.
pub struct PagedList<T> {
    pub rows: UseStateHandle<Vec<T>>,
    pub paging: Paging,
    pub loading: bool,
    /// Start over from page 1, e.g. after a mutation.
    pub reload: Callback<()>,
    pub load_more: Callback<()>,
}

/// Shared fetch/append logic of the purchase, sale and item lists.
#[hook]
pub fn use_paged_list<T, F, Fut>(label: &'static str, fetch: F) -> PagedList<T>
where
    T: Clone + 'static,
    F: Fn(ApiClient, u32, u32) -> Fut + 'static,
    Fut: Future<Output = Result<Vec<T>, ApiError>> + 'static,
{
    let api = use_api();
    let config = use_config();
    let notifier = use_notifier();
    let rows = use_state(Vec::<T>::new);
    let paging = use_state(|| Paging::new(config.page_limit));
    let loading = use_state(|| true);

    let fetch = Rc::new(fetch);
    let load = {
        let rows = rows.clone();
        let paging = paging.clone();
        let loading = loading.clone();
        Callback::from(move |page: u32| {
            let api = api.clone();
            let fetch = fetch.clone();
            let rows = rows.clone();
            let paging = paging.clone();
            let loading = loading.clone();
            let notifier = notifier.clone();
            loading.set(true);
            spawn_local(async move {
                match fetch(api, page, paging.limit).await {
                    Ok(batch) => {
                        let (next, merged) = paging.absorb(&rows, page, batch);
                        rows.set(merged);
                        paging.set(next);
                    }
                    Err(ApiError::Unauthorized) => {}
                    Err(err) => {
                        log::warn!("loading {label} page {page} failed: {err}");
                        notifier.error(format!("Failed to load {label}"));
                    }
                }
                loading.set(false);
            });
        })
    };

    {
        let load = load.clone();
        use_effect_with_deps(
            move |_| {
                load.emit(1);
                || ()
            },
            (),
        );
    }

    let reload = {
        let load = load.clone();
        Callback::from(move |_| load.emit(1))
    };
    let load_more = {
        let next = paging.next_page();
        Callback::from(move |_| load.emit(next))
    };

    PagedList {
        rows,
        paging: *paging,
        loading: *loading,
        reload,
        load_more,
    }
}

/// "Load more" footer under a list; hidden once a short page came back.
pub fn load_more_button(list_has_more: bool, loading: bool, on_click: Callback<()>) -> Html {
    if !list_has_more {
        return html! {};
    }
    html! {
        <div class="flex justify-center py-4">
            <button
                class="bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-[12px] font-bold disabled:opacity-50"
                disabled={loading}
                onclick={Callback::from(move |_| on_click.emit(()))}
            >
                { if loading { "Loading..." } else { "Load more" } }
            </button>
        </div>
    }
}
