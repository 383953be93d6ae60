use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;
use yew::prelude::*;

use crate::components::layout::page_shell;
use crate::config::use_config;

/// `shop_id` handed back by the TikTok connect redirect, if this page load is that redirect.
fn take_shop_id() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location();
    let search = location.search().ok()?;
    let shop_id = UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("shop_id")
        .filter(|id| !id.is_empty())?;

    let path = location.pathname().ok()?;
    if let Ok(history) = window.history() {
        if history
            .replace_state_with_url(&JsValue::NULL, "", Some(&path))
            .is_err()
        {
            log::warn!("could not clear the TikTok redirect query");
        }
    }
    Some(shop_id)
}

#[function_component(TikTokPage)]
pub fn tiktok_page() -> Html {
    let config = use_config();
    let shop_id = use_state(|| None::<String>);

    {
        let shop_id = shop_id.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(id) = take_shop_id() {
                    log::info!("tiktok shop {id} connected");
                    shop_id.set(Some(id));
                }
                || ()
            },
            (),
        );
    }

    page_shell(
        "TikTok Shop",
        html! {},
        html! {
            <div class="max-w-md mx-auto bg-white rounded-[10px] p-6 shadow-sm text-center text-[#173E63]">
                <h2 class="text-2xl font-bold mb-4">{"🛒 TikTok Shop Integration"}</h2>
                if let Some(id) = (*shop_id).clone() {
                    <p class="text-green-600 font-medium mb-2">{"✅ TikTok Shop Connected"}</p>
                    <p class="text-sm">{"Shop ID: "}<span class="font-mono">{ id }</span></p>
                } else {
                    <p class="mb-4 text-sm text-slate-500">
                        {"Connect your TikTok Shop to start managing orders and syncing products."}
                    </p>
                    <a href={config.tiktok_connect_url.clone()}
                        class="inline-block bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-sm font-bold">
                        {"Connect TikTok Shop"}
                    </a>
                }
            </div>
        },
    )
}
