use yew::prelude::*;

use crate::components::layout::page_shell;
use crate::session::SessionContext;

const FEATURES: [&str; 4] = [
    "Track your purchases and item details",
    "Record and analyze your sales",
    "Visualize spending and gain over time",
    "Manage your product inventory easily",
];

#[function_component(HomePage)]
pub fn home_page() -> Html {
    let session = use_context::<SessionContext>();
    let username = session
        .as_ref()
        .and_then(|s| s.username.clone())
        .filter(|name| !name.is_empty());

    page_shell(
        "Welcome to Wish Tracker",
        html! {},
        html! {
            <div class="bg-white rounded-[10px] p-6 shadow-sm text-[#173E63] space-y-4">
                if let Some(name) = username {
                    <p class="text-lg">{"Hello, "}<strong>{ name }</strong>{" 👋"}</p>
                } else {
                    <p class="text-lg">{"Please log in to access your data."}</p>
                }
                <ul class="list-disc list-inside text-sm leading-loose">
                    { for FEATURES.iter().map(|feature| html! { <li>{ *feature }</li> }) }
                </ul>
            </div>
        },
    )
}
