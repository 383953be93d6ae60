pub mod ask_ai;
pub mod confirm_dialog;
pub mod icons;
pub mod layout;
pub mod progress;
pub mod purchase_dialog;
pub mod review_dialog;
pub mod sale_dialog;
pub mod stat_card;

use yew::prelude::*;

/// Current text of the `<input>` that fired the event.
pub fn input_value(e: InputEvent) -> String {
    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
    input.value()
}

/// Build an `oninput` handler that applies the typed text to a state handle.
pub fn bind_text<T, F>(state: &UseStateHandle<T>, apply: F) -> Callback<InputEvent>
where
    T: Clone + 'static,
    F: Fn(&mut T, String) + 'static,
{
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let mut next = (*state).clone();
        apply(&mut next, input_value(e));
        state.set(next);
    })
}

pub const INPUT_CLASS: &str = "w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none disabled:opacity-60";
pub const PRIMARY_BUTTON: &str = "bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-[12px] font-bold flex items-center gap-2 disabled:opacity-50";
pub const SECONDARY_BUTTON: &str = "bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-[12px] font-bold flex items-center gap-2 disabled:opacity-50";
