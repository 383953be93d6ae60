use yew::prelude::*;

use crate::guard::GuardChoice;

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
    #[prop_or(AttrValue::Static("Are you sure?"))]
    pub title: AttrValue,
    #[prop_or_default]
    pub description: Option<AttrValue>,
    #[prop_or(AttrValue::Static("Delete"))]
    pub confirm_label: AttrValue,
    pub on_cancel: Callback<()>,
    pub on_confirm: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let on_cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_confirm = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div class="fixed inset-0 bg-black/60 z-50 flex items-center justify-center">
            <div class="bg-white rounded-[10px] p-6 w-full max-w-sm shadow-lg text-[#173E63]">
                <h2 class="text-lg font-bold mb-2">{ props.title.clone() }</h2>
                if let Some(description) = &props.description {
                    <p class="mb-4 text-sm text-slate-500">{ description.clone() }</p>
                }
                <div class="flex justify-end gap-2">
                    <button type="button" onclick={on_cancel} class="text-slate-500 hover:underline px-3">{"Cancel"}</button>
                    <button type="button" onclick={on_confirm} class="bg-red-600 hover:bg-red-700 text-white px-4 py-1 rounded-[10px]">
                        { props.confirm_label.clone() }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardDialogProps {
    /// Human readable list of the values that fell outside the range.
    pub offending: Vec<String>,
    pub bounds: (String, String),
    pub on_choice: Callback<GuardChoice>,
}

/// Shown when a submission trips the amount guard-rail.
#[function_component(GuardDialog)]
pub fn guard_dialog(props: &GuardDialogProps) -> Html {
    let choose = |choice: GuardChoice| {
        let cb = props.on_choice.clone();
        Callback::from(move |_| cb.emit(choice))
    };

    html! {
        <div class="fixed inset-0 bg-black/60 z-[55] flex items-center justify-center">
            <div class="bg-white rounded-[10px] p-6 w-full max-w-md shadow-lg text-[#173E63] space-y-4">
                <h2 class="text-lg font-bold">{"Unusual amount"}</h2>
                <p class="text-sm text-slate-500">
                    { format!("Amounts are normally between {} and {}. These look off:", props.bounds.0, props.bounds.1) }
                </p>
                <ul class="text-sm font-semibold list-disc list-inside">
                    { for props.offending.iter().map(|value| html! { <li>{ value.clone() }</li> }) }
                </ul>
                <div class="flex flex-col gap-2">
                    <button type="button" onclick={choose(GuardChoice::ProceedOnce)} class="bg-[#173E63] text-white py-2 rounded-[10px] text-sm font-bold">
                        {"Save anyway"}
                    </button>
                    <button type="button" onclick={choose(GuardChoice::ProceedAndSuppress)} class="bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-sm font-bold">
                        {"Save and don't warn me for 24 hours"}
                    </button>
                    <button type="button" onclick={choose(GuardChoice::Cancel)} class="text-slate-500 hover:underline text-sm">
                        {"Cancel"}
                    </button>
                </div>
            </div>
        </div>
    }
}
