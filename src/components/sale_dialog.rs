use chrono::Local;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::confirm_dialog::GuardDialog;
use super::{bind_text, INPUT_CLASS, PRIMARY_BUTTON};
use crate::api::use_api;
use crate::config::{use_config, SALE_GUARD_KEY};
use crate::format::format_currency;
use crate::forms::SaleForm;
use crate::guard::{now_ms, GuardChoice, GuardRail};
use crate::models::{Sale, SalePayload};
use crate::toast::use_notifier;

#[derive(Properties, PartialEq)]
pub struct SaleDialogProps {
    #[prop_or_default]
    pub edit: Option<Sale>,
    pub on_saved: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(SaleDialog)]
pub fn sale_dialog(props: &SaleDialogProps) -> Html {
    let api = use_api();
    let config = use_config();
    let notifier = use_notifier();

    let form = {
        let edit = props.edit.clone();
        use_state(move || {
            let today = Local::now().date_naive();
            match &edit {
                Some(sale) => SaleForm::from_sale(sale, today),
                None => SaleForm::new(today),
            }
        })
    };
    let saving = use_state(|| false);
    let pending = use_state(|| None::<SalePayload>);

    let rail = GuardRail::new(config.guard_rail, SALE_GUARD_KEY);
    let edit_id = props.edit.as_ref().map(|s| s.id.clone());

    let submit = {
        let saving = saving.clone();
        let notifier = notifier.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |payload: SalePayload| {
            let api = api.clone();
            let saving = saving.clone();
            let notifier = notifier.clone();
            let on_saved = on_saved.clone();
            let edit_id = edit_id.clone();
            saving.set(true);
            spawn_local(async move {
                let result = match &edit_id {
                    Some(id) => api.update_sale(id, &payload).await,
                    None => api.create_sale(&payload).await,
                };
                saving.set(false);
                match result {
                    Ok(()) => {
                        notifier.success(if edit_id.is_some() {
                            "Sale updated"
                        } else {
                            "Sale recorded"
                        });
                        on_saved.emit(());
                    }
                    Err(err) if err.reported_globally() => {}
                    Err(err) => {
                        log::error!("saving sale failed: {err}");
                        notifier.error(format!("Failed to save sale: {err}"));
                    }
                }
            });
        })
    };

    let on_submit = {
        let form = form.clone();
        let pending = pending.clone();
        let notifier = notifier.clone();
        let submit = submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = match form.to_payload() {
                Ok(payload) => payload,
                Err(err) => {
                    notifier.error(err.to_string());
                    return;
                }
            };
            if rail.check([payload.amount], now_ms()) {
                pending.set(Some(payload));
            } else {
                submit.emit(payload);
            }
        })
    };

    let on_guard_choice = {
        let pending = pending.clone();
        Callback::from(move |choice: GuardChoice| {
            let payload = (*pending).clone();
            pending.set(None);
            let Some(payload) = payload else { return };
            match choice {
                GuardChoice::ProceedOnce => submit.emit(payload),
                GuardChoice::ProceedAndSuppress => {
                    rail.suppress(now_ms());
                    submit.emit(payload);
                }
                GuardChoice::Cancel => {}
            }
        })
    };

    let on_cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let guard = (*pending).as_ref().map(|payload| {
        let (min, max) = rail.bounds();
        html! {
            <GuardDialog
                offending={vec![format_currency(payload.amount)]}
                bounds={(format_currency(min), format_currency(max))}
                on_choice={on_guard_choice.clone()}
            />
        }
    });

    html! {
        <div class="fixed inset-0 bg-black/60 z-50 flex justify-center items-center">
            <div class="bg-white p-6 rounded-[10px] w-full max-w-md shadow-lg text-[#173E63]">
                <h2 class="text-xl font-bold mb-4">{ if props.edit.is_some() { "Edit Sale" } else { "Add Sale" } }</h2>
                <form onsubmit={on_submit} class="space-y-4">
                    <input type="date" class={INPUT_CLASS} value={form.date.clone()}
                        oninput={bind_text(&form, |f: &mut SaleForm, v| f.date = v)} />
                    <input type="number" class={INPUT_CLASS} placeholder="Amount (e.g. 75000)" value={form.amount.clone()}
                        oninput={bind_text(&form, |f: &mut SaleForm, v| f.amount = v)} />
                    <input type="text" class={INPUT_CLASS} placeholder="Channel (e.g. Shopee)" value={form.channel.clone()}
                        oninput={bind_text(&form, |f: &mut SaleForm, v| f.channel = v)} />
                    <input type="text" class={INPUT_CLASS} placeholder="Note (optional)" value={form.note.clone()}
                        oninput={bind_text(&form, |f: &mut SaleForm, v| f.note = v)} />
                    <div class="flex justify-between">
                        <button type="submit" class={PRIMARY_BUTTON} disabled={*saving}>
                            { if *saving { "Saving..." } else { "Save" } }
                        </button>
                        <button type="button" onclick={on_cancel} class="text-slate-500 hover:underline text-sm">{"Cancel"}</button>
                    </div>
                </form>
                { guard.unwrap_or_default() }
            </div>
        </div>
    }
}
