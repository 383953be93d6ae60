use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::confirm_dialog::GuardDialog;
use super::icons::{icon_plus, icon_trash};
use super::{bind_text, input_value, INPUT_CLASS, PRIMARY_BUTTON};
use crate::api::use_api;
use crate::config::{use_config, PURCHASE_GUARD_KEY};
use crate::format::{format_currency, format_number};
use crate::forms::{ItemField, PurchaseForm};
use crate::guard::{now_ms, GuardChoice, GuardRail};
use crate::models::{ParsedReceipt, Purchase, PurchasePayload};
use crate::toast::use_notifier;

#[derive(Properties, PartialEq)]
pub struct PurchaseDialogProps {
    /// Existing purchase to edit; submit becomes an update.
    #[prop_or_default]
    pub edit: Option<Purchase>,
    /// Parsed receipt to pre-fill a new purchase with.
    #[prop_or_default]
    pub draft: Option<ParsedReceipt>,
    /// Read-only view of an already resolved draft.
    #[prop_or_default]
    pub disabled: bool,
    /// Rendered inside another dialog, so no backdrop of its own.
    #[prop_or_default]
    pub embedded: bool,
    /// Fires after a successful save with the new id (create mode only).
    pub on_saved: Callback<Option<String>>,
    pub on_cancel: Callback<()>,
}

#[function_component(PurchaseDialog)]
pub fn purchase_dialog(props: &PurchaseDialogProps) -> Html {
    let api = use_api();
    let config = use_config();
    let notifier = use_notifier();

    let form = {
        let edit = props.edit.clone();
        let draft = props.draft.clone();
        use_state(move || match (&edit, &draft) {
            (Some(purchase), _) => PurchaseForm::from_purchase(purchase),
            (None, Some(receipt)) => PurchaseForm::from_receipt(receipt),
            (None, None) => PurchaseForm::default(),
        })
    };
    let saving = use_state(|| false);
    let pending = use_state(|| None::<PurchasePayload>);

    let rail = GuardRail::new(config.guard_rail, PURCHASE_GUARD_KEY);
    let edit_id = props.edit.as_ref().map(|p| p.id.clone());

    let submit = {
        let saving = saving.clone();
        let notifier = notifier.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |payload: PurchasePayload| {
            let api = api.clone();
            let saving = saving.clone();
            let notifier = notifier.clone();
            let on_saved = on_saved.clone();
            let edit_id = edit_id.clone();
            saving.set(true);
            spawn_local(async move {
                let result = match &edit_id {
                    Some(id) => api.update_purchase(id, &payload).await.map(|_| None),
                    None => api.create_purchase(&payload).await,
                };
                saving.set(false);
                match result {
                    Ok(new_id) => {
                        notifier.success(if edit_id.is_some() {
                            "Purchase updated"
                        } else {
                            "Purchase recorded"
                        });
                        on_saved.emit(new_id);
                    }
                    Err(err) if err.reported_globally() => {}
                    Err(err) => {
                        log::error!("saving purchase failed: {err}");
                        notifier.error("Failed to save purchase");
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
        let disabled = props.disabled;
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if disabled {
                return;
            }
            let payload = match form.to_payload() {
                Ok(payload) => payload,
                Err(err) => {
                    notifier.error(err.to_string());
                    return;
                }
            };
            let line_totals: Vec<f64> = payload
                .items
                .iter()
                .map(|item| item.price * f64::from(item.quantity))
                .collect();
            if rail.check(line_totals, now_ms()) {
                pending.set(Some(payload));
            } else {
                submit.emit(payload);
            }
        })
    };

    let on_guard_choice = {
        let pending = pending.clone();
        let submit = submit.clone();
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

    let on_add_row = {
        let form = form.clone();
        Callback::from(move |_| {
            let mut next = (*form).clone();
            next.add_row();
            form.set(next);
        })
    };

    let on_cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let disabled = props.disabled || *saving;
    let title = if props.edit.is_some() {
        "Edit Purchase"
    } else if props.draft.is_some() {
        "Review Parsed Receipt"
    } else {
        "Add Purchase Manually"
    };

    let guard = (*pending).as_ref().map(|payload| {
        let offending = rail
            .out_of_range(payload.items.iter().map(|i| i.price * f64::from(i.quantity)))
            .into_iter()
            .map(format_currency)
            .collect::<Vec<_>>();
        let (min, max) = rail.bounds();
        html! {
            <GuardDialog
                offending={offending}
                bounds={(format_currency(min), format_currency(max))}
                on_choice={on_guard_choice.clone()}
            />
        }
    });

    let body = html! {
        <div class="bg-white p-6 rounded-[10px] w-full max-w-xl shadow-lg overflow-y-auto max-h-[90vh] text-[#173E63]">
            <h2 class="text-xl font-bold mb-4">{ title }</h2>
            <form onsubmit={on_submit} class="space-y-4">
                <input
                    class={INPUT_CLASS}
                    placeholder="Store Name"
                    value={form.store.clone()}
                    disabled={disabled}
                    oninput={bind_text(&form, |f: &mut PurchaseForm, v| f.store = v)}
                />

                { for form.rows.iter().enumerate().map(|(idx, row)| {
                    let field = |which: ItemField| {
                        let form = form.clone();
                        Callback::from(move |e: InputEvent| {
                            let mut next = (*form).clone();
                            next.set_field(idx, which, input_value(e));
                            form.set(next);
                        })
                    };
                    let on_remove = {
                        let form = form.clone();
                        Callback::from(move |_| {
                            let mut next = (*form).clone();
                            next.remove_row(idx);
                            form.set(next);
                        })
                    };
                    html! {
                        <div key={idx} class="flex gap-2">
                            <input class={INPUT_CLASS} placeholder="Item Name" value={row.name.clone()} disabled={disabled} oninput={field(ItemField::Name)} />
                            <input class={INPUT_CLASS} type="number" placeholder="Price" value={row.price.clone()} disabled={disabled} oninput={field(ItemField::Price)} />
                            <input class={INPUT_CLASS} type="number" placeholder="Qty" value={row.quantity.clone()} disabled={disabled} oninput={field(ItemField::Quantity)} />
                            if form.rows.len() > 1 && !disabled {
                                <button type="button" onclick={on_remove} class="text-red-500 px-1">{ icon_trash() }</button>
                            }
                        </div>
                    }
                }) }

                if !disabled {
                    <button type="button" onclick={on_add_row} class="text-[12px] text-[#1D617A] font-bold flex items-center gap-1">
                        { icon_plus() }{"Add Item"}
                    </button>
                }

                <div class="grid grid-cols-2 gap-4">
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{"Admin / Tax Fee"}</label>
                        <input class={INPUT_CLASS} type="number" placeholder="e.g. 3000" value={form.admin_fee.clone()} disabled={disabled}
                            oninput={bind_text(&form, |f: &mut PurchaseForm, v| f.admin_fee = v)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{"Shipping Fee"}</label>
                        <input class={INPUT_CLASS} type="number" placeholder="e.g. 8000" value={form.shipping_fee.clone()} disabled={disabled}
                            oninput={bind_text(&form, |f: &mut PurchaseForm, v| f.shipping_fee = v)} />
                    </div>
                </div>

                <p class="font-bold">{ format!("Total: Rp.{}", format_number(form.total())) }</p>

                <div class="flex justify-between">
                    if !props.disabled {
                        <button type="submit" class={PRIMARY_BUTTON} disabled={*saving}>
                            { if *saving { "Saving..." } else { "Save" } }
                        </button>
                    }
                    <button type="button" onclick={on_cancel} class="text-slate-500 hover:underline text-sm" disabled={*saving}>
                        { if props.embedded { "Skip receipt" } else { "Cancel" } }
                    </button>
                </div>
            </form>
            { guard.unwrap_or_default() }
        </div>
    };

    if props.embedded {
        body
    } else {
        html! {
            <div class="fixed inset-0 bg-black/60 z-50 flex justify-center items-center">
                { body }
            </div>
        }
    }
}
