use yew::prelude::*;

use super::purchase_dialog::PurchaseDialog;
use super::SECONDARY_BUTTON;
use crate::models::ParsedReceipt;
use crate::review::{Disposition, ReviewOutcome, ReviewWorkflow};
use crate::toast::use_notifier;

#[derive(Properties, PartialEq)]
pub struct ReviewDialogProps {
    /// At least two drafts; a single draft goes straight to the purchase dialog.
    pub drafts: Vec<ParsedReceipt>,
    /// Workflow ended on a save. Carries the number of saved drafts.
    pub on_complete: Callback<usize>,
    /// Workflow ended on a skip or cancel-all.
    pub on_cancel: Callback<()>,
}

fn badge(disposition: Disposition) -> Html {
    let (label, tone) = match disposition {
        Disposition::Editing => ("Editing", "bg-amber-100 text-amber-700"),
        Disposition::Saved => ("Saved", "bg-green-100 text-green-700"),
        Disposition::Canceled => ("Canceled", "bg-slate-200 text-slate-600"),
    };
    html! {
        <span class={format!("px-2 py-0.5 rounded-full text-[11px] font-bold {tone}")}>{ label }</span>
    }
}

fn dot_class(disposition: Disposition, current: bool) -> String {
    let tone = match disposition {
        Disposition::Editing => "bg-amber-400",
        Disposition::Saved => "bg-green-500",
        Disposition::Canceled => "bg-slate-400",
    };
    let ring = if current { "ring-2 ring-[#173E63]" } else { "" };
    format!("w-2.5 h-2.5 rounded-full {tone} {ring}")
}

#[function_component(ReviewDialog)]
pub fn review_dialog(props: &ReviewDialogProps) -> Html {
    let notifier = use_notifier();
    let workflow = {
        let drafts = props.drafts.clone();
        use_state(move || ReviewWorkflow::new(drafts).ok())
    };

    // Applies one operation and reports the terminal outcome to the owner, at most once.
    let apply = {
        let workflow = workflow.clone();
        let on_complete = props.on_complete.clone();
        let on_cancel = props.on_cancel.clone();
        move |op: fn(&mut ReviewWorkflow<ParsedReceipt>) -> ReviewOutcome| -> ReviewOutcome {
            let Some(mut next) = (*workflow).clone() else {
                return ReviewOutcome::Ignored;
            };
            let outcome = op(&mut next);
            workflow.set(Some(next));
            match outcome {
                ReviewOutcome::Completed { saved } => on_complete.emit(saved),
                ReviewOutcome::Cancelled => on_cancel.emit(()),
                ReviewOutcome::Continue | ReviewOutcome::Ignored => {}
            }
            outcome
        }
    };

    let Some(state) = (*workflow).clone() else {
        return html! {};
    };

    let on_saved = {
        let apply = apply.clone();
        Callback::from(move |_id: Option<String>| {
            apply(ReviewWorkflow::confirm_current);
        })
    };

    let on_skip = {
        let apply = apply.clone();
        let notifier = notifier.clone();
        Callback::from(move |_| {
            if apply(ReviewWorkflow::skip_current) != ReviewOutcome::Ignored {
                notifier.info("Receipt canceled.");
            }
        })
    };

    let on_cancel_all = {
        let apply = apply.clone();
        let notifier = notifier.clone();
        Callback::from(move |_| {
            if apply(ReviewWorkflow::cancel_all) != ReviewOutcome::Ignored {
                notifier.info("All remaining receipts canceled.");
            }
        })
    };

    let on_previous = {
        let workflow = workflow.clone();
        Callback::from(move |_| {
            if let Some(mut next) = (*workflow).clone() {
                if next.previous() {
                    workflow.set(Some(next));
                }
            }
        })
    };

    let on_next = {
        let workflow = workflow.clone();
        Callback::from(move |_| {
            if let Some(mut next) = (*workflow).clone() {
                if next.next() {
                    workflow.set(Some(next));
                }
            }
        })
    };

    if state.is_finished() {
        return html! {};
    }

    let index = state.current_index();

    html! {
        <div class="fixed inset-0 bg-black/60 z-50 flex justify-center items-center">
            <div class="w-full max-w-xl space-y-3">
                <div class="bg-white rounded-[10px] px-4 py-3 flex items-center justify-between text-[#173E63]">
                    <div class="flex items-center gap-3">
                        <span class="font-bold text-sm">{ format!("Receipt {} of {}", index + 1, state.len()) }</span>
                        { badge(state.current_disposition()) }
                    </div>
                    <div class="flex items-center gap-1">
                        { for state.dispositions().iter().enumerate().map(|(i, d)| html! {
                            <span key={i} class={dot_class(*d, i == index)}></span>
                        }) }
                    </div>
                </div>

                <PurchaseDialog
                    key={index}
                    draft={Some(state.current_draft().clone())}
                    disabled={!state.is_editable()}
                    embedded={true}
                    on_saved={on_saved}
                    on_cancel={on_skip}
                />

                <div class="bg-white rounded-[10px] px-4 py-3 flex items-center justify-between">
                    <div class="flex gap-2">
                        <button type="button" class={SECONDARY_BUTTON} disabled={!state.can_go_previous()} onclick={on_previous}>{"Prev"}</button>
                        <button type="button" class={SECONDARY_BUTTON} disabled={!state.can_go_next()} onclick={on_next}>{"Next"}</button>
                    </div>
                    <button type="button" class="text-red-600 hover:underline text-sm font-bold" onclick={on_cancel_all}>
                        {"Cancel All"}
                    </button>
                </div>
            </div>
        </div>
    }
}
