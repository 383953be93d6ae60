use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use super::{load_more_button, use_paged_list};
use crate::api::use_api;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::icons::{icon_pencil, icon_plus, icon_trash, icon_upload};
use crate::components::layout::page_shell;
use crate::components::progress::{progress_props, ProgressBar};
use crate::components::purchase_dialog::PurchaseDialog;
use crate::components::review_dialog::ReviewDialog;
use crate::components::{PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::config::use_config;
use crate::error::ApiError;
use crate::format::{format_currency, format_date};
use crate::models::{MatchingStatus, ParsedReceipt, Purchase};
use crate::poller::{start_polling, PollHandle};
use crate::toast::use_notifier;

/// Latest matching-job status per listed purchase.
///
/// Only ids of the current listing are tracked. A poller response for an id that dropped off
/// the list (deleted, or the list was reloaded) is ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchingBoard {
    tracked: HashSet<String>,
    statuses: HashMap<String, MatchingStatus>,
}

pub enum MatchingAction {
    Track(Vec<String>),
    Update(String, MatchingStatus),
}

impl MatchingBoard {
    /// Status to draw a progress bar for; `None` once the job is done or nothing arrived yet.
    pub fn in_progress(&self, id: &str) -> Option<&MatchingStatus> {
        self.statuses.get(id).filter(|status| !status.done)
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.tracked.contains(id)
    }
}

impl Reducible for MatchingBoard {
    type Action = MatchingAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            MatchingAction::Track(ids) => {
                let tracked: HashSet<String> = ids.into_iter().collect();
                let statuses = self
                    .statuses
                    .iter()
                    .filter(|(id, _)| tracked.contains(*id))
                    .map(|(id, status)| (id.clone(), status.clone()))
                    .collect();
                Rc::new(MatchingBoard { tracked, statuses })
            }
            MatchingAction::Update(id, status) => {
                if !self.tracked.contains(&id) {
                    log::debug!("dropping matching update for unlisted purchase {id}");
                    return self;
                }
                let mut next = (*self).clone();
                next.statuses.insert(id, status);
                Rc::new(next)
            }
        }
    }
}

#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    Add,
    Edit(Purchase),
    Draft(ParsedReceipt),
    Review(Vec<ParsedReceipt>),
    ConfirmDelete(String),
}

fn selected_files(input: &HtmlInputElement) -> Vec<File> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

#[function_component(PurchasesPage)]
pub fn purchases_page() -> Html {
    let api = use_api();
    let config = use_config();
    let notifier = use_notifier();
    let list = use_paged_list("purchases", |api, page, limit| async move {
        api.purchases(page, limit).await
    });
    let dialog = use_state(|| Dialog::Closed);
    let uploading = use_state(|| false);
    let board = use_reducer(MatchingBoard::default);
    let pollers = use_mut_ref(HashMap::<String, PollHandle>::new);

    let ids: Vec<String> = list.rows.iter().map(|p| p.id.clone()).collect();

    // Keep exactly one matching poller per listed purchase.
    {
        let api = api.clone();
        let board = board.clone();
        let pollers = pollers.clone();
        let interval = config.poll_interval_ms;
        use_effect_with_deps(
            move |ids: &Vec<String>| {
                board.dispatch(MatchingAction::Track(ids.clone()));
                let mut pollers = pollers.borrow_mut();
                pollers.retain(|id, _| ids.contains(id));
                for id in ids {
                    if pollers.contains_key(id) {
                        continue;
                    }
                    let fetch = {
                        let api = api.clone();
                        let id = id.clone();
                        move || {
                            let api = api.clone();
                            let id = id.clone();
                            async move { api.matching_status(&id).await }
                        }
                    };
                    let on_update = {
                        let board = board.clone();
                        let id = id.clone();
                        Callback::from(move |status: MatchingStatus| {
                            board.dispatch(MatchingAction::Update(id.clone(), status))
                        })
                    };
                    let handle = start_polling(
                        format!("matching:{id}"),
                        interval,
                        fetch,
                        on_update,
                        Callback::noop(),
                    );
                    pollers.insert(id.clone(), handle);
                }
                || ()
            },
            ids,
        );
    }

    {
        let pollers = pollers.clone();
        use_effect_with_deps(move |_| move || pollers.borrow_mut().clear(), ());
    }

    let close = {
        let dialog = dialog.clone();
        Callback::from(move |_| dialog.set(Dialog::Closed))
    };

    let on_saved = {
        let dialog = dialog.clone();
        let reload = list.reload.clone();
        Callback::from(move |new_id: Option<String>| {
            if let Some(id) = new_id {
                log::debug!("purchase {id} created, matching starts on reload");
            }
            dialog.set(Dialog::Closed);
            reload.emit(());
        })
    };

    let on_review_complete = {
        let dialog = dialog.clone();
        let reload = list.reload.clone();
        let notifier = notifier.clone();
        Callback::from(move |saved: usize| {
            notifier.success(format!("{saved} receipt(s) saved."));
            dialog.set(Dialog::Closed);
            reload.emit(());
        })
    };

    let on_review_cancel = {
        let dialog = dialog.clone();
        let reload = list.reload.clone();
        Callback::from(move |_| {
            dialog.set(Dialog::Closed);
            reload.emit(());
        })
    };

    let on_upload = {
        let api = api.clone();
        let dialog = dialog.clone();
        let uploading = uploading.clone();
        let notifier = notifier.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let files = selected_files(&input);
            input.set_value("");
            if files.is_empty() {
                return;
            }
            let api = api.clone();
            let dialog = dialog.clone();
            let uploading = uploading.clone();
            let notifier = notifier.clone();
            uploading.set(true);
            spawn_local(async move {
                let result = api.upload_receipts(&files).await;
                uploading.set(false);
                match result {
                    Ok(mut drafts) if drafts.len() == 1 => {
                        notifier.success("Receipt parsed. Please review.");
                        if let Some(draft) = drafts.pop() {
                            dialog.set(Dialog::Draft(draft));
                        }
                    }
                    Ok(drafts) if drafts.len() > 1 => {
                        notifier.success(format!("{} receipts parsed. Please review each.", drafts.len()));
                        dialog.set(Dialog::Review(drafts));
                    }
                    Ok(_) | Err(ApiError::Rejected(_)) => notifier.error("Could not parse receipt"),
                    Err(ApiError::Unauthorized) => {}
                    Err(err) => {
                        log::warn!("receipt upload failed: {err}");
                        notifier.error("Failed to upload receipt");
                    }
                }
            });
        })
    };

    let on_delete = {
        let api = api.clone();
        let dialog = dialog.clone();
        let reload = list.reload.clone();
        let notifier = notifier.clone();
        Callback::from(move |_| {
            let Dialog::ConfirmDelete(id) = (*dialog).clone() else {
                return;
            };
            dialog.set(Dialog::Closed);
            let api = api.clone();
            let reload = reload.clone();
            let notifier = notifier.clone();
            spawn_local(async move {
                match api.delete_purchase(&id).await {
                    Ok(()) => {
                        notifier.success("Purchase deleted");
                        reload.emit(());
                    }
                    Err(ApiError::Unauthorized) => {}
                    Err(err) => {
                        log::warn!("deleting purchase {id} failed: {err}");
                        notifier.error("Failed to delete purchase");
                    }
                }
            });
        })
    };

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_| dialog.set(next.clone()))
    };

    let actions = html! {
        <>
            <label class={SECONDARY_BUTTON}>
                { icon_upload() }
                { if *uploading { "Parsing..." } else { "Upload receipt" } }
                <input type="file" accept="image/*,application/pdf" multiple={true} class="hidden"
                    disabled={*uploading} onchange={on_upload} />
            </label>
            <button class={PRIMARY_BUTTON} onclick={open(Dialog::Add)}>{ icon_plus() }{"Add purchase"}</button>
        </>
    };

    let rows = html! {
        <div class="bg-white rounded-[10px] shadow-sm overflow-x-auto">
            <table class="w-full text-left border-collapse">
                <thead>
                    <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                        <th class="px-6 py-4 font-bold">{"Date"}</th>
                        <th class="px-6 py-4 font-bold">{"Store"}</th>
                        <th class="px-6 py-4 font-bold">{"Items"}</th>
                        <th class="px-6 py-4 font-bold text-right">{"Fees"}</th>
                        <th class="px-6 py-4 font-bold text-right">{"Total"}</th>
                        <th class="px-6 py-4"></th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    if list.rows.is_empty() && !list.loading {
                        <tr><td colspan="6" class="px-6 py-6 text-center text-muted-foreground">{"No purchases yet."}</td></tr>
                    }
                    { for list.rows.iter().map(|purchase| {
                        let matching = board.in_progress(&purchase.id).cloned();
                        html! {
                            <tr key={purchase.id.clone()} class="text-sm align-top">
                                <td class="px-6 py-4 text-muted-foreground whitespace-nowrap">{ format_date(purchase.date.as_deref()) }</td>
                                <td class="px-6 py-4 font-semibold">{ purchase.store.clone() }</td>
                                <td class="px-6 py-4 space-y-1">
                                    { for purchase.items.iter().map(|item| html! {
                                        <p class="text-[12px]">
                                            { format!("{} — {} × {} = {}", item.name, item.quantity, format_currency(item.price), format_currency(item.line_total())) }
                                        </p>
                                    }) }
                                    if let Some(status) = matching {
                                        <ProgressBar ..progress_props(&status, None) />
                                    }
                                </td>
                                <td class="px-6 py-4 text-right text-[12px] text-muted-foreground">
                                    <p>{ format!("Admin {}", format_currency(purchase.admin_fee)) }</p>
                                    <p>{ format!("Shipping {}", format_currency(purchase.shipping_fee)) }</p>
                                </td>
                                <td class="px-6 py-4 text-right font-semibold">{ format_currency(purchase.total) }</td>
                                <td class="px-6 py-4">
                                    <div class="flex gap-2 justify-end">
                                        <button class="text-[#1D617A]" onclick={open(Dialog::Edit(purchase.clone()))}>{ icon_pencil() }</button>
                                        <button class="text-red-500" onclick={open(Dialog::ConfirmDelete(purchase.id.clone()))}>{ icon_trash() }</button>
                                    </div>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
            { load_more_button(list.paging.has_more, list.loading, list.load_more.clone()) }
        </div>
    };

    let overlay = match &*dialog {
        Dialog::Closed => html! {},
        Dialog::Add => html! {
            <PurchaseDialog on_saved={on_saved} on_cancel={close} />
        },
        Dialog::Edit(purchase) => html! {
            <PurchaseDialog edit={Some(purchase.clone())} on_saved={on_saved} on_cancel={close} />
        },
        Dialog::Draft(draft) => html! {
            <PurchaseDialog draft={Some(draft.clone())} on_saved={on_saved} on_cancel={close} />
        },
        Dialog::Review(drafts) => html! {
            <ReviewDialog drafts={drafts.clone()} on_complete={on_review_complete} on_cancel={on_review_cancel} />
        },
        Dialog::ConfirmDelete(_) => html! {
            <ConfirmDialog
                description={AttrValue::Static("This purchase will be removed permanently.")}
                on_cancel={close}
                on_confirm={on_delete}
            />
        },
    };

    html! {
        <>
            { page_shell("Purchases", actions, rows) }
            { overlay }
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(processed: u32, total: u32, done: bool) -> MatchingStatus {
        MatchingStatus {
            processed,
            total,
            done,
        }
    }

    fn apply(board: MatchingBoard, action: MatchingAction) -> MatchingBoard {
        (*Rc::new(board).reduce(action)).clone()
    }

    #[test]
    fn updates_for_listed_purchases_are_kept() {
        let board = apply(
            MatchingBoard::default(),
            MatchingAction::Track(vec!["a".into(), "b".into()]),
        );
        let board = apply(board, MatchingAction::Update("a".into(), status(1, 4, false)));
        assert_eq!(board.in_progress("a"), Some(&status(1, 4, false)));
        assert_eq!(board.in_progress("b"), None);
    }

    #[test]
    fn stale_updates_are_ignored() {
        let board = apply(
            MatchingBoard::default(),
            MatchingAction::Track(vec!["a".into()]),
        );
        let board = apply(board, MatchingAction::Update("gone".into(), status(1, 2, false)));
        assert!(!board.is_tracked("gone"));
        assert_eq!(board.in_progress("gone"), None);
    }

    #[test]
    fn relisting_drops_statuses_of_removed_purchases() {
        let board = apply(
            MatchingBoard::default(),
            MatchingAction::Track(vec!["a".into(), "b".into()]),
        );
        let board = apply(board, MatchingAction::Update("a".into(), status(1, 2, false)));
        let board = apply(board, MatchingAction::Update("b".into(), status(1, 2, false)));
        let board = apply(board, MatchingAction::Track(vec!["b".into()]));
        assert_eq!(board.in_progress("a"), None);
        assert!(board.in_progress("b").is_some());

        let board = apply(board, MatchingAction::Update("a".into(), status(2, 2, false)));
        assert_eq!(board.in_progress("a"), None);
    }

    #[test]
    fn finished_jobs_hide_their_progress_bar() {
        let board = apply(
            MatchingBoard::default(),
            MatchingAction::Track(vec!["a".into()]),
        );
        let board = apply(board, MatchingAction::Update("a".into(), status(2, 2, true)));
        assert!(board.is_tracked("a"));
        assert_eq!(board.in_progress("a"), None);
    }
}
