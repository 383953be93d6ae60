use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{load_more_button, use_paged_list};
use crate::api::use_api;
use crate::components::icons::icon_refresh;
use crate::components::layout::page_shell;
use crate::components::progress::ResyncProgress;
use crate::components::SECONDARY_BUTTON;
use crate::error::ApiError;
use crate::format::{format_currency, format_number};
use crate::poller::PollOutcome;
use crate::toast::use_notifier;

/// Where the items resync stands. The progress poller only exists while `Polling`, i.e. after
/// the backend accepted the resync request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResyncPhase {
    Idle,
    Requesting,
    Polling,
}

impl ResyncPhase {
    pub fn started(result: &Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => ResyncPhase::Polling,
            Err(_) => ResyncPhase::Idle,
        }
    }

    /// Any poller stop returns to idle; only a completed job warrants a re-fetch.
    pub fn finished(outcome: &PollOutcome) -> (Self, bool) {
        (ResyncPhase::Idle, *outcome == PollOutcome::Completed)
    }

    pub fn is_busy(self) -> bool {
        self != ResyncPhase::Idle
    }

    pub fn shows_progress(self) -> bool {
        self == ResyncPhase::Polling
    }
}

#[function_component(ItemsPage)]
pub fn items_page() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let list = use_paged_list("items", |api, page, limit| async move {
        api.items(page, limit).await
    });
    let phase = use_state(|| ResyncPhase::Idle);

    let on_resync = {
        let phase = phase.clone();
        let notifier = notifier.clone();
        Callback::from(move |_| {
            if phase.is_busy() {
                return;
            }
            let api = api.clone();
            let phase = phase.clone();
            let notifier = notifier.clone();
            phase.set(ResyncPhase::Requesting);
            spawn_local(async move {
                let result = api.resync_items().await;
                phase.set(ResyncPhase::started(&result));
                match result {
                    Ok(()) => notifier.info("Resync started"),
                    Err(ApiError::Unauthorized) => {}
                    Err(err) => {
                        log::warn!("resync request failed: {err}");
                        notifier.error("Failed to start resync");
                    }
                }
            });
        })
    };

    let on_resync_finished = {
        let phase = phase.clone();
        let reload = list.reload.clone();
        Callback::from(move |outcome: PollOutcome| {
            let (next, refetch) = ResyncPhase::finished(&outcome);
            phase.set(next);
            if refetch {
                notifier.success("Items resynced");
                reload.emit(());
            }
        })
    };

    let actions = html! {
        <button class={SECONDARY_BUTTON} disabled={phase.is_busy()} onclick={on_resync}>
            { icon_refresh() }{ if phase.is_busy() { "Resyncing..." } else { "Resync items" } }
        </button>
    };

    let body = html! {
        <>
            if phase.shows_progress() {
                <ResyncProgress on_finished={on_resync_finished} />
            }
            <div class="bg-white rounded-[10px] shadow-sm overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                            <th class="px-6 py-4 font-bold">{"Item"}</th>
                            <th class="px-6 py-4 font-bold text-right">{"Total quantity"}</th>
                            <th class="px-6 py-4 font-bold text-right">{"Total spent"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        if list.rows.is_empty() && !list.loading {
                            <tr><td colspan="3" class="px-6 py-6 text-center text-muted-foreground">{"No items yet."}</td></tr>
                        }
                        { for list.rows.iter().map(|item| html! {
                            <tr key={item.id.clone()} class="text-sm">
                                <td class="px-6 py-4 font-semibold">{ item.name.clone() }</td>
                                <td class="px-6 py-4 text-right">{ format_number(item.total_quantity) }</td>
                                <td class="px-6 py-4 text-right">{ format_currency(item.total_spent) }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
                { load_more_button(list.paging.has_more, list.loading, list.load_more.clone()) }
            </div>
        </>
    };

    page_shell("Items", actions, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_waits_for_the_resync_request() {
        assert!(ResyncPhase::Requesting.is_busy());
        assert!(!ResyncPhase::Requesting.shows_progress());
        assert_eq!(ResyncPhase::started(&Ok(())), ResyncPhase::Polling);
        assert!(ResyncPhase::Polling.shows_progress());
    }

    #[test]
    fn rejected_request_frees_the_button() {
        let phase = ResyncPhase::started(&Err(ApiError::Status { status: 500 }));
        assert_eq!(phase, ResyncPhase::Idle);
        assert!(!phase.is_busy());
    }

    #[test]
    fn failed_status_read_returns_to_idle_without_refetch() {
        let (phase, refetch) =
            ResyncPhase::finished(&PollOutcome::Failed(ApiError::Status { status: 500 }));
        assert_eq!(phase, ResyncPhase::Idle);
        assert!(!refetch);
    }

    #[test]
    fn completed_job_refetches() {
        let (phase, refetch) = ResyncPhase::finished(&PollOutcome::Completed);
        assert!(!phase.is_busy());
        assert!(refetch);
    }
}
