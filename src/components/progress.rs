use yew::prelude::*;

use crate::api::use_api;
use crate::config::use_config;
use crate::models::ResyncStatus;
use crate::poller::{start_polling, JobStatus, PollOutcome};

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
    pub processed: u32,
    pub total: u32,
    pub percent: f64,
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

pub fn progress_props<S: JobStatus>(status: &S, label: Option<AttrValue>) -> ProgressBarProps {
    ProgressBarProps {
        processed: status.processed(),
        total: status.total(),
        percent: status.percent(),
        label,
    }
}

#[function_component(ProgressBar)]
pub fn progress_bar(props: &ProgressBarProps) -> Html {
    let percent = props.percent;

    html! {
        <div class="space-y-1">
            <div class="flex justify-between text-[11px] text-slate-500">
                <span>{ props.label.clone().unwrap_or(AttrValue::Static("Matching items")) }</span>
                <span>{ format!("{}/{}", props.processed, props.total) }</span>
            </div>
            <div class="w-full h-1.5 bg-[#D8E1E8] rounded-full overflow-hidden">
                <div class="h-full bg-[#1D617A] transition-all" style={format!("width: {percent:.0}%")}></div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResyncProgressProps {
    /// Fired once when polling stops by itself: the job completed or a status read failed.
    pub on_finished: Callback<PollOutcome>,
}

/// Polls the resync job for as long as it is mounted.
#[function_component(ResyncProgress)]
pub fn resync_progress(props: &ResyncProgressProps) -> Html {
    let api = use_api();
    let config = use_config();
    let status = use_state(|| None::<ResyncStatus>);

    {
        let status = status.clone();
        let on_finished = props.on_finished.clone();
        use_effect_with_deps(
            move |_| {
                let handle = start_polling(
                    "resync".to_string(),
                    config.poll_interval_ms,
                    move || {
                        let api = api.clone();
                        async move { api.resync_status().await }
                    },
                    Callback::from(move |s: ResyncStatus| status.set(Some(s))),
                    on_finished,
                );
                move || drop(handle)
            },
            (),
        );
    }

    match &*status {
        Some(s) => html! {
            <div class="bg-white rounded-[10px] p-4 shadow-sm">
                <ProgressBar ..progress_props(s, Some(AttrValue::Static("Resyncing items"))) />
            </div>
        },
        None => html! {
            <div class="bg-white rounded-[10px] p-4 shadow-sm text-[12px] text-slate-500">{"Starting resync..."}</div>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchingStatus;

    #[test]
    fn progress_props_follow_the_job_counters() {
        let status = MatchingStatus {
            processed: 3,
            total: 8,
            done: false,
        };
        let props = progress_props(&status, None);
        assert_eq!(props.processed, 3);
        assert_eq!(props.total, 8);
        assert_eq!(props.percent, 37.5);
        assert!(props.label.is_none());
    }
}
