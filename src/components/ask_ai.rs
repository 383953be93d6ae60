use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{input_value, INPUT_CLASS, PRIMARY_BUTTON};
use crate::api::use_api;

const TYPING_INTERVAL_MS: u32 = 10;
pub const FAILED_ANSWER: &str = "Failed to connect to AI service.";

pub const PRESET_QUESTIONS: [&str; 4] = [
    "Which items cost me the most overall?",
    "Where am I spending the most in shipping or admin fees?",
    "Is my profit margin improving or declining over time?",
    "What months have the highest net gain?",
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AskState {
    pub open: bool,
    pub preset: Option<&'static str>,
    pub custom: String,
    /// Ticket of the request whose answer is awaited.
    pending: Option<u64>,
    answer: Vec<char>,
    shown: usize,
}

pub enum AskAction {
    Open,
    Pick(&'static str),
    Type(String),
    Asked(u64),
    Answered(u64, String),
    Tick,
    Reset,
}

impl AskState {
    /// The preset wins over the custom text; blank means nothing to ask.
    pub fn prompt(&self) -> Option<String> {
        match self.preset {
            Some(preset) => Some(preset.to_string()),
            None if !self.custom.trim().is_empty() => Some(self.custom.clone()),
            None => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn revealed(&self) -> String {
        self.answer[..self.shown].iter().collect()
    }

    pub fn is_typing(&self) -> bool {
        self.shown < self.answer.len()
    }
}

impl Reducible for AskState {
    type Action = AskAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            AskAction::Open => next.open = true,
            AskAction::Pick(preset) => {
                next.preset = Some(preset);
                next.custom.clear();
            }
            AskAction::Type(text) => {
                next.custom = text;
                next.preset = None;
            }
            AskAction::Asked(ticket) => {
                next.pending = Some(ticket);
                next.answer.clear();
                next.shown = 0;
            }
            AskAction::Answered(ticket, text) => {
                // Answers to requests abandoned by Reset, or superseded, are dropped.
                if self.pending != Some(ticket) {
                    return self;
                }
                next.pending = None;
                next.answer = text.chars().collect();
                next.shown = 0;
            }
            AskAction::Tick => {
                if !next.is_typing() {
                    return self;
                }
                next.shown += 1;
            }
            AskAction::Reset => next = AskState::default(),
        }
        Rc::new(next)
    }
}

#[function_component(AskAi)]
pub fn ask_ai() -> Html {
    let api = use_api();
    let state = use_reducer(AskState::default);
    let tickets = use_mut_ref(|| 0u64);

    // One reveal timer per answer; it stops itself once the whole answer is shown.
    {
        let state = state.clone();
        let typing = state.is_typing();
        use_effect_with_deps(
            move |typing| {
                let interval = typing
                    .then(|| Interval::new(TYPING_INTERVAL_MS, move || state.dispatch(AskAction::Tick)));
                move || drop(interval)
            },
            typing,
        );
    }

    let on_open = {
        let state = state.clone();
        Callback::from(move |_| state.dispatch(AskAction::Open))
    };

    let on_reset = {
        let state = state.clone();
        Callback::from(move |_| state.dispatch(AskAction::Reset))
    };

    let on_keydown = {
        let state = state.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                state.dispatch(AskAction::Reset);
            }
        })
    };

    let on_type = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| state.dispatch(AskAction::Type(input_value(e))))
    };

    let on_ask = {
        let state = state.clone();
        Callback::from(move |_| {
            let Some(prompt) = state.prompt() else { return };
            let ticket = {
                let mut tickets = tickets.borrow_mut();
                *tickets += 1;
                *tickets
            };
            let api = api.clone();
            let state = state.clone();
            state.dispatch(AskAction::Asked(ticket));
            spawn_local(async move {
                let answer = match api.ask_ai(&prompt).await {
                    Ok(answer) => answer,
                    Err(err) => {
                        log::warn!("ask-ai failed: {err}");
                        FAILED_ANSWER.to_string()
                    }
                };
                state.dispatch(AskAction::Answered(ticket, answer));
            });
        })
    };

    let launcher = html! {
        <button onclick={on_open} class="fixed bottom-6 right-6 bg-[#173E63] text-white px-4 py-2 rounded-full shadow-lg text-sm font-bold">
            {"Ask AI "}<small class="font-normal">{"(experimental)"}</small>
        </button>
    };

    if !state.open {
        return launcher;
    }

    let revealed = state.revealed();

    html! {
        <>
            { launcher }
            <div class="fixed inset-0 z-50 flex items-center justify-center" onkeydown={on_keydown}>
                <div class="fixed inset-0 bg-black/50" onclick={on_reset.clone()}></div>
                <div class="relative bg-white rounded-[10px] p-6 w-full max-w-lg shadow-xl text-[#173E63]">
                    <h2 class="text-xl font-bold mb-4">{"Ask AI Anything"}</h2>
                    <div class="space-y-2 mb-4">
                        { for PRESET_QUESTIONS.iter().map(|question| {
                            let selected = state.preset == Some(*question);
                            let class = if selected {
                                "block w-full text-left px-3 py-2 rounded-[10px] text-[12px] bg-[#B2CBDE] font-bold"
                            } else {
                                "block w-full text-left px-3 py-2 rounded-[10px] text-[12px] bg-[#f1f4f9]"
                            };
                            let state = state.clone();
                            let question = *question;
                            html! {
                                <button key={question} type="button" class={class}
                                    onclick={Callback::from(move |_| state.dispatch(AskAction::Pick(question)))}>
                                    { question }
                                </button>
                            }
                        }) }
                        <input
                            type="text"
                            class={INPUT_CLASS}
                            placeholder="Or type your own question..."
                            value={state.custom.clone()}
                            oninput={on_type}
                            autofocus={true}
                        />
                    </div>
                    <div class="flex justify-between">
                        <button type="button" class={PRIMARY_BUTTON} onclick={on_ask}
                            disabled={state.is_loading() || state.prompt().is_none()}>
                            {"Ask"}
                        </button>
                        <button type="button" onclick={on_reset} class="text-slate-500 hover:underline text-sm">{"Cancel"}</button>
                    </div>
                    if state.is_loading() {
                        <p class="mt-4 text-[#1D617A] animate-pulse text-sm">{"Thinking..."}</p>
                    }
                    if !revealed.is_empty() {
                        <div class="mt-4 p-3 rounded-[10px] bg-[#f1f4f9] text-sm whitespace-pre-wrap overflow-auto max-h-[40vh]">
                            { revealed }
                        </div>
                    }
                </div>
            </div>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: AskState, action: AskAction) -> AskState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn preset_and_custom_text_replace_each_other() {
        let state = apply(AskState::default(), AskAction::Type("how much?".into()));
        assert_eq!(state.prompt().as_deref(), Some("how much?"));

        let state = apply(state, AskAction::Pick(PRESET_QUESTIONS[0]));
        assert!(state.custom.is_empty());
        assert_eq!(state.prompt().as_deref(), Some(PRESET_QUESTIONS[0]));

        let state = apply(state, AskAction::Type("   ".into()));
        assert_eq!(state.preset, None);
        assert_eq!(state.prompt(), None);
    }

    #[test]
    fn answer_is_revealed_one_char_per_tick() {
        let mut state = apply(AskState::default(), AskAction::Asked(1));
        assert!(state.is_loading());
        state = apply(state, AskAction::Answered(1, "héllo".into()));
        assert!(!state.is_loading());
        assert_eq!(state.revealed(), "");

        for _ in 0..2 {
            state = apply(state, AskAction::Tick);
        }
        assert_eq!(state.revealed(), "hé");

        for _ in 0..10 {
            state = apply(state, AskAction::Tick);
        }
        assert_eq!(state.revealed(), "héllo");
        assert!(!state.is_typing());
    }

    #[test]
    fn reset_clears_everything() {
        let state = apply(AskState::default(), AskAction::Open);
        let state = apply(state, AskAction::Asked(1));
        let state = apply(state, AskAction::Answered(1, FAILED_ANSWER.into()));
        let state = apply(state, AskAction::Reset);
        assert_eq!(state, AskState::default());
    }

    #[test]
    fn answer_arriving_after_reset_is_dropped() {
        let state = apply(AskState::default(), AskAction::Open);
        let state = apply(state, AskAction::Asked(1));
        let state = apply(state, AskAction::Reset);
        let state = apply(state, AskAction::Answered(1, "late".into()));
        assert_eq!(state, AskState::default());
        assert!(!state.is_typing());
    }

    #[test]
    fn only_the_latest_request_is_answered() {
        let state = apply(AskState::default(), AskAction::Asked(1));
        let state = apply(state, AskAction::Reset);
        let state = apply(state, AskAction::Open);
        let state = apply(state, AskAction::Asked(2));
        let state = apply(state, AskAction::Answered(1, "old".into()));
        assert!(state.is_loading());
        let state = apply(state, AskAction::Answered(2, "new".into()));
        assert!(!state.is_loading());
        assert!(state.is_typing());
    }
}
