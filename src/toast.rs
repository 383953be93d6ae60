use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

const MAX_VISIBLE: usize = 4;
const TOAST_LIFETIME_MS: u32 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastList {
    next_id: u64,
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Push(ToastKind, String),
    Dismiss(u64),
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(kind, message) => {
                next.next_id += 1;
                next.toasts.push(Toast {
                    id: next.next_id,
                    kind,
                    message,
                });
                if next.toasts.len() > MAX_VISIBLE {
                    let drain = next.toasts.len() - MAX_VISIBLE;
                    next.toasts.drain(0..drain);
                }
            }
            ToastAction::Dismiss(id) => next.toasts.retain(|toast| toast.id != id),
        }
        Rc::new(next)
    }
}

/// Handle the pages use to raise notifications. Outside a provider it silently drops them.
#[derive(Clone, Default, PartialEq)]
pub struct Notifier {
    handle: Option<UseReducerHandle<ToastList>>,
}

impl Notifier {
    pub fn new(handle: UseReducerHandle<ToastList>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn push(&self, kind: ToastKind, message: String) {
        match &self.handle {
            Some(handle) => handle.dispatch(ToastAction::Push(kind, message)),
            None => log::info!("toast without host: {message}"),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    fn dismiss(&self, id: u64) {
        if let Some(handle) = &self.handle {
            handle.dispatch(ToastAction::Dismiss(id));
        }
    }

    fn toasts(&self) -> Vec<Toast> {
        self.handle
            .as_ref()
            .map(|handle| handle.toasts.clone())
            .unwrap_or_default()
    }
}

#[hook]
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().unwrap_or_default()
}

#[function_component(ToastHost)]
pub fn toast_host() -> Html {
    let notifier = use_notifier();

    html! {
        <div class="fixed top-4 right-4 z-[60] flex flex-col gap-2 w-80">
            { for notifier.toasts().into_iter().map(|toast| {
                let id = toast.id;
                html! { <ToastItem key={id} toast={toast} notifier={notifier.clone()} /> }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
    notifier: Notifier,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    {
        let id = props.toast.id;
        let notifier = props.notifier.clone();
        use_effect_with_deps(
            move |_| {
                let timeout = Timeout::new(TOAST_LIFETIME_MS, move || notifier.dismiss(id));
                move || drop(timeout)
            },
            id,
        );
    }

    let tone = match props.toast.kind {
        ToastKind::Success => "bg-green-50 border-green-300 text-green-800",
        ToastKind::Error => "bg-red-50 border-red-300 text-red-700",
        ToastKind::Info => "bg-white border-border text-[#173E63]",
    };

    html! {
        <div class={format!("px-4 py-3 rounded-xl border shadow-lg text-sm font-medium {tone}")}>
            { props.toast.message.clone() }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(list: Rc<ToastList>, message: &str) -> Rc<ToastList> {
        list.reduce(ToastAction::Push(ToastKind::Info, message.to_string()))
    }

    #[test]
    fn keeps_only_latest_four() {
        let mut list = Rc::new(ToastList::default());
        for n in 0..6 {
            list = push(list, &format!("t{n}"));
        }
        let messages: Vec<_> = list.toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn dismiss_removes_by_id() {
        let list = push(push(Rc::new(ToastList::default()), "a"), "b");
        let first = list.toasts[0].id;
        let list = list.reduce(ToastAction::Dismiss(first));
        assert_eq!(list.toasts.len(), 1);
        assert_eq!(list.toasts[0].message, "b");
    }
}
