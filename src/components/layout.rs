use yew::prelude::*;

use super::icons::*;
use crate::session::{SessionAction, SessionContext};
use crate::storage;

#[derive(Clone, Copy, PartialEq)]
pub enum Page {
    Home,
    Dashboard,
    Purchases,
    Sales,
    Items,
    TikTok,
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

/// Below `md` the sidebar is a drawer opened from the header; from `md` up it is always shown.
fn sidebar_class(menu_open: bool) -> &'static str {
    if menu_open {
        "fixed inset-y-0 left-0 z-40 flex md:static"
    } else {
        "hidden md:flex"
    }
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let menu_open = use_state(|| false);

    let on_toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_| menu_open.set(!*menu_open))
    };

    let on_close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_| menu_open.set(false))
    };

    let on_select = {
        let menu_open = menu_open.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |page: Page| {
            menu_open.set(false);
            on_select.emit(page);
        })
    };

    html! {
        <div class="flex h-screen bg-background">
            if *menu_open {
                <div class="fixed inset-0 z-30 bg-black/40 md:hidden" onclick={on_close_menu}></div>
            }
            <div class={sidebar_class(*menu_open)}>
                <Sidebar active_page={props.active_page} on_select={on_select} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header on_toggle_menu={on_toggle_menu} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    on_toggle_menu: Callback<MouseEvent>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let session = use_context::<SessionContext>();
    let username = session
        .as_ref()
        .and_then(|s| s.username.clone())
        .filter(|name| !name.is_empty());

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <button class="md:hidden text-[#173E63]" aria-label="Menu" onclick={props.on_toggle_menu.clone()}>
                { icon_menu() }
            </button>
            <div class="flex-1"></div>
            {
                if let Some(name) = username {
                    html! { <span class="text-sm font-bold text-[#173E63]">{ format!("👤 {}", name) }</span> }
                } else {
                    html! {}
                }
            }
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let session = use_context::<SessionContext>();

    let nav_items = vec![
        NavItem {
            label: "Home",
            page: Page::Home,
            icon: icon_home,
        },
        NavItem {
            label: "Dashboard",
            page: Page::Dashboard,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "Purchases",
            page: Page::Purchases,
            icon: icon_package,
        },
        NavItem {
            label: "Sales",
            page: Page::Sales,
            icon: icon_trending_up,
        },
        NavItem {
            label: "Items",
            page: Page::Items,
            icon: icon_wallet,
        },
        NavItem {
            label: "TikTok Shop",
            page: Page::TikTok,
            icon: icon_shop,
        },
    ];

    let on_logout = Callback::from(move |_| {
        storage::remove(crate::config::TOKEN_KEY);
        log::info!("logged out");
        if let Some(session) = &session {
            session.dispatch(SessionAction::SignedOut);
        }
    });

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"Wish Tracker"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let is_active = item.page == props.active_page;
                        let page = item.page;
                        let on_select = props.on_select.clone();
                        let class = if is_active {
                            "w-full flex items-center gap-3 px-4 py-3 rounded-xl bg-white text-[#173E63] font-bold text-sm"
                        } else {
                            "w-full flex items-center gap-3 px-4 py-3 rounded-xl text-white/80 hover:bg-white/10 text-sm"
                        };
                        html! {
                            <button class={class} onclick={Callback::from(move |_| on_select.emit(page))}>
                                { (item.icon)() }
                                <span>{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <button class="w-full flex items-center gap-3 px-4 py-3 rounded-xl text-white/80 hover:bg-white/10 text-sm" onclick={on_logout}>
                    { icon_log_out() }
                    <span>{"Logout"}</span>
                </button>
            </div>
        </div>
    }
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-[#173E63]">{ title }</h1>
                <div class="flex items-center gap-2">{ actions }</div>
            </div>
            { children }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_sidebar_still_shows_on_wide_screens() {
        assert_eq!(sidebar_class(false), "hidden md:flex");
    }

    #[test]
    fn open_menu_shows_sidebar_on_narrow_screens() {
        let class = sidebar_class(true);
        assert!(!class.contains("hidden"));
        assert!(class.contains("fixed"));
    }
}
