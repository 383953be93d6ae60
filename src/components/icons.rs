use yew::prelude::*;

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_home() -> Html {
    icon_base("M3 11l9-8 9 8M5 10v10h14V10")
}
pub fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
pub fn icon_package() -> Html {
    icon_base("M21 8l-9-5-9 5 9 5 9-5zM3 8v8l9 5 9-5V8M12 13v8")
}
pub fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_shop() -> Html {
    icon_base("M4 4h16l-1 6H5zM5 10v10h14V10M9 20v-5h6v5")
}
pub fn icon_menu() -> Html {
    icon_base("M4 6h16M4 12h16M4 18h16")
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_upload() -> Html {
    icon_base("M12 16V4M7 9l5-5 5 5M4 20h16")
}
pub fn icon_refresh() -> Html {
    icon_base("M21 12a9 9 0 11-3-6.7L21 8M21 3v5h-5")
}
pub fn icon_trash() -> Html {
    icon_base("M3 6h18M8 6V4h8v2M6 6l1 14h10l1-14")
}
pub fn icon_pencil() -> Html {
    icon_base("M4 20h4L20 8l-4-4L4 16zM14 6l4 4")
}
