use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{load_more_button, use_paged_list};
use crate::api::use_api;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::icons::{icon_pencil, icon_plus, icon_trash};
use crate::components::layout::page_shell;
use crate::components::sale_dialog::SaleDialog;
use crate::components::PRIMARY_BUTTON;
use crate::error::ApiError;
use crate::format::{format_currency, format_date};
use crate::models::Sale;
use crate::toast::use_notifier;

#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    Add,
    Edit(Sale),
    ConfirmDelete(String),
}

fn note_or_dash(note: &str) -> String {
    if note.trim().is_empty() {
        "-".to_string()
    } else {
        note.to_string()
    }
}

#[function_component(SalesPage)]
pub fn sales_page() -> Html {
    let api = use_api();
    let notifier = use_notifier();
    let list = use_paged_list("sales", |api, page, limit| async move {
        api.sales(page, limit).await
    });
    let dialog = use_state(|| Dialog::Closed);

    let close = {
        let dialog = dialog.clone();
        Callback::from(move |_| dialog.set(Dialog::Closed))
    };

    let on_saved = {
        let dialog = dialog.clone();
        let reload = list.reload.clone();
        Callback::from(move |_| {
            dialog.set(Dialog::Closed);
            reload.emit(());
        })
    };

    let on_delete = {
        let dialog = dialog.clone();
        let reload = list.reload.clone();
        Callback::from(move |_| {
            let Dialog::ConfirmDelete(id) = (*dialog).clone() else {
                return;
            };
            dialog.set(Dialog::Closed);
            let api = api.clone();
            let reload = reload.clone();
            let notifier = notifier.clone();
            spawn_local(async move {
                match api.delete_sale(&id).await {
                    Ok(()) => {
                        notifier.success("Sale deleted");
                        reload.emit(());
                    }
                    Err(ApiError::Unauthorized) => {}
                    Err(err) => {
                        log::warn!("deleting sale {id} failed: {err}");
                        notifier.error("Failed to delete sale");
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
        <button class={PRIMARY_BUTTON} onclick={open(Dialog::Add)}>{ icon_plus() }{"Add sale"}</button>
    };

    let table = html! {
        <div class="bg-white rounded-[10px] shadow-sm overflow-x-auto">
            <table class="w-full text-left border-collapse">
                <thead>
                    <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                        <th class="px-6 py-4 font-bold">{"Date"}</th>
                        <th class="px-6 py-4 font-bold">{"Channel"}</th>
                        <th class="px-6 py-4 font-bold">{"Note"}</th>
                        <th class="px-6 py-4 font-bold text-right">{"Amount"}</th>
                        <th class="px-6 py-4"></th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    if list.rows.is_empty() && !list.loading {
                        <tr><td colspan="5" class="px-6 py-6 text-center text-muted-foreground">{"No sales yet."}</td></tr>
                    }
                    { for list.rows.iter().map(|sale| html! {
                        <tr key={sale.id.clone()} class="text-sm">
                            <td class="px-6 py-4 text-muted-foreground">{ format_date(sale.date.as_deref()) }</td>
                            <td class="px-6 py-4">
                                <span class="bg-secondary text-secondary-foreground px-2.5 py-1 rounded-md text-[10px] font-bold">{ sale.channel.clone() }</span>
                            </td>
                            <td class="px-6 py-4 text-muted-foreground">{ note_or_dash(&sale.note) }</td>
                            <td class="px-6 py-4 text-right font-semibold">{ format!("+ {}", format_currency(sale.amount)) }</td>
                            <td class="px-6 py-4">
                                <div class="flex gap-2 justify-end">
                                    <button class="text-[#1D617A]" onclick={open(Dialog::Edit(sale.clone()))}>{ icon_pencil() }</button>
                                    <button class="text-red-500" onclick={open(Dialog::ConfirmDelete(sale.id.clone()))}>{ icon_trash() }</button>
                                </div>
                            </td>
                        </tr>
                    }) }
                </tbody>
            </table>
            { load_more_button(list.paging.has_more, list.loading, list.load_more.clone()) }
        </div>
    };

    let overlay = match &*dialog {
        Dialog::Closed => html! {},
        Dialog::Add => html! { <SaleDialog on_saved={on_saved} on_cancel={close} /> },
        Dialog::Edit(sale) => html! {
            <SaleDialog edit={Some(sale.clone())} on_saved={on_saved} on_cancel={close} />
        },
        Dialog::ConfirmDelete(_) => html! {
            <ConfirmDialog
                description={AttrValue::Static("This sale will be removed permanently.")}
                on_cancel={close}
                on_confirm={on_delete}
            />
        },
    };

    html! {
        <>
            { page_shell("Sales", actions, table) }
            { overlay }
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notes_show_a_dash() {
        assert_eq!(note_or_dash("  "), "-");
        assert_eq!(note_or_dash("bundle deal"), "bundle deal");
    }
}
