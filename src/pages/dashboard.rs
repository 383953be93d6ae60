use chrono::Local;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::use_api;
use crate::components::ask_ai::AskAi;
use crate::components::layout::page_shell;
use crate::components::stat_card::{CompareCard, StatCard, StatCardProps};
use crate::components::SECONDARY_BUTTON;
use crate::error::ApiError;
use crate::format::format_number;
use crate::models::{DashboardStats, TopItem};
use crate::poller::{unless_cancelled, CancelFlag};
use crate::stats::{axis_max, densify_trend, scale, DailyFigures, TimeRange};

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 220.0;
const SPENT_COLOR: &str = "#173E63";
const GAINED_COLOR: &str = "#1D617A";

#[derive(Clone, Copy, PartialEq)]
enum ChartKind {
    Bar,
    Line,
}

/// `name (qty)` for the most bought item, `-` when the backend has none.
pub fn top_item_label(top: Option<&TopItem>) -> String {
    match top.and_then(|t| t.name.as_deref().map(|name| (name, t.quantity))) {
        Some((name, quantity)) if !name.is_empty() => format!("{name} ({})", format_number(quantity)),
        _ => "-".to_string(),
    }
}

/// SVG polyline points for one series spread evenly across the chart width.
pub fn line_points(values: &[f64], max: f64, width: f64, height: f64) -> String {
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", i as f64 * step, height - scale(*v, max, height)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn trend_chart(days: &[DailyFigures], kind: ChartKind) -> Html {
    if days.is_empty() {
        return html! { <p class="text-sm text-muted-foreground">{"No trend data."}</p> };
    }
    let spent: Vec<f64> = days.iter().map(|d| d.spent).collect();
    let gained: Vec<f64> = days.iter().map(|d| d.gained).collect();
    let max = axis_max(spent.iter().chain(gained.iter()));
    let view_box = format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}");

    let series = match kind {
        ChartKind::Line => html! {
            <>
                <polyline fill="none" stroke={SPENT_COLOR} stroke-width="2"
                    points={line_points(&spent, max, CHART_WIDTH, CHART_HEIGHT)} />
                <polyline fill="none" stroke={GAINED_COLOR} stroke-width="2" stroke-dasharray="4 3"
                    points={line_points(&gained, max, CHART_WIDTH, CHART_HEIGHT)} />
            </>
        },
        ChartKind::Bar => {
            let slot = CHART_WIDTH / days.len() as f64;
            let bar = (slot / 2.0 - 1.0).max(0.5);
            html! {
                <>
                    { for days.iter().enumerate().map(|(i, day)| {
                        let x = i as f64 * slot;
                        let spent_h = scale(day.spent, max, CHART_HEIGHT);
                        let gained_h = scale(day.gained, max, CHART_HEIGHT);
                        html! {
                            <g key={i}>
                                <title>{ format!("{}: spent {}, gained {}", day.date, format_number(day.spent), format_number(day.gained)) }</title>
                                <rect x={format!("{x:.1}")} y={format!("{:.1}", CHART_HEIGHT - spent_h)}
                                    width={format!("{bar:.1}")} height={format!("{spent_h:.1}")} fill={SPENT_COLOR} />
                                <rect x={format!("{:.1}", x + bar)} y={format!("{:.1}", CHART_HEIGHT - gained_h)}
                                    width={format!("{bar:.1}")} height={format!("{gained_h:.1}")} fill={GAINED_COLOR} />
                            </g>
                        }
                    }) }
                </>
            }
        }
    };

    let first = days.first().map(|d| d.date.format("%d/%m").to_string()).unwrap_or_default();
    let last = days.last().map(|d| d.date.format("%d/%m").to_string()).unwrap_or_default();

    html! {
        <div class="space-y-2">
            <svg viewBox={view_box} class="w-full h-56" preserveAspectRatio="none">
                <line x1="0" y1={CHART_HEIGHT.to_string()} x2={CHART_WIDTH.to_string()} y2={CHART_HEIGHT.to_string()} stroke="#D8E1E8" />
                { series }
            </svg>
            <div class="flex justify-between text-[11px] text-muted-foreground">
                <span>{ first }</span>
                <span class="flex gap-4">
                    <span style={format!("color: {SPENT_COLOR}")}>{"■ Spent"}</span>
                    <span style={format!("color: {GAINED_COLOR}")}>{"■ Gained"}</span>
                    <span>{ format!("Peak {}", format_number(max)) }</span>
                </span>
                <span>{ last }</span>
            </div>
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let api = use_api();
    let range = use_state(|| TimeRange::Week);
    let stats = use_state(|| None::<DashboardStats>);
    let loading = use_state(|| true);
    let chart = use_state(|| ChartKind::Bar);

    {
        let stats = stats.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |range: &TimeRange| {
                let range = *range;
                // Switching range supersedes whatever request is still in flight.
                let superseded = CancelFlag::default();
                let request_flag = superseded.clone();
                loading.set(true);
                spawn_local(async move {
                    let Some(result) =
                        unless_cancelled(api.dashboard(range.as_query()), &request_flag).await
                    else {
                        log::debug!("dropped stale dashboard {} response", range.as_query());
                        return;
                    };
                    match result {
                        Ok(fetched) => stats.set(Some(fetched)),
                        Err(ApiError::Unauthorized) => {}
                        Err(err) => {
                            log::warn!("dashboard {} failed: {err}", range.as_query());
                            stats.set(None);
                        }
                    }
                    loading.set(false);
                });
                move || superseded.cancel()
            },
            *range,
        );
    }

    let on_toggle_chart = {
        let chart = chart.clone();
        Callback::from(move |_| {
            chart.set(match *chart {
                ChartKind::Bar => ChartKind::Line,
                ChartKind::Line => ChartKind::Bar,
            })
        })
    };

    let range_buttons = html! {
        <>
            { for TimeRange::ALL.iter().map(|option| {
                let option = *option;
                let range = range.clone();
                let class = if *range == option {
                    "bg-[#173E63] text-white px-3 py-1.5 rounded-[10px] text-[12px] font-bold"
                } else {
                    "bg-white text-[#173E63] px-3 py-1.5 rounded-[10px] text-[12px]"
                };
                html! {
                    <button key={option.as_query()} class={class} onclick={Callback::from(move |_| range.set(option))}>
                        { option.label() }
                    </button>
                }
            }) }
            <button class={SECONDARY_BUTTON} onclick={on_toggle_chart}>{"Toggle Chart Type"}</button>
        </>
    };

    let body = match (&*stats, *loading) {
        (None, true) => html! { <p class="text-muted-foreground">{"Loading..."}</p> },
        (None, false) => html! { <p class="text-muted-foreground">{"No statistics available."}</p> },
        (Some(stats), _) => {
            let today = Local::now().date_naive();
            let days = densify_trend(&stats.trends.data, range.start_date(today), today);
            let totals = &stats.totals;
            html! {
                <>
                    <div class="grid grid-cols-2 lg:grid-cols-5 gap-4">
                        <StatCard ..StatCardProps::figure("Total Spent", totals.spent, true) />
                        <StatCard ..StatCardProps::figure("Total Gained", totals.gained, true) />
                        <StatCard ..StatCardProps::figure("Net Gain", totals.net_gain, true) />
                        <StatCard ..StatCardProps::figure("Shipping Fee", totals.shipping_fee, true) />
                        <StatCard ..StatCardProps::figure("Admin Fee", totals.admin_fee, true) />
                    </div>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <StatCard ..StatCardProps::figure("Items Bought", totals.items_bought, false) />
                        <StatCard ..StatCardProps::figure("Sales Count", totals.sales_count, false) />
                        <StatCard title="Most Bought" value={top_item_label(stats.top_item.as_ref())} />
                    </div>
                    if let Some(comparison) = &stats.comparison {
                        <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                            <CompareCard title="Spent" this_month={comparison.this_month.spent}
                                last_month={comparison.last_month.spent} higher_is_better={false} />
                            <CompareCard title="Gained" this_month={comparison.this_month.gained}
                                last_month={comparison.last_month.gained} />
                            <CompareCard title="Net Gain" this_month={comparison.this_month.net_gain}
                                last_month={comparison.last_month.net_gain} />
                        </div>
                    }
                    <div class="bg-white rounded-[10px] p-5 shadow-sm">
                        <h3 class="font-bold text-[#173E63] mb-3">{ format!("Trend, {}", range.label().to_lowercase()) }</h3>
                        { trend_chart(&days, *chart) }
                    </div>
                </>
            }
        }
    };

    html! {
        <>
            { page_shell("Dashboard", range_buttons, html! { <div class="space-y-6">{ body }</div> }) }
            <AskAi />
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_item_label_formats_name_and_quantity() {
        let top = TopItem {
            name: Some("Sticker".into()),
            quantity: 1200.0,
        };
        assert_eq!(top_item_label(Some(&top)), "Sticker (1.200)");
        assert_eq!(top_item_label(None), "-");
        assert_eq!(top_item_label(Some(&TopItem::default())), "-");
    }

    #[test]
    fn line_points_flip_the_y_axis() {
        assert_eq!(line_points(&[0.0, 50.0, 100.0], 100.0, 200.0, 100.0), "0.0,100.0 100.0,50.0 200.0,0.0");
    }

    #[test]
    fn single_point_sits_at_the_left_edge() {
        assert_eq!(line_points(&[10.0], 0.0, 200.0, 100.0), "0.0,100.0");
    }
}
