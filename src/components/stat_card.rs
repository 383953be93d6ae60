use yew::prelude::*;

use crate::format::{format_currency, format_optional};
use crate::stats::percent_change;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    /// Preformatted value; `-` while nothing was reported.
    pub value: AttrValue,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

impl StatCardProps {
    pub fn figure(title: &'static str, value: Option<f64>, money: bool) -> Self {
        Self {
            title: AttrValue::Static(title),
            value: AttrValue::from(format_optional(value, money)),
            hint: None,
        }
    }
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-white rounded-[10px] p-5 shadow-sm">
            <p class="text-[12px] font-bold text-slate-500">{ props.title.clone() }</p>
            <p class="text-xl font-black text-[#173E63] mt-1 truncate">{ props.value.clone() }</p>
            if let Some(hint) = &props.hint {
                <p class="text-[11px] text-slate-400 mt-1">{ hint.clone() }</p>
            }
        </div>
    }
}

/// Arrow and tone for a month-over-month change. `higher_is_better` is false for spending.
pub fn delta_badge(current: f64, previous: f64, higher_is_better: bool) -> (String, &'static str) {
    let change = percent_change(current, previous);
    let arrow = if change >= 0.0 { "▲" } else { "▼" };
    let good = (change >= 0.0) == higher_is_better;
    let tone = if change == 0.0 {
        "text-slate-500"
    } else if good {
        "text-green-600"
    } else {
        "text-red-600"
    };
    (format!("{arrow} {:.1}%", change.abs()), tone)
}

#[derive(Properties, PartialEq)]
pub struct CompareCardProps {
    pub title: AttrValue,
    pub this_month: f64,
    pub last_month: f64,
    #[prop_or(true)]
    pub higher_is_better: bool,
}

#[function_component(CompareCard)]
pub fn compare_card(props: &CompareCardProps) -> Html {
    let (delta, tone) = delta_badge(props.this_month, props.last_month, props.higher_is_better);

    html! {
        <div class="bg-white rounded-[10px] p-5 shadow-sm">
            <p class="text-[12px] font-bold text-slate-500">{ props.title.clone() }</p>
            <p class="text-xl font-black text-[#173E63] mt-1">{ format_currency(props.this_month) }</p>
            <div class="flex items-center justify-between mt-1 text-[11px]">
                <span class="text-slate-400">{ format!("Last month {}", format_currency(props.last_month)) }</span>
                <span class={format!("font-bold {tone}")}>{ delta }</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_up_is_bad_news() {
        let (text, tone) = delta_badge(150.0, 100.0, false);
        assert_eq!(text, "▲ 50.0%");
        assert_eq!(tone, "text-red-600");
    }

    #[test]
    fn gain_down_shows_a_falling_arrow() {
        let (text, tone) = delta_badge(50.0, 100.0, true);
        assert_eq!(text, "▼ 50.0%");
        assert_eq!(tone, "text-red-600");
    }

    #[test]
    fn flat_month_is_neutral() {
        let (text, tone) = delta_badge(0.0, 0.0, true);
        assert_eq!(text, "▲ 0.0%");
        assert_eq!(tone, "text-slate-500");
    }

    #[test]
    fn missing_figures_render_as_dash() {
        let props = StatCardProps::figure("Spent", None, true);
        assert_eq!(props.value.as_str(), "-");
    }
}
