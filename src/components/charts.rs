//! Small SVG charts for the statistics view.

use leptos::prelude::*;
use std::f64::consts::PI;

const PALETTE: [&str; 6] = [
    "#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2",
];
const VIEW: f64 = 200.0;

fn color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// SVG path for each non-empty share of a pie centered in the view box.
pub(crate) fn pie_paths(values: &[u32], radius: f64) -> Vec<(usize, String)> {
    let total: u32 = values.iter().sum();
    if total == 0 {
        return vec![];
    }
    let c = VIEW / 2.0;
    let point = |angle: f64| (c + radius * angle.sin(), c - radius * angle.cos());

    let mut start = 0.0;
    let mut paths = vec![];
    for (i, &v) in values.iter().enumerate() {
        if v == 0 {
            continue;
        }
        if v == total {
            // A full circle cannot be drawn as a single arc.
            paths.push((
                i,
                format!(
                    "M {c} {top} A {radius} {radius} 0 1 1 {c} {bottom} A {radius} {radius} 0 1 1 {c} {top} Z",
                    top = c - radius,
                    bottom = c + radius
                ),
            ));
            return paths;
        }
        let sweep = 2.0 * PI * f64::from(v) / f64::from(total);
        let (x0, y0) = point(start);
        let (x1, y1) = point(start + sweep);
        let large = u8::from(sweep > PI);
        paths.push((
            i,
            format!("M {c} {c} L {x0:.2} {y0:.2} A {radius} {radius} 0 {large} 1 {x1:.2} {y1:.2} Z"),
        ));
        start += sweep;
    }
    paths
}

/// Bar heights scaled so the largest value fills `height`.
pub(crate) fn scaled(values: &[u32], height: f64) -> Vec<f64> {
    let max = values.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|&v| height * f64::from(v) / f64::from(max))
        .collect()
}

/// `points` attribute for a polyline spread across `width`.
pub(crate) fn line_points(values: &[u32], width: f64, height: f64) -> String {
    let heights = scaled(values, height);
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:.2},{:.2}", step * i as f64, height - h))
        .collect::<Vec<_>>()
        .join(" ")
}

#[component]
fn ChartFrame(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <figure class="flex min-w-64 flex-1 flex-col gap-2 rounded-md border p-3" data-name="Chart">
            <figcaption class="text-sm font-semibold">{title}</figcaption>
            {children()}
        </figure>
    }
}

#[component]
pub fn PieChart(
    #[prop(into)] title: String,
    #[prop(into)] labels: Signal<Vec<String>>,
    #[prop(into)] values: Signal<Vec<u32>>,
) -> impl IntoView {
    view! {
        <ChartFrame title=title>
            <svg viewBox=format!("0 0 {VIEW} {VIEW}") class="h-48 w-full" role="img">
                {move || {
                    let values = values.get();
                    let labels = labels.get();
                    pie_paths(&values, VIEW / 2.0 - 4.0)
                        .into_iter()
                        .map(|(i, d)| {
                            let hint = format!(
                                "{}: {}",
                                labels.get(i).cloned().unwrap_or_default(),
                                values[i],
                            );
                            view! {
                                <path d=d fill=color(i) stroke="white" stroke-width="1">
                                    <title>{hint}</title>
                                </path>
                            }
                        })
                        .collect_view()
                }}
            </svg>
            <Legend labels=labels />
        </ChartFrame>
    }
}

#[component]
pub fn ColumnChart(
    #[prop(into)] title: String,
    #[prop(into)] labels: Signal<Vec<String>>,
    #[prop(into)] values: Signal<Vec<u32>>,
) -> impl IntoView {
    view! {
        <ChartFrame title=title>
            <svg viewBox=format!("0 0 {VIEW} {VIEW}") class="h-48 w-full" role="img">
                {move || {
                    let values = values.get();
                    let labels = labels.get();
                    let width = VIEW / values.len().max(1) as f64;
                    scaled(&values, VIEW - 10.0)
                        .into_iter()
                        .enumerate()
                        .map(|(i, h)| {
                            let hint = format!(
                                "{}: {}",
                                labels.get(i).cloned().unwrap_or_default(),
                                values[i],
                            );
                            view! {
                                <rect
                                    x=format!("{:.2}", width * i as f64 + width * 0.15)
                                    y=format!("{:.2}", VIEW - h)
                                    width=format!("{:.2}", width * 0.7)
                                    height=format!("{h:.2}")
                                    fill=color(i)
                                >
                                    <title>{hint}</title>
                                </rect>
                            }
                        })
                        .collect_view()
                }}
            </svg>
            <Legend labels=labels />
        </ChartFrame>
    }
}

#[component]
pub fn LineChart(
    #[prop(into)] title: String,
    #[prop(into)] categories: Signal<Vec<String>>,
    #[prop(into)] values: Signal<Vec<u32>>,
) -> impl IntoView {
    const WIDTH: f64 = 600.0;
    const HEIGHT: f64 = 160.0;

    view! {
        <ChartFrame title=title>
            <svg viewBox=format!("-10 -10 {} {}", WIDTH + 20.0, HEIGHT + 20.0) class="h-48 w-full" role="img">
                <line x1="0" y1=HEIGHT.to_string() x2=WIDTH.to_string() y2=HEIGHT.to_string() stroke="currentColor" stroke-opacity="0.2" />
                <polyline
                    fill="none"
                    stroke=color(0)
                    stroke-width="2"
                    points=move || line_points(&values.get(), WIDTH, HEIGHT)
                />
            </svg>
            <div class="flex justify-between gap-2 text-xs text-muted-foreground">
                {move || {
                    categories
                        .get()
                        .into_iter()
                        .zip(values.get())
                        .map(|(c, v)| view! { <span title=v.to_string()>{c}</span> })
                        .collect_view()
                }}
            </div>
        </ChartFrame>
    }
}

#[component]
fn Legend(labels: Signal<Vec<String>>) -> impl IntoView {
    view! {
        <ul class="flex flex-wrap gap-3 text-xs">
            {move || {
                labels
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(i, l)| {
                        view! {
                            <li class="inline-flex items-center gap-1">
                                <span class="inline-block size-2 rounded-full" style=format!("background:{}", color(i))></span>
                                {l}
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}
