use crate::components::charts::{ColumnChart, LineChart, PieChart};
use crate::components::ui::Spinner;
use crate::state::use_stats;
use crate::sync::{Activity, SyncPhase};
use leptos::prelude::*;

fn priority_labels() -> Vec<String> {
    (1..=5).map(|p| p.to_string()).collect()
}

#[component]
pub fn StatsView() -> impl IntoView {
    let stats = use_stats();

    let priorities = Signal::derive(move || {
        stats
            .stats
            .with(|s| (1..=5).map(|p| s.priority_count(p)).collect::<Vec<_>>())
    });
    let status = Signal::derive(move || stats.stats.with(|s| vec![s.assigned, s.done]));
    let deadline_labels = Signal::derive(move || stats.stats.with(|s| s.deadline_labels()));
    let deadline_counts = Signal::derive(move || stats.stats.with(|s| s.deadline_counts()));

    let busy = move || {
        matches!(
            stats.phase.get(),
            SyncPhase::Loading | SyncPhase::Online(Activity::Refreshing)
        )
    };

    view! {
        <div class="flex flex-col gap-4">
            <div class="flex h-5 items-center gap-2 text-xs text-muted-foreground">
                <Show when=busy fallback=|| ().into_view()>
                    <Spinner />
                </Show>
                <Show when=move || stats.offline() fallback=|| ().into_view()>
                    <span>"Showing cached statistics while offline."</span>
                </Show>
            </div>
            <div class="flex flex-wrap gap-4">
                <PieChart title="Priorities" labels=priority_labels() values=priorities />
                <ColumnChart
                    title="Status"
                    labels=vec!["Assigned".to_string(), "Done".to_string()]
                    values=status
                />
            </div>
            <LineChart title="Deadlines" categories=deadline_labels values=deadline_counts />
        </div>
    }
}
