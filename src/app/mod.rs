use crate::pages::{LoginPage, MainLayout, StatsView, TodoView};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("stats") view=move || view! {
                    <MainLayout>
                        <StatsView />
                    </MainLayout>
                } />
                <Route path=path!("") view=move || view! {
                    <MainLayout>
                        <TodoView />
                    </MainLayout>
                } />
            </Routes>
        </Router>
    }
}
