use crate::components::ui::{Button, ButtonSize, ButtonVariant, Toaster};
use crate::connectivity::ConnectionState;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_location;

struct MenuRoute {
    path: &'static str,
    title: &'static str,
}

const MENU: [MenuRoute; 2] = [
    MenuRoute {
        path: "/",
        title: "Todo",
    },
    MenuRoute {
        path: "/stats",
        title: "Stats",
    },
];

fn title_for(path: &str) -> &'static str {
    MENU.iter()
        .find(|r| r.path == path)
        .map(|r| r.title)
        .unwrap_or("My App")
}

fn connection_badge(state: ConnectionState) -> Option<&'static str> {
    match state {
        ConnectionState::ConnectionLost => Some("Offline"),
        ConnectionState::Reconnecting => Some("Reconnecting"),
        ConnectionState::Connected | ConnectionState::Loading => None,
    }
}

/// Drawer navigation, user footer and the notification stack around a page.
#[component]
pub fn MainLayout(children: ChildrenFn) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    app.load_user_info();

    let drawer_open = RwSignal::new(true);
    let location = use_location();
    let pathname = move || location.pathname.get();

    let on_sign_out = move |_| {
        let client = app.api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = client.logout().await {
                tracing::warn!(error = %e, "logout request failed");
            }
            app.user_info.set(None);
            app.logged_in.set(false);
            let _ = window().location().set_href("/login");
        });
    };

    let children = StoredValue::new(children);

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="flex min-h-screen w-full">
                <Show when=move || drawer_open.get() fallback=|| ().into_view()>
                    <aside class="flex w-56 shrink-0 flex-col justify-between border-r p-4">
                        <header class="flex flex-col gap-4">
                            <h1 class="text-lg font-semibold">"My App"</h1>
                            <nav class="flex flex-col gap-1">
                                {MENU
                                    .iter()
                                    .map(|r| {
                                        let path = r.path;
                                        let class = move || {
                                            if pathname() == path {
                                                "block rounded-md px-3 py-2 text-sm bg-primary/10 text-primary"
                                            } else {
                                                "block rounded-md px-3 py-2 text-sm hover:bg-accent"
                                            }
                                        };
                                        view! { <a href=path class=class>{r.title}</a> }
                                    })
                                    .collect_view()}
                            </nav>
                        </header>

                        <footer class="flex flex-col gap-2">
                            {move || match app.user_info.get() {
                                Some(user) => {
                                    let name = user.display_name().to_string();
                                    let picture = user.profile_picture_url();
                                    view! {
                                        <div class="flex items-center gap-2 text-sm">
                                            {picture.map(|src| view! { <img src=src alt="" class="size-6 rounded-full" /> })}
                                            <span class="truncate">{name}</span>
                                        </div>
                                        <Button size=ButtonSize::Sm on:click=on_sign_out>"Sign out"</Button>
                                    }
                                        .into_any()
                                }
                                None => view! { <a href="/login" class="text-sm text-primary">"Sign in"</a> }.into_any(),
                            }}
                        </footer>
                    </aside>
                </Show>

                <main class="flex min-w-0 flex-1 flex-col">
                    <div class="flex items-center gap-2 border-b px-4 py-2">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:aria-label="Menu toggle"
                            on:click=move |_| drawer_open.update(|o| *o = !*o)
                        >
                            "☰"
                        </Button>
                        <h2 class="text-lg font-medium">{move || title_for(&pathname())}</h2>
                        {move || {
                            connection_badge(app.connection_state.get())
                                .map(|text| {
                                    view! {
                                        <span class="ml-auto rounded-full bg-amber-100 px-2 py-0.5 text-xs text-amber-900">
                                            {text}
                                        </span>
                                    }
                                })
                        }}
                    </div>
                    <div class="flex-1 p-4">{move || children.with_value(|c| c())}</div>
                </main>
            </div>
            <Toaster notifications=app.notifications />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::{connection_badge, title_for};
    use crate::connectivity::ConnectionState;

    #[test]
    fn titles_follow_menu() {
        assert_eq!(title_for("/"), "Todo");
        assert_eq!(title_for("/stats"), "Stats");
        assert_eq!(title_for("/elsewhere"), "My App");
    }

    #[test]
    fn badge_only_while_disconnected() {
        assert_eq!(connection_badge(ConnectionState::ConnectionLost), Some("Offline"));
        assert_eq!(connection_badge(ConnectionState::Reconnecting), Some("Reconnecting"));
        assert_eq!(connection_badge(ConnectionState::Loading), None);
        assert_eq!(connection_badge(ConnectionState::Connected), None);
    }
}
