use crate::notify::{Notifications, Theme};
use leptos::prelude::*;

fn theme_class(theme: Theme) -> &'static str {
    match theme {
        Theme::Success => "border-green-600/40 bg-green-50 text-green-900",
        Theme::Warning => "border-amber-500/40 bg-amber-50 text-amber-900",
        Theme::Error => "border-destructive/40 bg-red-50 text-destructive",
        Theme::Contrast => "border-foreground bg-foreground text-background",
    }
}

/// Bottom-right stack of the app's notifications.
#[component]
pub fn Toaster(notifications: Notifications) -> impl IntoView {
    let items = notifications.items();

    view! {
        <div class="pointer-events-none fixed bottom-4 right-4 z-[100] flex w-80 flex-col gap-2" aria-live="polite">
            <For each=move || items.get() key=|(id, _)| *id let:entry>
                {
                    let (id, n) = entry;
                    view! {
                        <div
                            data-name="Notification"
                            data-theme=n.theme.to_string()
                            class=format!(
                                "pointer-events-auto rounded-md border px-3 py-2 text-sm shadow-md {}",
                                theme_class(n.theme),
                            )
                            on:click=move |_| notifications.dismiss(id)
                        >
                            {n.text}
                        </div>
                    }
                }
            </For>
        </div>
    }
}
