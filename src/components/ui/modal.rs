use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

mod components {
    use super::*;
    clx! {ModalHeader, div, "mb-3 flex items-center justify-between gap-2"}
    clx! {ModalTitle, h3, "text-base leading-none font-semibold"}
    clx! {ModalFooter, footer, "mt-4 flex flex-wrap items-center gap-2"}
}

pub use components::*;

/// Overlay dialog whose visibility is owned by the caller.
#[component]
pub fn Modal(
    open: RwSignal<bool>,
    #[prop(into, optional)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let class = tw_merge!(
        "w-full max-w-3xl max-h-[85vh] overflow-auto rounded-md border border-border bg-background p-4 shadow-lg",
        class
    );
    let children = StoredValue::new(children);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4"
                on:click=move |_| open.set(false)
            >
                <div class=class.clone() on:click=|ev| ev.stop_propagation()>
                    <button
                        type="button"
                        class="float-right rounded-sm p-1 hover:bg-accent"
                        aria-label="Close dialog"
                        on:click=move |_| open.set(false)
                    >
                        <X />
                    </button>
                    {move || children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}
