use crate::api::ContactEndpoint;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Input, Modal, ModalFooter, ModalHeader, ModalTitle,
};
use crate::models::{Contact, SortDirection};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

const PAGE_SIZE: u32 = 50;

pub(crate) fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

fn row_name(c: &Contact) -> String {
    format!("{} {}", c.first_name.to_uppercase(), c.last_name)
}

/// Paged contact picker. Closing without a choice reports `None`.
#[component]
pub fn ContactDialog(open: RwSignal<bool>, #[prop(into)] on_assign: Callback<Option<Contact>>) -> impl IntoView {
    let app = expect_context::<AppContext>().0;

    let filter = RwSignal::new(String::new());
    let direction = RwSignal::new(SortDirection::Desc);
    let page = RwSignal::new(0u32);
    let rows: RwSignal<Vec<Contact>> = RwSignal::new(vec![]);
    let total = RwSignal::new(0u64);
    let selected: RwSignal<Option<Contact>> = RwSignal::new(None);
    let loading = RwSignal::new(false);

    // Responses for an older filter/page are ignored.
    let request_id = RwSignal::new(0u64);

    Effect::new(move |_| {
        if open.get() {
            filter.set(String::new());
            page.set(0);
            selected.set(None);
        }
    });

    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        let (f, d, p) = (filter.get(), direction.get(), page.get());
        let id = request_id.get_untracked() + 1;
        request_id.set(id);
        let client = app.api_client.get_untracked();
        loading.set(true);

        spawn_local(async move {
            let result = client.get_page(p, PAGE_SIZE, &f, Some(d)).await;
            if request_id.get_untracked() != id {
                return;
            }
            match result {
                Ok(contacts) => {
                    rows.set(contacts.content);
                    total.set(contacts.size);
                }
                Err(e) => tracing::warn!(error = %e, page = p, "could not load contacts"),
            }
            loading.set(false);
        });
    });

    let pages = move || page_count(total.get(), PAGE_SIZE).max(1);
    let choose = move |c: Option<Contact>| {
        on_assign.run(c);
        open.set(false);
    };

    view! {
        <Modal open=open>
            <ModalHeader>
                <ModalTitle>"Assign Todo"</ModalTitle>
            </ModalHeader>

            <table class="w-full min-w-[600px] text-sm">
                <thead>
                    <tr class="border-b text-left">
                        <th class="py-2">
                            <button
                                type="button"
                                class="inline-flex items-center gap-1 font-medium hover:underline"
                                title="Sort by last name and first name"
                                on:click=move |_| {
                                    direction.update(|d| *d = d.toggled());
                                    page.set(0);
                                }
                            >
                                "Name"
                                {move || if direction.get() == SortDirection::Asc { "▲" } else { "▼" }}
                            </button>
                        </th>
                        <th class="py-2">"Email"</th>
                        <th class="py-2">"Date"</th>
                    </tr>
                </thead>
                <tbody>
                    <For each=move || rows.get() key=|c| c.id let:contact>
                        {
                            let id = contact.id;
                            let row_class = move || {
                                if selected.with(|s| s.as_ref().map(|c| c.id) == Some(id)) {
                                    "cursor-pointer bg-primary/10"
                                } else {
                                    "cursor-pointer hover:bg-accent"
                                }
                            };
                            let name = row_name(&contact);
                            let email = contact.email.clone();
                            let date = contact.date.map(|d| d.to_string()).unwrap_or_default();
                            view! {
                                <tr class=row_class on:click=move |_| selected.set(Some(contact.clone()))>
                                    <td class="py-1.5">{name}</td>
                                    <td class="py-1.5">{email}</td>
                                    <td class="py-1.5">{date}</td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>

            <div class="mt-2 flex items-center gap-2 text-xs text-muted-foreground">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    attr:disabled=move || page.get() == 0
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1))
                >
                    "‹"
                </Button>
                <span>{move || format!("{} / {}", page.get() + 1, pages())}</span>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    attr:disabled=move || page.get() + 1 >= pages()
                    on:click=move |_| page.update(|p| *p += 1)
                >
                    "›"
                </Button>
                <Show when=move || loading.get() fallback=|| ().into_view()>
                    <span>"Loading…"</span>
                </Show>
            </div>

            <ModalFooter>
                <Input
                    class="mr-auto max-w-64"
                    placeholder="Filter by e-mail"
                    value=filter
                    on_value=Callback::new(move |v| {
                        filter.set(v);
                        page.set(0);
                    })
                />
                <Button variant=ButtonVariant::Default on:click=move |_| choose(None)>
                    "Cancel"
                </Button>
                <Button
                    variant=ButtonVariant::Primary
                    attr:disabled=move || selected.with(|s| s.is_none())
                    on:click=move |_| choose(selected.get_untracked())
                >
                    "Assign"
                </Button>
            </ModalFooter>
        </Modal>
    }
}
