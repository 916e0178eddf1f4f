mod contact_dialog;
mod grid;

use contact_dialog::ContactDialog;
use grid::TodoGrid;

use crate::components::ui::{
    Button, ButtonVariant, DatePicker, FieldMessage, Input, Label, TextArea, Tooltip,
    TooltipPosition,
};
use crate::form::{todo_fields, FieldValue};
use crate::models::{Contact, Todo};
use crate::state::{use_todos, AppContext, TodosHandle};
use crate::util::parse_priority;
use icons::Plus;
use leptos::prelude::*;

const PRESETS: [&str; 5] = [
    "Make food",
    "Clean the house",
    "Do the groceries",
    "Mow the lawn",
    "Walk the dog",
];

const ADMIN_ROLE: &str = "ROLE_ADMIN";

fn field_error(todos: TodosHandle, name: &'static str) -> Signal<Option<String>> {
    Signal::derive(move || {
        todos
            .form
            .with(|f| f.field_error(name).map(|e| e.message.clone()))
    })
}

fn draft_text(todos: TodosHandle, read: fn(&Todo) -> String) -> Signal<String> {
    Signal::derive(move || todos.form.with(|f| read(f.value())))
}

#[component]
pub fn TodoView() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let todos = use_todos();
    let dialog_open = RwSignal::new(false);

    let task_error = field_error(todos, todo_fields::TASK);
    let description_error = field_error(todos, todo_fields::DESCRIPTION);
    let priority_error = field_error(todos, todo_fields::PRIORITY);
    let deadline_error = field_error(todos, todo_fields::DEADLINE);

    let assigned = Signal::derive(move || todos.form.with(|f| f.value().assigned.clone()));
    let can_assign = move || app.has_role(ADMIN_ROLE);

    view! {
        <div class="flex h-full flex-col gap-4">
            <Show when=move || todos.offline() fallback=|| ().into_view()>
                <p class="text-xs text-muted-foreground">"Showing cached todos while offline."</p>
            </Show>

            <section class="grid gap-3 rounded-md border p-3 shadow-sm">
                <Tooltip text="Add new todo" position=TooltipPosition::End class="w-fit">
                    <Button attr:id="new" attr:aria-label="Add new todo" on:click=move |_| todos.add_new()>
                        <Plus />
                    </Button>
                </Tooltip>

                <div class="grid gap-3 md:grid-cols-2">
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="task">"Task"</Label>
                        <Input
                            id="task"
                            list="task-presets"
                            value=draft_text(todos, |t| t.task.clone())
                            on_value=Callback::new(move |v| {
                                todos.set_field(todo_fields::TASK, FieldValue::Text(v))
                            })
                            invalid=Signal::derive(move || task_error.get().is_some())
                        />
                        <datalist id="task-presets">
                            {PRESETS.iter().map(|p| view! { <option value=*p></option> }).collect_view()}
                        </datalist>
                        <FieldMessage error=task_error />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="description">"Description"</Label>
                        <TextArea
                            id="description"
                            value=draft_text(todos, |t| t.description.clone())
                            on_value=Callback::new(move |v| {
                                todos.set_field(todo_fields::DESCRIPTION, FieldValue::Text(v))
                            })
                            invalid=Signal::derive(move || description_error.get().is_some())
                        />
                        <FieldMessage error=description_error />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="priority">"Priority"</Label>
                        <Input
                            id="priority"
                            r#type="number"
                            class="text-right"
                            value=draft_text(todos, |t| t.priority.map(|p| p.to_string()).unwrap_or_default())
                            on_value=Callback::new(move |v: String| {
                                todos.set_field(todo_fields::PRIORITY, FieldValue::Number(parse_priority(&v)))
                            })
                            invalid=Signal::derive(move || priority_error.get().is_some())
                        />
                        <FieldMessage error=priority_error />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="deadline">"Deadline"</Label>
                        <DatePicker
                            id="deadline"
                            language=app.language
                            value=Signal::derive(move || todos.form.with(|f| f.value().deadline))
                            on_value=Callback::new(move |d| {
                                todos.set_field(todo_fields::DEADLINE, FieldValue::Date(d))
                            })
                            invalid=Signal::derive(move || deadline_error.get().is_some())
                        />
                        <FieldMessage error=deadline_error helper="Finnish format" />
                    </div>
                </div>

                <ContactDialog
                    open=dialog_open
                    on_assign=Callback::new(move |c: Option<Contact>| {
                        if c.is_some() {
                            todos.assign(c);
                        }
                    })
                />

                <div class="flex">
                    <Button
                        attr:disabled=move || !can_assign()
                        on:click=move |_| dialog_open.update(|o| *o = !*o)
                    >
                        {move || {
                            assigned
                                .get()
                                .map(|c| c.display_name())
                                .unwrap_or_else(|| "Assign".to_string())
                        }}
                    </Button>
                    <Button
                        attr:id="add"
                        class="ml-auto"
                        variant=ButtonVariant::Primary
                        attr:disabled=move || todos.invalid()
                        on:click=move |_| todos.submit()
                    >
                        {move || if todos.adding.get() { "Add" } else { "Update" }}
                    </Button>
                </div>
            </section>

            <section class="flex flex-grow flex-col rounded-md border p-3 shadow-sm">
                <TodoGrid
                    todos=todos.items
                    on_click=Callback::new(move |t| todos.edit(t))
                    on_change_status=Callback::new(move |(t, v)| todos.change_status(t, v))
                />
                <Tooltip text="Remove todos that are done" position=TooltipPosition::End class="mt-3 w-fit">
                    <Button
                        variant=ButtonVariant::Error
                        attr:disabled=move || !todos.has_done()
                        on:click=move |_| todos.remove()
                    >
                        "Remove"
                    </Button>
                </Tooltip>
            </section>
        </div>
    }
}
