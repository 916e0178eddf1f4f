use crate::components::ui::{Badge, BadgeVariant, Checkbox, Tooltip, TooltipPosition};
use crate::models::Todo;
use leptos::prelude::*;

/// Row-per-todo grid with a done checkbox and a clickable task name.
#[component]
pub fn TodoGrid(
    #[prop(into)] todos: Signal<Vec<Todo>>,
    #[prop(into)] on_change_status: Callback<(Todo, Option<bool>)>,
    #[prop(into)] on_click: Callback<Todo>,
) -> impl IntoView {
    view! {
        <div class="grid max-h-[300px] flex-grow grid-cols-6 items-center gap-2 overflow-auto p-3 text-sm">
            <span class="font-medium">"Done"</span>
            <span class="font-medium">"Task"</span>
            <span class="font-medium">"Description"</span>
            <span class="font-medium">"Assigned"</span>
            <span class="font-medium">"Deadline"</span>
            <span class="text-right font-medium">"Priority"</span>
            <hr class="col-span-6" />
            // Any field change rebuilds the row, so a row never holds an outdated copy.
            <For each=move || todos.get() key=|t| t.clone() let:todo>
                <TodoItem todo=todo on_change_status=on_change_status on_click=on_click />
            </For>
        </div>
    }
}

#[component]
fn TodoItem(
    todo: Todo,
    on_change_status: Callback<(Todo, Option<bool>)>,
    on_click: Callback<Todo>,
) -> impl IntoView {
    let id = todo.id.map(|i| i.to_string()).unwrap_or_default();
    let done = todo.done;
    let variant = BadgeVariant::for_priority(todo.priority);
    let priority = todo.priority.map(|p| p.to_string()).unwrap_or_default();
    let deadline = todo.deadline.map(|d| d.to_string()).unwrap_or_default();
    let assignee = todo.assignee_name();
    let task = todo.task.clone();
    let description = todo.description.clone();
    let for_status = todo.clone();
    let task_id = format!("task-{id}");
    let badge_id = format!("badge-{id}");

    view! {
        <Checkbox
            checked=done
            title="Done"
            on_checked=Callback::new(move |v| on_change_status.run((for_status.clone(), v)))
        />
        <Tooltip text="Edit me" position=TooltipPosition::Bottom>
            <span
                id=task_id
                class="cursor-pointer font-bold text-primary"
                on:click=move |_| on_click.run(todo.clone())
            >
                {task}
            </span>
        </Tooltip>
        <span>{description}</span>
        <span>{assignee}</span>
        <span>{deadline}</span>
        <Tooltip text="Priority" position=TooltipPosition::End class="ml-auto">
            <Badge id=badge_id variant=variant>{priority}</Badge>
        </Tooltip>
    }
}
