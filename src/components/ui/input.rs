use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const FIELD_CLASS: &str = "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2 aria-invalid:ring-destructive/20 aria-invalid:border-destructive";

fn event_value(ev: &web_sys::Event) -> Option<String> {
    let target = ev.target()?;
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    target
        .dyn_ref::<web_sys::HtmlTextAreaElement>()
        .map(|t| t.value())
}

/// Text input reporting every keystroke through `on_value`.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] list: String,
    #[prop(optional)] required: bool,
    #[prop(optional)] autofocus: bool,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_value: Callback<String>,
    #[prop(into, optional)] invalid: Signal<bool>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "flex h-9", class);

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            list=list
            required=required
            autofocus=autofocus
            aria-invalid=move || invalid.get().to_string()
            prop:value=move || value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    on_value.run(v);
                }
            }
            node_ref=node_ref
        />
    }
}

#[component]
pub fn TextArea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_value: Callback<String>,
    #[prop(into, optional)] invalid: Signal<bool>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "min-h-16 py-2", class);

    view! {
        <textarea
            data-name="TextArea"
            class=merged_class
            id=id
            aria-invalid=move || invalid.get().to_string()
            prop:value=move || value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    on_value.run(v);
                }
            }
        />
    }
}

#[component]
pub fn Checkbox(
    #[prop(into)] checked: Signal<bool>,
    #[prop(into)] on_checked: Callback<Option<bool>>,
    #[prop(into, optional)] title: String,
) -> impl IntoView {
    view! {
        <input
            data-name="Checkbox"
            type="checkbox"
            class="size-4 accent-primary hover:cursor-pointer"
            title=title
            prop:checked=move || checked.get()
            on:change=move |ev| {
                let value = ev
                    .target()
                    .and_then(|t| t.dyn_ref::<web_sys::HtmlInputElement>().map(|i| i.checked()));
                on_checked.run(value);
            }
        />
    }
}
