use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Label(
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] html_for: String,
    children: Children,
) -> impl IntoView {
    let class = tw_merge!(
        "flex items-center gap-2 text-xs leading-none font-medium text-muted-foreground select-none",
        class
    );

    view! {
        <label class=class r#for=html_for>
            {children()}
        </label>
    }
}

/// Helper or error line under a form field.
#[component]
pub fn FieldMessage(
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(optional, into)] helper: String,
) -> impl IntoView {
    view! {
        {move || match error.get() {
            Some(e) => view! { <p class="text-xs text-destructive" role="alert">{e}</p> }.into_any(),
            None if !helper.is_empty() => {
                view! { <p class="text-xs text-muted-foreground">{helper.clone()}</p> }.into_any()
            }
            None => ().into_any(),
        }}
    }
}
