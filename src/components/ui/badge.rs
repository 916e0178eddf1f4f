use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Badge(
    #[prop(into, optional)] variant: Signal<BadgeVariant>,
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    children: Children,
) -> impl IntoView {
    let merged_class = move || BadgeClass { variant: variant.get() }.with_class(class.clone());

    view! {
        <span data-name="Badge" id=id class=merged_class>
            {children()}
        </span>
    }
}

#[derive(TwClass, Default)]
#[tw(class = "inline-flex items-center rounded-full px-2.5 py-0.5 text-xs font-medium")]
pub struct BadgeClass {
    variant: BadgeVariant,
}

#[derive(TwVariant, PartialEq)]
pub enum BadgeVariant {
    #[tw(default, class = "bg-primary/10 text-primary")]
    Default,
    #[tw(class = "bg-primary text-primary-foreground")]
    Primary,
}

impl BadgeVariant {
    /// Top priority stands out.
    pub fn for_priority(priority: Option<i32>) -> Self {
        if priority == Some(5) {
            BadgeVariant::Primary
        } else {
            BadgeVariant::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_priority_five_is_primary() {
        assert!(BadgeVariant::for_priority(Some(5)) == BadgeVariant::Primary);
        assert!(BadgeVariant::for_priority(Some(4)) == BadgeVariant::Default);
        assert!(BadgeVariant::for_priority(None) == BadgeVariant::Default);
    }
}
