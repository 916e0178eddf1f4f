use leptos::prelude::*;
use tw_merge::tw_merge;

#[derive(Clone, Copy, Default, strum::AsRefStr)]
pub enum TooltipPosition {
    #[default]
    Top,
    Bottom,
    End,
}

/// Hover hint shown next to its children. Pure CSS, no JS state.
#[component]
pub fn Tooltip(
    #[prop(into)] text: String,
    #[prop(default = TooltipPosition::default())] position: TooltipPosition,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let position_class = match position {
        TooltipPosition::Top => "left-1/2 bottom-full mb-1 -translate-x-1/2",
        TooltipPosition::Bottom => "left-1/2 top-full mt-1 -translate-x-1/2",
        TooltipPosition::End => "left-full top-1/2 ml-2 -translate-y-1/2",
    };

    let tooltip_class = tw_merge!(
        "absolute z-50 opacity-0 pointer-events-none transition-opacity duration-200 group-hover/tooltip:opacity-100",
        "py-1.5 px-2 rounded text-xs whitespace-nowrap shadow-lg text-background bg-foreground/90",
        position_class,
    );

    view! {
        <span class=tw_merge!("relative inline-flex group/tooltip", class)>
            {children()}
            <span data-name="TooltipContent" data-position=position.as_ref().to_string() role="tooltip" class=tooltip_class>
                {text}
            </span>
        </span>
    }
}
