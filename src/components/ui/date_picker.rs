use super::{Button, ButtonSize, ButtonVariant, Input};
use crate::i18n::{DatePickerI18n, Language};
use crate::util::today_local;
use chrono::{Datelike, NaiveDate};
use icons::{Calendar, ChevronLeft, ChevronRight};
use leptos::prelude::*;

fn shift_month((year, month): (i32, u32), delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Text the field should show for `value`, or `None` to leave `typed` alone.
///
/// Unparseable typing stays visible while the value is empty so the user can
/// fix it next to the field error.
fn synced_text(typed: &str, value: Option<NaiveDate>, i18n: &DatePickerI18n) -> Option<String> {
    match value {
        Some(d) => Some(i18n.format_date(d)),
        None if !typed.trim().is_empty() && i18n.parse_date(typed).is_none() => None,
        None => Some(String::new()),
    }
}

/// Date field typed in the language's format, with a month calendar overlay.
///
/// Typed text is committed on change; unparseable text clears the value but
/// stays on screen.
#[component]
pub fn DatePicker(
    #[prop(into)] language: Signal<Language>,
    #[prop(into)] value: Signal<Option<NaiveDate>>,
    #[prop(into)] on_value: Callback<Option<NaiveDate>>,
    #[prop(into, optional)] invalid: Signal<bool>,
    #[prop(into, optional)] id: String,
) -> impl IntoView {
    let text = RwSignal::new(String::new());
    let open = RwSignal::new(false);
    let shown = RwSignal::new({
        let d = today_local();
        (d.year(), d.month())
    });

    // Only real value changes re-sync the text, not every draft edit.
    let value = Memo::new(move |_| value.get());

    Effect::new(move |_| {
        let i18n = language.get().i18n();
        let current = value.get();
        if let Some(t) = synced_text(&text.get_untracked(), current, i18n) {
            text.set(t);
        }
        if let Some(d) = current {
            shown.set((d.year(), d.month()));
        }
    });

    let commit = move || {
        let raw = text.get_untracked();
        let parsed = if raw.trim().is_empty() {
            None
        } else {
            language.get_untracked().i18n().parse_date(&raw)
        };
        on_value.run(parsed);
    };

    let pick = move |d: NaiveDate| {
        open.set(false);
        on_value.run(Some(d));
    };

    view! {
        <div class="relative" data-name="DatePicker">
            <div class="flex items-center gap-1" on:change=move |_| commit()>
                <Input
                    id=id
                    value=text
                    on_value=Callback::new(move |v| text.set(v))
                    invalid=invalid
                    placeholder=language.get_untracked().i18n().hint
                />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:r#type="button"
                    attr:aria-label="Open calendar"
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    <Calendar />
                </Button>
            </div>

            <Show when=move || open.get() fallback=|| ().into_view()>
                {move || {
                    let i18n = language.get().i18n();
                    let (year, month) = shown.get();
                    let selected = value.get();
                    view! {
                        <div class="absolute z-40 mt-1 w-72 rounded-md border bg-background p-3 shadow-lg">
                            <div class="mb-2 flex items-center justify-between">
                                <Button
                                    variant=ButtonVariant::Ghost
                                    size=ButtonSize::Icon
                                    attr:r#type="button"
                                    on:click=move |_| shown.update(|m| *m = shift_month(*m, -1))
                                >
                                    <ChevronLeft />
                                </Button>
                                <span class="text-sm font-medium">{i18n.format_title(month, year)}</span>
                                <Button
                                    variant=ButtonVariant::Ghost
                                    size=ButtonSize::Icon
                                    attr:r#type="button"
                                    on:click=move |_| shown.update(|m| *m = shift_month(*m, 1))
                                >
                                    <ChevronRight />
                                </Button>
                            </div>
                            <div class="grid grid-cols-7 gap-1 text-center text-xs text-muted-foreground">
                                {i18n
                                    .week_header()
                                    .into_iter()
                                    .map(|(short, long)| view! { <span title=long>{short}</span> })
                                    .collect_view()}
                            </div>
                            <div class="mt-1 grid grid-cols-7 gap-1 text-center text-sm">
                                {i18n
                                    .month_grid(year, month)
                                    .into_iter()
                                    .flatten()
                                    .map(|cell| match cell {
                                        Some(d) => {
                                            let class = if Some(d) == selected {
                                                "rounded bg-primary text-primary-foreground"
                                            } else {
                                                "rounded hover:bg-accent"
                                            };
                                            view! {
                                                <button type="button" class=class on:click=move |_| pick(d)>
                                                    {d.day()}
                                                </button>
                                            }
                                                .into_any()
                                        }
                                        None => view! { <span></span> }.into_any(),
                                    })
                                    .collect_view()}
                            </div>
                            <div class="mt-2 flex justify-between">
                                <Button
                                    variant=ButtonVariant::Link
                                    size=ButtonSize::Sm
                                    attr:r#type="button"
                                    on:click=move |_| pick(today_local())
                                >
                                    {i18n.today}
                                </Button>
                                <Button
                                    variant=ButtonVariant::Link
                                    size=ButtonSize::Sm
                                    attr:r#type="button"
                                    on:click=move |_| open.set(false)
                                >
                                    {i18n.cancel}
                                </Button>
                            </div>
                        </div>
                    }
                }}
            </Show>
        </div>
    }
}
