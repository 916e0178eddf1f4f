use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::state::AppContext;
use crate::storage::{set_logged_in, LocalStorage};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<bool> = RwSignal::new(false);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app = expect_context::<AppContext>().0;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let user = username.get();
        let pass = password.get();
        let client = app.api_client.get_untracked();

        loading.set(true);
        error.set(false);

        spawn_local(async move {
            match client.login(&user, &pass).await {
                Ok(result) => {
                    set_logged_in(&LocalStorage);
                    app.logged_in.set(true);
                    let _ = window().location().set_href(&result.target());
                }
                Err(e) => {
                    tracing::info!(error = %e, "login rejected");
                    error.set(true);
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"My App"</CardTitle>
                        <CardDescription class="text-xs">"Login using user/user or admin/admin"</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="username">"Username"</Label>
                                <Input
                                    id="username"
                                    value=username
                                    on_value=Callback::new(move |v| username.set(v))
                                    required=true
                                    autofocus=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    value=password
                                    on_value=Callback::new(move |v| password.set(v))
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <Show when=move || error.get() fallback=|| ().into_view()>
                                <Alert class="border-destructive/30">
                                    <AlertDescription class="text-destructive text-xs">
                                        <p class="font-medium">"Incorrect username or password"</p>
                                        <p>"Check that you have entered the correct username and password and try again."</p>
                                    </AlertDescription>
                                </Alert>
                            </Show>

                            <Button
                                class="w-full"
                                variant=ButtonVariant::Primary
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    "Log in"
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
