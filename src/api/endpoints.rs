use super::{ApiClient, ApiError, ApiResult, Subscription};
use crate::models::{ContactPage, Message, SortDirection, Stats, Todo, UserInfo};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub(crate) trait TodoEndpoint {
    async fn find_all(&self) -> ApiResult<Vec<Todo>>;

    /// The server answers with its normalized copy, or nothing.
    async fn save(&self, todo: &Todo) -> ApiResult<Option<Todo>>;

    async fn remove(&self, todos: &[Todo]) -> ApiResult<()>;
}

pub(crate) trait StatsEndpoint {
    async fn get_stats(&self) -> ApiResult<Stats>;
}

pub(crate) trait ContactEndpoint {
    async fn get_page(
        &self,
        page: u32,
        page_size: u32,
        filter: &str,
        direction: Option<SortDirection>,
    ) -> ApiResult<ContactPage>;
}

pub(crate) trait UserInfoService {
    async fn get_user_info(&self) -> ApiResult<UserInfo>;
}

/// `EventEndpoint`: a cancellable message stream plus fire-and-forget sends.
pub(crate) trait PushEndpoint {
    fn subscribe(&self, on_next: Rc<dyn Fn(Message)>) -> ApiResult<Subscription>;

    fn send(&self, message: Message) -> LocalBoxFuture<'static, ApiResult<()>>;
}

impl TodoEndpoint for ApiClient {
    async fn find_all(&self) -> ApiResult<Vec<Todo>> {
        self.call("TodoEndpoint", "findAll", json!({})).await
    }

    async fn save(&self, todo: &Todo) -> ApiResult<Option<Todo>> {
        self.call("TodoEndpoint", "save", json!({ "todo": todo })).await
    }

    async fn remove(&self, todos: &[Todo]) -> ApiResult<()> {
        self.call("TodoEndpoint", "remove", json!({ "todos": todos }))
            .await
    }
}

impl StatsEndpoint for ApiClient {
    async fn get_stats(&self) -> ApiResult<Stats> {
        self.call("StatsEndpoint", "getStats", json!({})).await
    }
}

impl ContactEndpoint for ApiClient {
    async fn get_page(
        &self,
        page: u32,
        page_size: u32,
        filter: &str,
        direction: Option<SortDirection>,
    ) -> ApiResult<ContactPage> {
        self.call(
            "ContactEndpoint",
            "getPage",
            json!({
                "page": page,
                "pageSize": page_size,
                "filter": filter,
                "direction": direction,
            }),
        )
        .await
    }
}

impl UserInfoService for ApiClient {
    async fn get_user_info(&self) -> ApiResult<UserInfo> {
        self.call("UserInfoService", "getUserInfo", json!({})).await
    }
}

impl PushEndpoint for ApiClient {
    fn subscribe(&self, on_next: Rc<dyn Fn(Message)>) -> ApiResult<Subscription> {
        let url = self.absolute(&self.push_path("EventEndpoint", "getEventsCancellable"));
        let source = web_sys::EventSource::new(&url)
            .map_err(|e| ApiError::Network(format!("cannot open event stream: {e:?}")))?;

        let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
            move |ev: web_sys::MessageEvent| {
                let Some(text) = ev.data().as_string() else {
                    return;
                };
                match serde_json::from_str::<Message>(&text) {
                    Ok(message) => on_next(message),
                    Err(e) => tracing::warn!(error = %e, "dropping malformed push message"),
                }
            },
        );
        source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        tracing::info!(%url, "events subscription opened");

        Ok(Subscription::new(move || {
            source.set_onmessage(None);
            source.close();
            drop(on_message);
            tracing::info!("events subscription cancelled");
        }))
    }

    fn send(&self, message: Message) -> LocalBoxFuture<'static, ApiResult<()>> {
        let client = self.clone();
        async move {
            client
                .call("EventEndpoint", "send", json!({ "message": message }))
                .await
        }
        .boxed_local()
    }
}
