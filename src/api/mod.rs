//! Domain action set: `auth`, `file`, `status` and `setting` operations.
//!
//! Every operation performs one HTTP call. Failures are reported as a toast
//! (and, for auth, a failure dispatch) before the error is handed back, so
//! callers may ignore the `Err` entirely.

mod auth;
mod file;
mod setting;
mod status;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, Failure};
use crate::http::HttpClient;
use crate::nav::Navigator;
use crate::notify::{Notifier, Severity, Toast};
use crate::session::SessionStorage;
use crate::store::{Action, Store};

pub use auth::Auth;
pub use file::{list_target, Files};
pub use setting::Settings;
pub use status::Status;

pub const SERVER_CLOSED: &str = "서버가 닫혀있습니다";
pub const INVALID_LOGIN: &str = "올바르지 않은 로그인 형식입니다";
pub const INVALID_SIGNUP: &str = "올바르지 않은 회원가입 형식입니다";
pub const INVALID_REQUEST: &str = "올바르지 않은 요청 형식입니다";

/// Services every operation needs.
pub struct Context {
    pub http: HttpClient,
    pub store: Store,
    pub storage: Arc<dyn SessionStorage>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

#[derive(Clone)]
pub struct Api {
    ctx: Arc<Context>,
}

impl Api {
    pub fn new(ctx: Context) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn from_config(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::new(config, storage.clone())?;
        Ok(Self::new(Context {
            http,
            store: Store::new(),
            storage,
            notifier,
            navigator,
        }))
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(&self.ctx)
    }

    pub fn file(&self) -> Files<'_> {
        Files::new(&self.ctx)
    }

    pub fn status(&self) -> Status<'_> {
        Status::new(&self.ctx)
    }

    pub fn setting(&self) -> Settings<'_> {
        Settings::new(&self.ctx)
    }

    pub fn store(&self) -> &Store {
        &self.ctx.store
    }

    pub fn storage(&self) -> &dyn SessionStorage {
        self.ctx.storage.as_ref()
    }
}

/// How a failed call is worded to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Policy {
    Login,
    SignUp,
    /// download / upload: always the server message, as a warning.
    Transfer,
    Read,
}

pub(crate) fn failure_toast(err: &ApiError, policy: Policy) -> Toast {
    let raw_body = || match err {
        ApiError::Status { body, .. } => body.clone(),
        other => other.to_string(),
    };
    if policy == Policy::Transfer {
        let message = err.server_message().unwrap_or_else(|| err.to_string());
        return Toast::new(message, Severity::Warn);
    }
    match (policy, Failure::classify(err)) {
        (Policy::Login, Failure::BadRequest) => Toast::new(INVALID_LOGIN, Severity::Info),
        (Policy::SignUp, Failure::BadRequest) => Toast::new(INVALID_SIGNUP, Severity::Info),
        (_, Failure::BadRequest) => Toast::new(INVALID_REQUEST, Severity::Info),
        (Policy::Login, Failure::Unauthorized(message)) => Toast::new(message, Severity::Warn),
        (Policy::SignUp, Failure::Conflict(message)) => Toast::new(message, Severity::Warn),
        (_, Failure::ServerClosed) => Toast::new(SERVER_CLOSED, Severity::Error),
        (_, Failure::Unreachable(message)) => Toast::new(message, Severity::Error),
        (Policy::Read, _) => Toast::new(
            err.server_message().unwrap_or_else(|| err.to_string()),
            Severity::Error,
        ),
        _ => Toast::new(raw_body(), Severity::Error),
    }
}

impl Context {
    pub(crate) fn report(&self, err: &ApiError, policy: Policy) {
        log::warn!("요청 실패 ({:?}): {}", policy, err);
        self.notifier.toast(failure_toast(err, policy));
    }

    /// GET and decode, then dispatch the body unmodified. Nothing is
    /// dispatched when decoding fails.
    pub(crate) async fn read<T: DeserializeOwned>(&self, target: &str) -> Result<T, ApiError> {
        match self.fetch_and_dispatch(target).await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.report(&err, Policy::Read);
                Err(err)
            }
        }
    }

    async fn fetch_and_dispatch<T: DeserializeOwned>(&self, target: &str) -> Result<T, ApiError> {
        let value = self.http.get_json(target).await?;
        let typed = serde_json::from_value(value.clone())?;
        self.store.dispatch(Action::FileSuccess(value));
        Ok(typed)
    }
}
