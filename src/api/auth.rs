use serde::Deserialize;
use serde_json::Value;

use super::{Context, Policy};
use crate::error::ApiError;
use crate::http::read_json;
use crate::nav::HOME_ROUTE;
use crate::notify::{Severity, Toast};
use crate::session::{self, JWT_ACCESS_TOKEN, JWT_REFRESH_TOKEN};
use crate::store::Action;
use crate::types::{LoginData, SignUpData, TokenData};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(flatten)]
    tokens: TokenData,
    #[serde(default)]
    message: Option<String>,
}

/// anonymous → logging-in → authenticated | anonymous(error);
/// authenticated → logging-out → anonymous.
pub struct Auth<'a> {
    ctx: &'a Context,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    // POST <base>/auth/login
    pub async fn login(&self, data: &LoginData) -> Result<TokenData, ApiError> {
        let ctx = self.ctx;
        ctx.store.dispatch(Action::LoginRequest);

        let resp = match self.request_login(data).await {
            Ok(resp) => resp,
            Err(err) => {
                ctx.report(&err, Policy::Login);
                ctx.store.dispatch(Action::LoginFailure(err.to_string()));
                return Err(err);
            }
        };

        let tokens = resp.tokens;
        if let Err(err) = session::store_tokens(ctx.storage.as_ref(), &tokens) {
            session::clear_tokens(ctx.storage.as_ref()).ok();
            ctx.notifier.toast(Toast::new(err.to_string(), Severity::Error));
            ctx.store.dispatch(Action::LoginFailure(err.to_string()));
            return Err(err);
        }
        ctx.store.dispatch(Action::LoginSuccess(tokens.accesstoken.clone()));

        let welcome = resp
            .message
            .unwrap_or_else(|| format!("{} 님, 환영합니다", tokens.username));
        ctx.notifier.toast(Toast::new(welcome, Severity::Success));
        log::info!("로그인 성공: {}", tokens.username);
        ctx.navigator.replace(HOME_ROUTE);
        Ok(tokens)
    }

    async fn request_login(&self, data: &LoginData) -> Result<LoginResponse, ApiError> {
        let resp = self.ctx.http.post_json("auth/login", data).await?;
        Ok(resp.json().await?)
    }

    /// Drops the stored credentials. No server call.
    pub fn logout(&self) -> Result<(), ApiError> {
        let ctx = self.ctx;
        ctx.store.dispatch(Action::LogoutRequest);
        let cleared = session::clear_tokens(ctx.storage.as_ref());
        if let Err(e) = &cleared {
            log::error!("세션 정리 실패: {}", e);
        }
        ctx.store.dispatch(Action::LogoutSuccess);
        ctx.navigator.replace(HOME_ROUTE);
        cleared
    }

    // POST <base>/auth/signup
    pub async fn register(&self, data: &SignUpData) -> Result<(), ApiError> {
        let ctx = self.ctx;
        let body = match self.request_register(data).await {
            Ok(body) => body,
            Err(err) => {
                ctx.report(&err, Policy::SignUp);
                return Err(err);
            }
        };
        let message = match &body {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("회원가입이 완료되었습니다")
                .to_string(),
            _ => "회원가입이 완료되었습니다".to_string(),
        };
        ctx.notifier.toast(Toast::new(message, Severity::Success));
        ctx.navigator.replace(HOME_ROUTE);
        Ok(())
    }

    async fn request_register(&self, data: &SignUpData) -> Result<Value, ApiError> {
        let resp = self.ctx.http.post_json("auth/signup", data).await?;
        read_json(resp).await
    }

    // GET <base>/auth/refresh
    /// Best effort: a new `accesstoken` in the body replaces the stored one.
    pub async fn refresh(&self) -> Result<Value, ApiError> {
        let ctx = self.ctx;
        match self.request_refresh().await {
            Ok(body) => {
                if let Some(token) = body.get("accesstoken").and_then(Value::as_str) {
                    if let Err(err) = ctx.storage.set(JWT_ACCESS_TOKEN, token) {
                        log::warn!("재발급 토큰 저장 실패: {}", err);
                        ctx.store.dispatch(Action::LoginFailure(err.to_string()));
                        return Err(err);
                    }
                    ctx.store.dispatch(Action::LoginSuccess(token.to_string()));
                }
                Ok(body)
            }
            Err(err) => {
                log::warn!("토큰 재발급 실패: {}", err);
                ctx.store.dispatch(Action::LoginFailure(err.to_string()));
                Err(err)
            }
        }
    }

    async fn request_refresh(&self) -> Result<Value, ApiError> {
        let http = &self.ctx.http;
        let resp = match self.ctx.storage.get(JWT_REFRESH_TOKEN) {
            Some(refresh) => http.get_with_bearer("auth/refresh", &refresh).await?,
            None => http.get("auth/refresh").await?,
        };
        read_json(resp).await
    }
}
