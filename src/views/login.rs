use crate::api::Api;
use crate::error::ApiError;
use crate::types::{LoginData, TokenData};

/// The login form's fields. The server expects the email as `username`.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn login_data(&self) -> LoginData {
        LoginData {
            username: self.email.clone(),
            password: self.password.clone(),
        }
    }

    pub async fn submit(&self, api: &Api) -> Result<TokenData, ApiError> {
        api.auth().login(&self.login_data()).await
    }
}
