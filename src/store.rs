use serde_json::Value;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    LoggingIn,
    Authenticated,
    LoggingOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub token: String,
    pub error_message: String,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            phase: AuthPhase::Anonymous,
            token: String::new(),
            error_message: String::new(),
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, AuthPhase::LoggingIn | AuthPhase::LoggingOut)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileState {
    /// Last response body, as received.
    pub data: Value,
    /// Upload progress in percent.
    pub progress: u8,
    pub last_download: Option<DownloadRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRecord {
    pub file_id: u64,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub file: FileState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoginRequest,
    LoginSuccess(String),
    LoginFailure(String),
    LogoutRequest,
    LogoutSuccess,
    FileSuccess(Value),
    FileProgress(u8),
    DownloadSuccess { file_id: u64, size: usize },
}

pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::LoginRequest => {
            state.auth.phase = AuthPhase::LoggingIn;
            state.auth.error_message.clear();
        }
        Action::LoginSuccess(token) => {
            state.auth.phase = AuthPhase::Authenticated;
            state.auth.token = token;
            state.auth.error_message.clear();
        }
        Action::LoginFailure(message) => {
            state.auth.phase = AuthPhase::Anonymous;
            state.auth.token.clear();
            state.auth.error_message = message;
        }
        Action::LogoutRequest => {
            state.auth.phase = AuthPhase::LoggingOut;
        }
        Action::LogoutSuccess => {
            state.auth = AuthState::default();
        }
        Action::FileSuccess(data) => {
            state.file.data = data;
        }
        Action::FileProgress(percent) => {
            state.file.progress = percent.min(100);
        }
        Action::DownloadSuccess { file_id, size } => {
            state.file.last_download = Some(DownloadRecord { file_id, size });
        }
    }
}

/// Application state container. Clones share the same state.
#[derive(Clone)]
pub struct Store {
    tx: watch::Sender<AppState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AppState::default());
        Self { tx }
    }

    pub fn dispatch(&self, action: Action) {
        log::trace!("dispatch {:?}", action);
        self.tx.send_modify(|state| reduce(state, action));
    }

    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}
