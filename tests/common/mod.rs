#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use drive_client::config::ClientConfig;
use drive_client::error::ApiError;
use drive_client::http::HttpClient;
use drive_client::nav::RecordingNavigator;
use drive_client::notify::{Notifier, Toast};
use drive_client::session::{MemoryStorage, SessionStorage};
use drive_client::store::Store;
use drive_client::api::{Api, Context};

/// Shared event log so tests can check the order of side effects.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct JournalStorage {
    inner: MemoryStorage,
    journal: Journal,
    read_only: AtomicBool,
}

impl JournalStorage {
    /// Every later `set` fails, as a full disk would.
    pub fn make_read_only(&self) {
        self.read_only.store(true, Ordering::SeqCst);
    }
}

impl SessionStorage for JournalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.journal.push(format!("set {}", key));
        if self.read_only.load(Ordering::SeqCst) {
            return Err(ApiError::Storage(format!("read-only: {}", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.journal.push(format!("remove {}", key));
        self.inner.remove(key)
    }
}

pub struct JournalNotifier {
    toasts: Mutex<Vec<Toast>>,
    journal: Journal,
}

impl JournalNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Notifier for JournalNotifier {
    fn toast(&self, toast: Toast) {
        self.journal.push(format!("toast {}", toast.severity));
        self.toasts.lock().unwrap().push(toast);
    }
}

pub struct Harness {
    pub api: Api,
    pub storage: Arc<JournalStorage>,
    pub notifier: Arc<JournalNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub journal: Journal,
}

impl Harness {
    pub fn new(base_url: &str) -> Self {
        let journal = Journal::default();
        let storage = Arc::new(JournalStorage {
            inner: MemoryStorage::new(),
            journal: journal.clone(),
            read_only: AtomicBool::new(false),
        });
        let notifier = Arc::new(JournalNotifier {
            toasts: Mutex::new(Vec::new()),
            journal: journal.clone(),
        });
        let navigator = Arc::new(RecordingNavigator::new());
        let config = ClientConfig {
            api_base: base_url.to_string(),
            ..ClientConfig::default()
        };
        let http = HttpClient::new(&config, storage.clone()).expect("http client");
        let api = Api::new(Context {
            http,
            store: Store::new(),
            storage: storage.clone(),
            notifier: notifier.clone(),
            navigator: navigator.clone(),
        });
        Self {
            api,
            storage,
            notifier,
            navigator,
            journal,
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.notifier.toasts()
    }
}
