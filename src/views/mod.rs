//! View-models: state and event translation for each screen, no rendering.

pub mod folder_tab;
pub mod login;
pub mod menu;
pub mod preview;
pub mod search;

pub use folder_tab::FolderTabButton;
pub use login::LoginForm;
pub use menu::{AppMenu, Panel};
pub use preview::{PhotoPreview, Preview};
pub use search::{SearchModal, SearchView, DOWNLOAD_FLASH};
