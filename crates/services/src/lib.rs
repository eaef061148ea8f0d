#![forbid(unsafe_code)]

pub mod error;
pub mod import;
pub mod shortcuts;
pub mod store;

pub use quiz_core::Clock;

pub use error::{ImportError, LoadError};
pub use shortcuts::{Key, KeyEvent, ShortcutAction, handle_key};
pub use store::{ImportSummary, QuestionStore};
