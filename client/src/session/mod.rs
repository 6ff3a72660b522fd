pub mod state;
pub mod storage;
pub mod store;

pub use self::state::{Session, SessionState};
pub use self::storage::{
    FileStorage, MemoryStorage, REFRESH_TOKEN_KEY, StorageError, TOKEN_KEY, TokenStorage,
};
pub use self::store::{LoginOutcome, SessionStore};
