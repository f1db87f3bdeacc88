mod filesystem;
mod memory;
mod storage;
mod store;

pub use filesystem::{FileBackend, STORAGE_FILE_NAME};
pub use memory::MemoryBackend;
pub use storage::{SessionBackend, StoreSnapshot, SNAPSHOT_VERSION};
pub use store::SessionStore;
