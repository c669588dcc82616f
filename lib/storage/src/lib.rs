pub mod builder;
pub mod layout;
pub mod npy;
pub mod sqlite;

pub use builder::{CorpusKind, IndexBuilder, DEFAULT_MIN_LEN, SENTENCE_BANK_FILE};
pub use layout::{IndexFiles, LEGACY_VECTORS_FILE, META_FILE, VECTORS_FILE};
pub use sqlite::SqliteStore;
