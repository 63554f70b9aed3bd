pub mod repository;
pub mod storage;
pub mod types;

pub use repository::{MatchDraft, MatchHistoryStore, PlayerDirectory, Repository, TeamGenerationStore};
pub use storage::{get_database_path, load_database, save_database};
pub use types::{Database, TeamGeneration};
