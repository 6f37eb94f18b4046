// Game engine modules

pub mod answer;
pub mod board;
pub mod events;
pub mod graph;
pub mod holders;
pub mod progress;
pub mod scorer;
pub mod session;
pub mod solver;

pub use answer::{AnswerTracker, Rejection};
pub use board::{BoardState, OpenTile};
pub use graph::{DependencyGraph, Mode, OverlapTolerance};
pub use holders::{HeldTile, LetterHolders, Slot};
pub use progress::{JsonFileStore, MemoryStore, ProgressStore};
pub use scorer::{ScoreKeeper, Scorer};
pub use session::{GameSession, LevelSummary, PendingMove, SessionSettings, SubmitOutcome};
pub use solver::{Solution, WordSolver};
