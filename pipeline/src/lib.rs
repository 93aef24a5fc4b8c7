//! Orchestration of the sealing pipeline: piece staging, the worker-pool
//! scheduler, the strict per-sector stage sequence, and per-stage timing
//! collection.

pub mod pieces;
pub mod scheduler;
pub mod sealing;
pub mod timings;

pub use pieces::PieceSource;
pub use scheduler::{run_seals, SealRunReport};
pub use sealing::{seal_sector, SealedSector};
pub use timings::{stage_totals, SealTiming, StageTotals};
