//! The sealer capability contract: every cryptographic operation the
//! benchmarking flows depend on, behind two traits so a real proving backend
//! and the built-in deterministic emulation are interchangeable.

use std::io::Read;

use primitives::{
    ActorId, Challenge, Commit1Output, PieceInfo, PoStProof, PreCommit1Output,
    RegisteredPoStProof, RegisteredSealProof, Result, SealVerifyInfo, SectorCids, SectorId,
    SectorInfo, Seed, Ticket, UnpaddedPieceSize, WindowPoStVerifyInfo, WinningPoStVerifyInfo,
};

mod emulated;

pub use emulated::EmulatedSealer;

/// Piece ingestion, the four sealing stages, and PoSt generation.
///
/// Every method is potentially long-running and blocking; callers bound
/// concurrency themselves (one call per worker, never one per sector).
pub trait Sealer: Send + Sync {
    fn seal_proof_type(&self) -> RegisteredSealProof;

    /// Ingests piece data for a sector, producing its piece commitment.
    /// Exactly `size` bytes are consumed from `data`.
    fn add_piece(
        &self,
        sector: SectorId,
        existing: &[PieceInfo],
        size: UnpaddedPieceSize,
        data: &mut dyn Read,
    ) -> Result<PieceInfo>;

    fn seal_pre_commit1(
        &self,
        sector: SectorId,
        ticket: &Ticket,
        pieces: &[PieceInfo],
    ) -> Result<PreCommit1Output>;

    fn seal_pre_commit2(&self, sector: SectorId, pc1: &PreCommit1Output) -> Result<SectorCids>;

    fn seal_commit1(
        &self,
        sector: SectorId,
        ticket: &Ticket,
        seed: &Seed,
        pieces: &[PieceInfo],
        cids: &SectorCids,
    ) -> Result<Commit1Output>;

    /// Produces the final seal proof bytes from the Commit1 output.
    fn seal_commit2(&self, sector: SectorId, c1: &Commit1Output) -> Result<Vec<u8>>;

    /// Proves the full challenged sector set; one proof per partition.
    /// The second return value lists sectors the backend had to skip.
    fn generate_window_post(
        &self,
        prover: ActorId,
        sectors: &[SectorInfo],
        challenge: &Challenge,
    ) -> Result<(Vec<PoStProof>, Vec<SectorId>)>;

    /// Proves exactly the given candidate set.
    fn generate_winning_post(
        &self,
        prover: ActorId,
        candidates: &[SectorInfo],
        challenge: &Challenge,
    ) -> Result<Vec<PoStProof>>;
}

/// Verification half of the capability, plus deterministic winning-PoSt
/// candidate selection.
pub trait ProofVerifier: Send + Sync {
    fn verify_seal(&self, info: &SealVerifyInfo) -> Result<bool>;

    fn verify_window_post(&self, info: &WindowPoStVerifyInfo) -> Result<bool>;

    fn verify_winning_post(&self, info: &WinningPoStVerifyInfo) -> Result<bool>;

    /// Selects which of `eligible_count` sectors are challenged for winning
    /// PoSt. A pure function of the four inputs: identical inputs always
    /// yield identical indices in identical order.
    fn generate_winning_post_sector_challenge(
        &self,
        proof: RegisteredPoStProof,
        prover: ActorId,
        challenge: &Challenge,
        eligible_count: u64,
    ) -> Result<Vec<u64>>;
}
