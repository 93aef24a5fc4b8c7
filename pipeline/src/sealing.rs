use std::time::{Duration, Instant};

use tracing::{info, warn};

use primitives::{
    PieceInfo, Result, SealVerifyInfo, SectorId, SectorInfo, Seed, Ticket,
};
use sealer::{ProofVerifier, Sealer};

use crate::timings::SealTiming;

/// One sealed sector: its externally-visible descriptor plus stage timings.
#[derive(Debug, Clone)]
pub struct SealedSector {
    pub info: SectorInfo,
    pub timing: SealTiming,
}

/// Drives one sector through the strict stage sequence
/// PreCommit1 → PreCommit2 → Commit1 → Commit2 → Verify.
///
/// The piece was added before scheduling; its duration is carried in so the
/// timing record covers the whole lifecycle. The first failing stage aborts
/// the sector. The verification outcome is logged, not used to halt the run.
pub fn seal_sector<S>(
    sb: &S,
    sector: SectorId,
    piece: PieceInfo,
    add_piece: Duration,
    ticket: &Ticket,
    seed: &Seed,
) -> Result<SealedSector>
where
    S: Sealer + ProofVerifier + ?Sized,
{
    let pieces = [piece];

    info!("[{}] running replication (1)", sector.number);
    let started = Instant::now();
    let pc1 = sb.seal_pre_commit1(sector, ticket, &pieces)?;
    let pre_commit1 = started.elapsed();

    info!("[{}] running replication (2)", sector.number);
    let started = Instant::now();
    let cids = sb.seal_pre_commit2(sector, &pc1)?;
    let pre_commit2 = started.elapsed();

    let info = SectorInfo {
        seal_proof: sb.seal_proof_type(),
        sector_number: sector.number,
        sealed_cid: cids.sealed,
    };

    info!("[{}] generating proof of replication (1)", sector.number);
    let started = Instant::now();
    let c1 = sb.seal_commit1(sector, ticket, seed, &pieces, &cids)?;
    let commit1 = started.elapsed();

    info!("[{}] generating proof of replication (2)", sector.number);
    let started = Instant::now();
    let proof = sb.seal_commit2(sector, &c1)?;
    let commit2 = started.elapsed();

    let started = Instant::now();
    let ok = sb.verify_seal(&SealVerifyInfo {
        sector,
        seal_proof: info.seal_proof,
        sealed_cid: cids.sealed,
        unsealed_cid: cids.unsealed,
        proof,
        ticket: *ticket,
        seed: *seed,
    })?;
    let verify = started.elapsed();

    if ok {
        info!("[{}] seal proof verified", sector.number);
    } else {
        warn!("[{}] seal proof did NOT verify", sector.number);
    }

    Ok(SealedSector {
        info,
        timing: SealTiming {
            sector_number: sector.number,
            add_piece,
            pre_commit1,
            pre_commit2,
            commit1,
            commit2,
            verify,
        },
    })
}
