use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task;
use tracing::debug;

use primitives::{
    derive_ticket, ActorId, BenchError, ParCfg, PieceInfo, Result, SectorId, SectorInfo,
    SectorNumber, SectorSize, INTERACTIVE_SEAL_SEED,
};
use sealer::{ProofVerifier, Sealer};

use crate::pieces::PieceSource;
use crate::sealing::{seal_sector, SealedSector};
use crate::timings::SealTiming;

/// Outcome of a full sealing run: one descriptor and one timing record per
/// sector, ordered by sector number 1..=n.
#[derive(Debug, Clone)]
pub struct SealRunReport {
    pub sectors: Vec<SectorInfo>,
    pub timings: Vec<SealTiming>,
}

/// Seals `num_sectors` sectors, fanning the work out over
/// `par.pre_commit1` workers.
///
/// Sector numbers 1..=n are partitioned into contiguous equal shards, one
/// blocking task per shard. Piece staging happens up front, sequentially,
/// with a deterministic per-sector data stream. Worker outcomes are fanned
/// in over a bounded channel sized to the worker count; every outcome is
/// drained and every task joined before the first error (if any) is
/// returned.
pub async fn run_seals<S>(
    sb: Arc<S>,
    num_sectors: u64,
    par: ParCfg,
    miner: ActorId,
    sector_size: SectorSize,
    ticket_preimage: &[u8],
    source: &PieceSource,
) -> Result<SealRunReport>
where
    S: Sealer + ProofVerifier + 'static,
{
    if num_sectors == 0 {
        return Err(BenchError::Config("num-sectors must be positive".to_string()));
    }
    let workers = par.pre_commit1;
    if workers == 0 || num_sectors % workers as u64 != 0 {
        return Err(BenchError::Config(
            "parallelism factor must cleanly divide num-sectors".to_string(),
        ));
    }

    let ticket = derive_ticket(ticket_preimage);
    let seed = INTERACTIVE_SEAL_SEED;

    let mut pieces: Vec<(SectorNumber, PieceInfo, Duration)> =
        Vec::with_capacity(num_sectors as usize);
    for number in 1..=num_sectors {
        let sector = SectorId { miner, number };
        let started = Instant::now();
        let mut reader = source.reader_for(number)?;
        let piece = sb.add_piece(sector, &[], sector_size.unpadded(), reader.as_mut())?;
        debug!("[{}] staged piece {}", number, piece.commitment);
        pieces.push((number, piece, started.elapsed()));
    }

    let per_worker = (num_sectors / workers as u64) as usize;
    let (tx, mut rx) = mpsc::channel::<Result<Vec<SealedSector>>>(workers);
    let mut handles = Vec::with_capacity(workers);

    for wid in 0..workers {
        let tx = tx.clone();
        let sb = Arc::clone(&sb);
        let shard: Vec<(SectorNumber, PieceInfo, Duration)> =
            pieces[wid * per_worker..(wid + 1) * per_worker].to_vec();

        handles.push(task::spawn_blocking(move || {
            let outcome = shard.into_iter().try_fold(
                Vec::with_capacity(per_worker),
                |mut sealed, (number, piece, add_piece)| {
                    let sector = SectorId { miner, number };
                    sealed.push(seal_sector(sb.as_ref(), sector, piece, add_piece, &ticket, &seed)?);
                    Ok(sealed)
                },
            );
            // Capacity equals the worker count, so this never blocks.
            let _ = tx.blocking_send(outcome);
        }));
    }
    drop(tx);

    let mut first_err: Option<BenchError> = None;
    let mut sealed: Vec<SealedSector> = Vec::with_capacity(num_sectors as usize);
    while let Some(outcome) = rx.recv().await {
        match outcome {
            Ok(batch) => sealed.extend(batch),
            Err(err) => {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| BenchError::Worker(e.to_string()))?;
    }
    if let Some(err) = first_err {
        return Err(err);
    }

    assemble(sealed, num_sectors)
}

/// Orders worker output by sector number and checks the set is exactly
/// 1..=n before handing it to the PoSt flows.
fn assemble(mut sealed: Vec<SealedSector>, num_sectors: u64) -> Result<SealRunReport> {
    sealed.sort_by_key(|s| s.info.sector_number);
    if sealed.len() as u64 != num_sectors {
        return Err(BenchError::Worker(format!(
            "expected {num_sectors} sealed sectors, workers produced {}",
            sealed.len()
        )));
    }
    for (i, s) in sealed.iter().enumerate() {
        let expected = i as u64 + 1;
        if s.info.sector_number != expected {
            return Err(BenchError::Worker(format!(
                "missing output for sector {expected}"
            )));
        }
    }
    let (sectors, timings) = sealed.into_iter().map(|s| (s.info, s.timing)).unzip();
    Ok(SealRunReport { sectors, timings })
}
