use tracing::warn;

use primitives::{
    ActorId, Challenge, PoStProof, Result, SectorId, SectorInfo, WindowPoStVerifyInfo,
};
use sealer::{ProofVerifier, Sealer};

/// Proofs plus the sectors the backend had to skip. The skipped list is part
/// of the result, never silently dropped.
#[derive(Debug, Clone)]
pub struct WindowPoStOutput {
    pub proofs: Vec<PoStProof>,
    pub skipped: Vec<SectorId>,
}

/// Generates a window PoSt over the full sealed sector set. No sampling:
/// every sector is challenged.
pub fn generate_window_post<S: Sealer + ?Sized>(
    sb: &S,
    prover: ActorId,
    sectors: &[SectorInfo],
    challenge: &Challenge,
) -> Result<WindowPoStOutput> {
    let (proofs, skipped) = sb.generate_window_post(prover, sectors, challenge)?;
    if !skipped.is_empty() {
        warn!("window post skipped {} faulty sector(s)", skipped.len());
    }
    Ok(WindowPoStOutput { proofs, skipped })
}

/// Verifies a window PoSt against the full sector set it was generated over.
pub fn verify_window_post<V: ProofVerifier + ?Sized>(
    verifier: &V,
    prover: ActorId,
    sectors: &[SectorInfo],
    challenge: &Challenge,
    proofs: &[PoStProof],
) -> Result<bool> {
    verifier.verify_window_post(&WindowPoStVerifyInfo {
        randomness: *challenge,
        proofs: proofs.to_vec(),
        challenged_sectors: sectors.to_vec(),
        prover,
    })
}

#[cfg(test)]
mod tests {
    use sealer::EmulatedSealer;

    use crate::testutil::{sealed_set, MINER, SPT};

    use super::*;

    #[test]
    fn window_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let sectors = sealed_set(&sb, 4);
        let challenge = Challenge::from_bytes(&[0x11; 32]).unwrap();

        let out = generate_window_post(&sb, MINER, &sectors, &challenge).unwrap();
        assert!(out.skipped.is_empty());
        assert!(verify_window_post(&sb, MINER, &sectors, &challenge, &out.proofs).unwrap());
    }

    #[test]
    fn window_verify_rejects_wrong_sector_set() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let sectors = sealed_set(&sb, 4);
        let challenge = Challenge::from_bytes(&[0x11; 32]).unwrap();

        let out = generate_window_post(&sb, MINER, &sectors, &challenge).unwrap();
        let subset = &sectors[..2];
        assert!(!verify_window_post(&sb, MINER, subset, &challenge, &out.proofs).unwrap());
    }

    #[test]
    fn empty_sector_set_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let challenge = Challenge::from_bytes(&[0x11; 32]).unwrap();
        assert!(generate_window_post(&sb, MINER, &[], &challenge).is_err());
    }
}
