use tracing::debug;

use primitives::{
    ActorId, BenchError, Challenge, PoStProof, RegisteredPoStProof, Result, SectorInfo,
    WinningPoStVerifyInfo,
};
use sealer::{ProofVerifier, Sealer};

/// Maps the capability's challenge indices to sector descriptors. Selection
/// is a pure function of (proof type, prover, challenge, sector count), so
/// generate and verify recompute identical candidate sets.
pub fn select_candidates<V: ProofVerifier + ?Sized>(
    verifier: &V,
    post_proof: RegisteredPoStProof,
    prover: ActorId,
    challenge: &Challenge,
    sectors: &[SectorInfo],
) -> Result<Vec<SectorInfo>> {
    let indices = verifier.generate_winning_post_sector_challenge(
        post_proof,
        prover,
        challenge,
        sectors.len() as u64,
    )?;
    debug!("winning post challenged sector indices: {indices:?}");

    indices
        .into_iter()
        .map(|ix| {
            sectors
                .get(ix as usize)
                .copied()
                .ok_or_else(|| {
                    BenchError::Proof(format!(
                        "challenge index {ix} out of range for {} sectors",
                        sectors.len()
                    ))
                })
        })
        .collect()
}

/// Generates a winning PoSt over the challenge-selected candidate subset of
/// the sealed sector set.
pub fn generate_winning_post<S: Sealer + ProofVerifier + ?Sized>(
    sb: &S,
    post_proof: RegisteredPoStProof,
    prover: ActorId,
    sectors: &[SectorInfo],
    challenge: &Challenge,
) -> Result<Vec<PoStProof>> {
    let candidates = select_candidates(sb, post_proof, prover, challenge, sectors)?;
    sb.generate_winning_post(prover, &candidates, challenge)
}

/// Verifies a winning PoSt, recomputing the candidate set independently from
/// the same inputs used at generation time. A candidate set differing in
/// membership or order fails verification.
pub fn verify_winning_post<V: ProofVerifier + ?Sized>(
    verifier: &V,
    post_proof: RegisteredPoStProof,
    prover: ActorId,
    sectors: &[SectorInfo],
    challenge: &Challenge,
    proofs: &[PoStProof],
) -> Result<bool> {
    let candidates = select_candidates(verifier, post_proof, prover, challenge, sectors)?;
    verifier.verify_winning_post(&WinningPoStVerifyInfo {
        randomness: *challenge,
        proofs: proofs.to_vec(),
        challenged_sectors: candidates,
        prover,
    })
}

#[cfg(test)]
mod tests {
    use sealer::EmulatedSealer;

    use crate::testutil::{sealed_set, MINER, SPT};

    use super::*;

    #[test]
    fn candidate_selection_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let sectors = sealed_set(&sb, 6);
        let wpt = SPT.registered_winning_post_proof();
        let challenge = Challenge::from_bytes(&[0x22; 32]).unwrap();

        let a = select_candidates(&sb, wpt, MINER, &challenge, &sectors).unwrap();
        let b = select_candidates(&sb, wpt, MINER, &challenge, &sectors).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(a.iter().all(|c| sectors.contains(c)));
    }

    #[test]
    fn winning_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let sectors = sealed_set(&sb, 4);
        let wpt = SPT.registered_winning_post_proof();
        let challenge = Challenge::from_bytes(&[0x33; 32]).unwrap();

        let proofs = generate_winning_post(&sb, wpt, MINER, &sectors, &challenge).unwrap();
        assert!(verify_winning_post(&sb, wpt, MINER, &sectors, &challenge, &proofs).unwrap());
    }

    #[test]
    fn winning_verify_rejects_different_challenge() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let sectors = sealed_set(&sb, 4);
        let wpt = SPT.registered_winning_post_proof();
        let generated_with = Challenge::from_bytes(&[0x44; 32]).unwrap();
        let verified_with = Challenge::from_bytes(&[0x45; 32]).unwrap();

        let proofs = generate_winning_post(&sb, wpt, MINER, &sectors, &generated_with).unwrap();
        assert!(
            !verify_winning_post(&sb, wpt, MINER, &sectors, &verified_with, &proofs).unwrap()
        );
    }

    #[test]
    fn empty_sector_set_fails_selection() {
        let dir = tempfile::tempdir().unwrap();
        let sb = EmulatedSealer::new(dir.path(), SPT).unwrap();
        let wpt = SPT.registered_winning_post_proof();
        let challenge = Challenge::from_bytes(&[0x55; 32]).unwrap();
        assert!(select_candidates(&sb, wpt, MINER, &challenge, &[]).is_err());
    }
}
