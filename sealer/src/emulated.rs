//! Deterministic stand-in for a real proving backend. Every operation is a
//! pure function of its typed inputs, derived through domain-separated
//! SHA3-256, so round trips verify and any input change fails verification.
//! No cryptographic soundness is claimed; this backend exists so the harness
//! can exercise and time the orchestration layer end to end.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use sha2::digest::Digest as _;
use sha2::Sha256;
use sha3::{Digest, Sha3_256};

use primitives::{
    ActorId, BenchError, Challenge, Commit1Output, Commitment, PieceInfo, PoStProof,
    PreCommit1Output, RegisteredPoStProof, RegisteredSealProof, Result, SealVerifyInfo,
    SectorCids, SectorId, SectorInfo, Seed, Ticket, UnpaddedPieceSize, WindowPoStVerifyInfo,
    WinningPoStVerifyInfo, WINNING_POST_SECTOR_COUNT,
};

use crate::{ProofVerifier, Sealer};

/// Groth16 PoSt/seal proofs are 192 bytes; emulated proofs match the width so
/// payload sizes stay realistic.
const PROOF_BYTES: usize = 192;

/// Width of the opaque intermediate stage outputs.
const STAGE_OUTPUT_BYTES: usize = 96;

pub struct EmulatedSealer {
    root: PathBuf,
    seal_proof: RegisteredSealProof,
}

fn digest(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn expand(seed: [u8; 32], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut counter = 0u64;
    while out.len() < len {
        let block = digest("expand", &[&seed, &counter.to_le_bytes()]);
        out.extend_from_slice(&block[..block.len().min(len - out.len())]);
        counter += 1;
    }
    out
}

fn sector_bytes(sector: SectorId) -> [u8; 16] {
    let mut raw = [0u8; 16];
    raw[..8].copy_from_slice(&sector.miner.0.to_le_bytes());
    raw[8..].copy_from_slice(&sector.number.to_le_bytes());
    raw
}

fn post_tag(proof: RegisteredPoStProof) -> [u8; 8] {
    i64::from(proof).to_le_bytes()
}

/// One partition proof binding (proof type, prover, challenge, sectors).
fn partition_proof(
    tag: &str,
    post_proof: RegisteredPoStProof,
    prover: ActorId,
    challenge: &Challenge,
    sectors: &[SectorInfo],
) -> PoStProof {
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    hasher.update(post_tag(post_proof));
    hasher.update(prover.0.to_le_bytes());
    hasher.update(challenge.as_bytes());
    for sector in sectors {
        hasher.update(i64::from(sector.seal_proof).to_le_bytes());
        hasher.update(sector.sector_number.to_le_bytes());
        hasher.update(sector.sealed_cid.as_ref());
    }
    PoStProof {
        post_proof,
        proof_bytes: expand(hasher.finalize().into(), PROOF_BYTES),
    }
}

impl EmulatedSealer {
    pub fn new<P: Into<PathBuf>>(root: P, seal_proof: RegisteredSealProof) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("cache"))?;
        Ok(EmulatedSealer { root, seal_proof })
    }

    fn cache_dir(&self, sector: SectorId) -> PathBuf {
        self.root.join("cache").join(sector.to_string())
    }

    fn derive_commit1(&self, sector: SectorId, ticket: &Ticket, seed: &Seed, cids: &SectorCids) -> Commit1Output {
        let seed32 = digest(
            "commit1",
            &[
                &sector_bytes(sector),
                ticket.as_ref(),
                seed.as_ref(),
                cids.sealed.as_ref(),
                cids.unsealed.as_ref(),
            ],
        );
        Commit1Output(expand(seed32, STAGE_OUTPUT_BYTES))
    }

    fn derive_seal_proof(&self, sector: SectorId, c1: &Commit1Output) -> Vec<u8> {
        expand(digest("commit2", &[&sector_bytes(sector), &c1.0]), PROOF_BYTES)
    }
}

impl Sealer for EmulatedSealer {
    fn seal_proof_type(&self) -> RegisteredSealProof {
        self.seal_proof
    }

    fn add_piece(
        &self,
        sector: SectorId,
        existing: &[PieceInfo],
        size: UnpaddedPieceSize,
        data: &mut dyn Read,
    ) -> Result<PieceInfo> {
        let mut hasher = Sha3_256::new();
        hasher.update(b"piece");
        hasher.update(sector_bytes(sector));
        for piece in existing {
            hasher.update(piece.commitment.as_ref());
        }

        let mut limited = data.take(size.0);
        let copied = io::copy(&mut limited, &mut HashWriter(&mut hasher))?;
        if copied != size.0 {
            return Err(BenchError::Proof(format!(
                "piece data for {sector} ended after {copied} of {} bytes",
                size.0
            )));
        }

        Ok(PieceInfo {
            size,
            commitment: Commitment(hasher.finalize().into()),
        })
    }

    fn seal_pre_commit1(
        &self,
        sector: SectorId,
        ticket: &Ticket,
        pieces: &[PieceInfo],
    ) -> Result<PreCommit1Output> {
        if pieces.is_empty() {
            return Err(BenchError::Proof(format!("no pieces staged for {sector}")));
        }
        let mut hasher = Sha3_256::new();
        hasher.update(b"precommit1");
        hasher.update(sector_bytes(sector));
        hasher.update(ticket.as_ref());
        for piece in pieces {
            hasher.update(piece.size.0.to_le_bytes());
            hasher.update(piece.commitment.as_ref());
        }
        Ok(PreCommit1Output(expand(
            hasher.finalize().into(),
            STAGE_OUTPUT_BYTES,
        )))
    }

    fn seal_pre_commit2(&self, sector: SectorId, pc1: &PreCommit1Output) -> Result<SectorCids> {
        let comm_c = digest("comm-c", &[&pc1.0]);
        let comm_r_last = digest("comm-r-last", &[&pc1.0]);
        let comm_d = digest("comm-d", &[&pc1.0]);

        // CommR = SHA-256(CommC || CommRLast), the layout the aux-file
        // recomputation utility audits.
        let mut sha = Sha256::new();
        sha.update(comm_c);
        sha.update(comm_r_last);
        let comm_r: [u8; 32] = sha.finalize().into();

        let cache = self.cache_dir(sector);
        fs::create_dir_all(&cache)?;
        let mut aux = fs::File::create(cache.join("p_aux"))?;
        aux.write_all(&comm_c)?;
        aux.write_all(&comm_r_last)?;

        Ok(SectorCids {
            sealed: Commitment(comm_r),
            unsealed: Commitment(comm_d),
        })
    }

    fn seal_commit1(
        &self,
        sector: SectorId,
        ticket: &Ticket,
        seed: &Seed,
        pieces: &[PieceInfo],
        cids: &SectorCids,
    ) -> Result<Commit1Output> {
        if pieces.is_empty() {
            return Err(BenchError::Proof(format!("no pieces staged for {sector}")));
        }
        if cids.sealed.is_zero() {
            return Err(BenchError::Proof(format!(
                "sealed commitment for {sector} is not populated"
            )));
        }
        Ok(self.derive_commit1(sector, ticket, seed, cids))
    }

    fn seal_commit2(&self, sector: SectorId, c1: &Commit1Output) -> Result<Vec<u8>> {
        Ok(self.derive_seal_proof(sector, c1))
    }

    fn generate_window_post(
        &self,
        prover: ActorId,
        sectors: &[SectorInfo],
        challenge: &Challenge,
    ) -> Result<(Vec<PoStProof>, Vec<SectorId>)> {
        if sectors.is_empty() {
            return Err(BenchError::Proof("no sectors challenged".to_string()));
        }
        let post_proof = self.seal_proof.registered_window_post_proof();
        let width = post_proof.partition_sectors() as usize;
        let proofs = sectors
            .chunks(width)
            .map(|partition| partition_proof("window", post_proof, prover, challenge, partition))
            .collect();
        Ok((proofs, Vec::new()))
    }

    fn generate_winning_post(
        &self,
        prover: ActorId,
        candidates: &[SectorInfo],
        challenge: &Challenge,
    ) -> Result<Vec<PoStProof>> {
        if candidates.is_empty() {
            return Err(BenchError::Proof("no candidate sectors".to_string()));
        }
        let post_proof = self.seal_proof.registered_winning_post_proof();
        Ok(vec![partition_proof(
            "winning", post_proof, prover, challenge, candidates,
        )])
    }
}

impl ProofVerifier for EmulatedSealer {
    fn verify_seal(&self, info: &SealVerifyInfo) -> Result<bool> {
        if info.seal_proof != self.seal_proof {
            return Ok(false);
        }
        let cids = SectorCids {
            sealed: info.sealed_cid,
            unsealed: info.unsealed_cid,
        };
        let c1 = self.derive_commit1(info.sector, &info.ticket, &info.seed, &cids);
        Ok(self.derive_seal_proof(info.sector, &c1) == info.proof)
    }

    fn verify_window_post(&self, info: &WindowPoStVerifyInfo) -> Result<bool> {
        let post_proof = self.seal_proof.registered_window_post_proof();
        let width = post_proof.partition_sectors() as usize;
        let expected: Vec<PoStProof> = info
            .challenged_sectors
            .chunks(width)
            .map(|partition| {
                partition_proof("window", post_proof, info.prover, &info.randomness, partition)
            })
            .collect();
        Ok(expected == info.proofs)
    }

    fn verify_winning_post(&self, info: &WinningPoStVerifyInfo) -> Result<bool> {
        let post_proof = self.seal_proof.registered_winning_post_proof();
        let expected = vec![partition_proof(
            "winning",
            post_proof,
            info.prover,
            &info.randomness,
            &info.challenged_sectors,
        )];
        Ok(expected == info.proofs)
    }

    fn generate_winning_post_sector_challenge(
        &self,
        proof: RegisteredPoStProof,
        prover: ActorId,
        challenge: &Challenge,
        eligible_count: u64,
    ) -> Result<Vec<u64>> {
        if eligible_count == 0 {
            return Err(BenchError::Proof(
                "no eligible sectors for winning post challenge".to_string(),
            ));
        }
        let count = WINNING_POST_SECTOR_COUNT.min(eligible_count);
        let indices = (0..count)
            .map(|i| {
                let d = digest(
                    "winning-sector-challenge",
                    &[
                        &post_tag(proof),
                        &prover.0.to_le_bytes(),
                        challenge.as_bytes(),
                        &i.to_le_bytes(),
                    ],
                );
                let mut word = [0u8; 8];
                word.copy_from_slice(&d[..8]);
                u64::from_le_bytes(word) % eligible_count
            })
            .collect();
        Ok(indices)
    }
}

/// io::Write adapter feeding copied bytes straight into the digest.
struct HashWriter<'a>(&'a mut Sha3_256);

impl Write for HashWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
