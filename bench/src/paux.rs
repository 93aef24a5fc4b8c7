use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use primitives::Result;

/// The two auxiliary sub-commitments of a sealed replica plus the recomputed
/// top-level commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxCommitments {
    pub comm_c: [u8; 32],
    pub comm_r_last: [u8; 32],
    pub comm_r: [u8; 32],
}

/// Reads CommC and CommRLast from an auxiliary file (two consecutive 32-byte
/// fields, no header) and recomputes CommR = SHA-256(CommC || CommRLast) for
/// comparison against the sector's recorded replica commitment.
pub fn recompute_comm_r(path: &Path) -> Result<AuxCommitments> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut comm_c = [0u8; 32];
    reader.read_exact(&mut comm_c)?;
    let mut comm_r_last = [0u8; 32];
    reader.read_exact(&mut comm_r_last)?;

    let mut hasher = Sha256::new();
    hasher.update(comm_c);
    hasher.update(comm_r_last);

    Ok(AuxCommitments {
        comm_c,
        comm_r_last,
        comm_r: hasher.finalize().into(),
    })
}
