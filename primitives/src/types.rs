use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BenchError;
use crate::proofs::{RegisteredPoStProof, RegisteredSealProof};

pub type SectorNumber = u64;

/// Resolved numeric actor id of the miner, constant for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorId {
    pub miner: ActorId,
    pub number: SectorNumber,
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s-t0{}-{}", self.miner.0, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorSize(pub u64);

impl SectorSize {
    /// Usable piece size after padding overhead (127/128 of the padded size).
    pub fn unpadded(self) -> UnpaddedPieceSize {
        UnpaddedPieceSize(self.0 - self.0 / 128)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaddedPieceSize(pub u64);

/// 32-byte commitment digest, rendered as lowercase hex on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "hex")] pub [u8; 32]);

impl Commitment {
    pub fn from_hex(s: &str) -> Result<Self, BenchError> {
        let mut raw = [0u8; 32];
        hex::decode_to_slice(s, &mut raw)
            .map_err(|e| BenchError::Config(format!("invalid commitment {s:?}: {e}")))?;
        Ok(Commitment(raw))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(self.0))
    }
}

/// Commitment + unpadded size for data added to a sector; produced once per
/// sector before sealing begins and immutable afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceInfo {
    pub size: UnpaddedPieceSize,
    pub commitment: Commitment,
}

/// Sealing randomness derived from the caller-supplied preimage. The same
/// ticket is reused for every sector in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(pub [u8; 32]);

impl AsRef<[u8]> for Ticket {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Interactive randomness introduced at commit time. A fixed literal in this
/// harness, not epoch-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub [u8; 32]);

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// PoSt challenge randomness. Construction is the single place the 32-byte
/// rule is enforced, so every flow rejects bad lengths identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge([u8; 32]);

impl Challenge {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BenchError> {
        if bytes.len() != Self::LEN {
            return Err(BenchError::ChallengeLength(bytes.len()));
        }
        let mut raw = [0u8; 32];
        raw.copy_from_slice(bytes);
        Ok(Challenge(raw))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sealed/unsealed commitment pair produced by PreCommit2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorCids {
    pub sealed: Commitment,
    pub unsealed: Commitment,
}

/// Opaque PreCommit1 output: commitment-to-data plus intermediate labeling
/// data, fed unchanged into PreCommit2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreCommit1Output(pub Vec<u8>);

/// Opaque Commit1 output, fed unchanged into Commit2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit1Output(pub Vec<u8>);

/// Externally-visible descriptor of a sealed sector; the unit the PoSt flows
/// consume. Wire field names are fixed by the command payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorInfo {
    #[serde(rename = "SealProof")]
    pub seal_proof: RegisteredSealProof,
    #[serde(rename = "SectorNumber")]
    pub sector_number: SectorNumber,
    #[serde(rename = "SealedCID")]
    pub sealed_cid: Commitment,
}

/// Opaque proof payload tagged with its proof type. Proof bytes travel as
/// base64 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoStProof {
    #[serde(rename = "PoStProof")]
    pub post_proof: RegisteredPoStProof,
    #[serde(rename = "ProofBytes", with = "proof_bytes")]
    pub proof_bytes: Vec<u8>,
}

mod proof_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Worker counts per sealing stage. Only `pre_commit1` drives partitioning
/// today; the other counts are reserved degrees of parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParCfg {
    pub pre_commit1: usize,
    pub pre_commit2: usize,
    pub commit: usize,
}

impl Default for ParCfg {
    fn default() -> Self {
        ParCfg {
            pre_commit1: 1,
            pre_commit2: 1,
            commit: 1,
        }
    }
}

/// Everything the capability needs to check one seal proof.
#[derive(Debug, Clone)]
pub struct SealVerifyInfo {
    pub sector: SectorId,
    pub seal_proof: RegisteredSealProof,
    pub sealed_cid: Commitment,
    pub unsealed_cid: Commitment,
    pub proof: Vec<u8>,
    pub ticket: Ticket,
    pub seed: Seed,
}

#[derive(Debug, Clone)]
pub struct WindowPoStVerifyInfo {
    pub randomness: Challenge,
    pub proofs: Vec<PoStProof>,
    pub challenged_sectors: Vec<SectorInfo>,
    pub prover: ActorId,
}

#[derive(Debug, Clone)]
pub struct WinningPoStVerifyInfo {
    pub randomness: Challenge,
    pub proofs: Vec<PoStProof>,
    pub challenged_sectors: Vec<SectorInfo>,
    pub prover: ActorId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_rejects_bad_lengths() {
        for len in [0usize, 31, 33] {
            let err = Challenge::from_bytes(&vec![7u8; len]).unwrap_err();
            match err {
                BenchError::ChallengeLength(got) => assert_eq!(got, len),
                other => panic!("unexpected error: {other}"),
            }
        }
        assert!(Challenge::from_bytes(&[7u8; 32]).is_ok());
    }

    #[test]
    fn unpadded_size_drops_one_128th() {
        assert_eq!(SectorSize(2048).unpadded(), UnpaddedPieceSize(2032));
        assert_eq!(SectorSize(512 << 20).unpadded(), UnpaddedPieceSize(508 << 20));
    }

    #[test]
    fn sector_info_wire_names() {
        let info = SectorInfo {
            seal_proof: RegisteredSealProof::StackedDrg512MiBV1,
            sector_number: 1,
            sealed_cid: Commitment([0xab; 32]),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(
            json,
            format!(
                "{{\"SealProof\":2,\"SectorNumber\":1,\"SealedCID\":\"{}\"}}",
                "ab".repeat(32)
            )
        );
        let back: SectorInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn post_proof_wire_format_is_base64() {
        let proof = PoStProof {
            post_proof: RegisteredPoStProof::StackedDrgWindow512MiBV1,
            proof_bytes: vec![1, 2, 3, 4],
        };
        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(json, "{\"PoStProof\":7,\"ProofBytes\":\"AQIDBA==\"}");
        let back: PoStProof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn commitment_hex_round_trip() {
        let c = Commitment([0x5a; 32]);
        let s = c.to_string();
        assert_eq!(s.len(), 64);
        assert_eq!(Commitment::from_hex(&s).unwrap(), c);
        assert!(Commitment::from_hex("zz").is_err());
        assert!(Commitment::from_hex(&"ab".repeat(31)).is_err());
    }
}
