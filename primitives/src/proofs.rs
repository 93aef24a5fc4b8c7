use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::types::SectorSize;

const SIZE_2_KIB: u64 = 2 << 10;
const SIZE_8_MIB: u64 = 8 << 20;
const SIZE_512_MIB: u64 = 512 << 20;
const SIZE_32_GIB: u64 = 32 << 30;
const SIZE_64_GIB: u64 = 64 << 30;

/// Number of sectors challenged by one winning-PoSt call.
pub const WINNING_POST_SECTOR_COUNT: u64 = 1;

/// Registered seal proof types, tagged with their on-chain integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum RegisteredSealProof {
    StackedDrg2KiBV1,
    StackedDrg8MiBV1,
    StackedDrg512MiBV1,
    StackedDrg32GiBV1,
    StackedDrg64GiBV1,
}

impl RegisteredSealProof {
    pub fn from_sector_size(size: SectorSize) -> Result<Self, BenchError> {
        match size.0 {
            SIZE_2_KIB => Ok(Self::StackedDrg2KiBV1),
            SIZE_8_MIB => Ok(Self::StackedDrg8MiBV1),
            SIZE_512_MIB => Ok(Self::StackedDrg512MiBV1),
            SIZE_32_GIB => Ok(Self::StackedDrg32GiBV1),
            SIZE_64_GIB => Ok(Self::StackedDrg64GiBV1),
            other => Err(BenchError::UnsupportedSectorSize(other)),
        }
    }

    pub fn sector_size(self) -> SectorSize {
        SectorSize(match self {
            Self::StackedDrg2KiBV1 => SIZE_2_KIB,
            Self::StackedDrg8MiBV1 => SIZE_8_MIB,
            Self::StackedDrg512MiBV1 => SIZE_512_MIB,
            Self::StackedDrg32GiBV1 => SIZE_32_GIB,
            Self::StackedDrg64GiBV1 => SIZE_64_GIB,
        })
    }

    pub fn registered_winning_post_proof(self) -> RegisteredPoStProof {
        match self {
            Self::StackedDrg2KiBV1 => RegisteredPoStProof::StackedDrgWinning2KiBV1,
            Self::StackedDrg8MiBV1 => RegisteredPoStProof::StackedDrgWinning8MiBV1,
            Self::StackedDrg512MiBV1 => RegisteredPoStProof::StackedDrgWinning512MiBV1,
            Self::StackedDrg32GiBV1 => RegisteredPoStProof::StackedDrgWinning32GiBV1,
            Self::StackedDrg64GiBV1 => RegisteredPoStProof::StackedDrgWinning64GiBV1,
        }
    }

    pub fn registered_window_post_proof(self) -> RegisteredPoStProof {
        match self {
            Self::StackedDrg2KiBV1 => RegisteredPoStProof::StackedDrgWindow2KiBV1,
            Self::StackedDrg8MiBV1 => RegisteredPoStProof::StackedDrgWindow8MiBV1,
            Self::StackedDrg512MiBV1 => RegisteredPoStProof::StackedDrgWindow512MiBV1,
            Self::StackedDrg32GiBV1 => RegisteredPoStProof::StackedDrgWindow32GiBV1,
            Self::StackedDrg64GiBV1 => RegisteredPoStProof::StackedDrgWindow64GiBV1,
        }
    }
}

impl From<RegisteredSealProof> for i64 {
    fn from(proof: RegisteredSealProof) -> i64 {
        match proof {
            RegisteredSealProof::StackedDrg2KiBV1 => 0,
            RegisteredSealProof::StackedDrg8MiBV1 => 1,
            RegisteredSealProof::StackedDrg512MiBV1 => 2,
            RegisteredSealProof::StackedDrg32GiBV1 => 3,
            RegisteredSealProof::StackedDrg64GiBV1 => 4,
        }
    }
}

impl TryFrom<i64> for RegisteredSealProof {
    type Error = BenchError;

    fn try_from(tag: i64) -> Result<Self, BenchError> {
        match tag {
            0 => Ok(Self::StackedDrg2KiBV1),
            1 => Ok(Self::StackedDrg8MiBV1),
            2 => Ok(Self::StackedDrg512MiBV1),
            3 => Ok(Self::StackedDrg32GiBV1),
            4 => Ok(Self::StackedDrg64GiBV1),
            other => Err(BenchError::Config(format!("unknown seal proof type {other}"))),
        }
    }
}

/// Registered PoSt proof types, winning and window families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum RegisteredPoStProof {
    StackedDrgWinning2KiBV1,
    StackedDrgWinning8MiBV1,
    StackedDrgWinning512MiBV1,
    StackedDrgWinning32GiBV1,
    StackedDrgWinning64GiBV1,
    StackedDrgWindow2KiBV1,
    StackedDrgWindow8MiBV1,
    StackedDrgWindow512MiBV1,
    StackedDrgWindow32GiBV1,
    StackedDrgWindow64GiBV1,
}

impl RegisteredPoStProof {
    pub fn winning_from_sector_size(size: SectorSize) -> Result<Self, BenchError> {
        match size.0 {
            SIZE_2_KIB => Ok(Self::StackedDrgWinning2KiBV1),
            SIZE_8_MIB => Ok(Self::StackedDrgWinning8MiBV1),
            SIZE_512_MIB => Ok(Self::StackedDrgWinning512MiBV1),
            SIZE_32_GIB => Ok(Self::StackedDrgWinning32GiBV1),
            SIZE_64_GIB => Ok(Self::StackedDrgWinning64GiBV1),
            other => Err(BenchError::UnsupportedSectorSize(other)),
        }
    }

    pub fn window_from_sector_size(size: SectorSize) -> Result<Self, BenchError> {
        match size.0 {
            SIZE_2_KIB => Ok(Self::StackedDrgWindow2KiBV1),
            SIZE_8_MIB => Ok(Self::StackedDrgWindow8MiBV1),
            SIZE_512_MIB => Ok(Self::StackedDrgWindow512MiBV1),
            SIZE_32_GIB => Ok(Self::StackedDrgWindow32GiBV1),
            SIZE_64_GIB => Ok(Self::StackedDrgWindow64GiBV1),
            other => Err(BenchError::UnsupportedSectorSize(other)),
        }
    }

    /// Sectors proven per partition. Window proofs chunk the challenged set
    /// at this width; winning proofs cover their whole candidate set at once.
    pub fn partition_sectors(self) -> u64 {
        match self {
            Self::StackedDrgWinning2KiBV1
            | Self::StackedDrgWinning8MiBV1
            | Self::StackedDrgWinning512MiBV1
            | Self::StackedDrgWinning32GiBV1
            | Self::StackedDrgWinning64GiBV1 => WINNING_POST_SECTOR_COUNT,
            Self::StackedDrgWindow2KiBV1
            | Self::StackedDrgWindow8MiBV1
            | Self::StackedDrgWindow512MiBV1 => 2,
            Self::StackedDrgWindow32GiBV1 => 2349,
            Self::StackedDrgWindow64GiBV1 => 2300,
        }
    }
}

impl From<RegisteredPoStProof> for i64 {
    fn from(proof: RegisteredPoStProof) -> i64 {
        match proof {
            RegisteredPoStProof::StackedDrgWinning2KiBV1 => 0,
            RegisteredPoStProof::StackedDrgWinning8MiBV1 => 1,
            RegisteredPoStProof::StackedDrgWinning512MiBV1 => 2,
            RegisteredPoStProof::StackedDrgWinning32GiBV1 => 3,
            RegisteredPoStProof::StackedDrgWinning64GiBV1 => 4,
            RegisteredPoStProof::StackedDrgWindow2KiBV1 => 5,
            RegisteredPoStProof::StackedDrgWindow8MiBV1 => 6,
            RegisteredPoStProof::StackedDrgWindow512MiBV1 => 7,
            RegisteredPoStProof::StackedDrgWindow32GiBV1 => 8,
            RegisteredPoStProof::StackedDrgWindow64GiBV1 => 9,
        }
    }
}

impl TryFrom<i64> for RegisteredPoStProof {
    type Error = BenchError;

    fn try_from(tag: i64) -> Result<Self, BenchError> {
        match tag {
            0 => Ok(Self::StackedDrgWinning2KiBV1),
            1 => Ok(Self::StackedDrgWinning8MiBV1),
            2 => Ok(Self::StackedDrgWinning512MiBV1),
            3 => Ok(Self::StackedDrgWinning32GiBV1),
            4 => Ok(Self::StackedDrgWinning64GiBV1),
            5 => Ok(Self::StackedDrgWindow2KiBV1),
            6 => Ok(Self::StackedDrgWindow8MiBV1),
            7 => Ok(Self::StackedDrgWindow512MiBV1),
            8 => Ok(Self::StackedDrgWindow32GiBV1),
            9 => Ok(Self::StackedDrgWindow64GiBV1),
            other => Err(BenchError::Config(format!("unknown post proof type {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_proof_lookup_matches_registered_tags() {
        let cases = [
            (SIZE_2_KIB, 0i64),
            (SIZE_8_MIB, 1),
            (SIZE_512_MIB, 2),
            (SIZE_32_GIB, 3),
            (SIZE_64_GIB, 4),
        ];
        for (size, tag) in cases {
            let spt = RegisteredSealProof::from_sector_size(SectorSize(size)).unwrap();
            assert_eq!(i64::from(spt), tag);
            assert_eq!(spt.sector_size(), SectorSize(size));
        }
    }

    #[test]
    fn unsupported_sector_size_is_rejected() {
        for size in [0u64, 1024, SIZE_512_MIB + 1] {
            let err = RegisteredSealProof::from_sector_size(SectorSize(size)).unwrap_err();
            assert!(matches!(err, BenchError::UnsupportedSectorSize(s) if s == size));
            assert!(RegisteredPoStProof::winning_from_sector_size(SectorSize(size)).is_err());
            assert!(RegisteredPoStProof::window_from_sector_size(SectorSize(size)).is_err());
        }
    }

    #[test]
    fn post_proof_families_line_up() {
        let spt = RegisteredSealProof::StackedDrg512MiBV1;
        assert_eq!(i64::from(spt.registered_winning_post_proof()), 2);
        assert_eq!(i64::from(spt.registered_window_post_proof()), 7);
        assert_eq!(
            spt.registered_winning_post_proof(),
            RegisteredPoStProof::winning_from_sector_size(SectorSize(SIZE_512_MIB)).unwrap()
        );
    }

    #[test]
    fn post_proof_tag_round_trip() {
        for tag in 0i64..10 {
            let proof = RegisteredPoStProof::try_from(tag).unwrap();
            assert_eq!(i64::from(proof), tag);
        }
        assert!(RegisteredPoStProof::try_from(10).is_err());
        assert!(RegisteredSealProof::try_from(-1).is_err());
    }
}
