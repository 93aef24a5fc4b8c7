use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use primitives::{Result, SectorNumber};

/// Seed offset for per-sector benchmark piece data. Sector `n` reads from a
/// ChaCha8 stream seeded `PIECE_SEED_OFFSET + n`, so piece data is
/// reproducible across runs without any process-global randomness.
const PIECE_SEED_OFFSET: u64 = 100;

/// Where piece data for a sector comes from.
#[derive(Debug, Clone)]
pub enum PieceSource {
    /// Deterministic generated data, unique per sector.
    Benchmark,
    /// Contents of a caller-supplied file (single-sector seal runs).
    File(PathBuf),
}

impl PieceSource {
    pub fn reader_for(&self, sector_number: SectorNumber) -> Result<Box<dyn Read + Send>> {
        match self {
            PieceSource::Benchmark => Ok(Box::new(RngReader(ChaCha8Rng::seed_from_u64(
                PIECE_SEED_OFFSET + sector_number,
            )))),
            PieceSource::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }
}

/// Endless reader over a seeded deterministic stream.
struct RngReader(ChaCha8Rng);

impl Read for RngReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.fill_bytes(buf);
        Ok(buf.len())
    }
}
