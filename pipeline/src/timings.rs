use std::fmt;
use std::time::Duration;

use humantime::format_duration;

use primitives::SectorNumber;

/// Wall-clock duration of every stage one sector went through.
#[derive(Debug, Clone, Copy, Default)]
pub struct SealTiming {
    pub sector_number: SectorNumber,
    pub add_piece: Duration,
    pub pre_commit1: Duration,
    pub pre_commit2: Duration,
    pub commit1: Duration,
    pub commit2: Duration,
    pub verify: Duration,
}

impl SealTiming {
    pub fn total(&self) -> Duration {
        self.add_piece
            + self.pre_commit1
            + self.pre_commit2
            + self.commit1
            + self.commit2
            + self.verify
    }
}

impl fmt::Display for SealTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sector {}: add-piece {}, pre-commit1 {}, pre-commit2 {}, commit1 {}, commit2 {}, verify {}",
            self.sector_number,
            format_duration(self.add_piece),
            format_duration(self.pre_commit1),
            format_duration(self.pre_commit2),
            format_duration(self.commit1),
            format_duration(self.commit2),
            format_duration(self.verify),
        )
    }
}

/// Stage durations summed across all sectors of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTotals {
    pub add_piece: Duration,
    pub pre_commit1: Duration,
    pub pre_commit2: Duration,
    pub commit1: Duration,
    pub commit2: Duration,
    pub verify: Duration,
}

impl fmt::Display for StageTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "totals: add-piece {}, pre-commit1 {}, pre-commit2 {}, commit1 {}, commit2 {}, verify {}",
            format_duration(self.add_piece),
            format_duration(self.pre_commit1),
            format_duration(self.pre_commit2),
            format_duration(self.commit1),
            format_duration(self.commit2),
            format_duration(self.verify),
        )
    }
}

pub fn stage_totals(timings: &[SealTiming]) -> StageTotals {
    let mut totals = StageTotals::default();
    for t in timings {
        totals.add_piece += t.add_piece;
        totals.pre_commit1 += t.pre_commit1;
        totals.pre_commit2 += t.pre_commit2;
        totals.commit1 += t.commit1;
        totals.commit2 += t.commit2;
        totals.verify += t.verify;
    }
    totals
}
