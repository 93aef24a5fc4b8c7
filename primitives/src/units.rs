use crate::error::BenchError;
use crate::types::SectorSize;

/// Parses a human-readable byte size ("2KiB", "512MiB", "32g") into a sector
/// size. Suffixes are case-insensitive binary multiples.
pub fn parse_sector_size(input: &str) -> Result<SectorSize, BenchError> {
    let s = input.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);

    if digits.is_empty() {
        return Err(BenchError::Config(format!("invalid sector size {input:?}")));
    }

    let value: u64 = digits
        .parse()
        .map_err(|_| BenchError::Config(format!("invalid sector size {input:?}")))?;

    let multiplier: u64 = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => 1 << 10,
        "m" | "mb" | "mib" => 1 << 20,
        "g" | "gb" | "gib" => 1 << 30,
        "t" | "tb" | "tib" => 1 << 40,
        other => {
            return Err(BenchError::Config(format!(
                "unknown size suffix {other:?} in {input:?}"
            )))
        }
    };

    value
        .checked_mul(multiplier)
        .map(SectorSize)
        .ok_or_else(|| BenchError::Config(format!("sector size {input:?} overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_sizes() {
        assert_eq!(parse_sector_size("2KiB").unwrap(), SectorSize(2048));
        assert_eq!(parse_sector_size("8MiB").unwrap(), SectorSize(8 << 20));
        assert_eq!(parse_sector_size("512MiB").unwrap(), SectorSize(512 << 20));
        assert_eq!(parse_sector_size("32GiB").unwrap(), SectorSize(32u64 << 30));
        assert_eq!(parse_sector_size("64g").unwrap(), SectorSize(64u64 << 30));
        assert_eq!(parse_sector_size("2048").unwrap(), SectorSize(2048));
        assert_eq!(parse_sector_size(" 2 kib ").unwrap(), SectorSize(2048));
    }

    #[test]
    fn rejects_malformed_sizes() {
        for input in ["", "MiB", "12XiB", "-1KiB", "99999999999999999999B"] {
            assert!(
                matches!(parse_sector_size(input), Err(BenchError::Config(_))),
                "expected config error for {input:?}"
            );
        }
    }
}
