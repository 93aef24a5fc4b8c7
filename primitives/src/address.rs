use crate::error::BenchError;
use crate::types::ActorId;

/// Resolves a miner ID address ("t01000", "f01000") to its numeric actor id.
///
/// Only protocol-0 (ID) addresses can be resolved offline; any other protocol
/// would need chain state and is rejected.
pub fn resolve_actor_id(addr: &str) -> Result<ActorId, BenchError> {
    let resolution = |reason: &str| BenchError::Resolution {
        addr: addr.to_string(),
        reason: reason.to_string(),
    };

    let rest = addr
        .strip_prefix('t')
        .or_else(|| addr.strip_prefix('f'))
        .ok_or_else(|| resolution("unknown network prefix"))?;

    let digits = rest
        .strip_prefix('0')
        .ok_or_else(|| resolution("not an ID address (protocol 0)"))?;

    if digits.is_empty() {
        return Err(resolution("missing actor id"));
    }

    let id = digits
        .parse::<u64>()
        .map_err(|_| resolution("actor id is not a valid integer"))?;

    Ok(ActorId(id))
}
