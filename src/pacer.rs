use std::time::Duration;

use crate::error::{LoomError, LoomResult};

/// Parse the surface's cooldown box text: `"mm:ss"` or bare seconds.
/// Empty components read as zero. Anything else means the surface is in
/// a state we did not expect, which is an interception-class failure.
pub fn parse_cooldown(text: &str) -> LoomResult<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Duration::ZERO);
    }

    let parts: Vec<u64> = text
        .split(':')
        .map(parse_component)
        .collect::<LoomResult<_>>()?;

    let secs = match parts.as_slice() {
        [secs] => *secs,
        [mins, secs] => mins * 60 + secs,
        _ => {
            return Err(LoomError::intercepted(format!(
                "unreadable cooldown text '{text}'"
            )));
        }
    };
    Ok(Duration::from_secs(secs))
}

fn parse_component(part: &str) -> LoomResult<u64> {
    let part = part.trim();
    if part.is_empty() {
        return Ok(0);
    }
    part.parse()
        .map_err(|_| LoomError::intercepted(format!("unreadable cooldown component '{part}'")))
}

/// How long the scheduler must still block before the next click is safe.
/// `budget` accounts for time already spent navigating since the cooldown
/// was read; the result is clamped at zero.
pub fn remaining_wait(reported: Duration, budget: Duration) -> Duration {
    reported.saturating_sub(budget)
}
