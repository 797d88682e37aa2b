//! Candidate account-name allocation.
//!
//! Combines a fixed-length random lowercase-alphanumeric prefix with the
//! caller's suffix and verifies name-level availability with the provider,
//! regenerating on conflict. Exhausting the attempt budget is fatal for
//! the whole operation. No account is created here; each attempt costs
//! exactly one availability query.

use rand::Rng;
use tracing::debug;

use stratus_provider::{StorageProvider, with_timeout};

use crate::config::PlacementConfig;
use crate::error::{PlacementError, PlacementResult};

/// Provider-imposed bounds on account-name length.
const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 24;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Allocate an available account name for `suffix`.
///
/// Fails with [`PlacementError::NameExhausted`] after
/// `config.attempt_budget` unavailable candidates, the initial attempt
/// included.
pub async fn allocate_name<P: StorageProvider>(
    provider: &P,
    config: &PlacementConfig,
    suffix: &str,
) -> PlacementResult<String> {
    validate_suffix(suffix, config.prefix_len)?;

    for attempt in 1..=config.attempt_budget {
        let candidate = format!("{}{}", random_prefix(config.prefix_len), suffix);
        let available = with_timeout(
            config.provider_timeout,
            provider.check_name_available(&candidate),
        )
        .await?;
        if available {
            debug!(name = %candidate, attempt, "allocated account name");
            return Ok(candidate);
        }
        debug!(name = %candidate, attempt, "candidate name unavailable");
    }

    Err(PlacementError::NameExhausted {
        suffix: suffix.to_string(),
        attempts: config.attempt_budget,
    })
}

/// Reject suffixes that can never yield a valid account name, before any
/// provider round-trip.
fn validate_suffix(suffix: &str, prefix_len: usize) -> PlacementResult<()> {
    if !suffix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(PlacementError::InvalidSuffix {
            suffix: suffix.to_string(),
            reason: "must contain only lowercase letters and digits".to_string(),
        });
    }
    let total = prefix_len + suffix.len();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&total) {
        return Err(PlacementError::InvalidSuffix {
            suffix: suffix.to_string(),
            reason: format!(
                "prefix ({prefix_len}) plus suffix ({}) must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters",
                suffix.len()
            ),
        });
    }
    Ok(())
}

fn random_prefix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
