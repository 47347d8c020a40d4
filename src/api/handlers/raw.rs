use axum::http::Uri;

use crate::api::errors::ApiError;

/// Largest payload the generator will produce (1 GiB)
pub const MAX_RAW_BYTES: u64 = 1 << 30;

/// Deterministic pseudo-random bytes from a Lehmer generator
///
/// Seed starts at 1 and advances as `seed * 48271 mod (2^31 - 1)`; each
/// byte is the low 8 bits of the advanced seed.
pub fn generate_pr_data(len: usize) -> Vec<u8> {
    let mut seed: u64 = 1;
    (0..len)
        .map(|_| {
            seed = seed * 48271 % 2_147_483_647;
            seed as u8
        })
        .collect()
}

/// Serve `n` generated bytes for any unmatched `/<n>` path
///
/// GET /:n (fallback)
pub async fn raw_data(uri: Uri) -> Result<Vec<u8>, ApiError> {
    let requested = uri.path().replace('/', "");
    let len: u64 = requested
        .parse()
        .ok()
        .filter(|n| *n > 0 && *n <= MAX_RAW_BYTES)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid payload size: {}", uri.path())))?;

    tracing::debug!(len, "Generating raw payload");
    Ok(generate_pr_data(len as usize))
}
