use std::time::Duration;

use rand::Rng;

/// Lifetime of an issued verification code.
pub const CODE_TTL: Duration = Duration::from_secs(15 * 60);

/// Generates a 6-digit numeric verification code. The range keeps every
/// value at exactly six digits, so codes compare cleanly as strings with no
/// leading-zero ambiguity.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}
