//! OTP issuance and verification.
//!
//! A code moves issued → consumed; expiry happens in the cache and is
//! indistinguishable from "never issued" at verification time. Issuance
//! succeeds iff the cache write succeeds — mail delivery is reported as a
//! caveat, never as a failure of the issue itself.
//!
//! There is deliberately no attempt counting or per-email throttling here;
//! see DESIGN.md for why that gap is recorded rather than papered over.

use tracing::{debug, warn};

use super::code::{generate_code, CODE_TTL};
use super::email::VerificationCodeEmail;
use super::store::CodeStore;
use crate::errors::AppError;
use crate::mailer::Mailer;

/// Result of a successful issuance. `email_dispatched` is false when the
/// code was stored but the notification could not be delivered.
#[derive(Debug, Clone, Copy)]
pub struct IssueOutcome {
    pub email_dispatched: bool,
}

/// Issues a fresh code for `email`, replacing any prior unconsumed one, and
/// dispatches it by mail.
pub async fn issue(
    codes: &dyn CodeStore,
    mailer: &dyn Mailer,
    email: &str,
    name: &str,
) -> Result<IssueOutcome, AppError> {
    if !is_plausible_email(email) {
        return Err(AppError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }

    let code = generate_code();
    codes.put(email, &code, CODE_TTL).await?;

    let outbound = VerificationCodeEmail { name, code: &code }.into_outbound(email);
    match mailer.send(outbound).await {
        Ok(message_id) => {
            debug!(email, ?message_id, "verification code dispatched");
            Ok(IssueOutcome {
                email_dispatched: true,
            })
        }
        Err(e) => {
            // The code is stored and usable; the caller just has to be told
            // the notification did not go out.
            warn!(email, "verification email failed to send: {e}");
            Ok(IssueOutcome {
                email_dispatched: false,
            })
        }
    }
}

/// Checks `submitted` against the live code for `email`. Consumes the code
/// on success; returns false — with no side effects — for a wrong code, an
/// expired code, or an email no code was ever issued for.
pub async fn verify(codes: &dyn CodeStore, email: &str, submitted: &str) -> Result<bool, AppError> {
    match codes.get(email).await? {
        Some(expected) if expected == submitted => {
            // Consume before reporting success; if the delete fails the
            // single-use invariant is at risk, so surface the cache error.
            codes.remove(email).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && domain.len() >= 3,
        None => false,
    }
}
