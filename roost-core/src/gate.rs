use tracing::warn;

use crate::{RoomError, RoomResult};

/// Authorizes a per-user booking query: the caller-supplied email claim
/// must equal the email asserted by the verified credential. Runs before
/// any store scan.
pub fn authorize_email(verified_email: &str, query_email: Option<&str>) -> RoomResult<()> {
    let email =
        query_email.ok_or_else(|| RoomError::MissingParam("Email is required".to_string()))?;
    if email != verified_email {
        warn!(
            "email gate rejected query for {} by principal {}",
            email, verified_email
        );
        return Err(RoomError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_email_passes() {
        assert!(authorize_email("a@x.com", Some("a@x.com")).is_ok());
    }

    #[test]
    fn mismatch_is_forbidden() {
        assert!(matches!(
            authorize_email("a@x.com", Some("b@x.com")),
            Err(RoomError::Forbidden)
        ));
    }

    #[test]
    fn absent_email_is_a_missing_param_not_forbidden() {
        assert!(matches!(
            authorize_email("a@x.com", None),
            Err(RoomError::MissingParam(_))
        ));
    }

    #[test]
    fn comparison_is_exact() {
        assert!(matches!(
            authorize_email("a@x.com", Some("A@X.COM")),
            Err(RoomError::Forbidden)
        ));
    }
}
