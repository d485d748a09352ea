// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of serenity failures onto [`TauticordError`].

use serenity::gateway::GatewayError;
use serenity::http::HttpError;
use tauticord_core::TauticordError;

/// Error for a failed HTTP status, or `None` when the status needs the
/// generic platform error.
pub fn from_status(status: u16, what: &str) -> Option<TauticordError> {
    match status {
        401 => Some(TauticordError::InvalidToken),
        404 => Some(TauticordError::NotFound { what: what.to_string() }),
        429 => Some(TauticordError::RateLimited(what.to_string())),
        _ => None,
    }
}

/// Convert a serenity error raised while working on `what`.
pub fn platform_error(what: &str, e: serenity::Error) -> TauticordError {
    let status = match &e {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => Some(response.status_code.as_u16()),
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => return TauticordError::InvalidToken,
        _ => None,
    };
    if let Some(mapped) = status.and_then(|status| from_status(status, what)) {
        return mapped;
    }
    TauticordError::Platform {
        message: format!("{what}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_typed_errors() {
        assert!(matches!(from_status(401, "me"), Some(TauticordError::InvalidToken)));
        assert!(matches!(from_status(429, "rename"), Some(TauticordError::RateLimited(what)) if what == "rename"));
        assert!(matches!(
            from_status(404, "message 5"),
            Some(TauticordError::NotFound { what }) if what == "message 5"
        ));
        assert!(from_status(500, "x").is_none());
        assert!(from_status(403, "x").is_none());
    }

    #[test]
    fn gateway_authentication_is_invalid_token() {
        let err = platform_error("connect", serenity::Error::Gateway(GatewayError::InvalidAuthentication));
        assert_eq!(err.exit_code(), 101);
    }

    #[test]
    fn other_errors_are_platform_errors() {
        let err = platform_error("send", serenity::Error::Other("boom"));
        assert!(matches!(err, TauticordError::Platform { .. }));
        assert!(err.to_string().contains("send"));
    }
}
