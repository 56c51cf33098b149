// ABOUTME: Error types for the clip pipeline including the ErrorCode enum and ClipError struct.
// ABOUTME: Validation failures surface to callers; fetch-side codes are recovered inside enrichment.

use std::fmt;

/// Error codes representing the categories of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The user-supplied URL is missing or malformed.
    InvalidUrl,
    Fetch,
    Timeout,
    /// The page lives on, or redirected into, a private network.
    Ssrf,
    /// The caller gave up on the request before it finished.
    Cancelled,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "SSRF blocked",
            ErrorCode::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline failure: what went wrong (`code`), during which step (`op`), for which URL.
#[derive(Debug, thiserror::Error)]
pub struct ClipError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "beekeeper: {} {}: {}", self.op, self.url, self.code)?;
        match &self.source {
            Some(cause) => write!(f, ": {cause}"),
            None => Ok(()),
        }
    }
}

macro_rules! error_kinds {
    ($($code:ident => $ctor:ident, $is:ident;)*) => {
        impl ClipError {
            $(
                #[doc = concat!("Creates a `", stringify!($code), "` error.")]
                pub fn $ctor(
                    url: impl Into<String>,
                    op: impl Into<String>,
                    source: Option<anyhow::Error>,
                ) -> Self {
                    Self::with_code(ErrorCode::$code, url, op, source)
                }

                pub fn $is(&self) -> bool {
                    self.code == ErrorCode::$code
                }
            )*
        }
    };
}

error_kinds! {
    InvalidUrl => invalid_url, is_invalid_url;
    Fetch => fetch, is_fetch;
    Timeout => timeout, is_timeout;
    Ssrf => ssrf, is_ssrf;
}

impl ClipError {
    pub fn with_code(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// The caller cancelled; there is never an underlying cause.
    pub fn cancelled(url: impl Into<String>, op: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::Cancelled, url, op, None)
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }

    /// Failures while retrieving the remote page. Enrichment absorbs these and falls back
    /// to URL-derived values.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Fetch | ErrorCode::Timeout | ErrorCode::Ssrf
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_carries_step_url_code_and_cause() {
        let err = ClipError::timeout(
            "https://slow.example",
            "Fetch",
            Some(anyhow::anyhow!("no response within 10s")),
        );
        assert_eq!(
            err.to_string(),
            "beekeeper: Fetch https://slow.example: timeout: no response within 10s"
        );
        assert_eq!(
            ClipError::invalid_url("", "Validate", None).to_string(),
            "beekeeper: Validate : invalid URL"
        );
    }

    #[test]
    fn source_chain_is_exposed() {
        use std::error::Error as _;

        let err = ClipError::fetch("u", "Fetch", Some(anyhow::anyhow!("HTTP status 500")));
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("HTTP status 500"));
        assert!(ClipError::cancelled("u", "Enrich").source().is_none());
    }

    #[test]
    fn predicates_match_exactly_one_code() {
        let all = [
            ClipError::invalid_url("u", "op", None),
            ClipError::fetch("u", "op", None),
            ClipError::timeout("u", "op", None),
            ClipError::ssrf("u", "op", None),
            ClipError::cancelled("u", "op"),
        ];
        for err in &all {
            let hits = [
                err.is_invalid_url(),
                err.is_fetch(),
                err.is_timeout(),
                err.is_ssrf(),
                err.is_cancelled(),
            ];
            assert_eq!(hits.iter().filter(|hit| **hit).count(), 1, "{err}");
        }

        let recoverable: Vec<ErrorCode> = all
            .iter()
            .filter(|e| e.is_recoverable())
            .map(|e| e.code)
            .collect();
        assert_eq!(
            recoverable,
            vec![ErrorCode::Fetch, ErrorCode::Timeout, ErrorCode::Ssrf]
        );
    }
}
