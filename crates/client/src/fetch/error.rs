//! Mirror race error types.

use std::fmt;

/// Why a single mirror attempt did not produce a winner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// Mirror answered with a non-2xx status.
    #[error("status {0}")]
    Status(u16),

    /// Mirror's own request timed out.
    #[error("request timeout")]
    Timeout,

    /// Connection or transfer error.
    #[error("network error: {0}")]
    Network(String),

    /// The race deadline elapsed while this mirror was still pending.
    #[error("race deadline exceeded")]
    DeadlineExceeded,
}

impl From<reqwest::Error> for FailureReason {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FailureReason::Timeout } else { FailureReason::Network(err.to_string()) }
    }
}

/// One mirror's failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{mirror}: {reason}")]
pub struct MirrorFailure {
    pub mirror: String,
    pub reason: FailureReason,
}

/// Every mirror failed for one logical request.
///
/// Keeps each mirror's individual failure, in completion order, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFailure {
    pub path: String,
    pub failures: Vec<MirrorFailure>,
}

impl AggregateFailure {
    /// The failure recorded for `mirror`, if any.
    pub fn reason_for(&self, mirror: &str) -> Option<&FailureReason> {
        self.failures.iter().find(|f| f.mirror == mirror).map(|f| &f.reason)
    }

    /// Whether every mirror answered with a client error.
    ///
    /// That is the upstream saying "no such thing", not an outage.
    pub fn rejected(&self) -> bool {
        !self.failures.is_empty()
            && self.failures.iter().all(|f| matches!(f.reason, FailureReason::Status(code) if (400..500).contains(&code)))
    }

    /// Whether the deadline, rather than the mirrors themselves, ended the race.
    pub fn deadline_hit(&self) -> bool {
        self.failures.iter().any(|f| f.reason == FailureReason::DeadlineExceeded)
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all mirrors failed for {}", self.path)?;
        if !self.failures.is_empty() {
            let reasons: Vec<String> = self.failures.iter().map(ToString::to_string).collect();
            write!(f, ": {}", reasons.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_display_keeps_every_reason() {
        let err = AggregateFailure {
            path: "/api/genres".to_string(),
            failures: vec![
                MirrorFailure { mirror: "Primary".into(), reason: FailureReason::Status(502) },
                MirrorFailure { mirror: "Vercel".into(), reason: FailureReason::DeadlineExceeded },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("/api/genres"));
        assert!(msg.contains("Primary: status 502"));
        assert!(msg.contains("Vercel: race deadline exceeded"));
        assert!(err.deadline_hit());
        assert_eq!(err.reason_for("Primary"), Some(&FailureReason::Status(502)));
        assert_eq!(err.reason_for("Netlify"), None);
        assert!(!err.rejected());
    }

    #[test]
    fn test_uniform_client_errors_are_a_rejection() {
        let failure = |mirror: &str, code| MirrorFailure { mirror: mirror.into(), reason: FailureReason::Status(code) };
        let rejected = AggregateFailure { path: "/api/manga".into(), failures: vec![failure("Primary", 404), failure("Vercel", 410)] };
        assert!(rejected.rejected());

        let mixed = AggregateFailure { path: "/api/manga".into(), failures: vec![failure("Primary", 404), failure("Vercel", 502)] };
        assert!(!mixed.rejected());

        let empty = AggregateFailure { path: "/api/manga".into(), failures: vec![] };
        assert!(!empty.rejected());
    }
}
