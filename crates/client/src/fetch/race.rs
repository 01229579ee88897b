//! Mirror racing.
//!
//! The same request goes to every mirror at once. The first 2xx answer wins,
//! every sibling attempt is cancelled, and a single deadline bounds the whole
//! race. Late completions from cancelled mirrors are dropped unseen.

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{AggregateFailure, FailureReason, MirrorFailure};
use super::mirror::{Mirror, MirrorRegistry};
use super::request::ApiRequest;
use super::transport::{MirrorResponse, Transport};

/// Default deadline for a whole race.
pub const DEFAULT_RACE_TIMEOUT: Duration = Duration::from_secs(10);

/// The response that won a race.
#[derive(Debug, Clone)]
pub struct RaceWinner {
    pub mirror: String,
    pub response: MirrorResponse,
    pub elapsed: Duration,
}

/// Races one logical request across every registered mirror.
#[derive(Clone)]
pub struct RaceEngine {
    transport: Arc<dyn Transport>,
    registry: MirrorRegistry,
    deadline: Duration,
}

impl RaceEngine {
    pub fn new(transport: Arc<dyn Transport>, registry: MirrorRegistry, deadline: Duration) -> Self {
        Self { transport, registry, deadline }
    }

    pub fn registry(&self) -> &MirrorRegistry {
        &self.registry
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run the race for `request`.
    ///
    /// Returns the first successful mirror response, or an [`AggregateFailure`]
    /// holding every mirror's reason once all have failed or the deadline passed.
    pub async fn race(&self, request: &ApiRequest) -> Result<RaceWinner, AggregateFailure> {
        let start = Instant::now();
        let path = request.path_and_query();
        let scope = CancellationToken::new();

        let mut attempts: FuturesUnordered<_> = self
            .registry
            .mirrors()
            .iter()
            .map(|mirror| self.attempt(mirror, request, scope.child_token()))
            .collect();

        let deadline = tokio::time::sleep(self.deadline);
        tokio::pin!(deadline);

        let mut failures: Vec<MirrorFailure> = Vec::with_capacity(self.registry.len());

        loop {
            tokio::select! {
                next = attempts.next() => match next {
                    Some((mirror, Some(Ok(response)))) => {
                        scope.cancel();
                        drop(attempts);

                        let elapsed = start.elapsed();
                        tracing::info!("{} won the race in {}ms for {}", mirror.name, elapsed.as_millis(), path);
                        return Ok(RaceWinner { mirror: mirror.name.clone(), response, elapsed });
                    }
                    Some((mirror, Some(Err(reason)))) => {
                        tracing::debug!("{} lost or failed for {}: {}", mirror.name, path, reason);
                        failures.push(MirrorFailure { mirror: mirror.name.clone(), reason });
                    }
                    // Cancelled attempts carry no outcome.
                    Some((_, None)) => {}
                    None => break,
                },
                _ = &mut deadline => {
                    scope.cancel();
                    for mirror in self.registry.mirrors() {
                        if !failures.iter().any(|f| f.mirror == mirror.name) {
                            failures.push(MirrorFailure {
                                mirror: mirror.name.clone(),
                                reason: FailureReason::DeadlineExceeded,
                            });
                        }
                    }
                    break;
                }
            }
        }

        let failure = AggregateFailure { path, failures };
        tracing::warn!("{}", failure);
        Err(failure)
    }

    /// One mirror's attempt; resolves to `None` if cancelled before the transport answers.
    async fn attempt<'a>(
        &'a self, mirror: &'a Mirror, request: &'a ApiRequest, cancel: CancellationToken,
    ) -> (&'a Mirror, Option<Result<MirrorResponse, FailureReason>>) {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.transport.execute(mirror, request) => Some(result),
        };
        (mirror, outcome)
    }
}
