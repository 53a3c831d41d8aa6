use async_trait::async_trait;
use tripgate_core::{NormalizedHost, Outcome, ProfileId, RequestContext};

/// The result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Absolute URL to redirect to.
    pub target: String,
    pub outcome: Outcome,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a host already mapped to `profile` to a redirect target.
    ///
    /// Never fails: any problem yields the profile fallback target.
    async fn resolve(
        &self,
        host: &NormalizedHost,
        profile: &ProfileId,
        request: RequestContext,
    ) -> Resolution;
}
