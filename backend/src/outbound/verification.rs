//! Deterministic verifier adapters for e-sports profiles and documents.
//!
//! Neither adapter calls out to a network service; both decide from the
//! submitted metadata alone.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::domain::ports::{
    DocumentClassifier, DocumentClassifierError, EsportsProfileVerifier,
    EsportsProfileVerifierError, ProfileVerdict,
};
use crate::domain::{DocumentStatus, DocumentSubmission, EsportsPlatform};

/// Hosts that publish public player profiles for `platform`.
fn known_hosts(platform: EsportsPlatform) -> &'static [&'static str] {
    match platform {
        EsportsPlatform::LeagueOfLegends => &["op.gg", "u.gg", "leagueofgraphs.com"],
        EsportsPlatform::RainbowSix => &["r6.tracker.network", "tracker.gg"],
        EsportsPlatform::Steam => &["steamcommunity.com"],
        EsportsPlatform::Valorant => &["tracker.gg", "valorant.op.gg"],
        EsportsPlatform::GamersClub => &["gamersclub.com.br"],
        EsportsPlatform::Cs2 => &["steamcommunity.com", "faceit.com", "csstats.gg"],
    }
}

fn host_matches(host: &str, allowed: &str) -> bool {
    host == allowed
        || host
            .strip_suffix(allowed)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Accepts `http(s)` URLs on a platform's known hosts with a non-empty path.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAllowListVerifier;

impl HostAllowListVerifier {
    fn judge(platform: EsportsPlatform, profile_url: &str) -> ProfileVerdict {
        let Ok(url) = Url::parse(profile_url) else {
            return ProfileVerdict::invalid("profile url is not a valid URL");
        };
        if !matches!(url.scheme(), "http" | "https") {
            return ProfileVerdict::invalid("profile url must use http or https");
        }
        let Some(host) = url.host_str().map(str::to_ascii_lowercase) else {
            return ProfileVerdict::invalid("profile url has no host");
        };
        if !known_hosts(platform)
            .iter()
            .any(|allowed| host_matches(&host, allowed))
        {
            return ProfileVerdict::invalid(format!(
                "{host} does not host {platform} profiles"
            ));
        }
        if url.path().trim_matches('/').is_empty() {
            return ProfileVerdict::invalid("profile url does not point at a profile");
        }
        ProfileVerdict::valid(format!("valid {platform} profile"))
    }
}

#[async_trait]
impl EsportsProfileVerifier for HostAllowListVerifier {
    async fn verify(
        &self,
        platform: EsportsPlatform,
        profile_url: &str,
    ) -> Result<ProfileVerdict, EsportsProfileVerifierError> {
        let verdict = Self::judge(platform, profile_url);
        debug!(%platform, is_valid = verdict.is_valid, "profile url checked");
        Ok(verdict)
    }
}

/// Smallest file accepted as a readable identity document scan.
pub const MIN_DOCUMENT_BYTES: u64 = 1024;

/// Rejects files too small to contain a legible scan.
#[derive(Debug, Clone, Copy)]
pub struct SizeThresholdClassifier {
    min_bytes: u64,
}

impl SizeThresholdClassifier {
    pub fn new(min_bytes: u64) -> Self {
        Self { min_bytes }
    }
}

impl Default for SizeThresholdClassifier {
    fn default() -> Self {
        Self::new(MIN_DOCUMENT_BYTES)
    }
}

#[async_trait]
impl DocumentClassifier for SizeThresholdClassifier {
    async fn classify(
        &self,
        submission: &DocumentSubmission,
    ) -> Result<DocumentStatus, DocumentClassifierError> {
        let status = if submission.size_bytes() < self.min_bytes {
            DocumentStatus::Rejected
        } else {
            DocumentStatus::Validated
        };
        debug!(
            kind = %submission.kind(),
            size_bytes = submission.size_bytes(),
            status = status.as_str(),
            "document classified"
        );
        Ok(status)
    }
}
