//! Share resolution pipeline: enumerate, flatten, mint links, aggregate

pub mod flatten;
pub mod format;
pub mod types;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ResolverConfig;
use crate::error::ResolveError;

pub use flatten::flatten;
pub use format::{file_type, format_file_size, FileType};
pub use types::{
    FlatFile, RawEntry, ResolvedFile, ShareListing, ShareResult, ShareSession, Thumbnails,
};

/// One upstream share service: a listing endpoint and a per-file link endpoint.
#[async_trait]
pub trait ShareProvider: Send + Sync {
    /// Lists the full file tree of a share in a single call.
    async fn list_share(&self, share_id: &str, password: &str)
        -> Result<ShareListing, ResolveError>;

    /// Mints a direct link for one file. `Ok(None)` means the upstream answered without a link.
    async fn download_link(
        &self,
        session: &ShareSession,
        fs_id: u64,
    ) -> Result<Option<String>, ResolveError>;
}

#[derive(Debug, Clone)]
pub struct ResolvePolicy {
    /// Files past this many (in flatten order) are not processed
    pub max_files: usize,
    /// Pause before every link call after the first
    pub link_delay: Duration,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            max_files: 10,
            link_delay: Duration::from_secs(2),
        }
    }
}

impl TryFrom<&ResolverConfig> for ResolvePolicy {
    type Error = ResolveError;

    /// A zero cap would turn every non-empty share into `NoLinksResolved`.
    fn try_from(config: &ResolverConfig) -> Result<Self, Self::Error> {
        if config.max_files == 0 {
            return Err(ResolveError::Configuration(
                "resolver.max_files must be at least 1".into(),
            ));
        }
        Ok(Self {
            max_files: config.max_files,
            link_delay: config.link_delay(),
        })
    }
}

#[derive(Clone)]
pub struct Resolver {
    provider: Arc<dyn ShareProvider>,
    policy: ResolvePolicy,
}

impl Resolver {
    pub fn new(provider: Arc<dyn ShareProvider>, policy: ResolvePolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &ResolvePolicy {
        &self.policy
    }

    /// Validates `url`, extracts its share id and resolves it.
    pub async fn resolve_url(&self, url: &str, password: &str) -> Result<ShareResult, ResolveError> {
        let share_id = crate::terabox::validate_and_extract(url)?;
        info!("🔎 Extracted share id {} from {}", share_id, url);

        let mut result = self.resolve(&share_id, password).await?;
        result.share_url = Some(url.trim().to_string());
        Ok(result)
    }

    pub async fn resolve(&self, share_id: &str, password: &str) -> Result<ShareResult, ResolveError> {
        info!("📥 Fetching share info: share_id={}", share_id);

        let listing = self.provider.list_share(share_id, password).await?;
        if listing.entries.is_empty() {
            warn!("⚠️ Share {} has no entries", share_id);
            return Err(ResolveError::NoFilesInShare);
        }

        let ShareListing {
            title,
            entries,
            session,
        } = listing;

        let files = flatten(entries);
        let total_files = files.len();
        if total_files == 0 {
            warn!("⚠️ Share {} only contains empty folders", share_id);
            return Err(ResolveError::NoFilesInShare);
        }

        let limit = total_files.min(self.policy.max_files);
        info!("📋 Found {} files, resolving {}", total_files, limit);

        let mut resolved = Vec::with_capacity(limit);
        for (i, file) in files.into_iter().take(limit).enumerate() {
            if i > 0 && !self.policy.link_delay.is_zero() {
                tokio::time::sleep(self.policy.link_delay).await;
            }

            info!("🔗 [{}/{}] {}", i + 1, limit, file.full_path);
            match self.provider.download_link(&session, file.fs_id).await {
                Ok(Some(url)) => {
                    debug!("✅ {} -> {}", file.full_path, url);
                    resolved.push(ResolvedFile::new(file, url));
                }
                Ok(None) => {
                    warn!("⚠️ No download link returned for {}", file.full_path);
                }
                Err(e) => {
                    warn!("⚠️ Failed to get download link for {}: {}", file.full_path, e);
                }
            }
        }

        if resolved.is_empty() {
            error!("❌ No download links resolved for share {}", share_id);
            return Err(ResolveError::NoLinksResolved { total_files });
        }

        let share_title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| resolved[0].filename.clone());

        info!(
            "✅ Resolved {}/{} files for share {}",
            resolved.len(),
            total_files,
            share_id
        );

        Ok(ShareResult {
            share_title,
            share_id: share_id.to_string(),
            share_url: None,
            processed_files: resolved.len(),
            files: resolved,
            total_files,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// In-memory provider recording every link call.
    struct FakeProvider {
        listing: Result<ShareListing, fn() -> ResolveError>,
        missing: HashSet<u64>,
        failing: HashSet<u64>,
        calls: Mutex<Vec<(u64, Instant)>>,
    }

    impl FakeProvider {
        fn with_entries(entries: Vec<RawEntry>) -> Self {
            Self {
                listing: Ok(ShareListing {
                    title: Some("My Share".into()),
                    entries,
                    session: ShareSession {
                        surl: "1abc".into(),
                        share_id: "777".into(),
                        uk: "42".into(),
                        sign: "sig".into(),
                        timestamp: "1700000000".into(),
                    },
                }),
                missing: HashSet::new(),
                failing: HashSet::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_listing(err: fn() -> ResolveError) -> Self {
            Self {
                listing: Err(err),
                ..Self::with_entries(vec![])
            }
        }

        fn calls(&self) -> Vec<(u64, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ShareProvider for FakeProvider {
        async fn list_share(
            &self,
            _share_id: &str,
            _password: &str,
        ) -> Result<ShareListing, ResolveError> {
            match &self.listing {
                Ok(listing) => Ok(listing.clone()),
                Err(make) => Err(make()),
            }
        }

        async fn download_link(
            &self,
            session: &ShareSession,
            fs_id: u64,
        ) -> Result<Option<String>, ResolveError> {
            assert_eq!(session.sign, "sig");
            self.calls.lock().unwrap().push((fs_id, Instant::now()));
            if self.failing.contains(&fs_id) {
                return Err(ResolveError::UpstreamTimeout);
            }
            if self.missing.contains(&fs_id) {
                return Ok(None);
            }
            Ok(Some(format!("https://d.example/{}", fs_id)))
        }
    }

    fn flat_files(n: u64) -> Vec<RawEntry> {
        (1..=n)
            .map(|i| RawEntry::file(format!("file{}.mp4", i), i, i * 1024))
            .collect()
    }

    fn resolver(provider: Arc<FakeProvider>) -> Resolver {
        Resolver::new(provider, ResolvePolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_caps_files_and_spaces_calls() {
        let provider = Arc::new(FakeProvider::with_entries(flat_files(12)));
        let result = resolver(provider.clone()).resolve("1abc", "").await.unwrap();

        assert_eq!(result.total_files, 12);
        assert_eq!(result.processed_files, 10);
        assert_eq!(result.files.len(), 10);
        assert_eq!(result.share_title, "My Share");

        let calls = provider.calls();
        assert_eq!(calls.len(), 10);
        assert_eq!(
            calls.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            (1..=10).collect::<Vec<_>>()
        );
        for pair in calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_secs(2));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_listing_makes_no_link_calls() {
        let provider = Arc::new(FakeProvider::with_entries(vec![]));
        let err = resolver(provider.clone()).resolve("1abc", "").await.unwrap_err();

        assert!(matches!(err, ResolveError::NoFilesInShare));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_empty_folders_is_no_files() {
        let provider = Arc::new(FakeProvider::with_entries(vec![RawEntry::folder(
            "Empty",
            vec![],
        )]));
        let err = resolver(provider.clone()).resolve("1abc", "").await.unwrap_err();

        assert!(matches!(err, ResolveError::NoFilesInShare));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_links_failing_is_no_links_resolved() {
        let mut provider = FakeProvider::with_entries(flat_files(4));
        provider.missing = [1, 3].into_iter().collect();
        provider.failing = [2, 4].into_iter().collect();
        let provider = Arc::new(provider);

        let err = resolver(provider.clone()).resolve("1abc", "").await.unwrap_err();
        match err {
            ResolveError::NoLinksResolved { total_files } => assert_eq!(total_files, 4),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(provider.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_file_failures_are_skipped() {
        let mut provider = FakeProvider::with_entries(flat_files(3));
        provider.failing = [2].into_iter().collect();
        let provider = Arc::new(provider);

        let result = resolver(provider).resolve("1abc", "").await.unwrap();
        assert_eq!(result.total_files, 3);
        assert_eq!(result.processed_files, 2);
        assert_eq!(
            result.files.iter().map(|f| f.fs_id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_listing_order_and_paths() {
        let provider = Arc::new(FakeProvider::with_entries(vec![
            RawEntry::file("readme.txt", 1, 10),
            RawEntry::folder(
                "Videos",
                vec![RawEntry::file("a.mp4", 2, 10), RawEntry::file("b.mp4", 3, 10)],
            ),
        ]));

        let result = resolver(provider).resolve("1abc", "").await.unwrap();
        let paths: Vec<_> = result.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["readme.txt", "Videos/a.mp4", "Videos/b.mp4"]);
        assert_eq!(result.files[0].file_type, FileType::Document);
    }

    #[tokio::test(start_paused = true)]
    async fn test_title_falls_back_to_first_resolved_file() {
        let mut provider = FakeProvider::with_entries(flat_files(2));
        if let Ok(listing) = provider.listing.as_mut() {
            listing.title = Some(String::new());
        }
        provider.missing = [1].into_iter().collect();

        let result = resolver(Arc::new(provider)).resolve("1abc", "").await.unwrap();
        assert_eq!(result.share_title, "file2.mp4");
        assert_eq!(result.share_id, "1abc");
    }

    #[tokio::test]
    async fn test_listing_errors_propagate() {
        let provider = Arc::new(FakeProvider::failing_listing(|| {
            ResolveError::PasswordRequired("need password".into())
        }));
        let err = resolver(provider.clone()).resolve("1abc", "").await.unwrap_err();

        assert!(matches!(err, ResolveError::PasswordRequired(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_url_rejects_foreign_domain() {
        let provider = Arc::new(FakeProvider::with_entries(flat_files(1)));
        let err = resolver(provider.clone())
            .resolve_url("https://example.com/s/1abc", "")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::UnsupportedDomain(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_url_records_share_url() {
        let provider = Arc::new(FakeProvider::with_entries(flat_files(1)));
        let result = resolver(provider)
            .resolve_url(" https://www.terabox.com/s/1abc ", "")
            .await
            .unwrap();

        assert_eq!(result.share_id, "1abc");
        assert_eq!(
            result.share_url.as_deref(),
            Some("https://www.terabox.com/s/1abc")
        );
    }

    #[test]
    fn test_policy_rejects_zero_max_files() {
        let config = ResolverConfig {
            max_files: 0,
            link_delay_ms: 0,
        };
        assert!(matches!(
            ResolvePolicy::try_from(&config),
            Err(ResolveError::Configuration(_))
        ));

        let config = ResolverConfig {
            max_files: 1,
            link_delay_ms: 500,
        };
        let policy = ResolvePolicy::try_from(&config).unwrap();
        assert_eq!(policy.max_files, 1);
        assert_eq!(policy.link_delay, Duration::from_millis(500));
    }
}
