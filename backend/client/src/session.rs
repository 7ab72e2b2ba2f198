//! Submit-control state for one capture page.
//!
//! Holds the selected image and the last analysis text, and allows a single
//! request in flight at a time. While a request is outstanding the control
//! reports itself disabled and further submits are refused without touching
//! the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use pokedex_core::CapturedImage;

use crate::client::Submitter;

/// Text shown in place of an analysis when a submission fails.
pub const FALLBACK_MESSAGE: &str = "Error analyzing image. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No image selected; nothing was sent.
    NoImage,
    /// A request is already in flight; nothing was sent.
    Busy,
    /// The endpoint answered; the text is now displayed.
    Completed(String),
    /// The request failed; the fallback message is now displayed.
    Failed(String),
}

pub struct AnalysisSession {
    submitter: Arc<dyn Submitter>,
    image: RwLock<Option<CapturedImage>>,
    analysis: RwLock<Option<String>>,
    loading: AtomicBool,
}

/// Clears the in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AnalysisSession {
    pub fn new(submitter: Arc<dyn Submitter>) -> Self {
        Self {
            submitter,
            image: RwLock::new(None),
            analysis: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    pub async fn set_image(&self, image: CapturedImage) {
        *self.image.write().await = Some(image);
    }

    pub async fn clear_image(&self) {
        *self.image.write().await = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Whether the submit control is enabled.
    pub async fn can_submit(&self) -> bool {
        self.image.read().await.is_some() && !self.is_loading()
    }

    /// The text currently displayed, if any.
    pub async fn analysis(&self) -> Option<String> {
        self.analysis.read().await.clone()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let Some(image) = self.image.read().await.clone() else {
            return SubmitOutcome::NoImage;
        };
        let Some(_in_flight) = InFlight::acquire(&self.loading) else {
            return SubmitOutcome::Busy;
        };

        match self.submitter.submit(&image).await {
            Ok(text) => {
                info!(chars = text.len(), "Analysis received");
                *self.analysis.write().await = Some(text.clone());
                SubmitOutcome::Completed(text)
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                *self.analysis.write().await = Some(FALLBACK_MESSAGE.to_string());
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Answers after `release` is notified, so tests can observe the in-flight window.
    struct GatedSubmitter {
        release: Notify,
        calls: AtomicUsize,
        fail: bool,
    }

    impl GatedSubmitter {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                release: Notify::new(),
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl Submitter for GatedSubmitter {
        async fn submit(&self, _image: &CapturedImage) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            if self.fail {
                Err(ClientError::Rejected {
                    status: 500,
                    message: "Failed to analyze image".into(),
                })
            } else {
                Ok("Card Name: Eevee".into())
            }
        }
    }

    async fn wait_until_loading(session: &AnalysisSession) {
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn no_image_never_submits() {
        let submitter = GatedSubmitter::new(false);
        let session = AnalysisSession::new(submitter.clone());

        assert!(!session.can_submit().await);
        assert_eq!(session.submit().await, SubmitOutcome::NoImage);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn control_disabled_for_exactly_one_request() {
        let submitter = GatedSubmitter::new(false);
        let session = Arc::new(AnalysisSession::new(submitter.clone()));
        session.set_image(CapturedImage::new(vec![0xFF, 0xD8])).await;
        assert!(session.can_submit().await);

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.submit().await }
        });
        wait_until_loading(&session).await;

        assert!(!session.can_submit().await);
        assert_eq!(session.submit().await, SubmitOutcome::Busy);

        submitter.release.notify_one();
        let outcome = first.await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed("Card Name: Eevee".into()));
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert!(!session.is_loading());
        assert!(session.can_submit().await);
        assert_eq!(session.analysis().await.as_deref(), Some("Card Name: Eevee"));
    }

    #[tokio::test]
    async fn failure_shows_fallback_and_reenables() {
        let submitter = GatedSubmitter::new(true);
        let session = Arc::new(AnalysisSession::new(submitter.clone()));
        session.set_image(CapturedImage::new(vec![0xFF, 0xD8])).await;

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.submit().await }
        });
        wait_until_loading(&session).await;
        submitter.release.notify_one();

        let outcome = pending.await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Failed("Failed to analyze image".into()));
        assert_eq!(session.analysis().await.as_deref(), Some(FALLBACK_MESSAGE));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn new_result_overwrites_previous() {
        let submitter = GatedSubmitter::new(false);
        let session = Arc::new(AnalysisSession::new(submitter.clone()));
        session.set_image(CapturedImage::new(vec![1])).await;

        for _ in 0..2 {
            let pending = tokio::spawn({
                let session = session.clone();
                async move { session.submit().await }
            });
            wait_until_loading(&session).await;
            submitter.release.notify_one();
            pending.await.unwrap();
        }
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.analysis().await.as_deref(), Some("Card Name: Eevee"));
    }
}
