//! Workshop upload boundary.
//!
//! The actual submit is an external service behind [`WorkshopClient`]; this
//! module owns the precondition checks, request construction, and the
//! progress-event stream around one upload. Progress is a sequence of
//! events ending in a terminal one, delivered through an [`UploadProgress`]
//! reporter; there is no shared mutable progress value. No retry, resume,
//! or dedup: a transient network failure simply surfaces as an unsuccessful
//! outcome, and each call is independent.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tags attached to every uploaded item.
pub const UPLOAD_TAGS: [&str; 2] = ["Mod", "Character"];

/// Fixed description for auto-uploaded items.
pub const UPLOAD_DESCRIPTION: &str = "Auto-uploaded character mod";

/// Error for an upload attempt. Precondition failures are terminal for the
/// call and never retried.
#[derive(Debug, Error)]
pub enum WorkshopError {
    /// No authenticated workshop session
    #[error("no active workshop session")]
    NoSession,
    /// The bundle to upload does not exist
    #[error("bundle not found: {}", .0.display())]
    MissingBundle(PathBuf),
    /// The external submit call failed
    #[error("workshop submit failed: {0}")]
    Submit(String),
}

/// What gets submitted to the workshop service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    /// Folder whose contents are published (the bundle's directory)
    pub content_dir: PathBuf,
    pub tags: Vec<String>,
}

/// Final result of a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    pub success: bool,
    /// The item was blocked pending acceptance of the workshop agreement,
    /// as opposed to a generic failure
    pub needs_agreement: bool,
}

/// Progress events emitted during one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Started,
    /// Fractional progress in [0, 1]
    Progress(f32),
    Finished(UploadOutcome),
}

/// Sink for upload progress events.
pub trait UploadProgress {
    fn report(&self, event: UploadEvent);
}

/// A progress sink that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl UploadProgress for NullProgress {
    fn report(&self, _event: UploadEvent) {}
}

/// External workshop service seam.
pub trait WorkshopClient {
    /// Whether an authenticated session is currently active.
    fn is_session_active(&self) -> bool;

    /// Perform the network-bound submit, reporting fractional progress
    /// through the callback.
    fn submit(
        &mut self,
        request: &UploadRequest,
        progress: &mut dyn FnMut(f32),
    ) -> Result<UploadOutcome, WorkshopError>;
}

/// Uploads built bundles through a [`WorkshopClient`].
///
/// `upload` takes `&mut self`, so a given uploader instance can only have
/// one upload in flight.
pub struct WorkshopUploader<C> {
    client: C,
}

impl<C: WorkshopClient> WorkshopUploader<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Upload a built bundle as `Mod: {character}`.
    ///
    /// Preconditions (active session, existing bundle file) are checked
    /// first and fail the call without touching the service. The published
    /// content is the bundle's directory.
    pub fn upload(
        &mut self,
        bundle: &Path,
        character: &str,
        progress: &dyn UploadProgress,
    ) -> Result<UploadOutcome, WorkshopError> {
        if !self.client.is_session_active() {
            return Err(WorkshopError::NoSession);
        }
        if !bundle.is_file() {
            return Err(WorkshopError::MissingBundle(bundle.to_path_buf()));
        }

        let request = UploadRequest {
            title: format!("Mod: {}", character),
            description: UPLOAD_DESCRIPTION.to_string(),
            content_dir: bundle.parent().unwrap_or(Path::new("")).to_path_buf(),
            tags: UPLOAD_TAGS.iter().map(|t| t.to_string()).collect(),
        };

        progress.report(UploadEvent::Started);
        let result = self.client.submit(&request, &mut |fraction| {
            progress.report(UploadEvent::Progress(fraction.clamp(0.0, 1.0)));
        });

        // The event stream always ends in a terminal event, even when the
        // submit call itself errors out mid-transfer.
        let terminal = match &result {
            Ok(outcome) => *outcome,
            Err(_) => UploadOutcome {
                success: false,
                needs_agreement: false,
            },
        };
        progress.report(UploadEvent::Finished(terminal));

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct MockClient {
        session: bool,
        outcome: UploadOutcome,
        steps: Vec<f32>,
        seen_request: Option<UploadRequest>,
    }

    impl MockClient {
        fn new(outcome: UploadOutcome) -> Self {
            Self {
                session: true,
                outcome,
                steps: vec![0.25, 0.5, 1.0],
                seen_request: None,
            }
        }
    }

    impl WorkshopClient for MockClient {
        fn is_session_active(&self) -> bool {
            self.session
        }

        fn submit(
            &mut self,
            request: &UploadRequest,
            progress: &mut dyn FnMut(f32),
        ) -> Result<UploadOutcome, WorkshopError> {
            self.seen_request = Some(request.clone());
            for step in &self.steps {
                progress(*step);
            }
            Ok(self.outcome)
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: RefCell<Vec<UploadEvent>>,
    }

    impl UploadProgress for RecordingProgress {
        fn report(&self, event: UploadEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    fn success() -> UploadOutcome {
        UploadOutcome {
            success: true,
            needs_agreement: false,
        }
    }

    fn bundle_on_disk(dir: &Path) -> PathBuf {
        let path = dir.join("rex.customer");
        std::fs::write(&path, b"bundle").unwrap();
        path
    }

    #[test]
    fn test_no_session_is_terminal() {
        let dir = tempdir().unwrap();
        let bundle = bundle_on_disk(dir.path());

        let mut client = MockClient::new(success());
        client.session = false;
        let mut uploader = WorkshopUploader::new(client);

        let result = uploader.upload(&bundle, "Rex", &NullProgress);
        assert!(matches!(result, Err(WorkshopError::NoSession)));
        assert!(uploader.client().seen_request.is_none());
    }

    #[test]
    fn test_missing_bundle_is_terminal() {
        let dir = tempdir().unwrap();
        let ghost = dir.path().join("ghost.customer");

        let mut uploader = WorkshopUploader::new(MockClient::new(success()));
        let result = uploader.upload(&ghost, "Rex", &NullProgress);
        assert!(matches!(result, Err(WorkshopError::MissingBundle(p)) if p == ghost));
    }

    #[test]
    fn test_request_shape() {
        let dir = tempdir().unwrap();
        let bundle = bundle_on_disk(dir.path());

        let mut uploader = WorkshopUploader::new(MockClient::new(success()));
        uploader.upload(&bundle, "Rex", &NullProgress).unwrap();

        let request = uploader.client().seen_request.clone().unwrap();
        assert_eq!(request.title, "Mod: Rex");
        assert_eq!(request.content_dir, dir.path());
        assert_eq!(request.tags, vec!["Mod", "Character"]);
    }

    #[test]
    fn test_progress_events_in_order_with_terminal() {
        let dir = tempdir().unwrap();
        let bundle = bundle_on_disk(dir.path());

        let progress = RecordingProgress::default();
        let mut uploader = WorkshopUploader::new(MockClient::new(success()));
        uploader.upload(&bundle, "Rex", &progress).unwrap();

        let events = progress.events.into_inner();
        assert_eq!(events.first(), Some(&UploadEvent::Started));
        assert_eq!(
            &events[1..4],
            &[
                UploadEvent::Progress(0.25),
                UploadEvent::Progress(0.5),
                UploadEvent::Progress(1.0),
            ]
        );
        assert_eq!(events.last(), Some(&UploadEvent::Finished(success())));
    }

    struct FailingClient;

    impl WorkshopClient for FailingClient {
        fn is_session_active(&self) -> bool {
            true
        }

        fn submit(
            &mut self,
            _request: &UploadRequest,
            progress: &mut dyn FnMut(f32),
        ) -> Result<UploadOutcome, WorkshopError> {
            progress(0.5);
            Err(WorkshopError::Submit("connection reset".to_string()))
        }
    }

    #[test]
    fn test_submit_error_still_ends_with_terminal_event() {
        let dir = tempdir().unwrap();
        let bundle = bundle_on_disk(dir.path());

        let progress = RecordingProgress::default();
        let mut uploader = WorkshopUploader::new(FailingClient);
        let result = uploader.upload(&bundle, "Rex", &progress);
        assert!(matches!(result, Err(WorkshopError::Submit(_))));

        let events = progress.events.into_inner();
        assert_eq!(events[0], UploadEvent::Started);
        assert_eq!(events[1], UploadEvent::Progress(0.5));
        assert_eq!(
            events.last(),
            Some(&UploadEvent::Finished(UploadOutcome {
                success: false,
                needs_agreement: false,
            }))
        );
    }

    #[test]
    fn test_needs_agreement_passthrough() {
        let dir = tempdir().unwrap();
        let bundle = bundle_on_disk(dir.path());

        let outcome = UploadOutcome {
            success: false,
            needs_agreement: true,
        };
        let mut uploader = WorkshopUploader::new(MockClient::new(outcome));
        let result = uploader.upload(&bundle, "Rex", &NullProgress).unwrap();
        assert!(!result.success);
        assert!(result.needs_agreement);
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let dir = tempdir().unwrap();
        let bundle = bundle_on_disk(dir.path());

        let mut client = MockClient::new(success());
        client.steps = vec![-0.5, 1.5];
        let progress = RecordingProgress::default();
        let mut uploader = WorkshopUploader::new(client);
        uploader.upload(&bundle, "Rex", &progress).unwrap();

        let events = progress.events.into_inner();
        assert_eq!(events[1], UploadEvent::Progress(0.0));
        assert_eq!(events[2], UploadEvent::Progress(1.0));
    }
}
