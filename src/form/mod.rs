//! # Project Forms
//!
//! The write side of the admin view: one [`FormDialog`] for both adding and
//! editing projects, specialized by a [`FormMode`].
//!
//! # Main Components
//!
//! - [`FormDialog`] - open/cancel, field edits, validation, submit
//! - [`FormMode`] - [`CreateProject`] and [`EditProject`]
//! - [`ValidationErrors`] - field-scoped messages that never reach the network
//! - [`FormError`] - why a submit saved nothing

pub mod dialog;
pub mod error;
pub mod fields;
pub mod mode;
pub mod validation;

pub use dialog::{FormDialog, FormPhase};
pub use error::FormError;
pub use fields::{Field, ProjectFields};
pub use mode::{CreateProject, EditProject, FormMode};
pub use validation::{FieldError, ValidationErrors};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{create_mock_api, expect_create, MockApi};
    use crate::api::{ApiError, ProjectApi};
    use crate::cache::CacheActor;
    use crate::model::{Project, ProjectId};
    use crate::notify::mock::{Notification, RecordingNotifier};
    use crate::notify::NotificationKind;
    use crate::pages::{PageCache, PageKey, ProjectPages, PROJECTS};
    use std::sync::Arc;

    /// A page cache over its own mock, with page 1 already loaded.
    async fn warm_cache() -> (PageCache, MockApi) {
        let mut pages = MockApi::new();
        pages.expect_list(0, 5).return_ok(vec![Project::new(1, "Alpha", "")]);
        let (actor, cache) = CacheActor::new(10);
        tokio::spawn(actor.run(ProjectPages::new(Arc::new(pages.client()), 5)));
        cache.read(PageKey::new(PROJECTS, 1)).await.unwrap();
        (cache, pages)
    }

    async fn page_one_is_stale(cache: &PageCache) -> bool {
        cache
            .peek(PageKey::new(PROJECTS, 1))
            .await
            .unwrap()
            .map(|entry| entry.stale)
            .unwrap_or(false)
    }

    fn dialog<M: FormMode>(mode: M, api: Arc<dyn ProjectApi>, cache: PageCache, notifier: &RecordingNotifier) -> FormDialog<M> {
        let mut dialog = FormDialog::new(mode, api, cache, Arc::new(notifier.clone()));
        dialog.open();
        dialog
    }

    #[tokio::test]
    async fn test_create_with_empty_name_never_reaches_network() {
        let mock = MockApi::new();
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let mut form = dialog(CreateProject, Arc::new(mock.client()), cache.clone(), &notifier);

        let errors = match form.submit().await {
            Err(FormError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert_eq!(errors.get(Field::Name), Some("Name is required."));
        assert_eq!(form.errors().get(Field::Name), Some("Name is required."));
        assert_eq!(mock.request_count(), 0);
        assert!(notifier.received().is_empty());
        assert!(form.is_open());
        assert!(!page_one_is_stale(&cache).await);

        form.set_field(Field::Name, "A");
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn test_create_success_notifies_closes_and_invalidates() {
        let mut mock = MockApi::new();
        mock.expect_create().return_ok(Project::new(2, "Alpha", ""));
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let mut form = dialog(CreateProject, Arc::new(mock.client()), cache.clone(), &notifier);

        form.set_field(Field::Name, "Alpha");
        form.set_field(Field::Description, "");
        let saved = form.submit().await.unwrap();

        assert_eq!(saved.id, ProjectId(2));
        assert_eq!(
            notifier.received(),
            vec![Notification {
                title: "Success!".to_string(),
                message: "Project created successfully.".to_string(),
                kind: NotificationKind::Success,
            }]
        );
        assert!(!form.is_open());
        assert_eq!(form.values(), &ProjectFields::default());
        assert_eq!(form.phase(), FormPhase::Idle);
        assert!(page_one_is_stale(&cache).await);
        mock.verify();
    }

    #[tokio::test]
    async fn test_edit_is_gated_on_changes() {
        let mock = MockApi::new();
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let project = Project::new(1, "Alpha", "first");
        let mut form = dialog(EditProject::new(project), Arc::new(mock.client()), cache, &notifier);

        assert!(!form.is_dirty());
        assert!(!form.can_submit());
        assert_eq!(form.submit().await, Err(FormError::NothingToSave));
        assert_eq!(mock.request_count(), 0);

        form.set_field(Field::Description, "second");
        assert!(form.is_dirty());
        assert!(form.can_submit());

        form.set_field(Field::Description, "first");
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn test_edit_ignores_whitespace_around_name() {
        let mock = MockApi::new();
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let project = Project::new(1, "Alpha", "first");
        let mut form = dialog(EditProject::new(project), Arc::new(mock.client()), cache, &notifier);

        form.set_field(Field::Name, "  Alpha ");
        assert!(!form.is_dirty());
        assert!(!form.can_submit());
        assert_eq!(form.submit().await, Err(FormError::NothingToSave));

        form.set_field(Field::Name, "  Beta ");
        assert!(form.is_dirty());
        assert!(form.can_submit());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_closed_dialog_never_writes() {
        let mock = MockApi::new();
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let mut form = FormDialog::new(
            CreateProject,
            Arc::new(mock.client()),
            cache.clone(),
            Arc::new(notifier.clone()),
        );

        form.set_field(Field::Name, "Alpha");
        assert!(!form.is_open());
        assert!(!form.can_submit());
        assert_eq!(form.submit().await, Err(FormError::Closed));

        form.open();
        form.cancel();
        assert_eq!(form.submit().await, Err(FormError::Closed));

        assert_eq!(mock.request_count(), 0);
        assert!(notifier.received().is_empty());
        assert!(!page_one_is_stale(&cache).await);
    }

    #[tokio::test]
    async fn test_edit_failure_keeps_dialog_open() {
        let mut mock = MockApi::new();
        mock.expect_update(ProjectId(1))
            .return_err(ApiError::unprocessable("Name already taken"));
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let project = Project::new(1, "Alpha", "first");
        let mut form = dialog(EditProject::new(project), Arc::new(mock.client()), cache.clone(), &notifier);

        form.set_field(Field::Name, "Beta");
        let err = form.submit().await.unwrap_err();

        assert_eq!(err, FormError::Api(ApiError::unprocessable("Name already taken")));
        assert!(form.is_open());
        assert_eq!(form.values().name, "Beta");
        assert_eq!(form.values().description, "first");
        assert_eq!(form.phase(), FormPhase::Idle);
        assert!(form.can_submit());
        assert_eq!(
            notifier.last(),
            Some(Notification {
                title: "Error".to_string(),
                message: "Name already taken".to_string(),
                kind: NotificationKind::Error,
            })
        );
        assert!(!page_one_is_stale(&cache).await);
        mock.verify();
    }

    #[tokio::test]
    async fn test_error_without_message_uses_fallback() {
        let mut mock = MockApi::new();
        mock.expect_create().return_err(ApiError::new(500, ""));
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let mut form = dialog(CreateProject, Arc::new(mock.client()), cache, &notifier);

        form.set_field(Field::Name, "Alpha");
        assert!(form.submit().await.is_err());

        let notification = notifier.last().unwrap();
        assert_eq!(notification.message, "Something went wrong.");
        assert_eq!(notification.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_edit_success_moves_baseline() {
        let mut mock = MockApi::new();
        mock.expect_update(ProjectId(1))
            .return_ok(Project::new(1, "Beta", "first"));
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let project = Project::new(1, "Alpha", "first");
        let mut form = dialog(EditProject::new(project), Arc::new(mock.client()), cache, &notifier);

        form.set_field(Field::Name, "Beta");
        form.submit().await.unwrap();

        assert_eq!(notifier.last().unwrap().message, "Project updated successfully.");
        assert_eq!(form.values().name, "Beta");
        assert!(!form.is_dirty());
        assert_eq!(form.mode().project().name, "Beta");
    }

    #[tokio::test]
    async fn test_cancel_restores_defaults_without_calls() {
        let mock = MockApi::new();
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let project = Project::new(1, "Alpha", "first");
        let mut form = dialog(EditProject::new(project), Arc::new(mock.client()), cache.clone(), &notifier);

        form.set_field(Field::Name, "");
        form.cancel();

        assert!(!form.is_open());
        assert_eq!(form.values().name, "Alpha");
        assert_eq!(mock.request_count(), 0);
        assert!(notifier.received().is_empty());
        assert!(!page_one_is_stale(&cache).await);
    }

    #[tokio::test]
    async fn test_submitting_phase_is_observable() {
        let (api, mut requests) = create_mock_api(10);
        let (cache, _pages) = warm_cache().await;
        let notifier = RecordingNotifier::new();
        let mut form = dialog(CreateProject, Arc::new(api), cache, &notifier);
        let mut phases = form.subscribe();

        form.set_field(Field::Name, "Alpha");
        let submit = tokio::spawn(async move {
            let result = form.submit().await;
            (form, result)
        });

        let (params, responder) = expect_create(&mut requests).await.unwrap();
        assert_eq!(params.name, "Alpha");
        assert_eq!(params.description, None);
        assert_eq!(*phases.borrow_and_update(), FormPhase::Submitting);

        responder.send(Ok(Project::new(7, "Alpha", ""))).unwrap();
        let (form, result) = submit.await.unwrap();

        assert!(result.is_ok());
        assert_eq!(form.phase(), FormPhase::Idle);
        phases.changed().await.unwrap();
        assert_eq!(*phases.borrow(), FormPhase::Idle);
    }
}
