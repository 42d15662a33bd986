//! The modal add/edit dialog.

use super::error::FormError;
use super::fields::{Field, ProjectFields};
use super::mode::FormMode;
use super::validation::{validate, ValidationErrors};
use crate::api::ProjectApi;
use crate::model::Project;
use crate::notify::{NotificationKind, Notifier};
use crate::pages::{invalidate_resource, PageCache, PROJECTS};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

const FALLBACK_ERROR: &str = "Something went wrong.";

/// Where the dialog is in a submit. Success and failure both return to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
}

/// A project form shown in a dialog, parameterized by its [`FormMode`].
///
/// Submitting writes straight to the API. Once the write succeeds every
/// cached project page is invalidated, so the list refetches on its next
/// read.
///
/// ```rust,ignore
/// let mut dialog = FormDialog::new(CreateProject, api, cache, notifier);
/// dialog.open();
/// dialog.set_field(Field::Name, "Alpha");
/// let project = dialog.submit().await?;
/// assert!(!dialog.is_open());
/// ```
pub struct FormDialog<M: FormMode> {
    mode: M,
    api: Arc<dyn ProjectApi>,
    cache: PageCache,
    notifier: Arc<dyn Notifier>,
    values: ProjectFields,
    errors: ValidationErrors,
    open: bool,
    phase: watch::Sender<FormPhase>,
}

impl<M: FormMode> FormDialog<M> {
    pub fn new(mode: M, api: Arc<dyn ProjectApi>, cache: PageCache, notifier: Arc<dyn Notifier>) -> Self {
        let (phase, _) = watch::channel(FormPhase::Idle);
        Self {
            values: mode.defaults(),
            mode,
            api,
            cache,
            notifier,
            errors: ValidationErrors::default(),
            open: false,
            phase,
        }
    }

    pub fn open(&mut self) {
        debug!(form = self.mode.title(), "Open");
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn values(&self) -> &ProjectFields {
        &self.values
    }

    /// Replaces one input's text and clears its validation message.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value.into());
        self.errors.clear(field);
    }

    /// Messages from the last [`validate`](Self::validate) or submit.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormPhase> {
        self.phase.subscribe()
    }

    /// True when any value, as it would be saved, differs from the mode's
    /// defaults. Whitespace around the name does not count.
    pub fn is_dirty(&self) -> bool {
        self.values.normalized() != self.mode.defaults().normalized()
    }

    pub fn can_submit(&self) -> bool {
        self.open
            && self.phase() == FormPhase::Idle
            && (!self.mode.requires_changes() || self.is_dirty())
    }

    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        let result = validate(&self.values, self.mode.required());
        self.errors = result.clone().err().unwrap_or_default();
        result
    }

    /// Validates and saves the form. A closed dialog never writes.
    ///
    /// On success the user is notified, the dialog closes and resets, and
    /// the project pages are invalidated. On an API error the user is
    /// notified and the dialog stays open with its values, ready to retry.
    #[instrument(skip(self), fields(form = self.mode.title()))]
    pub async fn submit(&mut self) -> Result<Project, FormError> {
        if !self.open {
            debug!("Rejected, dialog closed");
            return Err(FormError::Closed);
        }
        if let Err(errors) = self.validate() {
            debug!(%errors, "Rejected");
            return Err(FormError::Validation(errors));
        }
        if self.mode.requires_changes() && !self.is_dirty() {
            return Err(FormError::NothingToSave);
        }

        self.phase.send_replace(FormPhase::Submitting);
        let result = self.mode.save(self.api.as_ref(), &self.values).await;
        self.phase.send_replace(FormPhase::Idle);

        match result {
            Ok(saved) => {
                info!(id = %saved.id, "Saved");
                self.notifier.notify(
                    "Success!",
                    self.mode.success_message(),
                    NotificationKind::Success,
                );
                self.open = false;
                self.mode.on_success(&saved);
                self.values = self.mode.defaults();
                self.errors = ValidationErrors::default();
                match invalidate_resource(&self.cache, PROJECTS).await {
                    Ok(marked) => debug!(marked, "Pages invalidated"),
                    Err(e) => warn!(error = %e, "Could not invalidate pages"),
                }
                Ok(saved)
            }
            Err(FormError::Api(e)) => {
                warn!(status = e.status, message = %e.message, "Save failed");
                let message = if e.message.trim().is_empty() {
                    FALLBACK_ERROR
                } else {
                    e.message.as_str()
                };
                self.notifier.notify("Error", message, NotificationKind::Error);
                Err(FormError::Api(e))
            }
            Err(other) => Err(other),
        }
    }

    /// Discards edits and closes. Nothing is sent or invalidated.
    pub fn cancel(&mut self) {
        debug!(form = self.mode.title(), dirty = self.is_dirty(), "Cancel");
        self.values = self.mode.defaults();
        self.errors = ValidationErrors::default();
        self.open = false;
    }
}
