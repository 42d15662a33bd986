//! # Mock API
//!
//! Two ways to stand in for the backend in tests:
//!
//! - [`MockApi`]: queue expectations up front (`expect_list(...).return_ok(...)`),
//!   hand out its client, and call [`MockApi::verify`] at the end. Requests are
//!   answered immediately, in order.
//! - [`create_mock_api`]: get a client and the raw request receiver, then use
//!   [`expect_list`], [`expect_create`] or [`expect_update`] to answer each
//!   request yourself. Use this when the test must observe a request while it
//!   is still in flight.
//!
//! ```rust,ignore
//! let mut mock = MockApi::new();
//! mock.expect_list(0, 5).return_ok(rows);
//! mock.expect_create().return_err(ApiError::unprocessable("Name taken"));
//!
//! let api = mock.client();
//! // ... drive the list or a form ...
//! mock.verify();
//! ```

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::message::{ApiRequest, Reply};
use crate::model::{Project, ProjectCreate, ProjectId, ProjectUpdate};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    List {
        skip: u32,
        limit: u32,
        response: Result<Vec<Project>, ApiError>,
    },
    Create {
        response: Result<Project, ApiError>,
    },
    Update {
        id: ProjectId,
        response: Result<Project, ApiError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock backend with expectation tracking for fluent testing.
///
/// A request that does not match the next expectation is answered with a 500
/// and recorded; [`verify`](Self::verify) reports it.
pub struct MockApi {
    client: ApiClient,
    expectations: Expectations,
    requests: Arc<AtomicUsize>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ApiRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let requests = Arc::new(AtomicUsize::new(0));
        let mismatches = Arc::new(Mutex::new(Vec::new()));

        let handle = tokio::spawn({
            let expectations = expectations.clone();
            let requests = requests.clone();
            let mismatches = mismatches.clone();
            async move {
                while let Some(request) = receiver.recv().await {
                    requests.fetch_add(1, Ordering::SeqCst);
                    let expectation = expectations.lock().unwrap().pop_front();
                    if let Some(unexpected) = answer(request, expectation) {
                        mismatches.lock().unwrap().push(unexpected);
                    }
                }
            }
        });

        Self {
            client: ApiClient::new(sender),
            expectations,
            requests,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ApiClient {
        self.client.clone()
    }

    /// Number of requests received so far, matched or not.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Expects a `list` call with exactly this window.
    pub fn expect_list(&mut self, skip: u32, limit: u32) -> ListExpectationBuilder {
        ListExpectationBuilder {
            skip,
            limit,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `create` call.
    pub fn expect_create(&mut self) -> CreateExpectationBuilder {
        CreateExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `update` call for `id`.
    pub fn expect_update(&mut self, id: ProjectId) -> UpdateExpectationBuilder {
        UpdateExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", *mismatches);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Replies to `request` from `expectation`, or describes the mismatch.
fn answer(request: ApiRequest, expectation: Option<Expectation>) -> Option<String> {
    match (request, expectation) {
        (
            ApiRequest::List {
                skip,
                limit,
                respond_to,
            },
            Some(Expectation::List {
                skip: want_skip,
                limit: want_limit,
                response,
            }),
        ) if skip == want_skip && limit == want_limit => {
            let _ = respond_to.send(response);
            None
        }
        (ApiRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            let _ = respond_to.send(response);
            None
        }
        (
            ApiRequest::Update { id, respond_to, .. },
            Some(Expectation::Update {
                id: want_id,
                response,
            }),
        ) if id == want_id => {
            let _ = respond_to.send(response);
            None
        }
        (request, _) => {
            let description = format!("{request:?}");
            reject(request);
            Some(description)
        }
    }
}

fn reject(request: ApiRequest) {
    let error = ApiError::new(500, "Unexpected request");
    match request {
        ApiRequest::List { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        ApiRequest::Create { respond_to, .. } | ApiRequest::Update { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        ApiRequest::Delete { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
    }
}

/// Builder for `list` expectations.
pub struct ListExpectationBuilder {
    skip: u32,
    limit: u32,
    expectations: Expectations,
}

impl ListExpectationBuilder {
    /// Sets the expectation to return these rows.
    pub fn return_ok(self, rows: Vec<Project>) {
        self.push(Ok(rows));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<Project>, ApiError>) {
        self.expectations.lock().unwrap().push_back(Expectation::List {
            skip: self.skip,
            limit: self.limit,
            response,
        });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder {
    expectations: Expectations,
}

impl CreateExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, project: Project) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Create {
            response: Ok(project),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Create {
            response: Err(error),
        });
    }
}

/// Builder for `update` expectations.
pub struct UpdateExpectationBuilder {
    id: ProjectId,
    expectations: Expectations,
}

impl UpdateExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, project: Project) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Update {
            id: self.id,
            response: Ok(project),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Update {
            id: self.id,
            response: Err(error),
        });
    }
}

// =============================================================================
// MANUAL HELPERS
// =============================================================================

/// Creates an API client and the receiver its requests arrive on.
///
/// Nothing answers the requests until the test does, so the caller stays
/// suspended at the network boundary for as long as the test needs.
pub fn create_mock_api(buffer_size: usize) -> (ApiClient, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ApiClient::new(sender), receiver)
}

/// Helper to verify that the next message is a List request
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(u32, u32, Reply<Vec<Project>>)> {
    match receiver.recv().await {
        Some(ApiRequest::List {
            skip,
            limit,
            respond_to,
        }) => Some((skip, limit, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(ProjectCreate, Reply<Project>)> {
    match receiver.recv().await {
        Some(ApiRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(ProjectId, ProjectUpdate, Reply<Project>)> {
    match receiver.recv().await {
        Some(ApiRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProjectApi;

    #[tokio::test]
    async fn test_mock_api() {
        let (client, mut receiver) = create_mock_api(10);

        let create_task = tokio::spawn(async move {
            let params = ProjectCreate {
                name: "Alpha".to_string(),
                description: None,
            };
            client.create(params).await
        });

        let (params, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(params.name, "Alpha");
        responder.send(Ok(Project::new(1, "Alpha", ""))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(Project::new(1, "Alpha", "")));
    }

    #[tokio::test]
    async fn test_mock_api_with_expectations() {
        let mut mock = MockApi::new();
        mock.expect_list(0, 5)
            .return_ok(vec![Project::new(1, "Alpha", "first")]);
        mock.expect_update(ProjectId(1))
            .return_err(ApiError::not_found("Project"));

        let api = mock.client();
        let rows = api.list(0, 5).await.unwrap();
        assert_eq!(rows.len(), 1);

        let err = api
            .update(ProjectId(1), ProjectUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.request_count(), 2);

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_api_records_mismatch() {
        let mut mock = MockApi::new();
        mock.expect_list(0, 5).return_ok(vec![]);

        let err = mock.client().list(5, 5).await.unwrap_err();
        assert_eq!(err.status, 500);

        let verified = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verified.is_err());
    }
}
