/// Initializes the tracing subscriber for the demo binary.
///
/// Verbosity comes from `RUST_LOG`, for example:
/// - `RUST_LOG=info` - saves, invalidations and lifecycle events
/// - `RUST_LOG=project_admin=debug` - every cache hit, fetch and page transition
///
/// Calling it twice panics; tests should not call it at all.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
