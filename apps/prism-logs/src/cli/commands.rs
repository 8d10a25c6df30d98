//! # CLI Command Implementations
//!
//! Authenticate, retrieve, write. One command per record kind, all sharing
//! the same flow.

use crate::config::Settings;
use crate::output::write_result_set;
use crate::retrieval::Retriever;
use crate::session::Session;
use chrono::Utc;
use prism_logs_core::{PrismError, RecordKind, TimeWindow};
use std::path::Path;

// =============================================================================
// RETRIEVE COMMAND
// =============================================================================

/// Authenticate against the configured Prism Central, then retrieve `kind`
/// over the configured window into the configured output file.
pub async fn cmd_retrieve(
    kind: RecordKind,
    settings: &Settings,
    keep_partial: bool,
) -> Result<(), PrismError> {
    let session = Session::new(settings.connection.clone())?;
    authenticate(&session).await?;

    retrieve_to_file(&session, kind, settings.window, &settings.output, keep_partial).await?;
    Ok(())
}

/// Run the identity probe and turn a rejection into an error.
pub async fn authenticate(session: &Session) -> Result<(), PrismError> {
    match session.authenticate().await {
        Ok(true) => {
            tracing::info!("Authentication successful");
            Ok(())
        }
        Ok(false) => {
            tracing::error!("Authentication failed");
            Err(PrismError::AuthenticationFailed {
                url: session.base_url().to_string(),
                user: session.connection().username.clone(),
            })
        }
        Err(e) if e.is_connectivity() => {
            tracing::error!(error = %e, "Prism Central is unreachable");
            Err(e)
        }
        Err(e) => {
            tracing::error!(error = %e, "Authentication probe failed");
            Err(e)
        }
    }
}

/// Retrieve `kind` over `window` and write the records to `output`.
///
/// Returns the number of records written. When the retrieval fails part-way
/// and `keep_partial` is set, the records collected before the failure are
/// written before the error is returned.
pub async fn retrieve_to_file(
    session: &Session,
    kind: RecordKind,
    window: TimeWindow,
    output: &Path,
    keep_partial: bool,
) -> Result<usize, PrismError> {
    tracing::info!(
        kind = %kind,
        start = %window.start(),
        end = %window.end(),
        "Getting {}s",
        kind
    );

    let retriever = Retriever::for_kind(kind, window, Utc::now());
    match retriever.run(session).await {
        Ok(results) => {
            tracing::info!(kind = %kind, "total log entries: {}", results.len());
            write_result_set(output, &results)?;
            Ok(results.len())
        }
        Err(err) => {
            if keep_partial && !err.partial.is_empty() {
                tracing::warn!(
                    kind = %kind,
                    records = err.partial.len(),
                    path = %output.display(),
                    "Writing partial results"
                );
                write_result_set(output, &err.partial)?;
            }
            Err(err.into_source())
        }
    }
}
