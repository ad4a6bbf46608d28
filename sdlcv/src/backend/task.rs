//! Backend dispatcher task.
//!
//! Receives `BackendRequest`s from the UI thread and spawns one tokio task
//! per request, so slow calls in one action family (a 60-second analysis)
//! never delay another (a chat question). Each task reports back exactly one
//! `AppEvent::Backend` message; the UI thread folds it into state.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{info, warn};

use sdlcv_core::error::VerifierError;

use crate::event::AppEvent;

use super::client::BackendClient;
use super::types::{BackendRequest, BackendResult, ReportPackage};

/// Spawns the dispatcher. Runs until the request sender is dropped.
pub fn spawn_backend_task(
    client: BackendClient,
    mut rx: mpsc::UnboundedReceiver<BackendRequest>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = handle_request(&client, request).await;
                let _ = tx.send(AppEvent::Backend(Box::new(result)));
            });
        }
    });
}

/// Executes one request to completion and wraps its outcome.
async fn handle_request(client: &BackendClient, request: BackendRequest) -> BackendResult {
    match request {
        BackendRequest::Upload { files } => {
            info!(count = files.len(), "uploading files");
            let result = client.upload(files).await;
            if let Err(ref err) = result {
                warn!(%err, "upload failed");
            }
            BackendResult::Upload(result)
        }
        BackendRequest::Analyze => {
            info!("starting analysis");
            let result = client.analyze().await;
            if let Err(ref err) = result {
                warn!(%err, "analysis failed");
            }
            BackendResult::Analyze(result)
        }
        BackendRequest::GeneratePdf(package) => {
            let result = export_pdf(client, &package).await;
            if let Err(ref err) = result {
                warn!(%err, "pdf export failed");
            }
            BackendResult::Export(result)
        }
        BackendRequest::SendToReviewer(package) => {
            info!("sending report to reviewer");
            let result = client.send_to_reviewer(&package).await;
            if let Err(ref err) = result {
                warn!(%err, "handoff failed");
            }
            BackendResult::Handoff(result)
        }
        BackendRequest::Chat { message } => {
            let result = client.chat(&message).await;
            if let Err(ref err) = result {
                warn!(%err, "chat request failed");
            }
            BackendResult::Chat(result)
        }
        BackendRequest::SignIn { email, password, reviewer } => {
            let result = client.sign_in(&email, &password, reviewer).await;
            match &result {
                Ok(session) => info!(user_id = %session.user_id, "signed in"),
                Err(err) => warn!(%err, "sign-in failed"),
            }
            BackendResult::SignIn(result)
        }
        BackendRequest::Register { email, password } => {
            let result = client.register(&email, &password).await;
            if let Err(ref err) = result {
                warn!(%err, "registration failed");
            }
            BackendResult::Register(result)
        }
        BackendRequest::SubmitReview(feedback) => {
            info!(bundle = %feedback.bundle_id, "submitting review feedback");
            let result = client.submit_review(&feedback).await;
            if let Err(ref err) = result {
                warn!(%err, "review submission failed");
            }
            BackendResult::Review(result)
        }
    }
}

/// Fetches the rendered PDF and saves it with the deterministic report name.
///
/// The filename carries the local date so repeated exports on the same day
/// overwrite the same artifact rather than piling up copies.
async fn export_pdf(
    client: &BackendClient,
    package: &ReportPackage,
) -> Result<PathBuf, VerifierError> {
    let bytes = client.generate_pdf(package).await?;
    let name = format!(
        "SDLC_Verification_Report_{}.pdf",
        chrono::Local::now().format("%Y-%m-%d")
    );
    let path = PathBuf::from(name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| VerifierError::Validation(format!("Cannot save report: {e}")))?;
    info!(path = %path.display(), "report saved");
    Ok(path)
}
