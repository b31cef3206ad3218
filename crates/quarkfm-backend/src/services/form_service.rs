use quarkfm_bridge::api::{FormOutcome, FormRequest};
use tokio::sync::oneshot;

/// Handles an incoming form submission (see
/// [`quarkfm_bridge::MessageToBackend::SubmitFormRequest`]) and replies with
/// the parsed response or the transport failure.
pub async fn handle_submit_form_request(
    context: super::AppContextHandle,
    request: FormRequest,
    reply: oneshot::Sender<FormOutcome>,
) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        let outcome = super::into_outcome(remote.submit_form(&request).await);
        if let Err(e) = &outcome {
            log::warn!("Form {} {} failed: {e}", request.method.as_str(), request.action);
        }
        if reply.send(outcome).is_err() {
            log::debug!("Form reply dropped, the requesting view is gone");
        }
    });
}
