//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over a
//! [`SessionController`](docqa_application::SessionController).

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::{ChatRepl, FileLoader};

use docqa_application::SessionController;
use std::future::Future;

/// Drive `request` to completion, cancelling it when Ctrl-C arrives.
///
/// The request still resolves through its failure path after a cancel, so
/// the caller always gets its output.
pub async fn cancel_on_ctrl_c<F: Future>(controller: &SessionController, request: F) -> F::Output {
    tokio::pin!(request);
    loop {
        tokio::select! {
            output = &mut request => return output,
            signal = tokio::signal::ctrl_c() => {
                if signal.is_err() {
                    // No signal handler available; just wait for the request
                    return request.await;
                }
                if controller.cancel() {
                    tracing::info!("Cancelling outstanding request");
                }
            }
        }
    }
}
