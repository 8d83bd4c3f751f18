//! # Cancellation
//!
//! Interrompe una sessione su Ctrl+C. Il future di lavoro viene droppato
//! prima di tornare al chiamante: un processo Ghostscript in corso viene
//! terminato (`kill_on_drop`) e i file temporanei vengono rimossi.

use std::future::Future;

/// Run `work` until it completes or `cancel` resolves.
///
/// Returns `None` when cancelled; `work` has been dropped by then.
pub async fn until_cancelled<F, C>(work: F, cancel: C) -> Option<F::Output>
where
    F: Future,
    C: Future,
{
    tokio::select! {
        output = work => Some(output),
        _ = cancel => None,
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
