use std::future::Future;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{AdvisoryRecord, WatchList};
use crate::notify::{Delivery, Notifier};
use crate::report::message;
use crate::source::Row;
use crate::store::StateStore;
use crate::tracker::differ::{classify, ActiveEntry, ChangeKind, Classification};
use crate::tracker::normalizer::normalize;

#[derive(Debug, Clone, Copy)]
pub struct CycleOptions {
    /// Send a liveness message when nothing is active.
    pub heartbeat: bool,
    /// Persist the new state. Off for `--no-save`.
    pub save: bool,
}

/// Everything one cycle decided, for reporting.
#[derive(Debug)]
pub struct CycleOutcome {
    pub classification: Classification,
    pub message: Option<String>,
    pub delivery: Option<Delivery>,
    pub saved: bool,
}

/// JSON form of a [`CycleOutcome`].
#[derive(Debug, Serialize)]
pub struct CycleSummary<'a> {
    pub change: ChangeKind,
    pub notified: bool,
    pub delivery: Option<&'a Delivery>,
    pub message: Option<&'a str>,
    pub saved: bool,
    pub active: &'a [ActiveEntry],
    pub released: &'a [AdvisoryRecord],
}

impl CycleOutcome {
    pub fn summary(&self) -> CycleSummary<'_> {
        CycleSummary {
            change: self.classification.kind(),
            notified: self.delivery.as_ref().is_some_and(Delivery::is_sent),
            delivery: self.delivery.as_ref(),
            message: self.message.as_deref(),
            saved: self.saved,
            active: self.classification.active(),
            released: self.classification.released(),
        }
    }
}

/// Obtain rows from `source`, then run the cycle over them.
///
/// A failed source aborts before the store is read or written and before
/// anything is sent.
pub async fn run_from_source<F, S, N>(
    source: F,
    watch: &WatchList,
    store: &S,
    notifier: &N,
    options: CycleOptions,
) -> Result<CycleOutcome>
where
    F: Future<Output = Result<Vec<Row>>>,
    S: StateStore,
    N: Notifier,
{
    let rows = source.await.context("obtaining advisory rows")?;
    info!(rows = rows.len(), watch = %watch, "rows loaded");
    run_cycle(&rows, watch, store, notifier, options).await
}

/// Run one polling cycle over already-scraped rows.
///
/// The previous state is read once and the new state written at most once,
/// after classification and delivery. A failed delivery does not stop the
/// write. Only a failed write is an error.
pub async fn run_cycle<S, N>(
    rows: &[Row],
    watch: &WatchList,
    store: &S,
    notifier: &N,
    options: CycleOptions,
) -> Result<CycleOutcome>
where
    S: StateStore,
    N: Notifier,
{
    let prev = store.read_state();
    let curr = normalize(rows, watch);
    let classification = classify(&prev, &curr);

    info!(
        previous = prev.len(),
        current = curr.len(),
        change = %classification.kind(),
        "classified"
    );

    let message = match &classification {
        Classification::Quiet if options.heartbeat => Some(message::render_heartbeat(watch)),
        other => message::render(other, watch),
    };

    let delivery = match &message {
        Some(text) => {
            let delivery = notifier.notify(text).await;
            if let Delivery::Failed(reason) = &delivery {
                warn!(%reason, "notification not delivered; state will still be saved");
            }
            Some(delivery)
        }
        None => None,
    };

    // Unchanged runs keep the existing file; every other outcome stores `curr`
    // (empty for quiet and full-clear runs).
    let saved = options.save && !matches!(classification, Classification::Unchanged);
    if saved {
        store.write_state(&curr)?;
    }

    Ok(CycleOutcome {
        classification,
        message,
        delivery,
        saved,
    })
}
