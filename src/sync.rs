//! Background server sync
//!
//! A single task on the app's runtime polls the remote source on a fixed
//! interval and takes commands from the UI. Results travel back as
//! `SyncEvent`s; the UI thread drains them and applies them to the store, so
//! the store itself never leaves the UI thread.

use crate::remote::QuoteSource;
use crate::types::Quote;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    SyncNow,
    Publish(Quote),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Fetched(Vec<Quote>),
    FetchFailed(String),
    Published(Quote),
    PublishFailed(String),
}

pub struct SyncHandle {
    commands: mpsc::UnboundedSender<SyncCommand>,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    cancel_token: CancellationToken,
}

impl SyncHandle {
    pub fn sync_now(&self) {
        self.send(SyncCommand::SyncNow);
    }

    pub fn publish(&self, quote: Quote) {
        self.send(SyncCommand::Publish(quote));
    }

    fn send(&self, command: SyncCommand) {
        if self.commands.send(command).is_err() {
            warn!("Sync loop is not running, command dropped");
        }
    }

    /// Next pending event without waiting
    pub fn try_next(&mut self) -> Option<SyncEvent> {
        self.events.try_recv().ok()
    }

    /// Wait for the next event, `None` once the loop has stopped
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<SyncEvent> {
        self.events.recv().await
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

pub struct SyncConfig {
    pub interval: Duration,
    /// Poll on the interval; when off only explicit commands hit the server
    pub auto_sync: bool,
}

/// Start the sync loop. The first poll happens immediately.
/// `notify` runs after every event so the UI can wake up.
pub fn spawn_sync_loop<S, F>(
    source: S,
    config: SyncConfig,
    notify: F,
    runtime: &tokio::runtime::Handle,
) -> SyncHandle
where
    S: QuoteSource,
    F: Fn() + Send + Sync + 'static,
{
    let (commands_tx, mut commands_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();
    let SyncConfig { interval, auto_sync } = config;

    runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = interval.as_secs(), auto_sync, "Sync loop started");

        loop {
            let event = tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick(), if auto_sync => fetch(&source).await,
                command = commands_rx.recv() => match command {
                    Some(SyncCommand::SyncNow) => fetch(&source).await,
                    Some(SyncCommand::Publish(quote)) => publish(&source, quote).await,
                    None => break,
                },
            };

            if events_tx.send(event).is_err() {
                break;
            }
            notify();
        }

        info!("Sync loop stopped");
    });

    SyncHandle {
        commands: commands_tx,
        events: events_rx,
        cancel_token,
    }
}

async fn fetch<S: QuoteSource>(source: &S) -> SyncEvent {
    match source.fetch_quotes().await {
        Ok(quotes) => {
            debug!(count = quotes.len(), "Fetched server quotes");
            SyncEvent::Fetched(quotes)
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch server quotes");
            SyncEvent::FetchFailed(e.to_string())
        }
    }
}

async fn publish<S: QuoteSource>(source: &S, quote: Quote) -> SyncEvent {
    match source.publish_quote(&quote).await {
        Ok(()) => SyncEvent::Published(quote),
        Err(e) => {
            warn!(error = %e, "Failed to post quote");
            SyncEvent::PublishFailed(e.to_string())
        }
    }
}
