//! Serialized event hub.
//!
//! One task owns the [`Hud`] and drains a single mpsc queue. Speech from the
//! device, rest timer ticks and metric ingestion all arrive as [`HubEvent`]s,
//! so every mutation runs to completion before the next one starts.
//!
//! The macro cache save is the one piece of disk I/O the hub triggers. It
//! runs on the blocking pool, chained behind the previous save so writes
//! land in order, and never holds up the queue.

use chrono::{DateTime, Utc};
use hud_core::{
    Error, Hud, MacroSnapshot, Metric, MetricsApplied, Result, SessionState, TickOutcome,
    TimerChange, TimerToken,
};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const QUEUE_DEPTH: usize = 64;

/// Outbound display channel of one connected device
pub type DisplaySender = mpsc::UnboundedSender<String>;

#[derive(Debug)]
pub enum HubEvent {
    Speech {
        device: Uuid,
        text: String,
        is_final: bool,
    },
    Tick(TimerToken),
    Metrics {
        metrics: Vec<Metric>,
        ack: oneshot::Sender<MetricsApplied>,
    },
    Attach {
        device: Uuid,
        display: DisplaySender,
    },
    Detach {
        device: Uuid,
    },
    Snapshot {
        reply: oneshot::Sender<HubSnapshot>,
    },
}

/// Point-in-time view of the hub, for health checks and tests
#[derive(Clone, Debug)]
pub struct HubSnapshot {
    pub session: SessionState,
    pub macros: MacroSnapshot,
    pub rest_seconds_remaining: u32,
    pub rest_running: bool,
    pub device: Option<Uuid>,
    pub display: String,
}

/// The single active device session
struct DeviceSlot {
    id: Uuid,
    connected_at: DateTime<Utc>,
    display: DisplaySender,
}

/// Cloneable handle for submitting events to the hub
#[derive(Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubEvent>,
}

impl HubHandle {
    async fn send(&self, event: HubEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| Error::Other("event hub has stopped".into()))
    }

    /// Register a device as the active session, superseding any other
    pub async fn attach(&self, display: DisplaySender) -> Result<Uuid> {
        let device = Uuid::new_v4();
        self.send(HubEvent::Attach { device, display }).await?;
        Ok(device)
    }

    pub async fn detach(&self, device: Uuid) -> Result<()> {
        self.send(HubEvent::Detach { device }).await
    }

    pub async fn speech(&self, device: Uuid, text: String, is_final: bool) -> Result<()> {
        self.send(HubEvent::Speech {
            device,
            text,
            is_final,
        })
        .await
    }

    /// Apply metrics and wait for the in-memory update to land
    pub async fn metrics(&self, metrics: Vec<Metric>) -> Result<MetricsApplied> {
        let (ack, rx) = oneshot::channel();
        self.send(HubEvent::Metrics { metrics, ack }).await?;
        rx.await
            .map_err(|_| Error::Other("event hub dropped metrics update".into()))
    }

    pub async fn snapshot(&self) -> Result<HubSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(HubEvent::Snapshot { reply }).await?;
        rx.await
            .map_err(|_| Error::Other("event hub dropped snapshot request".into()))
    }
}

pub struct Hub {
    hud: Hud<'static>,
    device: Option<DeviceSlot>,
    ticker: Option<JoinHandle<()>>,
    saver: Option<JoinHandle<()>>,
    // Weak so the hub stops once every external handle is gone
    tick_tx: mpsc::WeakSender<HubEvent>,
}

impl Hub {
    /// Spawn the hub task and return a handle to it
    pub fn spawn(hud: Hud<'static>) -> HubHandle {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let hub = Hub {
            hud,
            device: None,
            ticker: None,
            saver: None,
            tick_tx: tx.downgrade(),
        };
        tokio::spawn(hub.run(rx));
        HubHandle { tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<HubEvent>) {
        tracing::debug!("Event hub started");
        while let Some(event) = rx.recv().await {
            self.handle(event);
        }
        self.stop_ticker();
        if let Some(saver) = self.saver.take() {
            let _ = saver.await;
        }
        tracing::debug!("Event hub stopped");
    }

    fn handle(&mut self, event: HubEvent) {
        match event {
            HubEvent::Speech {
                device,
                text,
                is_final,
            } => {
                if !self.is_active(device) {
                    tracing::debug!(%device, "Ignoring speech from inactive device");
                    return;
                }
                let update = self.hud.on_speech(&text, is_final);
                match update.timer {
                    TimerChange::Started(token) => self.start_ticker(token),
                    TimerChange::Cancelled => self.stop_ticker(),
                    TimerChange::Unchanged => {}
                }
                if update.refresh {
                    self.refresh();
                }
            }
            HubEvent::Tick(token) => match self.hud.on_tick(token) {
                TickOutcome::Stale => {}
                TickOutcome::Ticking => self.refresh(),
                TickOutcome::Expired => {
                    self.stop_ticker();
                    self.refresh();
                }
            },
            HubEvent::Metrics { metrics, ack } => {
                let outcome = self.hud.update_macros(&metrics);
                self.persist_macros(outcome.snapshot.clone());
                let _ = ack.send(outcome);
                self.refresh();
            }
            HubEvent::Attach { device, display } => {
                let slot = DeviceSlot {
                    id: device,
                    connected_at: Utc::now(),
                    display,
                };
                if let Some(old) = self.device.replace(slot) {
                    tracing::info!(
                        old = %old.id,
                        connected_at = %old.connected_at,
                        "Device session superseded"
                    );
                }
                tracing::info!(%device, "Device connected");
                self.refresh();
            }
            HubEvent::Detach { device } => {
                if self.is_active(device) {
                    self.device = None;
                    tracing::info!(%device, "Device disconnected");
                }
            }
            HubEvent::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn is_active(&self, device: Uuid) -> bool {
        self.device.as_ref().is_some_and(|slot| slot.id == device)
    }

    /// Push the current render to the active device, if any
    fn refresh(&mut self) {
        let Some(slot) = &self.device else {
            return;
        };
        if slot.display.send(self.hud.render()).is_err() {
            tracing::info!(device = %slot.id, "Device display closed, clearing session");
            self.device = None;
        }
    }

    fn start_ticker(&mut self, token: TimerToken) {
        self.stop_ticker();
        let tx = self.tick_tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(tx) = tx.upgrade() else { break };
                if tx.send(HubEvent::Tick(token)).await.is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Save the macro cache off the hub task, after any earlier save
    fn persist_macros(&mut self, snapshot: MacroSnapshot) {
        let path = self.hud.macro_cache_path().to_path_buf();
        let previous = self.saver.take();
        self.saver = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            let saved =
                tokio::task::spawn_blocking(move || hud_core::macros::persist(&snapshot, &path))
                    .await;
            if let Err(e) = saved {
                tracing::warn!("Macro cache save task failed: {}", e);
            }
        }));
    }

    fn snapshot(&self) -> HubSnapshot {
        HubSnapshot {
            session: self.hud.session().clone(),
            macros: self.hud.macros().clone(),
            rest_seconds_remaining: self.hud.timer().seconds_remaining(),
            rest_running: self.hud.timer().is_running(),
            device: self.device.as_ref().map(|slot| slot.id),
            display: self.hud.render(),
        }
    }
}
