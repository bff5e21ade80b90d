// Author: Dustin Pilgrim
// License: MIT

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use tokio::sync::watch;

use wayland_client::{
    Connection, Dispatch, QueueHandle,
    protocol::{wl_registry, wl_seat::WlSeat},
};
use wayland_protocols::ext::idle_notify::v1::client::{
    ext_idle_notification_v1::{Event as IdleEvent, ExtIdleNotificationV1},
    ext_idle_notifier_v1::ExtIdleNotifierV1,
};

/// Seconds elapsed since the last input event. The tracker consumes this
/// through ticks; it never talks to the sensor backend directly.
pub trait IdleSensor: Send + Sync {
    fn idle_seconds(&self) -> u64;
}

/// How long the compositor waits before reporting an idle edge. Input gaps
/// shorter than this read as zero idle, which is far below any sane
/// idle-wait threshold.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct ClockInner {
    /// Set while the compositor reports the seat idle; pinned to the instant
    /// input actually stopped (edge time minus the notification timeout).
    idle_origin: Option<Instant>,
}

/// Shared activity clock fed by the Wayland listener and read by the ticker.
///
/// Starts out non-idle, so environments without the idle-notify protocol
/// degrade to "always active" rather than poisoning the journal.
#[derive(Debug)]
pub struct ActivityClock {
    inner: Mutex<ClockInner>,
}

impl ActivityClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(ClockInner { idle_origin: None }),
        })
    }

    fn mark_idled(&self) {
        let origin = Instant::now()
            .checked_sub(NOTIFY_TIMEOUT)
            .unwrap_or_else(Instant::now);

        if let Ok(mut inner) = self.inner.lock() {
            inner.idle_origin = Some(origin);
        }
    }

    fn mark_resumed(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.idle_origin = None;
        }
    }
}

impl IdleSensor for ActivityClock {
    fn idle_seconds(&self) -> u64 {
        match self.inner.lock() {
            Ok(inner) => inner
                .idle_origin
                .map(|origin| origin.elapsed().as_secs())
                .unwrap_or(0),
            Err(_) => 0,
        }
    }
}

// ---------------- Wayland listener ----------------

#[derive(Debug)]
pub enum IdleError {
    Connect(String),
    Roundtrip(String),
    Unsupported,
}

impl std::fmt::Display for IdleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdleError::Connect(s) => write!(f, "wayland connect failed: {s}"),
            IdleError::Roundtrip(s) => write!(f, "wayland roundtrip failed: {s}"),
            IdleError::Unsupported => {
                write!(f, "compositor lacks ext_idle_notifier_v1 or wl_seat")
            }
        }
    }
}

impl std::error::Error for IdleError {}

struct WaylandState {
    clock: Arc<ActivityClock>,

    idle_notifier: Option<ExtIdleNotifierV1>,
    seat: Option<WlSeat>,
    notification: Option<ExtIdleNotificationV1>,
}

impl WaylandState {
    fn new(clock: Arc<ActivityClock>) -> Self {
        Self {
            clock,
            idle_notifier: None,
            seat: None,
            notification: None,
        }
    }
}

impl Dispatch<wl_registry::WlRegistry, ()> for WaylandState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name, interface, ..
        } = event
        {
            match interface.as_str() {
                "ext_idle_notifier_v1" => {
                    // Version 1 is enough for our needs.
                    state.idle_notifier =
                        Some(registry.bind::<ExtIdleNotifierV1, _, _>(name, 1, qh, ()));
                }
                "wl_seat" => {
                    state.seat = Some(registry.bind::<WlSeat, _, _>(name, 1, qh, ()));
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<ExtIdleNotifierV1, ()> for WaylandState {
    fn event(
        _: &mut Self,
        _: &ExtIdleNotifierV1,
        _: <ExtIdleNotifierV1 as wayland_client::Proxy>::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        // no-op
    }
}

impl Dispatch<WlSeat, ()> for WaylandState {
    fn event(
        _: &mut Self,
        _: &WlSeat,
        _: wayland_client::protocol::wl_seat::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        // no-op
    }
}

impl Dispatch<ExtIdleNotificationV1, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _: &ExtIdleNotificationV1,
        event: IdleEvent,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        // Transition-based, not polled: the compositor tells us about the
        // edges and the clock interpolates the duration in between.
        match event {
            IdleEvent::Idled => state.clock.mark_idled(),
            IdleEvent::Resumed => state.clock.mark_resumed(),
            _ => {}
        }
    }
}

/// Spawnable idle listener.
///
/// - Connects to Wayland from env
/// - Sets up ext_idle_notifier_v1 with a short timeout
/// - Runs a blocking dispatch loop in a blocking task
pub async fn run_idle_listener(
    clock: Arc<ActivityClock>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), IdleError> {
    let timeout_ms = NOTIFY_TIMEOUT.as_millis() as u32;

    tracing::info!("idle listener starting (notify_timeout_ms={})", timeout_ms);

    let conn = Connection::connect_to_env().map_err(|e| IdleError::Connect(e.to_string()))?;
    let mut event_queue = conn.new_event_queue();
    let qh = event_queue.handle();
    let display = conn.display();

    let mut state = WaylandState::new(clock);

    // Bind globals
    let _registry = display.get_registry(&qh, ());
    event_queue
        .roundtrip(&mut state)
        .map_err(|e| IdleError::Roundtrip(e.to_string()))?;

    let (Some(notifier), Some(seat)) = (&state.idle_notifier, &state.seat) else {
        return Err(IdleError::Unsupported);
    };

    state.notification = Some(notifier.get_idle_notification(timeout_ms, seat, &qh, ()));
    tracing::info!("idle listener: ext_idle_notifier_v1 active");

    let stop = Arc::new(AtomicBool::new(false));
    let stop2 = Arc::clone(&stop);

    // Shutdown watcher
    tokio::spawn(async move {
        loop {
            if *shutdown.borrow() {
                stop2.store(true, Ordering::Relaxed);
                break;
            }
            if shutdown.changed().await.is_err() {
                stop2.store(true, Ordering::Relaxed);
                break;
            }
        }
    });

    // Run Wayland dispatch in a blocking task.
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = event_queue.blocking_dispatch(&mut state) {
                // Non-fatal; a compositor restart just stops the listener and
                // the clock freezes in its last state.
                tracing::error!("idle listener: dispatch error: {}", e);
                break;
            }
        }

        tracing::info!("idle listener stopping");
    });

    Ok(())
}
