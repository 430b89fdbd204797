use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::content::Project;

/// Application-level events. Input and tick events carry a monotonic
/// timestamp in milliseconds since startup.
#[derive(Debug, Clone)]
pub enum Event {
    /// User key press
    Key(KeyEvent),
    /// Mouse press, drag, release, move or wheel
    Mouse(MouseEvent, u64),
    /// Animation / render tick
    Tick(u64),
    /// Terminal resize
    Resize(u16, u16),
    /// A lazily fetched project page arrived
    ProjectLoaded(Box<Project>),
    /// A lazy project fetch failed
    ProjectFailed { slug: String, message: String },
}

/// Monotonic millisecond clock shared by the input and tick tasks
#[derive(Debug, Clone, Copy)]
pub struct EventClock {
    start: Instant,
}

impl EventClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for EventClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles event collection from multiple sources.
///
/// Uses crossterm's async `EventStream` (via `futures::StreamExt`) instead of
/// blocking `event::poll()` / `event::read()`, so no tokio worker thread is
/// ever blocked.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Create a new event handler. Spawns background tasks for async input and tick generation.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let clock = EventClock::new();

        // Async input task: crossterm's EventStream (non-blocking)
        let input_tx = tx.clone();
        let input_stop = stop.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                if input_stop.load(Ordering::Relaxed) {
                    return;
                }
                let maybe_event = reader.next().await;
                if input_stop.load(Ordering::Relaxed) {
                    return;
                }
                let event = match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => Event::Mouse(mouse, clock.now_ms()),
                    Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                    // Stream ended or errored; exit gracefully
                    Some(Err(_)) | None => return,
                    _ => continue,
                };
                if input_tx.send(event).is_err() {
                    return;
                }
            }
        });

        // Tick task
        let tick_tx = tx.clone();
        let tick_stop = stop.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(tick_rate_ms.max(1)));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tick_stop.load(Ordering::Relaxed) {
                    return;
                }
                if tick_tx.send(Event::Tick(clock.now_ms())).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx, stop }
    }

    /// Get a clone of the sender for forwarding background results
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal all background tasks to stop
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// True for mouse events that are plain motion without a button held.
/// Terminals emit a lot of these; the loop skips redrawing for them
/// unless hover changed.
pub fn is_hover_motion(mouse: &MouseEvent) -> bool {
    matches!(mouse.kind, MouseEventKind::Moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn clock_is_monotonic() {
        let clock = EventClock::new();
        let a = clock.now_ms();
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.now_ms() >= a + 1);
    }

    #[test]
    fn motion_is_recognised() {
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert!(is_hover_motion(&moved));
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            ..moved
        };
        assert!(!is_hover_motion(&wheel));
    }
}
