//! Frame scheduling for animations.
//!
//! Callbacks are registered for "the next frame" and run when the owner of
//! the clock drains it with a timestamp. The UI loop drains with the real
//! elapsed milliseconds on every tick; tests drain with virtual timestamps.
//!
//! A registration cancels its callback when cancelled or dropped, so an
//! animation that is replaced can never write again.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub type FrameCallback = Box<dyn FnOnce(u64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameCallbackId(u64);

/// Anything that can run a callback on the next animation frame.
pub trait FrameScheduler {
    /// Schedule `callback` for the next frame. It receives the frame time in ms.
    fn schedule(&self, callback: FrameCallback) -> FrameCallbackRegistration;

    /// Timestamp (ms) of the most recent frame.
    fn now_ms(&self) -> u64;
}

#[derive(Default)]
struct ClockInner {
    next_id: u64,
    now_ms: u64,
    pending: Vec<(FrameCallbackId, FrameCallback)>,
}

/// Single-threaded frame clock. Cloning shares the same callback queue.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameClock")
            .field("now_ms", &inner.now_ms)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let mut inner = self.inner.borrow_mut();
        let id = FrameCallbackId(inner.next_id);
        inner.next_id += 1;
        inner.pending.push((id, Box::new(callback)));
        FrameCallbackRegistration {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    #[cfg(test)]
    pub fn has_pending_callbacks(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Run every callback registered before this call with the given frame
    /// time. Callbacks registered while draining wait for the next frame.
    /// Time never moves backwards: an older timestamp is replaced by the
    /// last frame time. Returns the number of callbacks run.
    pub fn drain_frame_callbacks(&self, now_ms: u64) -> usize {
        let (frame_ms, batch) = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms = inner.now_ms.max(now_ms);
            (inner.now_ms, std::mem::take(&mut inner.pending))
        };
        let count = batch.len();
        for (_, callback) in batch {
            callback(frame_ms);
        }
        count
    }
}

impl FrameScheduler for FrameClock {
    fn schedule(&self, callback: FrameCallback) -> FrameCallbackRegistration {
        self.with_frame_millis(callback)
    }

    fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }
}

/// Handle to a scheduled frame callback.
#[derive(Debug)]
pub struct FrameCallbackRegistration {
    clock: Weak<RefCell<ClockInner>>,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    pub fn cancel(mut self) {
        self.cancel_in_place();
    }

    fn cancel_in_place(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(clock) = self.clock.upgrade() {
            // try_borrow_mut: a registration dropped by a callback while the
            // clock is draining has nothing left to remove anyway.
            if let Ok(mut inner) = clock.try_borrow_mut() {
                inner.pending.retain(|(pending_id, _)| *pending_id != id);
            }
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.cancel_in_place();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn drained_callbacks_receive_frame_time() {
        let clock = FrameClock::new();
        let seen = Rc::new(Cell::new(0u64));
        let seen_cb = Rc::clone(&seen);
        let _reg = clock.with_frame_millis(move |ms| seen_cb.set(ms));

        assert!(clock.has_pending_callbacks());
        assert_eq!(clock.drain_frame_callbacks(16), 1);
        assert_eq!(seen.get(), 16);
        assert!(!clock.has_pending_callbacks());
    }

    #[test]
    fn dropping_registration_cancels_callback() {
        let clock = FrameClock::new();
        let fired = Rc::new(Cell::new(false));
        let fired_cb = Rc::clone(&fired);
        let reg = clock.with_frame_millis(move |_| fired_cb.set(true));
        drop(reg);

        assert_eq!(clock.drain_frame_callbacks(16), 0);
        assert!(!fired.get());
    }

    #[test]
    fn explicit_cancel_only_removes_its_own_callback() {
        let clock = FrameClock::new();
        let count = Rc::new(Cell::new(0));
        let a = Rc::clone(&count);
        let b = Rc::clone(&count);
        let first = clock.with_frame_millis(move |_| a.set(a.get() + 1));
        let _second = clock.with_frame_millis(move |_| b.set(b.get() + 10));
        first.cancel();

        clock.drain_frame_callbacks(16);
        assert_eq!(count.get(), 10);
    }

    #[test]
    fn callbacks_registered_during_drain_wait_for_next_frame() {
        let clock = FrameClock::new();
        let frames = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::new(RefCell::new(None));

        let clock_cb = clock.clone();
        let frames_cb = Rc::clone(&frames);
        let keep_cb = Rc::clone(&keep);
        let _reg = clock.with_frame_millis(move |ms| {
            frames_cb.borrow_mut().push(ms);
            let frames_next = Rc::clone(&frames_cb);
            *keep_cb.borrow_mut() =
                Some(clock_cb.with_frame_millis(move |ms| frames_next.borrow_mut().push(ms)));
        });

        assert_eq!(clock.drain_frame_callbacks(16), 1);
        assert_eq!(*frames.borrow(), vec![16]);
        assert_eq!(clock.drain_frame_callbacks(32), 1);
        assert_eq!(*frames.borrow(), vec![16, 32]);
    }

    #[test]
    fn time_never_moves_backwards() {
        let clock = FrameClock::new();
        clock.drain_frame_callbacks(100);
        clock.drain_frame_callbacks(40);
        assert_eq!(clock.now_ms(), 100);
    }
}
