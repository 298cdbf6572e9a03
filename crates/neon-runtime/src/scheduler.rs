//! Frame-callback scheduling
//!
//! The engine never blocks: after each frame it asks the host for another
//! callback and returns. Pausing cancels the outstanding request so no tick
//! arrives until the loop is resumed.

use crate::clock::FrameClock;
use tracing::debug;

/// Handle for one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Host-side frame callback registration (e.g. `requestAnimationFrame`)
pub trait FrameScheduler {
    /// Ask the host to call back on its next frame
    fn request_frame(&mut self) -> FrameToken;

    /// Release a callback that has not fired yet
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Scheduler for hosts that pump frames themselves (headless runs, tests).
///
/// It only hands out tokens; the host polls `FrameLoop::pending()` to find
/// out whether a frame is due.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        FrameToken(self.next_id)
    }

    // Tokens are never fired by this scheduler, so there is nothing to release
    fn cancel_frame(&mut self, _token: FrameToken) {}
}

/// Run state of the frame loop: at most one pending callback, a clock whose
/// baseline resets on every (re)start.
pub struct FrameLoop {
    scheduler: Box<dyn FrameScheduler>,
    clock: FrameClock,
    pending: Option<FrameToken>,
    running: bool,
}

impl FrameLoop {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            clock: FrameClock::new(),
            pending: None,
            running: false,
        }
    }

    /// Start (or resume) the loop. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.clock.reset();
        self.pending = Some(self.scheduler.request_frame());
        true
    }

    /// Stop the loop and release the pending callback.
    /// Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        if let Some(token) = self.pending.take() {
            debug!(token = token.0, "releasing pending frame callback");
            self.scheduler.cancel_frame(token);
        }
        true
    }

    /// Accept a frame callback. Returns the frame delta in seconds, or `None`
    /// if the loop is paused or the token is stale.
    pub fn begin_frame(&mut self, token: FrameToken, timestamp: f64) -> Option<f64> {
        if !self.running || self.pending != Some(token) {
            return None;
        }
        self.pending = None;
        Some(self.clock.tick(timestamp))
    }

    /// Request the next callback after a frame completed
    pub fn end_frame(&mut self) {
        if self.running && self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The callback the host owes us, if any
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        requested: Vec<FrameToken>,
        cancelled: Vec<FrameToken>,
    }

    struct SpyScheduler {
        log: Rc<RefCell<Log>>,
        inner: ManualScheduler,
    }

    impl FrameScheduler for SpyScheduler {
        fn request_frame(&mut self) -> FrameToken {
            let token = self.inner.request_frame();
            self.log.borrow_mut().requested.push(token);
            token
        }

        fn cancel_frame(&mut self, token: FrameToken) {
            self.inner.cancel_frame(token);
            self.log.borrow_mut().cancelled.push(token);
        }
    }

    fn spy_loop() -> (FrameLoop, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let scheduler = SpyScheduler {
            log: log.clone(),
            inner: ManualScheduler::new(),
        };
        (FrameLoop::new(Box::new(scheduler)), log)
    }

    #[test]
    fn test_start_requests_one_frame() {
        let (mut frames, log) = spy_loop();
        assert!(frames.start());
        assert!(!frames.start());
        assert_eq!(log.borrow().requested.len(), 1);
        assert_eq!(frames.pending(), Some(FrameToken(1)));
    }

    #[test]
    fn test_frame_cycle() {
        let (mut frames, log) = spy_loop();
        frames.start();
        let token = frames.pending().unwrap();
        assert_eq!(frames.begin_frame(token, 1.0), Some(0.0));
        assert_eq!(frames.pending(), None);
        frames.end_frame();
        let next = frames.pending().unwrap();
        assert_ne!(next, token);
        let dt = frames.begin_frame(next, 1.5).unwrap();
        assert!((dt - 0.25).abs() < 1e-9);
        assert_eq!(log.borrow().requested.len(), 2);
    }

    #[test]
    fn test_stale_token_rejected() {
        let (mut frames, _log) = spy_loop();
        frames.start();
        assert_eq!(frames.begin_frame(FrameToken(99), 0.0), None);
        assert!(frames.pending().is_some());
    }

    #[test]
    fn test_pause_releases_callback() {
        let (mut frames, log) = spy_loop();
        frames.start();
        let token = frames.pending().unwrap();
        assert!(frames.pause());
        assert!(!frames.pause());
        assert_eq!(frames.pending(), None);
        assert_eq!(log.borrow().cancelled, vec![token]);
        // A callback that fires anyway is ignored
        assert_eq!(frames.begin_frame(token, 2.0), None);
        frames.end_frame();
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn test_resume_resets_time_baseline() {
        let (mut frames, _log) = spy_loop();
        frames.start();
        let t = frames.pending().unwrap();
        frames.begin_frame(t, 0.0);
        frames.end_frame();
        let t = frames.pending().unwrap();
        frames.begin_frame(t, 0.016);
        frames.end_frame();

        frames.pause();
        frames.start();
        let t = frames.pending().unwrap();
        // Hidden for a minute: the first tick after resume simulates nothing
        assert_eq!(frames.begin_frame(t, 60.0), Some(0.0));
    }
}
