//! Frame and persistence pump on a slint timer.
//!
//! Pointer moves only record where the pointer is; the drag is applied once
//! per tick. The same tick flushes due position syncs and, when a store is
//! attached, runs queued requests against it.

use crate::controller::CanvasController;
use crate::persistence::RemoteStore;
use slint::{Timer, TimerMode};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// ~60fps
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Owns the repeating timer. Dropping the driver stops it.
pub struct CanvasDriver {
    timer: Timer,
}

impl CanvasDriver {
    /// Drive drag frames and position debouncing only. The host drains
    /// requests with [`CanvasController::take_requests`] and reports back
    /// with [`CanvasController::complete`].
    pub fn new(ctrl: CanvasController) -> Self {
        let timer = Timer::default();
        timer.start(TimerMode::Repeated, FRAME_INTERVAL, move || {
            ctrl.frame();
            ctrl.poll(Instant::now());
        });
        Self { timer }
    }

    /// Drive drag frames and run every queued request against `store` on
    /// each tick.
    pub fn with_store<S: RemoteStore + 'static>(
        ctrl: CanvasController,
        store: Rc<RefCell<S>>,
    ) -> Self {
        let timer = Timer::default();
        timer.start(TimerMode::Repeated, FRAME_INTERVAL, move || {
            ctrl.frame();
            // A store call that re-entered the driver would already hold it
            let Ok(mut store) = store.try_borrow_mut() else {
                log::debug!("store busy, skipping persistence this tick");
                return;
            };
            ctrl.pump(&mut *store, Instant::now());
        });
        Self { timer }
    }

    pub fn is_running(&self) -> bool {
        self.timer.running()
    }

    pub fn stop(&self) {
        self.timer.stop();
    }

    pub fn restart(&self) {
        self.timer.restart();
    }
}
