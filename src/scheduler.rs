//! Dirty-flag render gate and the render loop's run state.
//!
//! The host's frame driver calls into the engine once per display refresh.
//! The scheduler decides whether that tick draws anything and whether the
//! driver should schedule another one.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

/// Run state of the render loop. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Running,
    Stopped,
}

/// What a single frame tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing changed since the last draw.
    Skipped,
    /// The scene was redrawn.
    Drawn,
    /// The loop is stopped; the driver must not schedule another frame.
    Stopped,
}

impl FrameOutcome {
    /// Whether the driver should request another frame.
    #[must_use]
    pub fn reschedule(self) -> bool {
        self != Self::Stopped
    }
}

#[derive(Debug, Clone)]
pub struct RenderScheduler {
    state: LoopState,
    dirty: bool,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self { state: LoopState::Running, dirty: true }
    }
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a redraw on the next frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Decide what the current frame should do.
    ///
    /// Returns [`FrameOutcome::Drawn`] exactly when the caller must redraw;
    /// the dirty flag is cleared before returning so that state changes made
    /// during the draw schedule a further frame.
    pub fn begin_frame(&mut self) -> FrameOutcome {
        if self.state == LoopState::Stopped {
            return FrameOutcome::Stopped;
        }
        if !self.dirty {
            return FrameOutcome::Skipped;
        }
        self.dirty = false;
        FrameOutcome::Drawn
    }

    /// Stop the loop. Returns false if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        self.state = LoopState::Stopped;
        true
    }
}
