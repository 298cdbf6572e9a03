//! Runtime system trait

use crate::event::HostEvent;
use crate::scheduler::FrameToken;
use neon_core::Result;

/// A system driven by the host.
///
/// Hosts call `initialize` once, forward every input event to `handle_event`
/// synchronously, and call `on_frame` whenever the token returned by
/// `pending_frame` fires. Everything runs on one thread, run-to-completion.
pub trait RuntimeSystem {
    /// Create resources and start the frame loop. Calling it again is a no-op.
    fn initialize(&mut self) -> Result<()>;

    /// React to one host input event
    fn handle_event(&mut self, event: &HostEvent) -> Result<()>;

    /// Frame callback fired for `token` at host time `timestamp` (seconds)
    fn on_frame(&mut self, token: FrameToken, timestamp: f64) -> Result<()>;

    /// The frame callback this system is waiting for, if any
    fn pending_frame(&self) -> Option<FrameToken>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
