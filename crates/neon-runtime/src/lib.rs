//! Neon Runtime - Frame loop infrastructure
//!
//! Provides the building blocks a host uses to drive the engine:
//! - `FrameClock` - frame-to-frame delta time with a resettable baseline
//! - `FrameLoop` / `FrameScheduler` - pending frame-callback bookkeeping with pause/resume
//! - `PointerState` - last pointer position, active flag, per-sample speed
//! - `HostEvent` / `EventBus` - host input events and a queue to batch them
//! - `RuntimeSystem` - trait for systems driven by the host

mod clock;
mod event;
mod event_bus;
mod input;
mod scheduler;
mod system;

pub use clock::FrameClock;
pub use event::HostEvent;
pub use event_bus::EventBus;
pub use input::PointerState;
pub use scheduler::{FrameLoop, FrameScheduler, FrameToken, ManualScheduler};
pub use system::RuntimeSystem;
