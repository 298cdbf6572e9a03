//! Host input events

use serde::{Deserialize, Serialize};

/// Environmental triggers a host forwards to the engine.
///
/// Coordinates are in surface units relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    Click { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
    VisibilityChanged { hidden: bool },
}

impl HostEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::PointerMove { .. } => "pointer_move",
            HostEvent::PointerLeave => "pointer_leave",
            HostEvent::Click { .. } => "click",
            HostEvent::Resize { .. } => "resize",
            HostEvent::VisibilityChanged { .. } => "visibility_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        event: HostEvent,
    }

    #[test]
    fn test_parse_tagged_event() {
        let parsed: Wrapper = toml::from_str(r#"event = { type = "click", x = 10.0, y = 20.0 }"#).unwrap();
        assert_eq!(parsed.event, HostEvent::Click { x: 10.0, y: 20.0 });
        assert_eq!(parsed.event.kind(), "click");
    }

    #[test]
    fn test_parse_unit_event() {
        let parsed: Wrapper = toml::from_str(r#"event = { type = "pointer_leave" }"#).unwrap();
        assert_eq!(parsed.event, HostEvent::PointerLeave);
    }
}
