//! Host events delivered to the app outside the frame loop.

use holoanchor_core::Viewport;
use serde::{Deserialize, Serialize};

/// How often a channel's handler fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Delivery {
    /// The handler runs for every occurrence.
    EveryOccurrence,
    /// The handler runs for the first occurrence after arming, then disarms.
    ExactlyOnce,
}

/// Events from the host, one named channel per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppEvent {
    /// Discrete "select" input from the AR controller (screen tap in handheld AR).
    Select,
    /// Raw pointer press on the page; only consumed by the gesture retry.
    PointerDown,
    /// Viewport size changed.
    Resize {
        width: u32,
        height: u32,
    },
    /// The runtime ended the session on its own.
    SessionEnd,
}

impl AppEvent {
    /// Delivery contract of this event's channel.
    pub fn delivery(&self) -> Delivery {
        match self {
            AppEvent::PointerDown => Delivery::ExactlyOnce,
            AppEvent::Select | AppEvent::Resize { .. } | AppEvent::SessionEnd => {
                Delivery::EveryOccurrence
            }
        }
    }

    /// Channel name used in logs.
    pub fn channel(&self) -> &'static str {
        match self {
            AppEvent::Select => "select",
            AppEvent::PointerDown => "pointerdown",
            AppEvent::Resize { .. } => "resize",
            AppEvent::SessionEnd => "end",
        }
    }

    /// New viewport for resize events.
    pub fn viewport(&self) -> Option<Viewport> {
        match self {
            AppEvent::Resize { width, height } => Some(Viewport::new(*width, *height)),
            _ => None,
        }
    }
}
