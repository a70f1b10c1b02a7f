//! Platform abstraction layer
//!
//! Narrow capabilities the game calls out to:
//! - Drawing circles on a surface
//! - Playing a sound effect
//! - Updating visible counters
//!
//! Browser implementations live in `renderer`, `audio` and `platform::web`;
//! `Headless` stands in for all three on native.

use std::fmt;

use glam::Vec2;

use crate::sim::{Color, SoundKind};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Drawing failed; the frame carries on without the shape
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// No context to draw into (detached canvas, lost context)
    Unavailable,
    Rejected(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "draw surface unavailable"),
            Self::Rejected(msg) => write!(f, "draw call rejected: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

pub trait Surface {
    /// Start a frame; paints a translucent backdrop so moving circles leave trails
    fn begin_frame(&mut self, width: f32, height: f32) -> Result<(), SurfaceError>;
    fn draw_circle(&mut self, pos: Vec2, radius: f32, color: Color, alpha: f32) -> Result<(), SurfaceError>;
}

pub trait AudioSink {
    /// Fire and forget; the sink stops the sound after `duration_ms`
    fn play(&mut self, kind: SoundKind, duration_ms: u32);

    /// Output gain in 0..=1; 0 silences the sink
    fn set_volume(&mut self, _volume: f32) {}
}

/// Visible counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    Score,
    HighScore,
    Life,
    AmmoCount,
    Badges,
    Health,
    Rockets,
    Grenades,
    Status,
}

impl DisplayField {
    pub const ALL: [DisplayField; 9] = [
        DisplayField::Score,
        DisplayField::HighScore,
        DisplayField::Life,
        DisplayField::AmmoCount,
        DisplayField::Badges,
        DisplayField::Health,
        DisplayField::Rockets,
        DisplayField::Grenades,
        DisplayField::Status,
    ];

    /// DOM element id of the field
    pub fn element_id(&self) -> &'static str {
        match self {
            DisplayField::Score => "score",
            DisplayField::HighScore => "highest_score",
            DisplayField::Life => "life",
            DisplayField::AmmoCount => "ammo",
            DisplayField::Badges => "badges",
            DisplayField::Health => "healths",
            DisplayField::Rockets => "rockets",
            DisplayField::Grenades => "grenades",
            DisplayField::Status => "status",
        }
    }
}

pub trait Hud {
    /// Update one counter. Fields the page does not have are ignored.
    fn set_text(&mut self, field: DisplayField, value: &str);

    /// Show or hide the start/pause menu overlay
    fn set_menu_visible(&mut self, _visible: bool) {}
}

/// No-op collaborator for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Surface for Headless {
    fn begin_frame(&mut self, _width: f32, _height: f32) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn draw_circle(&mut self, _pos: Vec2, _radius: f32, _color: Color, _alpha: f32) -> Result<(), SurfaceError> {
        Ok(())
    }
}

impl AudioSink for Headless {
    fn play(&mut self, kind: SoundKind, _duration_ms: u32) {
        log::trace!("sound {:?}", kind);
    }
}

impl Hud for Headless {
    fn set_text(&mut self, _field: DisplayField, _value: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_element_ids_unique() {
        let ids: HashSet<_> = DisplayField::ALL.iter().map(|f| f.element_id()).collect();
        assert_eq!(ids.len(), DisplayField::ALL.len());
    }
}
