//! Web Audio sound effects
//!
//! Every effect is one synthesized oscillator sweep. The sweep is scheduled to
//! stop after the duration the game passes in, so overlapping effects never
//! pile up.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::platform::AudioSink;
use crate::sim::SoundKind;

/// Waveform, start and end pitch (Hz) and relative loudness
type Voice = (OscillatorType, f32, f32, f32);

fn voice(kind: SoundKind) -> Voice {
    use OscillatorType::{Sawtooth, Sine, Square, Triangle};
    match kind {
        SoundKind::Fire1 => (Square, 880.0, 440.0, 0.15),
        SoundKind::Fire2 => (Square, 780.0, 360.0, 0.17),
        SoundKind::Fire3 => (Sawtooth, 660.0, 300.0, 0.18),
        SoundKind::Fire4 => (Sawtooth, 560.0, 220.0, 0.2),
        SoundKind::Fire5 => (Sawtooth, 420.0, 140.0, 0.22),
        SoundKind::Health => (Sine, 523.0, 1046.0, 0.4),
        SoundKind::WeaponChange => (Triangle, 330.0, 990.0, 0.35),
        SoundKind::Shrink => (Triangle, 300.0, 200.0, 0.3),
        SoundKind::Destroy => (Sine, 220.0, 40.0, 0.6),
        SoundKind::AccessDenied => (Square, 140.0, 120.0, 0.3),
        SoundKind::GameOver => (Sawtooth, 400.0, 50.0, 0.5),
    }
}

pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    /// `volume` is the initial gain; the game overrides it from the settings
    pub fn new(volume: f32) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn patch(ctx: &AudioContext, wave: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(wave);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some((osc, gain))
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, kind: SoundKind, duration_ms: u32) {
        if self.volume <= 0.0 || duration_ms == 0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let (wave, from_hz, to_hz, loudness) = voice(kind);
        let Some((osc, gain)) = Self::patch(ctx, wave) else {
            log::debug!("Could not build voice for {:?}", kind);
            return;
        };
        let start = ctx.current_time();
        let stop = start + f64::from(duration_ms) / 1000.0;

        let _ = gain.gain().set_value_at_time(self.volume * loudness, start);
        let _ = gain.gain().exponential_ramp_to_value_at_time(0.01, stop);
        let _ = osc.frequency().set_value_at_time(from_hz, start);
        let _ = osc.frequency().exponential_ramp_to_value_at_time(to_hz, stop);
        let _ = osc.start();
        let _ = osc.stop_with_when(stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}
