//! Sound effects
//!
//! Every effect is a single synthesized tone described by a `Tone`, so no
//! audio files are shipped. The web backend plays them through Web Audio;
//! everything else goes through the `SoundTrigger` seam.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Flap
    Jump,
    /// Pipe passed
    Score,
    /// Pickup collected
    PowerUp,
    GameOver,
    LevelUp,
    /// Chicken blown up on crash
    Explosion,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Synth recipe for one effect (seconds / Hz)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub wave: Wave,
    pub duration: f64,
    /// Exponential pitch slide: (target Hz, over seconds)
    pub ramp: Option<(f32, f64)>,
    /// Low-pass cutoff
    pub lowpass: Option<f32>,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Jump,
        SoundEffect::Score,
        SoundEffect::PowerUp,
        SoundEffect::GameOver,
        SoundEffect::LevelUp,
        SoundEffect::Explosion,
    ];

    /// Playback volume the game uses for this effect
    pub fn default_volume(&self) -> f32 {
        match self {
            SoundEffect::Jump => 0.08,
            SoundEffect::Score => 0.12,
            SoundEffect::PowerUp => 0.15,
            SoundEffect::GameOver => 0.12,
            SoundEffect::LevelUp => 0.15,
            SoundEffect::Explosion => 0.1,
        }
    }

    pub fn tone(&self) -> Tone {
        let tone = |frequency, wave, duration, ramp| Tone {
            frequency,
            wave,
            duration,
            ramp,
            lowpass: None,
        };
        match self {
            SoundEffect::Jump => tone(400.0, Wave::Square, 0.1, Some((600.0, 0.05))),
            SoundEffect::Score => tone(800.0, Wave::Sine, 0.3, Some((1200.0, 0.2))),
            SoundEffect::PowerUp => tone(600.0, Wave::Sawtooth, 0.4, Some((1000.0, 0.3))),
            SoundEffect::GameOver => tone(200.0, Wave::Sawtooth, 1.0, Some((100.0, 0.8))),
            SoundEffect::LevelUp => tone(500.0, Wave::Triangle, 0.6, Some((800.0, 0.4))),
            SoundEffect::Explosion => Tone {
                lowpass: Some(800.0),
                ..tone(150.0, Wave::Sawtooth, 0.5, None)
            },
        }
    }

    /// Which effect (if any) a game event sounds like
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Scored { .. } => Some(SoundEffect::Score),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUp),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::PowerUpExpired(_) => None,
        }
    }
}

/// Anything that can make a noise. Fire-and-forget: failures stay inside.
pub trait SoundTrigger {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Silent backend (native, headless)
#[derive(Debug, Default)]
pub struct NullSound;

impl SoundTrigger for NullSound {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Remembers what was played
#[derive(Debug, Default)]
pub struct RecordingSound {
    pub played: Vec<(SoundEffect, f32)>,
}

impl RecordingSound {
    pub fn effects(&self) -> Vec<SoundEffect> {
        self.played.iter().map(|(e, _)| *e).collect()
    }
}

impl SoundTrigger for RecordingSound {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played.push((effect, volume));
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundTrigger, Tone, Wave};

    /// Web Audio synth
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn wave_type(wave: Wave) -> OscillatorType {
            match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            }
        }

        /// oscillator -> (low-pass) -> gain -> destination
        fn build(ctx: &AudioContext, tone: &Tone) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(Self::wave_type(tone.wave));

            match tone.lowpass {
                Some(cutoff) => {
                    let filter = ctx.create_biquad_filter().ok()?;
                    filter.set_type(BiquadFilterType::Lowpass);
                    filter
                        .frequency()
                        .set_value_at_time(cutoff, ctx.current_time())
                        .ok()?;
                    osc.connect_with_audio_node(&filter).ok()?;
                    filter.connect_with_audio_node(&gain).ok()?;
                }
                None => {
                    osc.connect_with_audio_node(&gain).ok()?;
                }
            }
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some((osc, gain))
        }

        fn synth(ctx: &AudioContext, tone: &Tone, vol: f32) {
            let Some((osc, gain)) = Self::build(ctx, tone) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(tone.frequency, t).ok();
            if let Some((target, over)) = tone.ramp {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, t + over)
                    .ok();
            }

            // Short attack, exponential tail
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(vol, t + 0.01).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + tone.duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }

    impl SoundTrigger for WebAudio {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            if volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Self::synth(ctx, &effect.tone(), volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_volumes() {
        assert_eq!(SoundEffect::Jump.default_volume(), 0.08);
        assert_eq!(SoundEffect::Explosion.default_volume(), 0.1);
        for effect in SoundEffect::ALL {
            let v = effect.default_volume();
            assert!(v > 0.0 && v <= 0.15);
        }
    }

    #[test]
    fn test_only_explosion_is_filtered() {
        for effect in SoundEffect::ALL {
            let tone = effect.tone();
            assert_eq!(tone.lowpass.is_some(), effect == SoundEffect::Explosion);
            assert_eq!(tone.ramp.is_none(), effect == SoundEffect::Explosion);
            if let Some((_, over)) = tone.ramp {
                assert!(over < tone.duration);
            }
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Scored { gain: 2, total: 4 }),
            Some(SoundEffect::Score)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerUpCollected(PowerUpKind::Magnet)),
            Some(SoundEffect::PowerUp)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerUpExpired(PowerUpKind::Shield)),
            None
        );
    }

    #[test]
    fn test_recording_sound() {
        let mut sound = RecordingSound::default();
        sound.play(SoundEffect::Jump, 0.08);
        NullSound.play(SoundEffect::Jump, 0.08);
        assert_eq!(sound.effects(), vec![SoundEffect::Jump]);
    }
}
