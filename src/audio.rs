//! Audio adapter
//!
//! The simulation asks for sound effects through [`AudioSink`]. On the web
//! the effects are synthesized with the Web Audio API - no external files.

use glam::Vec2;

use crate::sim::ViewportState;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Two solid bodies collide
    HardCollision,
    /// A laser bullet is fired
    LaserBullet,
    /// A laser bullet hits something
    LaserBulletImpact,
    /// Ship thruster ignition
    RocketThrust,
}

/// Where sounds go
pub trait AudioSink {
    /// Play a one-shot effect; `pan` is the source offset from the listener,
    /// in viewport sizes (see [`spatial_pan`])
    fn play(&mut self, effect: SoundEffect, pan: Vec2);

    /// Keep the looping thruster sound running at `pan`, or stop it with `None`
    fn set_thruster(&mut self, pan: Option<Vec2>);
}

/// Sink that drops everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _pan: Vec2) {}

    fn set_thruster(&mut self, _pan: Option<Vec2>) {}
}

/// Position of a world coordinate relative to the viewport center, in
/// viewport sizes (the listener sits at the center)
pub fn spatial_pan(coordinate: Vec2, viewport: &ViewportState) -> Vec2 {
    let size = viewport.dimension.as_vec2();
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    (coordinate - viewport.center()) / size
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use glam::Vec2;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType, StereoPannerNode};

    use super::{AudioSink, SoundEffect};

    /// One oscillator routed through gain and stereo pan
    struct Voice {
        osc: OscillatorNode,
        gain: GainNode,
        panner: StereoPannerNode,
    }

    /// Procedural Web Audio synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        thruster: Option<Voice>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
                thruster: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.set_thruster(None);
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn voice(&self, ctx: &AudioContext, freq: f32, osc_type: OscillatorType, pan: Vec2) -> Option<Voice> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            let panner = ctx.create_stereo_panner().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            panner.pan().set_value(pan.x.clamp(-1.0, 1.0));
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&panner).ok()?;
            panner.connect_with_audio_node(&ctx.destination()).ok()?;

            Some(Voice { osc, gain, panner })
        }

        /// Quieter the further the source is from the listener
        fn attenuate(vol: f32, pan: Vec2) -> f32 {
            vol / (1.0 + pan.length())
        }

        /// Hard collision - low thud with a metallic crunch
        fn play_hard_collision(&self, ctx: &AudioContext, vol: f32, pan: Vec2) {
            let t = ctx.current_time();

            if let Some(v) = self.voice(ctx, 120.0, OscillatorType::Sine, pan) {
                v.gain.gain().set_value_at_time(vol * 0.6, t).ok();
                v.gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.3).ok();
                v.osc.frequency().exponential_ramp_to_value_at_time(40.0, t + 0.3).ok();
                v.osc.start().ok();
                v.osc.stop_with_when(t + 0.35).ok();
            }

            if let Some(v) = self.voice(ctx, 300.0, OscillatorType::Square, pan) {
                v.gain.gain().set_value_at_time(vol * 0.15, t).ok();
                v.gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.12).ok();
                v.osc.frequency().set_value_at_time(220.0, t + 0.04).ok();
                v.osc.start().ok();
                v.osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Laser shot - falling zap
        fn play_laser(&self, ctx: &AudioContext, vol: f32, pan: Vec2) {
            let Some(v) = self.voice(ctx, 1400.0, OscillatorType::Sawtooth, pan) else {
                return;
            };
            let t = ctx.current_time();
            v.gain.gain().set_value_at_time(vol * 0.2, t).ok();
            v.gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.12).ok();
            v.osc.frequency().exponential_ramp_to_value_at_time(200.0, t + 0.12).ok();
            v.osc.start().ok();
            v.osc.stop_with_when(t + 0.15).ok();
        }

        /// Laser impact - short crackle
        fn play_laser_impact(&self, ctx: &AudioContext, vol: f32, pan: Vec2) {
            let t = ctx.current_time();
            if let Some(v) = self.voice(ctx, 600.0, OscillatorType::Triangle, pan) {
                v.gain.gain().set_value_at_time(vol * 0.35, t).ok();
                v.gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.08).ok();
                v.osc.frequency().exponential_ramp_to_value_at_time(100.0, t + 0.08).ok();
                v.osc.start().ok();
                v.osc.stop_with_when(t + 0.1).ok();
            }
            if let Some(v) = self.voice(ctx, 3000.0, OscillatorType::Square, pan) {
                v.gain.gain().set_value_at_time(vol * 0.08, t).ok();
                v.gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.04).ok();
                v.osc.start().ok();
                v.osc.stop_with_when(t + 0.05).ok();
            }
        }

        /// Ignition burst when the thruster lights
        fn play_thrust(&self, ctx: &AudioContext, vol: f32, pan: Vec2) {
            let Some(v) = self.voice(ctx, 55.0, OscillatorType::Sawtooth, pan) else {
                return;
            };
            let t = ctx.current_time();
            v.gain.gain().set_value_at_time(vol * 0.15, t).ok();
            v.gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.25).ok();
            v.osc.start().ok();
            v.osc.stop_with_when(t + 0.3).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect, pan: Vec2) {
            let vol = Self::attenuate(self.effective_volume(), pan);
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::HardCollision => self.play_hard_collision(ctx, vol, pan),
                SoundEffect::LaserBullet => self.play_laser(ctx, vol, pan),
                SoundEffect::LaserBulletImpact => self.play_laser_impact(ctx, vol, pan),
                SoundEffect::RocketThrust => self.play_thrust(ctx, vol, pan),
            }
        }

        fn set_thruster(&mut self, pan: Option<Vec2>) {
            match pan {
                Some(pan) => {
                    if let Some(voice) = &self.thruster {
                        voice.panner.pan().set_value(pan.x.clamp(-1.0, 1.0));
                        return;
                    }
                    let vol = self.effective_volume();
                    if vol <= 0.0 {
                        return;
                    }
                    let Some(ctx) = &self.ctx else { return };
                    if let Some(voice) = self.voice(ctx, 55.0, OscillatorType::Sawtooth, pan) {
                        voice.gain.gain().set_value(vol * 0.08);
                        voice.osc.start().ok();
                        self.thruster = Some(voice);
                    }
                }
                None => {
                    if let Some(voice) = self.thruster.take() {
                        voice.osc.stop().ok();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Dimension;

    #[test]
    fn test_spatial_pan_relative_to_center() {
        let viewport = ViewportState {
            coordinate: Vec2::new(-400.0, -300.0),
            dimension: Dimension::new(800.0, 600.0),
        };
        assert_eq!(spatial_pan(Vec2::ZERO, &viewport), Vec2::ZERO);
        assert_eq!(spatial_pan(Vec2::new(400.0, 0.0), &viewport), Vec2::new(0.5, 0.0));
        assert_eq!(spatial_pan(Vec2::new(0.0, -600.0), &viewport), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_spatial_pan_degenerate_viewport() {
        let viewport = ViewportState {
            coordinate: Vec2::ZERO,
            dimension: Dimension::new(0.0, 0.0),
        };
        assert_eq!(spatial_pan(Vec2::new(10.0, 10.0), &viewport), Vec2::ZERO);
    }
}
