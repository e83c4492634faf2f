//! Audio system using cpal
//!
//! Procedurally generated sound effects - no external files needed!
//! Effects are short stacks of enveloped oscillators. `AudioManager::play`
//! queues a voice in a shared mixer and returns immediately; the mixer is
//! rendered on the audio device's callback thread.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

/// Voices beyond this are dropped, oldest first
pub const MAX_VOICES: usize = 16;

/// Fixed headroom so a handful of overlapping voices doesn't clip
const MIX_GAIN: f32 = 0.5;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Ball hits a brick that survives
    BrickHit,
    /// Brick destroyed
    BrickBreak,
    /// Ball fell out of the playfield
    BallLost,
    /// Power-pill caught
    PillCatch,
    /// Laser volley fired
    LaserShot,
    /// Level cleared
    LevelClear,
    /// Ball served
    Launch,
    /// Game over
    GameOver,
    /// All levels cleared
    GameWon,
}

/// Oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Sample at `phase` in [0, 1)
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// One enveloped oscillator inside an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Waveform,
    pub freq: f32,
    /// Frequency reached after `sweep` seconds (exponential glide)
    pub end_freq: f32,
    pub sweep: f32,
    pub gain: f32,
    /// Time for the gain to fall to 1% (exponential decay)
    pub decay: f32,
    /// Start offset from the beginning of the effect
    pub delay: f32,
    /// Seconds after `delay` at which the oscillator stops
    pub stop: f32,
}

impl Tone {
    const fn new(wave: Waveform, freq: f32, gain: f32, decay: f32, stop: f32) -> Self {
        Self {
            wave,
            freq,
            end_freq: freq,
            sweep: 0.0,
            gain,
            decay,
            delay: 0.0,
            stop,
        }
    }

    const fn glide(mut self, end_freq: f32, sweep: f32) -> Self {
        self.end_freq = end_freq;
        self.sweep = sweep;
        self
    }

    const fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    fn end(&self) -> f32 {
        self.delay + self.stop
    }

    /// Frequency at `t` seconds into the tone
    fn freq_at(&self, t: f32) -> f32 {
        if self.sweep <= 0.0 || t >= self.sweep {
            self.end_freq
        } else {
            self.freq * (self.end_freq / self.freq).powf(t / self.sweep)
        }
    }

    /// Envelope at `t` seconds into the tone
    fn gain_at(&self, t: f32) -> f32 {
        self.gain * 0.01f32.powf(t / self.decay)
    }
}

/// Rising/falling arpeggio of equal tones
fn arpeggio(wave: Waveform, freqs: &[f32], spacing: f32, gain: f32, decay: f32, stop: f32) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &freq)| Tone::new(wave, freq, gain, decay, stop).after(i as f32 * spacing))
        .collect()
}

impl SoundEffect {
    /// Oscillator recipe for this effect
    pub fn tones(self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            // Solid thump
            SoundEffect::PaddleHit => vec![Tone::new(Sine, 150.0, 0.6, 0.1, 0.15).glide(60.0, 0.1)],
            // Higher ping
            SoundEffect::WallHit => vec![Tone::new(Sine, 400.0, 0.3, 0.08, 0.1)],
            // Soft tap
            SoundEffect::BrickHit => vec![Tone::new(Triangle, 300.0, 0.25, 0.05, 0.08)],
            // Crack over a bass thump
            SoundEffect::BrickBreak => vec![
                Tone::new(Square, 700.0, 0.2, 0.1, 0.12).glide(350.0, 0.08),
                Tone::new(Sine, 60.0, 0.3, 0.1, 0.12),
            ],
            // Ominous descend
            SoundEffect::BallLost => vec![Tone::new(Sine, 300.0, 0.4, 0.8, 1.0).glide(20.0, 0.8)],
            // Happy ding
            SoundEffect::PillCatch => arpeggio(Sine, &[600.0, 800.0, 1000.0], 0.08, 0.25, 0.15, 0.2),
            SoundEffect::LaserShot => {
                vec![Tone::new(Sawtooth, 1500.0, 0.15, 0.1, 0.12).glide(300.0, 0.1)]
            }
            // Triumphant fanfare
            SoundEffect::LevelClear => {
                arpeggio(Triangle, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.3, 0.4, 0.5)
            }
            // Whoosh up
            SoundEffect::Launch => vec![Tone::new(Triangle, 200.0, 0.3, 0.2, 0.25).glide(600.0, 0.15)],
            // Sad descending
            SoundEffect::GameOver => arpeggio(Sine, &[400.0, 350.0, 300.0, 200.0], 0.2, 0.3, 0.3, 0.4),
            SoundEffect::GameWon => arpeggio(
                Triangle,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                0.25,
                0.25,
                0.3,
            ),
        }
    }
}

/// A playing effect
#[derive(Debug, Clone)]
struct Voice {
    tones: Vec<Tone>,
    phases: Vec<f32>,
    elapsed: f32,
    length: f32,
}

impl Voice {
    fn new(effect: SoundEffect) -> Self {
        let tones = effect.tones();
        let length = tones.iter().map(Tone::end).fold(0.0, f32::max);
        Self {
            phases: vec![0.0; tones.len()],
            tones,
            elapsed: 0.0,
            length,
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.length
    }

    fn next_sample(&mut self, dt: f32) -> f32 {
        let mut out = 0.0;
        for (tone, phase) in self.tones.iter().zip(self.phases.iter_mut()) {
            let t = self.elapsed - tone.delay;
            if t < 0.0 || t >= tone.stop {
                continue;
            }
            out += tone.wave.sample(*phase) * tone.gain_at(t);
            *phase = (*phase + tone.freq_at(t) * dt).fract();
        }
        self.elapsed += dt;
        out
    }
}

/// Sums active voices into an interleaved output buffer
#[derive(Debug)]
pub struct Mixer {
    voices: VecDeque<Voice>,
    sample_rate: u32,
    master_volume: f32,
    enabled: bool,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            voices: VecDeque::new(),
            sample_rate,
            master_volume: 0.8,
            enabled: true,
        }
    }

    /// Queue an effect, dropping the oldest voice when full
    pub fn play(&mut self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        if self.voices.len() >= MAX_VOICES {
            self.voices.pop_front();
        }
        self.voices.push_back(Voice::new(effect));
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Turning sound off also silences what is playing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.voices.clear();
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate.max(1);
    }

    /// Fill `data` (interleaved, `channels` per frame) and drop finished voices
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let dt = 1.0 / self.sample_rate as f32;
        let gain = self.master_volume * MIX_GAIN;

        for frame in data.chunks_mut(channels) {
            let mut sample = 0.0;
            for voice in &mut self.voices {
                sample += voice.next_sample(dt);
            }
            let sample = (sample * gain).clamp(-1.0, 1.0);
            frame.fill(sample);
        }

        self.voices.retain(|v| !v.is_finished());
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("no usable output configuration")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to open output stream")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream")]
    Play(#[from] cpal::PlayStreamError),
}

/// Open the default output device and start rendering `mixer` into it
fn init_audio_stream(mixer: Arc<Mutex<Mixer>>) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let supported = device.default_output_config()?;

    let config = cpal::StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };
    let channels = config.channels as usize;

    if let Ok(mut mixer) = mixer.lock() {
        mixer.set_sample_rate(config.sample_rate.0);
    }

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match mixer.lock() {
            Ok(mut mixer) => mixer.render(data, channels),
            Err(_) => data.fill(0.0),
        },
        |err| log::error!("Audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    log::info!(
        "Audio output: {} Hz, {} channels",
        config.sample_rate.0,
        config.channels
    );
    Ok(stream)
}

/// Audio manager for the game
pub struct AudioManager {
    mixer: Arc<Mutex<Mixer>>,
    /// Kept alive for the lifetime of the manager
    stream: Option<cpal::Stream>,
}

impl AudioManager {
    /// Open the default device; without one the manager stays silent
    pub fn new(enabled: bool, master_volume: f32) -> Self {
        let mut mixer = Mixer::new(44_100);
        mixer.set_enabled(enabled);
        mixer.set_master_volume(master_volume);
        let mixer = Arc::new(Mutex::new(mixer));

        let stream = match init_audio_stream(Arc::clone(&mixer)) {
            Ok(stream) => Some(stream),
            Err(e) => {
                log::warn!("Audio disabled: {e}");
                None
            }
        };

        Self { mixer, stream }
    }

    /// Play a sound effect (fire-and-forget)
    pub fn play(&self, effect: SoundEffect) {
        if self.stream.is_none() {
            return;
        }
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.play(effect);
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.set_enabled(enabled);
        }
        log::info!("Sound {}", if enabled { "on" } else { "off" });
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("has_stream", &self.stream.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SoundEffect; 11] = [
        SoundEffect::PaddleHit,
        SoundEffect::WallHit,
        SoundEffect::BrickHit,
        SoundEffect::BrickBreak,
        SoundEffect::BallLost,
        SoundEffect::PillCatch,
        SoundEffect::LaserShot,
        SoundEffect::LevelClear,
        SoundEffect::Launch,
        SoundEffect::GameOver,
        SoundEffect::GameWon,
    ];

    #[test]
    fn test_every_effect_has_finite_tones() {
        for effect in ALL {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{effect:?}");
            for tone in tones {
                assert!(tone.stop > 0.0 && tone.decay > 0.0);
                assert!(tone.end() < 2.0);
            }
        }
    }

    #[test]
    fn test_frequency_glide() {
        let tone = Tone::new(Waveform::Sine, 150.0, 0.6, 0.1, 0.15).glide(60.0, 0.1);
        assert_eq!(tone.freq_at(0.0), 150.0);
        assert!(tone.freq_at(0.05) < 150.0 && tone.freq_at(0.05) > 60.0);
        assert_eq!(tone.freq_at(0.12), 60.0);
    }

    #[test]
    fn test_voice_cap_drops_oldest() {
        let mut mixer = Mixer::new(8_000);
        mixer.play(SoundEffect::BallLost);
        for _ in 0..MAX_VOICES {
            mixer.play(SoundEffect::WallHit);
        }
        assert_eq!(mixer.voice_count(), MAX_VOICES);
        // The long BallLost voice was the one evicted
        let mut buf = vec![0.0; 8_000 * 2 / 5];
        mixer.render(&mut buf, 2);
        assert_eq!(mixer.voice_count(), 0);
    }

    #[test]
    fn test_render_is_bounded() {
        let mut mixer = Mixer::new(8_000);
        mixer.set_master_volume(1.0);
        for effect in ALL {
            mixer.play(effect);
        }
        let mut buf = vec![0.0; 4_000];
        mixer.render(&mut buf, 2);
        assert!(buf.iter().all(|s| s.is_finite() && (-1.0..=1.0).contains(s)));
        assert!(buf.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_finished_voices_dropped() {
        let mut mixer = Mixer::new(8_000);
        mixer.play(SoundEffect::WallHit);
        let mut buf = vec![0.0; 400];
        mixer.render(&mut buf, 1);
        assert_eq!(mixer.voice_count(), 1);
        let mut buf = vec![0.0; 800];
        mixer.render(&mut buf, 1);
        assert_eq!(mixer.voice_count(), 0);
    }

    #[test]
    fn test_disabled_mixer_is_silent() {
        let mut mixer = Mixer::new(8_000);
        mixer.play(SoundEffect::PaddleHit);
        mixer.set_enabled(false);
        assert_eq!(mixer.voice_count(), 0);
        mixer.play(SoundEffect::PaddleHit);
        assert_eq!(mixer.voice_count(), 0);

        let mut buf = vec![1.0; 64];
        mixer.render(&mut buf, 2);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_stereo_frames_duplicate_mono() {
        let mut mixer = Mixer::new(8_000);
        mixer.play(SoundEffect::BrickBreak);
        let mut buf = vec![0.0; 64];
        mixer.render(&mut buf, 2);
        for frame in buf.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }
}
