// Procedurally generated arcade sound effects. No sample assets: every
// effect is a handful of swept square/triangle/noise voices mixed in the
// SDL2 audio callback.

use sdl2::AudioSubsystem;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use std::sync::{Arc, Mutex};
use std::time::Instant;

const MASTER_VOLUME: f32 = 0.4;

/// Repeated dig sounds closer together than this are swallowed
const DIG_COOLDOWN_MS: u128 = 80;

/// The sound effects the game can trigger
#[derive(Debug, Clone, Copy)]
pub enum Sound {
    Dig,
    Pump(u32),
    MonsterDefeat,
    RockFall,
    Damage,
    Collect,
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy)]
enum Wave {
    Square,
    Triangle,
    Noise,
}

/// One scheduled oscillator: frequency sweeps linearly from `freq_start`
/// to `freq_end` over `duration_s`, with a linear fade-out envelope.
struct Voice {
    wave: Wave,
    freq_start: f32,
    freq_end: f32,
    delay_s: f32,
    duration_s: f32,
    volume: f32,
    elapsed_s: f32,
    phase: f32,
    noise_state: u32,
}

impl Voice {
    fn new(wave: Wave, freq_start: f32, freq_end: f32, duration_s: f32, volume: f32) -> Self {
        Voice {
            wave,
            freq_start,
            freq_end,
            delay_s: 0.0,
            duration_s,
            volume,
            elapsed_s: 0.0,
            phase: 0.0,
            noise_state: 0x2545_F491,
        }
    }

    fn delayed(mut self, delay_s: f32) -> Self {
        self.delay_s = delay_s;
        self
    }

    fn finished(&self) -> bool {
        self.elapsed_s - self.delay_s > self.duration_s
    }

    /// Render one sample and advance by `dt` seconds
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.elapsed_s += dt;
        let t = self.elapsed_s - self.delay_s;
        if t < 0.0 || t > self.duration_s {
            return 0.0;
        }

        let progress = t / self.duration_s;
        let freq = self.freq_start + (self.freq_end - self.freq_start) * progress;
        self.phase = (self.phase + freq * dt).fract();

        let raw = match self.wave {
            Wave::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Wave::Triangle => 4.0 * (self.phase - 0.5).abs() - 1.0,
            Wave::Noise => {
                // xorshift32, mapped to [-1, 1]
                let mut s = self.noise_state;
                s ^= s << 13;
                s ^= s >> 17;
                s ^= s << 5;
                self.noise_state = s;
                (s as f32 / u32::MAX as f32) * 2.0 - 1.0
            }
        };

        raw * self.volume * (1.0 - progress)
    }
}

/// Runs on the SDL audio thread; mixes whatever voices the game thread
/// has queued.
struct Mixer {
    queue: Arc<Mutex<Vec<Voice>>>,
    sample_rate: f32,
}

impl AudioCallback for Mixer {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        let Ok(mut voices) = self.queue.lock() else {
            out.fill(0.0);
            return;
        };

        let dt = 1.0 / self.sample_rate;
        for sample in out.iter_mut() {
            let mut mix = 0.0;
            for voice in voices.iter_mut() {
                mix += voice.next_sample(dt);
            }
            *sample = (mix * MASTER_VOLUME).clamp(-1.0, 1.0);
        }
        voices.retain(|v| !v.finished());
    }
}

pub struct AudioManager {
    _device: AudioDevice<Mixer>,
    queue: Arc<Mutex<Vec<Voice>>>,
    last_dig: Option<Instant>,
}

impl AudioManager {
    pub fn new(audio: &AudioSubsystem) -> Result<Self, String> {
        let desired = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: Some(512),
        };

        let queue = Arc::new(Mutex::new(Vec::new()));
        let callback_queue = Arc::clone(&queue);
        let device = audio.open_playback(None, &desired, |spec| Mixer {
            queue: callback_queue,
            sample_rate: spec.freq as f32,
        })?;
        device.resume();

        Ok(AudioManager {
            _device: device,
            queue,
            last_dig: None,
        })
    }

    pub fn play(&mut self, sound: Sound) {
        if let Sound::Dig = sound {
            let now = Instant::now();
            if let Some(last) = self.last_dig {
                if now.duration_since(last).as_millis() < DIG_COOLDOWN_MS {
                    return;
                }
            }
            self.last_dig = Some(now);
        }

        let voices = Self::voices_for(sound);
        if let Ok(mut queue) = self.queue.lock() {
            queue.extend(voices);
        }
    }

    fn voices_for(sound: Sound) -> Vec<Voice> {
        match sound {
            Sound::Dig => vec![Voice::new(Wave::Noise, 0.0, 0.0, 0.08, 0.3)],

            // Rising squeak, pitched up with each stage
            Sound::Pump(stage) => {
                let base = 200.0 + stage as f32 * 150.0;
                vec![Voice::new(Wave::Square, base, base * 2.0, 0.15, 0.35)]
            }

            // Pop plus a short explosion hiss
            Sound::MonsterDefeat => vec![
                Voice::new(Wave::Square, 600.0, 100.0, 0.2, 0.5),
                Voice::new(Wave::Noise, 0.0, 0.0, 0.15, 0.2),
            ],

            Sound::RockFall => vec![Voice::new(Wave::Triangle, 120.0, 40.0, 0.4, 0.6)],

            Sound::Damage => vec![Voice::new(Wave::Square, 400.0, 80.0, 0.4, 0.5)],

            // G5 B5 D6 pickup arpeggio
            Sound::Collect => [784.0, 988.0, 1175.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| {
                    Voice::new(Wave::Square, f, f, 0.12, 0.3).delayed(i as f32 * 0.06)
                })
                .collect(),

            // C5 E5 G5 C6 fanfare
            Sound::LevelComplete => [523.0, 659.0, 784.0, 1047.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| {
                    Voice::new(Wave::Square, f, f, 0.2, 0.4).delayed(i as f32 * 0.12)
                })
                .collect(),

            // G4 F4 E4 C4, descending
            Sound::GameOver => [392.0, 349.0, 330.0, 262.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| {
                    Voice::new(Wave::Square, f, f, 0.35, 0.4).delayed(i as f32 * 0.2)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_respects_delay_and_duration() {
        let mut voice = Voice::new(Wave::Square, 440.0, 440.0, 0.1, 1.0).delayed(0.05);
        let dt = 1.0 / 44_100.0;

        // Silent during the delay
        let early = voice.next_sample(dt);
        assert_eq!(early, 0.0);
        assert!(!voice.finished());

        // Audible once the delay elapses
        while voice.elapsed_s < 0.06 {
            voice.next_sample(dt);
        }
        let playing = voice.next_sample(dt);
        assert!(playing.abs() > 0.0);

        // Finished after delay + duration
        while voice.elapsed_s < 0.16 {
            voice.next_sample(dt);
        }
        assert!(voice.finished());
        assert_eq!(voice.next_sample(dt), 0.0);
    }

    #[test]
    fn test_envelope_fades_out() {
        let mut voice = Voice::new(Wave::Triangle, 100.0, 100.0, 1.0, 1.0);
        let dt = 0.01;
        let mut peak_late = 0.0f32;
        let mut peak_early = 0.0f32;
        for i in 0..100 {
            let s = voice.next_sample(dt).abs();
            if i < 20 {
                peak_early = peak_early.max(s);
            }
            if i >= 80 {
                peak_late = peak_late.max(s);
            }
        }
        assert!(peak_late < peak_early);
    }

    #[test]
    fn test_pump_pitch_rises_with_stage() {
        let low = AudioManager::voices_for(Sound::Pump(1));
        let high = AudioManager::voices_for(Sound::Pump(3));
        assert!(high[0].freq_start > low[0].freq_start);
    }

    #[test]
    fn test_melodies_are_staggered() {
        let voices = AudioManager::voices_for(Sound::LevelComplete);
        assert_eq!(voices.len(), 4);
        for pair in voices.windows(2) {
            assert!(pair[1].delay_s > pair[0].delay_s);
        }
    }
}
