//! Synthesized cues and the ambient hum.
//!
//! Sample generation is plain math over `Vec<f32>` so it can be checked
//! without a device; [`SoundGenerator`] hands the buffers to the default
//! output. Every failure in here is logged and swallowed.

use std::{
    f32::consts::TAU,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use rand::Rng;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source, buffer::SamplesBuffer};

use crate::{controller::Cue, error::Result};

pub const SAMPLE_RATE: u32 = 44_100;

const PULL_SECONDS: f32 = 0.1;
const PULL_SWEEP_SECONDS: f32 = 0.05;
const PULL_CUTOFF_START: f32 = 1000.0;
const PULL_CUTOFF_END: f32 = 3000.0;
const PULL_GAIN_START: f32 = 0.05;
const PULL_GAIN_END: f32 = 0.001;
const FILTER_Q: f32 = 1.0;

const CLICK_SECONDS: f32 = 0.1;
const CLICK_ON_PITCH: f32 = 150.0;
const CLICK_OFF_PITCH: f32 = 120.0;
const CLICK_END_PITCH: f32 = 40.0;
const CLICK_GAIN_START: f32 = 0.1;
const CLICK_GAIN_END: f32 = 0.01;

const RING_SECONDS: f32 = 0.5;
const RING_PITCH: f32 = 800.0;
const RING_GAIN_START: f32 = 0.02;
const RING_GAIN_END: f32 = 0.001;

const HUM_PITCH: f32 = 60.0;
const HUM_HARMONIC_PITCH: f32 = 120.0;
const HUM_HARMONIC_LEVEL: f32 = 0.002;
pub const HUM_LEVEL: f32 = 0.015;
pub const HUM_FADE_IN: Duration = Duration::from_secs(2);
pub const HUM_FADE_OUT: Duration = Duration::from_millis(500);

fn sample_count(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE as f32).round() as usize
}

/// Exponential glide from `from` to `to` over `length` seconds, then holds.
fn exponential_ramp(from: f32, to: f32, length: f32, time: f32) -> f32 {
    if time >= length {
        to
    } else {
        from * (to / from).powf(time / length)
    }
}

struct HighPass {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl HighPass {
    fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn tune(&mut self, cutoff: f32) {
        let omega = TAU * cutoff / SAMPLE_RATE as f32;
        let alpha = omega.sin() / (2.0 * FILTER_Q);
        let cosine = omega.cos();
        let a0 = 1.0 + alpha;
        self.b0 = (1.0 + cosine) / 2.0 / a0;
        self.b1 = -(1.0 + cosine) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cosine / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }
}

/// Short high-passed noise burst with a rising cutoff.
pub fn pull_samples(rng: &mut impl Rng) -> Vec<f32> {
    let mut filter = HighPass::new();
    (0..sample_count(PULL_SECONDS))
        .map(|index| {
            let time = index as f32 / SAMPLE_RATE as f32;
            filter.tune(exponential_ramp(
                PULL_CUTOFF_START,
                PULL_CUTOFF_END,
                PULL_SWEEP_SECONDS,
                time,
            ));
            let noise: f32 = rng.random_range(-1.0..1.0);
            let gain = exponential_ramp(PULL_GAIN_START, PULL_GAIN_END, PULL_SECONDS, time);
            filter.process(noise) * gain
        })
        .collect()
}

/// Square-wave thunk, plus a sine ring when the switch closes.
pub fn click_samples(turning_on: bool) -> Vec<f32> {
    let start_pitch = if turning_on {
        CLICK_ON_PITCH
    } else {
        CLICK_OFF_PITCH
    };
    let length = if turning_on {
        sample_count(RING_SECONDS)
    } else {
        sample_count(CLICK_SECONDS)
    };
    let click_length = sample_count(CLICK_SECONDS);

    let mut phase = 0.0f32;
    (0..length)
        .map(|index| {
            let time = index as f32 / SAMPLE_RATE as f32;
            let mut sample = 0.0;

            if index < click_length {
                let pitch = exponential_ramp(start_pitch, CLICK_END_PITCH, CLICK_SECONDS, time);
                phase = (phase + pitch / SAMPLE_RATE as f32).fract();
                let square = if phase < 0.5 { 1.0 } else { -1.0 };
                sample +=
                    square * exponential_ramp(CLICK_GAIN_START, CLICK_GAIN_END, CLICK_SECONDS, time);
            }

            if turning_on {
                let ring = (TAU * RING_PITCH * time).sin();
                sample += ring * exponential_ramp(RING_GAIN_START, RING_GAIN_END, RING_SECONDS, time);
            }
            sample
        })
        .collect()
}

#[derive(Default)]
pub struct HumControl {
    fading_out: AtomicBool,
}

impl HumControl {
    pub fn fade_out(&self) {
        self.fading_out.store(true, Ordering::Relaxed);
    }
}

/// 60 Hz mains hum with a faint second harmonic. Fades in on its own and ends
/// once a requested fade-out reaches silence.
pub struct HumVoice {
    control: Arc<HumControl>,
    index: u64,
    gain: f32,
    fade_step: Option<f32>,
}

impl HumVoice {
    pub fn new(control: Arc<HumControl>) -> Self {
        Self {
            control,
            index: 0,
            gain: 0.0,
            fade_step: None,
        }
    }
}

impl Iterator for HumVoice {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.fade_step.is_none() && self.control.fading_out.load(Ordering::Relaxed) {
            let samples = HUM_FADE_OUT.as_secs_f32() * SAMPLE_RATE as f32;
            self.fade_step = Some(self.gain / samples);
        }

        match self.fade_step {
            Some(step) => {
                self.gain -= step;
                if self.gain <= 0.0 || step <= 0.0 {
                    return None;
                }
            }
            None => {
                let rise = HUM_LEVEL / (HUM_FADE_IN.as_secs_f32() * SAMPLE_RATE as f32);
                self.gain = (self.gain + rise).min(HUM_LEVEL);
            }
        }

        let time = self.index as f64 / SAMPLE_RATE as f64;
        self.index += 1;
        let fundamental = (std::f64::consts::TAU * HUM_PITCH as f64 * time).sin() as f32;
        let harmonic = (std::f64::consts::TAU * HUM_HARMONIC_PITCH as f64 * time).sin() as f32;
        Some(self.gain * (fundamental + HUM_HARMONIC_LEVEL * harmonic))
    }
}

impl Source for HumVoice {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

struct Hum {
    control: Arc<HumControl>,
    sink: Sink,
}

/// Owns the output device for the lifetime of the app. The device is opened
/// on first use; if that fails the next cue tries again.
pub struct SoundGenerator {
    output: Option<Output>,
    hum: Option<Hum>,
    device_warned: bool,
}

impl SoundGenerator {
    pub fn new() -> Self {
        Self {
            output: None,
            hum: None,
            device_warned: false,
        }
    }

    fn output(&mut self) -> Result<&OutputStreamHandle> {
        let output = match self.output.take() {
            Some(output) => output,
            None => {
                let (stream, handle) = OutputStream::try_default()?;
                log::info!("[sound] output device opened");
                Output {
                    _stream: stream,
                    handle,
                }
            }
        };
        Ok(&self.output.insert(output).handle)
    }

    fn report(&mut self, error: crate::error::Error) {
        if self.device_warned {
            log::debug!("[sound] {error}");
        } else {
            log::warn!("[sound] {error}, continuing silently");
            self.device_warned = true;
        }
    }

    pub fn play(&mut self, cue: Cue) {
        let samples = match cue {
            Cue::Pull => pull_samples(&mut rand::rng()),
            Cue::Click { turning_on } => click_samples(turning_on),
        };
        let result = self.output().and_then(|handle| {
            handle
                .play_raw(SamplesBuffer::new(1, SAMPLE_RATE, samples))
                .map_err(Into::into)
        });
        if let Err(error) = result {
            self.report(error);
        }
    }

    /// Keeps exactly one hum running while `lit`.
    pub fn set_hum(&mut self, lit: bool) {
        match (lit, self.hum.is_some()) {
            (true, false) => self.start_hum(),
            (false, true) => self.stop_hum(),
            _ => {}
        }
    }

    fn start_hum(&mut self) {
        let result = self.output().and_then(|handle| Ok(Sink::try_new(handle)?));
        match result {
            Ok(sink) => {
                let control = Arc::new(HumControl::default());
                sink.append(HumVoice::new(control.clone()));
                log::debug!("[sound] hum started");
                self.hum = Some(Hum { control, sink });
            }
            Err(error) => self.report(error),
        }
    }

    fn stop_hum(&mut self) {
        if let Some(hum) = self.hum.take() {
            hum.control.fade_out();
            // The voice ends itself after the fade; let it finish unattended.
            hum.sink.detach();
            log::debug!("[sound] hum fading out");
        }
    }
}

impl Drop for SoundGenerator {
    fn drop(&mut self) {
        self.stop_hum();
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0, |peak, sample| peak.max(sample.abs()))
    }

    #[test]
    fn pull_cue_is_a_short_decaying_burst() {
        let samples = pull_samples(&mut StdRng::seed_from_u64(7));
        assert_eq!(samples.len(), 4410);
        assert!(samples.iter().all(|sample| sample.is_finite()));
        assert!(peak(&samples) > 0.0);

        let head = peak(&samples[..441]);
        let tail = peak(&samples[samples.len() - 441..]);
        assert!(tail < head);
    }

    #[test]
    fn click_on_rings_longer_than_click_off() {
        let on = click_samples(true);
        let off = click_samples(false);
        assert_eq!(off.len(), 4410);
        assert_eq!(on.len(), 22050);
        assert!(peak(&off) <= CLICK_GAIN_START + f32::EPSILON);
        assert!(peak(&on[5000..]) > 0.0);
        assert!(peak(&on[5000..]) <= RING_GAIN_START);
    }

    #[test]
    fn ramp_reaches_target_and_holds() {
        assert_eq!(exponential_ramp(150.0, 40.0, 0.1, 0.0), 150.0);
        assert!((exponential_ramp(150.0, 40.0, 0.1, 0.0999) - 40.0).abs() < 0.2);
        assert_eq!(exponential_ramp(150.0, 40.0, 0.1, 0.5), 40.0);
    }

    #[test]
    fn hum_fades_in_to_its_level() {
        let mut voice = HumVoice::new(Arc::new(HumControl::default()));
        let fade_in = (HUM_FADE_IN.as_secs_f32() * SAMPLE_RATE as f32) as usize;

        let first: Vec<f32> = voice.by_ref().take(SAMPLE_RATE as usize / 10).collect();
        assert!(peak(&first) < HUM_LEVEL / 10.0);

        for _ in 0..fade_in {
            voice.next();
        }
        assert!((voice.gain - HUM_LEVEL).abs() < 1e-6);
        let steady: Vec<f32> = voice.by_ref().take(SAMPLE_RATE as usize / 10).collect();
        assert!(peak(&steady) > HUM_LEVEL * 0.9);
        assert!(peak(&steady) <= HUM_LEVEL * (1.0 + HUM_HARMONIC_LEVEL) + 1e-6);
    }

    #[test]
    fn hum_fade_out_interrupts_fade_in_and_ends() {
        let control = Arc::new(HumControl::default());
        let mut voice = HumVoice::new(control.clone());
        for _ in 0..SAMPLE_RATE / 2 {
            voice.next();
        }
        assert!(voice.gain < HUM_LEVEL);

        control.fade_out();
        let remaining = voice.count() as i64;
        let fade_out = (HUM_FADE_OUT.as_secs_f32() * SAMPLE_RATE as f32) as i64;
        assert!((remaining - fade_out).abs() < fade_out / 50);
    }

    #[test]
    fn silent_hum_stops_immediately_on_fade_out() {
        let control = Arc::new(HumControl::default());
        control.fade_out();
        assert_eq!(HumVoice::new(control).next(), None);
    }
}
