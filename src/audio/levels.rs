use crate::audio::smoother::Ema;
use crate::data::settings::AudioSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

pub const AUDIO_CONFIG_EVENT: &str = "audio:config";

/// Analyzer settings pushed to the level producer whenever audio settings change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub fft_size: u32,
    pub freq_min: f64,
    pub freq_max: f64,
}

impl From<&AudioSettings> for AudioConfig {
    fn from(a: &AudioSettings) -> Self {
        Self {
            fft_size: a.fft_size.as_u32(),
            freq_min: a.freq_min,
            freq_max: a.freq_max,
        }
    }
}

#[derive(Serialize)]
struct EventMessage<'a, T> {
    event: &'a str,
    data: &'a T,
}

impl AudioConfig {
    pub fn to_event_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&EventMessage { event: AUDIO_CONFIG_EVENT, data: self })
    }
}

/// Where band levels come from. Picked explicitly at startup.
pub trait LevelSource {
    /// Latest frame, or `None` before anything has arrived.
    fn poll(&mut self) -> Option<&[f32]>;
    fn is_active(&self) -> bool;
    /// Fire-and-forget; sources with nothing upstream ignore it.
    fn send_config(&mut self, config: &AudioConfig);
}

/// Pseudo-random levels for running without an analyzer.
pub struct SyntheticLevels {
    rng: StdRng,
    started: Instant,
    levels: Vec<f32>,
}

impl SyntheticLevels {
    pub fn new(band_count: usize) -> Self {
        Self::with_rng(band_count, StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(band_count: usize, seed: u64) -> Self {
        Self::with_rng(band_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(band_count: usize, rng: StdRng) -> Self {
        Self {
            rng,
            started: Instant::now(),
            levels: vec![0.0; band_count],
        }
    }
}

impl LevelSource for SyntheticLevels {
    fn poll(&mut self) -> Option<&[f32]> {
        let ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let wave = (ms / 500.0).sin() as f32 * 0.3;
        for v in self.levels.iter_mut() {
            *v = (self.rng.gen::<f32>() * 0.5 + wave + 0.2).clamp(0.0, 1.0);
        }
        Some(self.levels.as_slice())
    }

    fn is_active(&self) -> bool {
        true
    }

    fn send_config(&mut self, _config: &AudioConfig) {}
}

/// Levels pushed by an external analyzer as one JSON array per line.
pub struct LiveLevels {
    rx: Receiver<Vec<f32>>,
    config_out: Box<dyn Write + Send>,
    smooth: Ema,
    band_count: usize,
    levels: Vec<f32>,
    active: bool,
    disconnected: bool,
}

impl LiveLevels {
    pub fn spawn<R, W>(input: R, config_out: W, band_count: usize, smoothing: f32) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(input).lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        log::warn!("level feed read failed: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Vec<f32>>(&line) {
                    Ok(frame) => {
                        if tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Err(e) => log::debug!("skipping malformed level frame: {e}"),
                }
            }
        });

        Self {
            rx,
            config_out: Box::new(config_out),
            smooth: Ema::new(smoothing, band_count),
            band_count,
            levels: vec![0.0; band_count],
            active: false,
            disconnected: false,
        }
    }

    fn accept(&mut self, frame: Vec<f32>) {
        if frame.len() != self.band_count {
            log::debug!("dropping level frame with {} bands (want {})", frame.len(), self.band_count);
            return;
        }
        let clamped: Vec<f32> = frame.into_iter().map(|v| v.clamp(0.0, 1.0)).collect();
        self.levels.copy_from_slice(self.smooth.apply(&clamped));
        self.active = true;
    }
}

impl LevelSource for LiveLevels {
    fn poll(&mut self) -> Option<&[f32]> {
        while !self.disconnected {
            match self.rx.try_recv() {
                Ok(frame) => self.accept(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("level feed closed");
                    self.disconnected = true;
                }
            }
        }
        if self.active {
            Some(self.levels.as_slice())
        } else {
            None
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn send_config(&mut self, config: &AudioConfig) {
        let line = match config.to_event_json() {
            Ok(l) => l,
            Err(e) => {
                log::warn!("failed to encode audio config: {e}");
                return;
            }
        };
        if let Err(e) = writeln!(self.config_out, "{line}").and_then(|_| self.config_out.flush()) {
            log::warn!("failed to send audio config: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn poll_until_closed(src: &mut LiveLevels) {
        for _ in 0..200 {
            src.poll();
            if src.disconnected {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("feed never closed");
    }

    #[test]
    fn test_audio_config_event_json() {
        let cfg = AudioConfig::from(&AudioSettings::default());
        assert_eq!(
            cfg.to_event_json().unwrap(),
            r#"{"event":"audio:config","data":{"fftSize":2048,"freqMin":20.0,"freqMax":20000.0}}"#
        );
    }

    #[test]
    fn test_synthetic_levels_in_range() {
        let mut src = SyntheticLevels::seeded(64, 7);
        assert!(src.is_active());
        for _ in 0..20 {
            let frame = src.poll().unwrap();
            assert_eq!(frame.len(), 64);
            assert!(frame.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_live_levels_accepts_matching_frames_only() {
        let input = "[0.5, 0.5]\n[1, 2, 3]\nnot json\n[1.0, 0.0]\n";
        let mut src = LiveLevels::spawn(Cursor::new(input), std::io::sink(), 2, 1.0);
        assert!(!src.is_active());
        poll_until_closed(&mut src);
        assert!(src.is_active());
        assert_eq!(src.poll().unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn test_live_levels_inactive_without_frames() {
        let mut src = LiveLevels::spawn(Cursor::new("[0.1]\n"), std::io::sink(), 4, 0.3);
        poll_until_closed(&mut src);
        assert!(!src.is_active());
        assert!(src.poll().is_none());
    }

    #[test]
    fn test_live_levels_send_config_writes_line() {
        let out = SharedBuf::default();
        let mut src = LiveLevels::spawn(Cursor::new(""), out.clone(), 4, 0.3);
        src.send_config(&AudioConfig { fft_size: 4096, freq_min: 30.0, freq_max: 16000.0 });
        let written = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            written,
            "{\"event\":\"audio:config\",\"data\":{\"fftSize\":4096,\"freqMin\":30.0,\"freqMax\":16000.0}}\n"
        );
    }
}
