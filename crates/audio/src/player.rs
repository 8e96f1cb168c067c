//! rodio output: one looping ambiance sink plus an effects sink

use crate::service::AudioError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::time::Duration;

/// Audio player owning the output stream.
///
/// Not `Send`: create it on the thread that drives it.
pub struct AudioPlayer {
    // Keep the stream alive - dropping it stops all audio
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    ambiance: Option<Sink>,
    effects: Sink,
    volume: f32,
}

impl AudioPlayer {
    /// Open the default output device
    pub fn new(volume: f32) -> Result<Self, AudioError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
        let effects =
            Sink::try_new(&stream_handle).map_err(|e| AudioError::Unavailable(e.to_string()))?;
        let volume = volume.clamp(0.0, 1.0);
        effects.set_volume(volume);

        Ok(Self {
            _stream: stream,
            stream_handle,
            ambiance: None,
            effects,
            volume,
        })
    }

    /// Master volume this player was opened with
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Replace the ambiance with a looping, paused source decoded from `path`
    pub fn load_ambiance(&mut self, path: &Path) -> Result<(), AudioError> {
        self.stop_ambiance();

        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .repeat_infinite();

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);
        self.ambiance = Some(sink);
        Ok(())
    }

    /// Start the loaded ambiance at full volume
    pub fn start_ambiance(&self) {
        if let Some(sink) = &self.ambiance {
            sink.set_volume(self.volume);
            sink.play();
        }
    }

    pub fn stop_ambiance(&mut self) {
        if let Some(sink) = self.ambiance.take() {
            sink.stop();
        }
    }

    /// Set the ambiance volume as a fraction of the master volume
    pub fn set_ambiance_level(&self, level: f32) {
        if let Some(sink) = &self.ambiance {
            sink.set_volume(self.volume * level.clamp(0.0, 1.0));
        }
    }

    pub fn has_ambiance(&self) -> bool {
        self.ambiance.is_some()
    }

    /// Pause all output
    pub fn pause(&self) {
        if let Some(sink) = &self.ambiance {
            sink.pause();
        }
        self.effects.pause();
    }

    /// Resume all output
    pub fn resume(&self) {
        if let Some(sink) = &self.ambiance {
            sink.play();
        }
        self.effects.play();
    }

    /// Play preloaded sound bytes on the effects sink
    pub fn play_bytes(&self, bytes: &[u8]) -> Result<(), AudioError> {
        let source =
            Decoder::new(Cursor::new(bytes.to_vec())).map_err(|e| AudioError::Decode {
                path: Default::default(),
                message: e.to_string(),
            })?;
        self.effects.append(source);
        self.effects.play();
        Ok(())
    }

    /// Play a sound file once on the effects sink
    pub fn play_file(&self, path: &Path) -> Result<(), AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.effects.append(source);
        self.effects.play();
        Ok(())
    }

    /// Try to play a system alert sound, falling back to a generated tone
    pub fn play_system_alert(&self) -> Result<(), AudioError> {
        let paths = [
            // freedesktop sounds (Linux)
            "/usr/share/sounds/freedesktop/stereo/bell.oga",
            "/usr/share/sounds/freedesktop/stereo/complete.oga",
            // GNOME
            "/usr/share/sounds/gnome/default/alerts/glass.ogg",
            // macOS
            "/System/Library/Sounds/Glass.aiff",
            // Windows
            "C:\\Windows\\Media\\chimes.wav",
        ];

        for path in paths {
            let path = Path::new(path);
            if path.exists() && self.play_file(path).is_ok() {
                return Ok(());
            }
        }

        self.play_tone(528.0, Duration::from_millis(900), 0.3);
        Ok(())
    }

    /// Play a sine tone on the effects sink
    pub fn play_tone(&self, frequency: f32, duration: Duration, gain: f32) {
        let source = rodio::source::SineWave::new(frequency)
            .take_duration(duration)
            .amplify(gain);
        self.effects.append(source);
        self.effects.play();
    }
}
