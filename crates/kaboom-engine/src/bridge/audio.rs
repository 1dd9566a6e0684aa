use crate::assets::SoundData;

/// Playback options for `play`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayConf {
    pub volume: f32,
    pub speed: f32,
    pub looping: bool,
}

impl Default for PlayConf {
    fn default() -> Self {
        Self {
            volume: 1.0,
            speed: 1.0,
            looping: false,
        }
    }
}

/// Host audio output.
pub trait AudioSink {
    fn play(&mut self, sound: &SoundData, conf: &PlayConf);

    /// Master volume, `[0, 1]`.
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that records what was played. Used when the host has no audio.
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    pub played: Vec<(u32, PlayConf)>,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, sound: &SoundData, conf: &PlayConf) {
        self.played.push((sound.handle, *conf));
    }
}
