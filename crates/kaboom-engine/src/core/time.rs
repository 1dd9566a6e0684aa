/// Frame clock.
/// Tracks the raw frame delta, accumulated game time and a once-per-second
/// averaged fps reading.
pub struct Clock {
    /// Raw delta of the last frame in seconds.
    dt: f32,
    /// Accumulated game time.
    time: f32,
    fps: u32,
    fps_buf: Vec<f32>,
    fps_timer: f32,
    /// Ignore the next frame's delta (e.g. after the tab was hidden).
    skip: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            dt: 0.0,
            time: 0.0,
            fps: 0,
            fps_buf: Vec::with_capacity(120),
            fps_timer: 0.0,
            skip: false,
        }
    }

    /// Feed one frame's raw delta.
    pub fn advance(&mut self, frame_dt: f32) {
        if self.skip {
            self.skip = false;
            self.dt = 0.0;
            return;
        }
        self.dt = frame_dt.max(0.0);
        self.time += self.dt;
        if self.dt > 0.0 {
            self.fps_buf.push(1.0 / self.dt);
        }
        self.fps_timer += self.dt;
        if self.fps_timer >= 1.0 {
            self.fps_timer = 0.0;
            if !self.fps_buf.is_empty() {
                let avg = self.fps_buf.iter().sum::<f32>() / self.fps_buf.len() as f32;
                self.fps = avg.round() as u32;
            }
            self.fps_buf.clear();
        }
    }

    /// Drop the next delta instead of applying it.
    pub fn skip_next(&mut self) {
        self.skip = true;
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
