use std::f32::consts::PI;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Hidden,
    SlidingIn,
    Shown,
    SlidingOut,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Rest(bool),
    Sliding {
        showing: bool,
        from: f32,
        started: Instant,
    },
}

/// Slide animation of the info panel's right margin, from `-width` (hidden) to 0.
#[derive(Debug, Clone)]
pub struct PanelMotion {
    width: f32,
    duration: Duration,
    phase: Phase,
}

/// jQuery-style "swing" easing.
pub fn swing(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    0.5 - (p * PI).cos() / 2.0
}

impl PanelMotion {
    pub fn new(width: f32, duration: Duration) -> Self {
        Self {
            width,
            duration,
            phase: Phase::Rest(false),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn visibility(&self) -> PanelVisibility {
        match self.phase {
            Phase::Rest(false) => PanelVisibility::Hidden,
            Phase::Rest(true) => PanelVisibility::Shown,
            Phase::Sliding { showing: true, .. } => PanelVisibility::SlidingIn,
            Phase::Sliding { showing: false, .. } => PanelVisibility::SlidingOut,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Sliding { .. })
    }

    /// Current right margin; `-width` is fully off-screen.
    pub fn offset(&self, now: Instant) -> f32 {
        match self.phase {
            Phase::Rest(true) => 0.0,
            Phase::Rest(false) => -self.width,
            Phase::Sliding {
                showing,
                from,
                started,
            } => {
                let to = if showing { 0.0 } else { -self.width };
                from + (to - from) * swing(self.progress(started, now))
            }
        }
    }

    /// Starts sliding in unless already shown or on the way in.
    pub fn show(&mut self, now: Instant) -> bool {
        match self.visibility() {
            PanelVisibility::Shown | PanelVisibility::SlidingIn => false,
            _ => {
                self.start(true, now);
                true
            }
        }
    }

    /// Starts sliding out unless already hidden or on the way out.
    pub fn hide(&mut self, now: Instant) -> bool {
        match self.visibility() {
            PanelVisibility::Hidden | PanelVisibility::SlidingOut => false,
            _ => {
                self.start(false, now);
                true
            }
        }
    }

    /// Settles a finished slide; returns the resting state it reached.
    pub fn advance(&mut self, now: Instant) -> Option<PanelVisibility> {
        if let Phase::Sliding {
            showing, started, ..
        } = self.phase
        {
            if self.progress(started, now) >= 1.0 {
                self.phase = Phase::Rest(showing);
                return Some(self.visibility());
            }
        }
        None
    }

    fn start(&mut self, showing: bool, now: Instant) {
        let from = self.offset(now);
        self.phase = Phase::Sliding {
            showing,
            from,
            started: now,
        };
    }

    fn progress(&self, started: Instant, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}
