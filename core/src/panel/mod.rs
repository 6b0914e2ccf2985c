//! Attribute panel for the selected eclipse path.
//!
//! The panel slides in when a record is shown and out when hidden. With an
//! idle timeout configured it also hides itself after a quiet period, unless
//! the pointer rests over it.

pub mod fields;
pub mod motion;
pub mod timer;

pub use fields::{PanelField, PanelFields, PanelImage};
pub use motion::{PanelMotion, PanelVisibility};
pub use timer::IdleTimer;

use crate::model::EclipseRecord;
use std::time::{Duration, Instant};

pub struct InfoPanel {
    fields: Option<PanelFields>,
    motion: PanelMotion,
    timer: IdleTimer,
    idle_timeout: Option<Duration>,
    pointer_inside: bool,
    timeout_hides: usize,
}

impl InfoPanel {
    pub fn new(width: f32, slide: Duration, idle_timeout: Option<Duration>) -> Self {
        Self {
            fields: None,
            motion: PanelMotion::new(width, slide),
            timer: IdleTimer::new(),
            idle_timeout,
            pointer_inside: false,
            timeout_hides: 0,
        }
    }

    pub fn fields(&self) -> Option<&PanelFields> {
        self.fields.as_ref()
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.motion.visibility()
    }

    pub fn offset(&self, now: Instant) -> f32 {
        self.motion.offset(now)
    }

    pub fn width(&self) -> f32 {
        self.motion.width()
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_animating()
    }

    pub fn timer(&self) -> &IdleTimer {
        &self.timer
    }

    /// Number of times the idle timer has hidden the panel.
    pub fn timeout_hides(&self) -> usize {
        self.timeout_hides
    }

    pub fn show(&mut self, record: &EclipseRecord, now: Instant) {
        self.fields = Some(PanelFields::from_record(record));
        self.motion.show(now);
        self.hover_keep_alive(now);
    }

    pub fn hide(&mut self, now: Instant) {
        self.timer.cancel();
        self.motion.hide(now);
    }

    /// Rearms the idle timer; a no-op without an idle timeout or while the
    /// pointer is over the panel.
    pub fn hover_keep_alive(&mut self, now: Instant) {
        if let Some(timeout) = self.idle_timeout {
            if !self.pointer_inside {
                self.timer.arm(now, timeout);
            }
        }
    }

    pub fn pointer_entered(&mut self) {
        self.pointer_inside = true;
        self.timer.cancel();
    }

    pub fn pointer_left(&mut self, now: Instant) {
        self.pointer_inside = false;
        if self.visibility() != PanelVisibility::Hidden {
            self.hover_keep_alive(now);
        }
    }

    /// Fires the idle timer and settles the slide. Returns true when the
    /// panel started hiding because it sat idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut timed_out = false;
        if self.timer.fire_if_due(now) && !self.pointer_inside {
            self.motion.hide(now);
            self.timeout_hides += 1;
            timed_out = true;
        }
        self.motion.advance(now);
        timed_out
    }

    pub fn reset(&mut self) {
        self.timer.cancel();
        self.fields = None;
        self.pointer_inside = false;
        self.motion = PanelMotion::new(self.motion.width(), self.motion.duration());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;
    use crate::model::EclipseType;

    const SLIDE: Duration = Duration::from_millis(300);
    const IDLE: Duration = Duration::from_secs(3);

    fn hover_panel() -> InfoPanel {
        InfoPanel::new(175.0, SLIDE, Some(IDLE))
    }

    fn run(panel: &mut InfoPanel, from: Instant, until: Instant) -> usize {
        let mut hides = 0;
        let mut now = from;
        while now <= until {
            if panel.tick(now) {
                hides += 1;
            }
            now += Duration::from_millis(100);
        }
        hides
    }

    #[test]
    fn idle_panel_hides_exactly_once() {
        let start = Instant::now();
        let mut panel = hover_panel();
        panel.show(&record(EclipseType::Total, 2024), start);
        assert_eq!(run(&mut panel, start, start + Duration::from_secs(10)), 1);
        assert_eq!(panel.visibility(), PanelVisibility::Hidden);
        assert_eq!(panel.timeout_hides(), 1);
    }

    #[test]
    fn interaction_before_expiry_suppresses_hide() {
        let start = Instant::now();
        let mut panel = hover_panel();
        panel.show(&record(EclipseType::Total, 2024), start);
        let nudge = start + Duration::from_secs(2);
        assert_eq!(run(&mut panel, start, nudge), 0);
        panel.hover_keep_alive(nudge);
        assert_eq!(run(&mut panel, nudge, start + Duration::from_millis(4900)), 0);
        assert_eq!(panel.visibility(), PanelVisibility::Shown);
        assert_eq!(run(&mut panel, start + Duration::from_secs(5), start + Duration::from_secs(6)), 1);
    }

    #[test]
    fn pointer_over_panel_keeps_it_open() {
        let start = Instant::now();
        let mut panel = hover_panel();
        panel.show(&record(EclipseType::Total, 2024), start);
        panel.pointer_entered();
        assert!(!panel.timer().is_armed());
        panel.hover_keep_alive(start);
        assert!(!panel.timer().is_armed());
        assert_eq!(run(&mut panel, start, start + Duration::from_secs(10)), 0);

        let leave = start + Duration::from_secs(10);
        panel.pointer_left(leave);
        assert!(panel.timer().is_armed());
        assert_eq!(run(&mut panel, leave, leave + IDLE + SLIDE), 1);
    }

    #[test]
    fn click_panel_never_times_out() {
        let start = Instant::now();
        let mut panel = InfoPanel::new(175.0, SLIDE, None);
        panel.show(&record(EclipseType::Annular, 2023), start);
        assert_eq!(run(&mut panel, start, start + Duration::from_secs(30)), 0);
        assert_eq!(panel.visibility(), PanelVisibility::Shown);
        assert_eq!(panel.fields().unwrap().type_label, "Annular Eclipse");

        panel.hide(start + Duration::from_secs(30));
        assert_eq!(panel.visibility(), PanelVisibility::SlidingOut);
    }

    #[test]
    fn explicit_hide_cancels_timer() {
        let start = Instant::now();
        let mut panel = hover_panel();
        panel.show(&record(EclipseType::Total, 2024), start);
        panel.hide(start + Duration::from_secs(1));
        assert!(!panel.timer().is_armed());
        assert_eq!(run(&mut panel, start, start + Duration::from_secs(10)), 0);
        assert_eq!(panel.timeout_hides(), 0);
    }
}
