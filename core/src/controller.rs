use crate::geometry::MapPoint;
use crate::model::{EclipseFeature, FeatureId};
use crate::panel::InfoPanel;
use crate::prelude::{ControllerConfig, InteractionMode, ViewerResult};
use crate::query::{QueryDispatcher, QueryOutcome, QueryTicket, SpatialQuery};
use crate::selection::{RenderedShape, SelectionController};
use crate::telemetry::{LogManager, MetricsRecorder, QueryMetrics};
use chrono::{DateTime, Utc};
use std::time::Instant;

/// What became of a query response.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    Applied(usize),
    Failed(String),
    Stale,
}

/// Owns the viewer state and maps platform events onto it.
///
/// Constructed once the host passes its startup check and dropped (after
/// `teardown`) with the view.
pub struct EclipseController {
    config: ControllerConfig,
    selection: SelectionController,
    panel: InfoPanel,
    dispatcher: QueryDispatcher,
    pushpin: Option<MapPoint>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl EclipseController {
    pub fn new(config: ControllerConfig, today: DateTime<Utc>) -> Self {
        let idle = match config.mode {
            InteractionMode::Hover => Some(config.idle_timeout),
            InteractionMode::Click => None,
        };
        Self {
            panel: InfoPanel::new(config.panel_width, config.slide_duration, idle),
            selection: SelectionController::new(today),
            dispatcher: QueryDispatcher::new(),
            pushpin: None,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("controller"),
            config,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.config.mode
    }

    pub fn shapes(&self) -> &[RenderedShape] {
        self.selection.shapes()
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selection.selected()
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    pub fn pushpin(&self) -> Option<MapPoint> {
        self.pushpin
    }

    pub fn metrics(&self) -> QueryMetrics {
        self.metrics.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.dispatcher.is_pending()
    }

    /// Shape under the given map point, if any.
    pub fn hit_test(&self, point: MapPoint) -> Option<FeatureId> {
        self.selection.hit_test(point)
    }

    /// Hover mode renders every path up front.
    pub fn startup_query(&mut self) -> Option<QueryTicket> {
        match self.config.mode {
            InteractionMode::Hover => Some(self.issue(SpatialQuery::all())),
            InteractionMode::Click => None,
        }
    }

    pub fn feature_clicked(&mut self, id: FeatureId, now: Instant) {
        self.select_and_show(id, now);
    }

    /// Clears the selection; in click mode also pins the point and re-queries.
    pub fn background_clicked(&mut self, point: MapPoint, now: Instant) -> Option<QueryTicket> {
        self.selection.on_background_click();
        self.panel.hide(now);
        match self.config.mode {
            InteractionMode::Click => {
                self.pushpin = Some(point);
                Some(self.issue(SpatialQuery::at(point)))
            }
            InteractionMode::Hover => None,
        }
    }

    pub fn hover_entered(&mut self, id: FeatureId, now: Instant) {
        if self.config.mode == InteractionMode::Hover {
            self.select_and_show(id, now);
        }
    }

    pub fn hover_left(&mut self, now: Instant) {
        if self.config.mode == InteractionMode::Hover {
            self.selection.select(None);
            self.panel.hover_keep_alive(now);
        }
    }

    pub fn panel_entered(&mut self) {
        self.panel.pointer_entered();
    }

    pub fn panel_left(&mut self, now: Instant) {
        self.panel.pointer_left(now);
    }

    pub fn query_completed(
        &mut self,
        ticket: &QueryTicket,
        result: ViewerResult<Vec<EclipseFeature>>,
    ) -> QueryStatus {
        match self.dispatcher.complete(ticket, result) {
            QueryOutcome::Applied(features) => {
                let count = features.len();
                self.selection.replace_shapes(features);
                self.metrics.record_applied();
                self.logger
                    .record(&format!("query {} applied: {} paths", ticket.sequence, count));
                QueryStatus::Applied(count)
            }
            QueryOutcome::Failed(err) => {
                self.metrics.record_failed();
                self.logger
                    .warn(&format!("query {} failed: {}", ticket.sequence, err));
                QueryStatus::Failed(err.to_string())
            }
            QueryOutcome::Stale => {
                self.metrics.record_stale();
                self.logger
                    .record(&format!("query {} superseded, dropped", ticket.sequence));
                QueryStatus::Stale
            }
        }
    }

    /// Advances timers and animations. Returns true if the panel timed out.
    pub fn tick(&mut self, now: Instant, today: DateTime<Utc>) -> bool {
        self.selection.set_reference_date(today);
        let timed_out = self.panel.tick(now);
        if timed_out {
            self.logger.record("panel hidden after idle timeout");
        }
        timed_out
    }

    /// Whether the host needs frequent ticks (slide in progress or timer armed).
    pub fn wants_fast_ticks(&self) -> bool {
        self.panel.is_animating() || self.panel.timer().is_armed()
    }

    pub fn teardown(&mut self) {
        self.dispatcher.abandon();
        self.selection.clear();
        self.panel.reset();
        self.pushpin = None;
        self.logger.record("controller torn down");
    }

    fn select_and_show(&mut self, id: FeatureId, now: Instant) {
        self.selection.select(Some(id));
        if let Some(feature) = self.selection.selected_feature() {
            self.logger.record(&format!("selected {}", feature.id));
            self.panel.show(&feature.record, now);
        }
    }

    fn issue(&mut self, query: SpatialQuery) -> QueryTicket {
        self.metrics.record_issued();
        let ticket = self.dispatcher.issue(query);
        self.logger
            .record(&format!("query {} issued: {:?}", ticket.sequence, query.filter));
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::feature;
    use crate::panel::PanelVisibility;
    use crate::prelude::ViewerError;
    use chrono::TimeZone;
    use std::time::Duration;

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn controller(mode: InteractionMode) -> EclipseController {
        EclipseController::new(
            ControllerConfig {
                mode,
                ..Default::default()
            },
            today(),
        )
    }

    fn paths() -> Vec<EclipseFeature> {
        vec![feature(1, 2017, 0.0, 0.0), feature(2, 2045, 5.0, 5.0)]
    }

    #[test]
    fn background_click_pins_and_queries_in_click_mode() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Click);
        assert!(controller.startup_query().is_none());

        let point = MapPoint::new(7.0, 7.0);
        let ticket = controller.background_clicked(point, start).unwrap();
        assert_eq!(ticket.query, SpatialQuery::at(point));
        assert_eq!(controller.pushpin(), Some(point));
        assert!(controller.is_loading());

        assert_eq!(
            controller.query_completed(&ticket, Ok(paths())),
            QueryStatus::Applied(2)
        );
        assert_eq!(controller.shapes().len(), 2);
        assert!(!controller.is_loading());
    }

    #[test]
    fn click_selects_and_background_click_clears() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Click);
        let ticket = controller
            .background_clicked(MapPoint::new(7.0, 7.0), start)
            .unwrap();
        controller.query_completed(&ticket, Ok(paths()));

        controller.feature_clicked(FeatureId(1), start);
        assert_eq!(controller.selected(), Some(FeatureId(1)));
        assert_eq!(controller.panel().visibility(), PanelVisibility::SlidingIn);
        controller.feature_clicked(FeatureId(2), start);
        assert_eq!(controller.selection.highlighted_count(), 1);

        let later = start + Duration::from_secs(1);
        controller.background_clicked(MapPoint::new(50.0, 50.0), later);
        assert_eq!(controller.selection.highlighted_count(), 0);
        assert_eq!(controller.panel().visibility(), PanelVisibility::SlidingOut);
    }

    #[test]
    fn stale_query_does_not_overwrite_newer_result() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Click);
        let slow = controller
            .background_clicked(MapPoint::new(1.0, 1.0), start)
            .unwrap();
        let fast = controller
            .background_clicked(MapPoint::new(7.0, 7.0), start)
            .unwrap();

        controller.query_completed(&fast, Ok(vec![feature(2, 2045, 5.0, 5.0)]));
        assert_eq!(
            controller.query_completed(&slow, Ok(paths())),
            QueryStatus::Stale
        );
        assert_eq!(controller.shapes().len(), 1);
        assert_eq!(controller.metrics().stale, 1);
        assert_eq!(controller.metrics().issued, 2);
    }

    #[test]
    fn failed_query_keeps_previous_shapes() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Click);
        let first = controller
            .background_clicked(MapPoint::new(7.0, 7.0), start)
            .unwrap();
        controller.query_completed(&first, Ok(paths()));
        let second = controller
            .background_clicked(MapPoint::new(8.0, 8.0), start)
            .unwrap();
        let status = controller.query_completed(
            &second,
            Err(ViewerError::Service {
                code: 500,
                message: "unavailable".into(),
            }),
        );
        assert!(matches!(status, QueryStatus::Failed(_)));
        assert_eq!(controller.shapes().len(), 2);
        assert_eq!(controller.metrics().failed, 1);
    }

    #[test]
    fn hover_mode_auto_hides_after_idle_period() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Hover);
        let ticket = controller.startup_query().unwrap();
        assert_eq!(ticket.query, SpatialQuery::all());
        controller.query_completed(&ticket, Ok(paths()));

        controller.hover_entered(FeatureId(2), start);
        assert_eq!(controller.selected(), Some(FeatureId(2)));
        controller.hover_left(start + Duration::from_secs(1));
        assert_eq!(controller.selected(), None);
        assert!(controller.wants_fast_ticks());

        assert!(!controller.tick(start + Duration::from_millis(3900), today()));
        assert!(controller.tick(start + Duration::from_secs(4), today()));
        assert!(!controller.tick(start + Duration::from_secs(5), today()));
        assert_eq!(controller.panel().visibility(), PanelVisibility::Hidden);
        assert_eq!(controller.panel().timeout_hides(), 1);
    }

    #[test]
    fn hover_events_are_ignored_in_click_mode() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Click);
        let ticket = controller
            .background_clicked(MapPoint::new(7.0, 7.0), start)
            .unwrap();
        controller.query_completed(&ticket, Ok(paths()));
        controller.hover_entered(FeatureId(1), start);
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn teardown_drops_in_flight_query() {
        let start = Instant::now();
        let mut controller = controller(InteractionMode::Click);
        let ticket = controller
            .background_clicked(MapPoint::new(7.0, 7.0), start)
            .unwrap();
        controller.teardown();
        assert_eq!(
            controller.query_completed(&ticket, Ok(paths())),
            QueryStatus::Stale
        );
        assert!(controller.shapes().is_empty());
        assert_eq!(controller.pushpin(), None);
    }
}
