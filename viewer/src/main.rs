use chrono::Utc;
use clap::Parser;
use config::ViewerConfig;
use eclipsecore::controller::QueryStatus;
use eclipsecore::geometry::{MapPoint, Viewport};
use eclipsecore::host::ensure_vector_surface;
use eclipsecore::model::{EclipseFeature, FeatureId};
use eclipsecore::query::QueryTicket;
use eclipsecore::{EclipseController, InteractionMode, ViewerError};
use iced::{
    alignment, time,
    widget::{button, column, container, row, stack, text, Canvas, Column},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use log::{error, info};
use map::{EclipseMap, ShapeColors};
use source::RemoteSource;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod config;
mod map;
mod panel_view;
mod source;

#[derive(Parser)]
#[command(author, version, about = "Interactive solar eclipse path map")]
struct Args {
    /// Load viewer settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Feature layer URL, e.g. a local `eclipse-server --serve`
    #[arg(long)]
    service_url: Option<String>,
    /// Select paths by hovering instead of clicking
    #[arg(long, default_value_t = false)]
    hover: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(url) = args.service_url {
        config.service_url = url;
    }
    if args.hover {
        config.mode = InteractionMode::Hover;
    }
    config.validate()?;

    iced::application(
        move || Viewer::boot(config.clone()),
        Viewer::update,
        Viewer::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()?;
    Ok(())
}

fn application_title(_: &Viewer) -> String {
    "Solar Eclipse Finder".into()
}

fn application_subscription(state: &Viewer) -> Subscription<Message> {
    let fast = state
        .host
        .as_ref()
        .is_some_and(|host| host.controller.wants_fast_ticks());
    let period = if fast {
        Duration::from_millis(16)
    } else {
        Duration::from_secs(1)
    };
    time::every(period).map(Message::Tick)
}

fn application_theme(_: &Viewer) -> Theme {
    Theme::Light
}

/// Everything that only exists once the startup check has passed.
struct MapHost {
    controller: EclipseController,
    colors: ShapeColors,
}

impl Drop for MapHost {
    fn drop(&mut self) {
        self.controller.teardown();
    }
}

struct Viewer {
    host: Option<MapHost>,
    fatal: Option<String>,
    source: RemoteSource,
    viewport: Viewport,
    hovered: Option<FeatureId>,
    status: String,
    history: Vec<String>,
    show_tutorial: bool,
    now: Instant,
}

#[derive(Debug, Clone)]
enum Message {
    Tick(Instant),
    MapPressed(MapPoint),
    MapHovered(MapPoint),
    MapLeft,
    ViewportChanged(Viewport),
    PanelEntered,
    PanelLeft,
    QueryFinished(QueryTicket, Result<Vec<EclipseFeature>, String>),
    ToggleTutorial,
}

impl Viewer {
    fn boot(config: ViewerConfig) -> (Self, Task<Message>) {
        let mut viewer = Viewer {
            host: None,
            fatal: None,
            source: RemoteSource::new(&config.service_url),
            viewport: config.viewport(),
            hovered: None,
            status: "Click the map to find eclipse paths.".into(),
            history: Vec::new(),
            show_tutorial: config.show_tutorial,
            now: Instant::now(),
        };

        let startup = ensure_vector_surface(config.surface)
            .and_then(|_| ShapeColors::from_palette(&config.palette));
        let colors = match startup {
            Ok(colors) => colors,
            Err(err) => {
                error!("startup check failed: {err}");
                viewer.fatal = Some(err.to_string());
                return (viewer, Task::none());
            }
        };

        let mut controller = EclipseController::new(config.to_controller_config(), Utc::now());
        let task = match controller.startup_query() {
            Some(ticket) => {
                viewer.status = "Loading eclipse paths...".into();
                query_task(&viewer.source, ticket)
            }
            None => Task::none(),
        };
        info!("viewer ready in {:?} mode against {}", config.mode, config.service_url);
        viewer.host = Some(MapHost { controller, colors });
        (viewer, task)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        state.now = Instant::now();
        let now = state.now;

        if let Message::ToggleTutorial = message {
            state.show_tutorial = !state.show_tutorial;
            return Task::none();
        }
        let Some(host) = state.host.as_mut() else {
            return Task::none();
        };
        let controller = &mut host.controller;

        match message {
            Message::Tick(_) => {
                if controller.tick(now, Utc::now()) {
                    push_history(&mut state.history, "Panel hidden after idle timeout".into());
                }
                Task::none()
            }
            Message::MapPressed(point) => match controller.hit_test(point) {
                Some(id) => {
                    controller.feature_clicked(id, now);
                    Task::none()
                }
                None => match controller.background_clicked(point, now) {
                    Some(ticket) => {
                        state.status =
                            format!("Searching at {:.2}°, {:.2}°...", point.lon, point.lat);
                        query_task(&state.source, ticket)
                    }
                    None => Task::none(),
                },
            },
            Message::MapHovered(point) => {
                let hovered = controller.hit_test(point);
                if hovered != state.hovered {
                    match hovered {
                        Some(id) => controller.hover_entered(id, now),
                        None => controller.hover_left(now),
                    }
                    state.hovered = hovered;
                }
                Task::none()
            }
            Message::MapLeft => {
                if state.hovered.take().is_some() {
                    controller.hover_left(now);
                }
                Task::none()
            }
            Message::ViewportChanged(viewport) => {
                state.viewport = viewport;
                Task::none()
            }
            Message::PanelEntered => {
                controller.panel_entered();
                Task::none()
            }
            Message::PanelLeft => {
                controller.panel_left(now);
                Task::none()
            }
            Message::QueryFinished(ticket, result) => {
                match controller.query_completed(&ticket, result.map_err(ViewerError::Transport)) {
                    QueryStatus::Applied(count) => {
                        state.status = format!("{count} eclipse paths");
                        push_history(
                            &mut state.history,
                            format!("Query {}: {count} paths", ticket.sequence),
                        );
                    }
                    QueryStatus::Failed(err) => {
                        state.status = format!("Query error: {err}");
                        push_history(&mut state.history, format!("Query {} failed", ticket.sequence));
                    }
                    QueryStatus::Stale => {}
                }
                Task::none()
            }
            Message::ToggleTutorial => Task::none(),
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let Some(host) = &state.host else {
            let notice = state.fatal.as_deref().unwrap_or("Viewer failed to start.");
            return container(text(notice).size(20))
                .center(Length::Fill)
                .into();
        };
        let controller = &host.controller;

        let map = Canvas::new(EclipseMap {
            shapes: controller.shapes(),
            viewport: state.viewport,
            pushpin: controller.pushpin(),
            colors: host.colors,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let mut layers = stack![map].width(Length::Fill).height(Length::Fill);

        let panel = controller.panel();
        let visible = panel.width() + panel.offset(state.now);
        if let Some(fields) = panel.fields() {
            if visible > 0.5 {
                layers = layers.push(
                    container(panel_view::info_panel(fields, panel.width(), visible))
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .align_x(alignment::Horizontal::Right)
                        .padding(10),
                );
            }
        }
        if state.show_tutorial {
            layers = layers.push(
                container(
                    container(panel_view::tutorial(controller.mode()))
                        .style(container::rounded_box),
                )
                .center(Length::Fill),
            );
        }

        let loading = if controller.is_loading() { " (loading)" } else { "" };
        let top_bar = row![
            text("Solar Eclipse Finder").size(20),
            button("How to use").on_press(Message::ToggleTutorial).padding(6),
            text(format!("{}{}", state.status, loading)).size(14),
        ]
        .spacing(16)
        .padding(8)
        .align_y(Alignment::Center);

        let history = state
            .history
            .iter()
            .rev()
            .take(3)
            .fold(Column::new().spacing(2).padding(4), |col, entry| {
                col.push(text(entry.clone()).size(11))
            });

        column![top_bar, layers, history].into()
    }
}

fn query_task(source: &RemoteSource, ticket: QueryTicket) -> Task<Message> {
    Task::perform(source.clone().query(ticket.query), move |result| {
        Message::QueryFinished(ticket, result)
    })
}

fn push_history(history: &mut Vec<String>, entry: String) {
    history.push(entry);
    if history.len() > 20 {
        history.remove(0);
    }
}
