//! Widget gallery demo
//!
//! Drives a carousel, statistics counters, a countdown and read-more excerpts
//! with scripted input so the widgets can be watched in the log output.
//! Pass a gallery configuration JSON file as the first argument to override
//! the built-in settings.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wg_core::events::events::{AutoRotationChanged, SequenceReplaced};
use wg_core::{EventBus, PositionChange, RenderError, Renderer, RotationConfig};
use wg_widgets::counter::parse_counter_value;
use wg_widgets::{
    Carousel, Countdown, CounterAnimation, Excerpt, GalleryConfig, RevealTracker, SlideDeck,
};

#[derive(Debug, Clone)]
struct Announcement {
    title: String,
    category: &'static str,
}

fn announcements() -> Vec<Announcement> {
    [
        ("Mid-term exam timetable published", "academics"),
        ("Inter-house sports day", "events"),
        ("Library opening hours extended", "facilities"),
        ("Science fair registrations open", "events"),
        ("New bus route for the east campus", "facilities"),
    ]
    .into_iter()
    .map(|(title, category)| Announcement {
        title: title.to_string(),
        category,
    })
    .collect()
}

/// Slide renderer that logs what is shown and fades slides in the first time they appear
struct LoggedSlides {
    deck: SlideDeck,
    reveal: Mutex<RevealTracker<String>>,
}

impl LoggedSlides {
    fn new(items: &[Announcement], reveal_threshold: f64) -> Self {
        let mut reveal = RevealTracker::new(reveal_threshold);
        for item in items {
            reveal.observe(item.title.clone());
        }

        Self {
            deck: SlideDeck::new(),
            reveal: Mutex::new(reveal),
        }
    }
}

impl Renderer<Announcement> for LoggedSlides {
    fn on_position_changed(&self, change: &PositionChange<'_, Announcement>) -> Result<(), RenderError> {
        self.deck.on_position_changed(change)?;

        match change.current_item() {
            Some(item) => {
                let first_time = self.reveal.lock().on_intersection(&item.title, 1.0);
                info!(
                    slide = change.current.unwrap_or_default(),
                    of = change.sequence.len(),
                    fade_in = first_time,
                    "{}",
                    item.title
                );
            }
            None => info!("Carousel cleared"),
        }
        Ok(())
    }
}

fn demo_config() -> GalleryConfig {
    GalleryConfig {
        carousel: RotationConfig::auto_rotating(1500),
        ..GalleryConfig::default()
    }
}

async fn run_carousel(config: &GalleryConfig, bus: Arc<EventBus>) -> Result<()> {
    let interval = config.carousel.rotation_interval();
    let items = announcements();
    let renderer: Arc<dyn Renderer<Announcement>> =
        Arc::new(LoggedSlides::new(&items, config.reveal.threshold));
    let carousel = Carousel::with_event_bus(items, config.carousel.clone(), renderer, bus)?;

    if config.carousel.auto_rotate {
        info!("Letting the carousel rotate on its own");
        tokio::time::sleep(interval * 2 + interval / 2).await;
    }

    info!("Pointer enters the carousel");
    carousel.pointer_enter()?;
    tokio::time::sleep(interval).await;
    info!("Pointer leaves the carousel");
    carousel.pointer_leave()?;

    carousel.touch_start(320.0)?;
    if let Some(direction) = carousel.touch_end(140.0)? {
        info!(?direction, "Swipe");
    }
    carousel.next_clicked()?;
    carousel.prev_clicked()?;

    let matched = carousel.apply_filter(|item| item.category == "events")?;
    info!(matched, "Filtered to events");
    tokio::time::sleep(interval + interval / 2).await;

    carousel.clear_filter()?;
    carousel.teardown();
    Ok(())
}

async fn run_counters(config: &GalleryConfig) -> Result<()> {
    let statistics = [("Students", "1250"), ("Teachers", "86"), ("Pass rate", "98%")];

    let mut tasks = Vec::new();
    for (label, text) in statistics {
        let Some(target) = parse_counter_value(text) else {
            continue;
        };
        let animation = CounterAnimation::from_config(target, &config.counter);
        tasks.push(tokio::spawn(async move {
            animation
                .play(|frame| {
                    if frame.is_final() {
                        info!(counter = label, "{frame}");
                    } else {
                        debug!(counter = label, "{frame}");
                    }
                })
                .await;
        }));
    }

    for task in tasks {
        task.await?;
    }
    Ok(())
}

async fn run_countdown() -> Result<()> {
    let countdown = Countdown::new(chrono::Utc::now() + chrono::Duration::seconds(3));
    countdown
        .spawn_ticker(&tokio::runtime::Handle::current(), |status| {
            info!(countdown = %status, "Open day");
        })
        .await?;
    Ok(())
}

fn show_excerpts(config: &GalleryConfig) {
    let text = "The science fair returns this spring with a new robotics track. \
        Teams of up to four students may register, and each team will be paired \
        with a mentor from the engineering department. Projects are judged on \
        originality, method and presentation, and the winning team represents \
        the school at the regional finals.";

    let mut excerpt = Excerpt::new(text, config.excerpt.max_chars);
    info!(button = excerpt.label(), "{}", excerpt.displayed());
    let label = excerpt.toggle();
    info!(button = label, "{}", excerpt.displayed());
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading gallery configuration from {}", path);
            GalleryConfig::load(&path)?
        }
        None => demo_config(),
    };

    info!("Starting widget gallery demo");

    let bus = Arc::new(EventBus::new());
    bus.subscribe_fn::<AutoRotationChanged, _>(|event| {
        info!(from = ?event.from, to = ?event.to, "Auto-rotation state changed");
    });
    bus.subscribe_fn::<SequenceReplaced, _>(|event| {
        info!(len = event.len, "Carousel items replaced");
    });

    run_carousel(&config, bus).await?;
    run_counters(&config).await?;
    run_countdown().await?;
    show_excerpts(&config);

    info!("Demo finished");
    Ok(())
}
