use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::ValueEnum;
use ratatui::style::Style;

use brightwave_core::{content, AppConfig};
use brightwave_tui::motion::{
    Anchor, Bounds, Direction, Edge, ListenerRegistry, LoopingTrack, PinnedSection, Ring, RingCarousel,
    ScrollProgress, ScrollRange, Spin, TrackOptions, Viewport,
};
use brightwave_tui::pages::{measure_marquee, services_track_width, MARQUEE_SEPARATOR};
use brightwave_tui::widgets::surface::{canvas, put_str, row_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewKind {
    /// Client logo marquee over one loop
    Marquee,
    /// Horizontally pinned services section
    Pinned,
    /// Scroll progress of an element crossing the viewport
    Progress,
    /// Rotating rings after a fast scroll
    Rings,
}

pub fn run(config: &AppConfig, kind: PreviewKind, frames: u32, width: u16) -> Result<()> {
    let frames = frames.max(1);
    let viewport = Viewport::new(width as f64, 24.0);
    match kind {
        PreviewKind::Marquee => marquee(config, frames, width),
        PreviewKind::Pinned => pinned(frames, viewport),
        PreviewKind::Progress => progress(frames, viewport),
        PreviewKind::Rings => rings(config, frames),
    }
}

fn marquee(config: &AppConfig, frames: u32, width: u16) -> Result<()> {
    let registry = ListenerRegistry::new();
    let mut track = LoopingTrack::new(
        &registry,
        content::CLIENTS.to_vec(),
        config.motion.marquee_speed,
        Direction::Left,
        TrackOptions {
            copies: 3,
            retry_delay: config.motion.measure_retry(),
            resize_debounce: config.motion.resize_debounce(),
        },
    );

    let start = Instant::now();
    track.tick(start, measure_marquee);
    let (Some(span), Some(period)) = (track.span(), track.period()) else {
        bail!("marquee speed must be positive (motion.marquee_speed)");
    };
    let strip: String = track
        .track_items()
        .map(|item| format!("{}{}", item, MARQUEE_SEPARATOR))
        .collect();

    println!("span {:.0} cells, one loop every {:.2}s\n", span, period);
    for i in 0..=frames {
        let t = period * i as f64 / frames as f64;
        let offset = track.tick(start + Duration::from_secs_f64(t), measure_marquee);
        let mut buf = canvas(width, 1, Style::default());
        put_str(&mut buf, offset.round() as i32, 0, &strip, Style::default());
        println!("{:>6.2}s {:>7.1} |{}|", t, offset, row_text(&buf, 0));
    }
    Ok(())
}

fn pinned(frames: u32, viewport: Viewport) -> Result<()> {
    let registry = ListenerRegistry::new();
    let section_top = viewport.height;
    let section = PinnedSection::new(&registry, section_top, services_track_width(), viewport);
    let (pin_start, pin_end) = section.pin_range();
    let last = section_top + section.document_height();

    println!(
        "track {:.0} cells, pinned from scroll {:.0} to {:.0}\n",
        services_track_width(),
        pin_start,
        pin_end
    );
    println!("{:>7} {:>8} {:>10} {:>8} {:>6}", "scroll", "phase", "translate", "progress", "top");
    for i in 0..=frames {
        let scroll = last * i as f64 / frames as f64;
        let frame = section.frame(scroll);
        println!(
            "{:>7.1} {:>8} {:>10.1} {:>8.2} {:>6.1}",
            scroll,
            format!("{:?}", frame.phase),
            frame.translate_x,
            frame.progress,
            frame.top
        );
    }
    Ok(())
}

fn progress(frames: u32, viewport: Viewport) -> Result<()> {
    let registry = ListenerRegistry::new();
    let bounds = Bounds::new(viewport.height * 1.5, 12.0);
    let range = ScrollRange::new(Anchor::new(Edge::Top, 0.8), Anchor::new(Edge::Bottom, 0.2));
    let mut tracker = ScrollProgress::new(&registry, range, viewport);
    tracker.mount(bounds);

    let (start, end) = range.offsets(&bounds, &viewport);
    println!(
        "element at {:.0}..{:.0}, progress runs from scroll {:.1} to {:.1}\n",
        bounds.top,
        bounds.bottom(),
        start,
        end
    );
    let last = bounds.bottom();
    for i in 0..=frames {
        let scroll = last * i as f64 / frames as f64;
        let value = tracker.set_scroll(scroll);
        let bar = "█".repeat((value * 30.0).round() as usize);
        println!("{:>7.1} {:>5.2} {}", scroll, value, bar);
    }
    Ok(())
}

fn rings(config: &AppConfig, frames: u32) -> Result<()> {
    let registry = ListenerRegistry::new();
    let rings = content::RING_ITEMS
        .iter()
        .enumerate()
        .map(|(i, items)| {
            let spin = if i % 2 == 0 { Spin::Clockwise } else { Spin::CounterClockwise };
            Ring::new(items.iter().copied(), 20.0 - 5.0 * i as f64, spin)
        })
        .collect();
    let mut carousel = RingCarousel::new(&registry, rings, &config.motion.rings);

    // A quick flick: 60 rows in 100 ms
    let start = Instant::now();
    carousel.tick(start);
    carousel.on_scroll(0.0, start);
    carousel.on_scroll(60.0, start + Duration::from_millis(100));

    println!("{:>6} {:>5}  ring angles", "t", "x");
    for i in 0..=frames {
        let now = start + Duration::from_millis(100 + 100 * i as u64);
        carousel.tick(now);
        let angles: Vec<String> = carousel
            .rings()
            .iter()
            .map(|ring| format!("{:>6.1}°", ring.angle()))
            .collect();
        println!(
            "{:>5.1}s {:>4.2}x  {}",
            (100 + 100 * i) as f64 / 1000.0,
            carousel.multiplier(),
            angles.join(" ")
        );
    }
    Ok(())
}
