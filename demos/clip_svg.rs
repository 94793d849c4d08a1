//! Clip demo: a seeded random polygon cut by a circle, written as SVG.
//!
//! Usage:
//! ```text
//! cargo run --example clip_svg > clip.svg            # circle at (640, 640)
//! cargo run --example clip_svg -- 400 300 > clip.svg # circle at (400, 300)
//! ```

use std::f64::consts::PI;

use circlip::math::arc_2d::arc_sweep;
use circlip::{clip_circle, Circle, ClipOptions, FillRule, PathSink, Point2, Result};

const SIZE: f64 = 1024.0 + 256.0;
const RADIUS: f64 = 250.0;

/// Collects path commands into an SVG path `d` attribute.
#[derive(Debug, Default)]
struct SvgPath {
    d: String,
    fill_rule: Option<FillRule>,
    stroked: bool,
}

impl SvgPath {
    fn arc_to(&mut self, radius: f64, end: Point2, sweep: f64) {
        let large = u8::from(sweep.abs() > PI);
        let positive = u8::from(sweep > 0.0);
        self.d
            .push_str(&format!("A{radius} {radius} 0 {large} {positive} {} {} ", end.x, end.y));
    }
}

impl PathSink for SvgPath {
    fn move_to(&mut self, p: Point2) {
        self.d.push_str(&format!("M{} {} ", p.x, p.y));
    }

    fn line_to(&mut self, p: Point2) {
        self.d.push_str(&format!("L{} {} ", p.x, p.y));
    }

    fn arc(&mut self, center: Point2, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        let at = |angle: f64| Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
        let sweep = arc_sweep(start_angle, end_angle, counterclockwise);
        self.line_to(at(start_angle));
        // SVG cannot draw a full turn in one arc command.
        let half = sweep / 2.0;
        self.arc_to(radius, at(start_angle + half), half);
        self.arc_to(radius, at(start_angle + sweep), half);
    }

    fn fill(&mut self, rule: FillRule) {
        self.fill_rule = Some(rule);
    }

    fn stroke(&mut self) {
        self.stroked = true;
    }
}

/// `count` pseudo-random vertices in `[128, 1152)`, from a multiplicative
/// congruential generator.
fn random_ring(count: usize, seed: &mut u32) -> Vec<Point2> {
    let mut next = || {
        *seed = seed.wrapping_mul(0x93d7_65dd);
        f64::from(*seed) / 65536.0 / 64.0 + 128.0
    };
    (0..count).map(|_| Point2::new(next(), next())).collect()
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for circlip.
    // Override with RUST_LOG env var (e.g. RUST_LOG=circlip=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("clip_svg=info".parse().unwrap_or_default())
        .add_directive("circlip=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<f64> = std::env::args().skip(1).filter_map(|a| a.parse().ok()).collect();
    let center = match args.as_slice() {
        [x, y, ..] => Point2::new(*x, *y),
        _ => Point2::new(512.0 + 128.0, 512.0 + 128.0),
    };

    let mut seed = 1;
    let ring = random_ring(100, &mut seed);
    let circle = Circle::new(center, RADIUS)?;

    let mut clipped = SvgPath::default();
    let assembly = clip_circle(circle, std::slice::from_ref(&ring), true, ClipOptions::default(), &mut clipped)?;
    tracing::info!(
        crossings = assembly.crossings().len(),
        groups = assembly.representatives().len(),
        subpaths = assembly.subpath_count(),
        "clipped random polygon"
    );

    let original: String = ring
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}{} {} ", if i == 0 { 'M' } else { 'L' }, p.x, p.y))
        .collect();

    let fill_rule = match clipped.fill_rule {
        Some(FillRule::NonZero) => "nonzero",
        _ => "evenodd",
    };
    let fill = if clipped.fill_rule.is_some() { "#0c04" } else { "none" };
    let stroke = if clipped.stroked { "#0c0" } else { "none" };

    println!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SIZE}" height="{SIZE}">"#);
    println!(r##"<path d="{original}Z" fill="#0002" fill-rule="evenodd" stroke="#0004"/>"##);
    println!(
        r##"<circle cx="{}" cy="{}" r="{RADIUS}" fill="none" stroke="#0c08"/>"##,
        center.x, center.y
    );
    println!(r#"<path d="{}" fill="{fill}" fill-rule="{fill_rule}" stroke="{stroke}"/>"#, clipped.d);
    println!("</svg>");
    Ok(())
}
