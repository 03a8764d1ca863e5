use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use formflash::headless::{HeadlessItemView, HeadlessWidget, HeadlessWindow, ManualClock, ManualTimer};
use formflash::{
    DisplayInfo, FixedDisplay, FlashColor, FlashConfig, FlashCoordinator, FlashPainter, FlashScope,
    FlashSettings, ItemHandle, ItemLocator, RasterPainter, Rect, Size, TickTimer, Timestamp,
    UnknownDisplay, WindowHost,
};

#[derive(Parser, Debug)]
#[command(name = "formflash", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the flash alpha curve for a settings file.
    Curve(CurveArgs),
    /// Simulate a headless form window and write one PNG per tick.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CurveArgs {
    /// Flash settings JSON (defaults when omitted).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Display refresh rate in Hz (fallback rate when omitted).
    #[arg(long)]
    refresh_hz: Option<f64>,

    /// Sample step in milliseconds (frame interval when omitted).
    #[arg(long)]
    step_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output directory for frame PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Flash settings JSON (defaults when omitted).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Window width in pixels.
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Window height in pixels.
    #[arg(long, default_value_t = 320)]
    height: u32,

    /// Write only every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Curve(args) => cmd_curve(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: Option<&Path>, display: &dyn DisplayInfo) -> anyhow::Result<FlashConfig> {
    let Some(path) = path else {
        return Ok(FlashConfig::standard());
    };
    let settings = FlashSettings::from_path(path)?;
    settings
        .resolve(display)
        .with_context(|| format!("resolve flash settings '{}'", path.display()))
}

fn cmd_curve(args: CurveArgs) -> anyhow::Result<()> {
    let config = match args.refresh_hz {
        Some(hz) => load_config(args.settings.as_deref(), &FixedDisplay(hz))?,
        None => load_config(args.settings.as_deref(), &UnknownDisplay)?,
    };
    let timing = config.timing;
    let step = match args.step_ms {
        Some(0) => anyhow::bail!("--step-ms must be > 0"),
        Some(ms) => Duration::from_millis(ms),
        None => timing.frame_interval(),
    };

    println!(
        "# fade_in={}ms hold={}ms fade_out={}ms frame={}ms alpha={}",
        timing.fade_in().as_millis(),
        timing.hold().as_millis(),
        timing.fade_out().as_millis(),
        timing.frame_interval().as_millis(),
        config.flash_alpha
    );
    println!("t_ms\tphase\talpha");
    let start = Timestamp::default();
    let base = config.neutral_color;
    let mut t = Duration::ZERO;
    loop {
        let now = Timestamp(t);
        let phase = timing.phase_between(start, now);
        let alpha = formflash::flash_color_at(start, now, &timing, base, config.flash_alpha)
            .map_or(0, |c| c.a);
        println!("{}\t{phase:?}\t{alpha}", t.as_millis());
        if t >= timing.total_duration() {
            break;
        }
        t += step;
    }
    Ok(())
}

const BACKGROUND: FlashColor = FlashColor::rgb(0xf4, 0xf4, 0xf4);
const PANEL: FlashColor = FlashColor::rgb(0xe0, 0xe0, 0xe0);
const FIELD: FlashColor = FlashColor::rgb(0xff, 0xff, 0xff);
const SECOND_WAVE_MS: u64 = 300;

struct Form {
    window: Rc<HeadlessWindow>,
    group: Rc<HeadlessWidget>,
    leaves: Vec<Rc<HeadlessWidget>>,
    list: Rc<HeadlessItemView>,
    rows: Vec<Rect>,
}

fn build_form(width: u32, height: u32) -> Form {
    let (w, h) = (f64::from(width), f64::from(height));
    let window = HeadlessWindow::new(1, Size::new(w, h));
    let wid = window.id();

    let group = HeadlessWidget::new(10, Rect::new(16.0, 16.0, w * 0.55, h - 16.0));
    group.set_frame(0.0, 24.0, 6.0);
    group.attach(wid);
    let mut leaves = Vec::new();
    for i in 0..4u8 {
        let y = 48.0 + f64::from(i) * 44.0;
        let leaf = HeadlessWidget::new(20 + u64::from(i), Rect::new(28.0, y, w * 0.55 - 12.0, y + 28.0));
        group.add_child(leaf.clone());
        leaves.push(leaf);
    }

    let list_rect = Rect::new(w * 0.55 + 16.0, 16.0, w - 16.0, h - 16.0);
    let list = HeadlessItemView::new(40, list_rect);
    list.attach(wid);
    window.set_viewports(vec![Rect::new(8.0, 8.0, w * 0.55 + 8.0, h - 8.0)]);
    let mut rows = Vec::new();
    for i in 0..6u32 {
        let y = list_rect.y0 + f64::from(i) * 24.0;
        let row = Rect::new(list_rect.x0, y, list_rect.x1, y + 24.0);
        list.set_row(ItemHandle(u64::from(i)), row);
        rows.push(row);
    }

    Form {
        window,
        group,
        leaves,
        list,
        rows,
    }
}

fn backdrop(form: &Form, width: u32, height: u32) -> anyhow::Result<RasterPainter> {
    let mut painter = RasterPainter::new(width, height)?.with_backdrop(
        Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
        BACKGROUND,
    );
    painter = painter.with_backdrop(form.group.rect(), PANEL);
    for leaf in &form.leaves {
        painter = painter.with_backdrop(leaf.rect(), FIELD);
    }
    for row in &form.rows {
        painter = painter.with_backdrop(row.inset(-1.0), FIELD);
    }
    Ok(painter)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.every == 0 {
        anyhow::bail!("--every must be > 0");
    }
    let config = load_config(args.settings.as_deref(), &UnknownDisplay)?;
    let clock = ManualClock::new();
    let timer = ManualTimer::new();
    let mut coord = FlashCoordinator::new(config, Box::new(clock.clone()), Box::new(timer.clone()));

    let form = build_form(args.width, args.height);
    let wid = form.window.id();
    coord.open_window(form.window.clone());

    let mut scope = FlashScope::new("preview");
    scope.register_container(&mut coord, "group", form.group.clone());
    scope.register_leaf(&mut coord, "group.leaf1", form.group.clone(), form.leaves[1].clone());
    for i in 0..form.rows.len() as u64 {
        let locator = Rc::new(move || Some(ItemHandle(i))) as Rc<dyn ItemLocator>;
        scope.register_list_row(&mut coord, &format!("row{i}"), form.list.clone(), locator, 1.0);
    }

    let mut painter = backdrop(&form, args.width, args.height)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    scope.queue_flash(&mut coord, "group");
    scope.queue_flash(&mut coord, "row1");
    let interval_ms = timer.interval().map_or(16, |d| d.as_millis().max(1) as u64);
    let second_wave = SECOND_WAVE_MS / interval_ms;

    let mut frame = 0u64;
    let mut written = 0usize;
    while timer.is_active() {
        clock.set_millis(frame * interval_ms);
        if frame == second_wave {
            scope.queue_flash(&mut coord, "group.leaf1");
            scope.queue_flash(&mut coord, "row4");
        }
        let report = coord.on_tick();
        tracing::debug!(frame, ?report, "tick");

        coord.paint_window(wid, &mut painter);
        for (i, row) in form.rows.iter().enumerate() {
            if let Some(color) = scope.computed_color_in(&coord, wid, &format!("row{i}")) {
                painter.fill_rect(row.inset(-1.0), color);
            }
        }

        if frame % args.every == 0 {
            let img = painter.finish();
            let path = args.out.join(format!("frame_{frame:04}.png"));
            image::save_buffer_with_format(
                &path,
                &img.data,
                img.width,
                img.height,
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .with_context(|| format!("write png '{}'", path.display()))?;
            written += 1;
        }
        frame += 1;
    }

    let stats = coord.stats();
    eprintln!(
        "wrote {written} frames to {} ({} ticks, {} elements)",
        args.out.display(),
        stats.ticks,
        stats.registered_elements
    );
    Ok(())
}
