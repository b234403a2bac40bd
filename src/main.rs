use anyhow::{bail, Context};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use overlay_fx::{AnimationDriver, ConfigFile, EffectId, FrameQueue, HostSettings, MountConfig, Rgb, TerminalSurface};
use std::env;
use std::fs::File;
use std::io::{stdout, BufWriter, Stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

type Surface = TerminalSurface<BufWriter<Stdout>>;

const FIXED_DT: f32 = 1.0 / 60.0;

fn print_usage() {
    eprintln!("overlay-fx - Ambient particle overlays for the terminal");
    eprintln!();
    eprintln!("Usage: overlay-fx [EFFECT] [OPTIONS]");
    eprintln!();
    eprintln!("Effects:");
    for id in EffectId::ALL {
        eprintln!("  {id}");
    }
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --color RRGGBB     Tint for effects without a fixed palette (default ffffff)");
    eprintln!("  --bg-color RRGGBB  Background color (default 000000)");
    eprintln!("  --scale N          Logical units per terminal pixel (default 4)");
    eprintln!("  --config FILE      Load settings from a TOML file; flags override it");
    eprintln!("  --log-file FILE    Write logs to FILE (RUST_LOG controls the level)");
    eprintln!("  --list             Print effect names and exit");
    eprintln!();
    eprintln!("Tab / Shift+Tab cycles effects. Press 'q', ESC, or Ctrl+C to exit");
}

struct Options {
    file: ConfigFile,
    log_file: Option<PathBuf>,
}

fn value_of(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", args[i]))
}

/// Parses the command line. `None` means usage or the effect list was printed.
fn parse_args() -> anyhow::Result<Option<Options>> {
    let args: Vec<String> = env::args().collect();

    let mut effect_name: Option<String> = None;
    let mut color: Option<Rgb> = None;
    let mut bg_color: Option<Rgb> = None;
    let mut scale: Option<f32> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut log_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--color" => color = Some(value_of(&args, i)?.parse()?),
            "--bg-color" => bg_color = Some(value_of(&args, i)?.parse()?),
            "--scale" => {
                let parsed: f32 = value_of(&args, i)?.parse().with_context(|| format!("invalid scale: {}", args[i + 1]))?;
                scale = Some(parsed);
            }
            "--config" => config_path = Some(PathBuf::from(value_of(&args, i)?)),
            "--log-file" => log_file = Some(PathBuf::from(value_of(&args, i)?)),
            "--list" => {
                for id in EffectId::ALL {
                    println!("{id}");
                }
                return Ok(None);
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            arg if !arg.starts_with('-') => {
                effect_name = Some(arg.to_string());
                i += 1;
                continue;
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
        i += 2;
    }

    let mut file = match &config_path {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile {
            mount: MountConfig::new(EffectId::Snowfall.name()),
            host: HostSettings::default(),
        },
    };

    if let Some(name) = effect_name {
        if name.parse::<EffectId>().is_err() {
            eprintln!("Unknown effect: {}", name);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
        file.mount.effect_type = name;
    }
    if let Some(color) = color {
        file.mount.primary_color = color;
    }
    if let Some(bg) = bg_color {
        file.host.background = bg;
    }
    if let Some(scale) = scale {
        file.host.scale = scale;
    }
    file.host.validate()?;

    Ok(Some(Options { file, log_file }))
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    // Stderr shares the alternate screen, so keep it quiet unless redirected
    let (filter, target) = match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
            ("info", env_logger::Target::Pipe(Box::new(file)))
        }
        None => ("error", env_logger::Target::Stderr),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(target)
        .try_init()?;
    Ok(())
}

fn cycle(driver: &mut AnimationDriver<FrameQueue, Surface>, step: fn(EffectId) -> EffectId) -> anyhow::Result<()> {
    let mut config = driver.config().clone();
    config.effect_type = step(driver.effect()).name().to_string();
    driver.reconfigure(config);
    // The last frame of the old effect would linger otherwise
    execute!(stdout(), Clear(ClearType::All))?;
    Ok(())
}

fn animate(mount: MountConfig, host: &HostSettings) -> anyhow::Result<()> {
    let mut driver: AnimationDriver<FrameQueue, Surface> = AnimationDriver::new(FrameQueue::new());
    driver.mount(mount, || {
        TerminalSurface::acquire(BufWriter::with_capacity(1024 * 64, stdout()), host.scale, host.background)
    });
    if driver.surface().is_none() {
        bail!("could not take over the terminal");
    }

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    match key_event.code {
                        KeyCode::Tab => cycle(&mut driver, EffectId::next)?,
                        KeyCode::BackTab => cycle(&mut driver, EffectId::previous)?,
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    driver.resize(Surface::bounds_for(cols, rows, host.scale));
                    execute!(stdout(), Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            driver.pump();
            accumulator -= FIXED_DT;
        }
    }

    driver.unmount();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let Some(options) = parse_args()? else {
        return Ok(());
    };
    init_logging(options.log_file.as_deref())?;

    let mut stdout = stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = animate(options.file.mount, &options.file.host);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}
