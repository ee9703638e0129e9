use egonet::render::{SvgRenderOptions, layout_to_json};
use egonet::raster::{RasterOptions, render_scene_png};
use egonet::{EgoConfig, Explorer, LocalSource, RecordFile, Resolution};
use futures::executor::block_on;
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Render(egonet::render::Error),
    Raster(egonet::raster::RasterError),
    Navigation(egonet::NavigationError),
    Json(serde_json::Error),
    /// A user-facing notice raised by the navigator (rejected file, failed lookup).
    Rejected(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Navigation(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Rejected(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<egonet::render::Error> for CliError {
    fn from(value: egonet::render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<egonet::raster::RasterError> for CliError {
    fn from(value: egonet::raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<egonet::NavigationError> for CliError {
    fn from(value: egonet::NavigationError) -> Self {
        Self::Navigation(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    List,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    person: Option<String>,
    pretty: bool,
    verbose: bool,
    render_format: RenderFormat,
    render_scale: f32,
    width: Option<f64>,
    height: Option<f64>,
    config: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "egonet-cli\n\
\n\
USAGE:\n\
  egonet-cli [parse] [--pretty] [<path>|-]\n\
  egonet-cli list [<path>|-]\n\
  egonet-cli layout --person <id> [--pretty] [--width <w>] [--height <h>] [--config <file.json>] [<path>|-]\n\
  egonet-cli render --person <id> [--format svg|png] [--scale <n>] [--out <path>] [--width <w>] [--height <h>] [--config <file.json>] [<path>|-]\n\
\n\
OPTIONS:\n\
  -v, --verbose   log at debug level (otherwise EGONET_LOG, default warn)\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the GEDCOM file is read from stdin.\n\
  - parse prints the record set as JSON; list prints one tab-separated line per individual.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
"
}

fn parse_f64(value: Option<&String>) -> Result<f64, CliError> {
    let Some(v) = value else {
        return Err(CliError::Usage(usage()));
    };
    let v = v.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Parse,
        render_format: RenderFormat::Svg,
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "list" => args.command = Command::List,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--person" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.person = Some(id.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--width" => args.width = Some(parse_f64(it.next())?),
            "--height" => args.height = Some(parse_f64(it.next())?),
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Layout | Command::Render) && args.person.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("EGONET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn read_input(input: Option<&str>) -> Result<RecordFile, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(RecordFile::new("<stdin>", buf))
        }
        Some(path) => Ok(RecordFile::from_path(path)?),
    }
}

fn load_config(args: &Args) -> Result<EgoConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => EgoConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EgoConfig::default(),
    };
    if let Some(w) = args.width {
        config.set_f64("canvas.width", w);
    }
    if let Some(h) = args.height {
        config.set_f64("canvas.height", h);
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

/// Uploads the input through the navigator, surfacing its notice on rejection.
fn load_explorer(args: &Args) -> Result<Explorer<LocalSource>, CliError> {
    let config = load_config(args)?;
    let navigator = egonet::navigator_from_config(&config)?;
    let mut explorer = Explorer::new(LocalSource, navigator);
    let file = read_input(args.input.as_deref())?;
    if !block_on(explorer.upload(Some(file))) {
        return Err(rejected(&explorer));
    }
    Ok(explorer)
}

fn rejected(explorer: &Explorer<LocalSource>) -> CliError {
    CliError::Rejected(
        explorer
            .navigator()
            .notice()
            .map(|n| n.message().to_string())
            .unwrap_or_else(|| "request failed".to_string()),
    )
}

fn center_on(explorer: &mut Explorer<LocalSource>, person_id: &str) -> Result<(), CliError> {
    match block_on(explorer.select(person_id))? {
        Resolution::Applied => Ok(()),
        Resolution::Stale | Resolution::Failed => Err(rejected(explorer)),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let mut explorer = load_explorer(&args)?;

    match args.command {
        Command::Parse => {
            let Some(records) = explorer.navigator().records() else {
                return Err(rejected(&explorer));
            };
            write_json(&**records, args.pretty)
        }
        Command::List => {
            let mut out = std::io::stdout().lock();
            for card in explorer.navigator().person_list() {
                writeln!(out, "{}\t{}\t{}\t{}", card.id, card.name, card.born, card.died)?;
            }
            Ok(())
        }
        Command::Layout => {
            let person = args.person.as_deref().ok_or(CliError::Usage(usage()))?;
            center_on(&mut explorer, person)?;
            let Some(layout) = explorer.navigator().layout() else {
                return Err(rejected(&explorer));
            };
            let json = layout_to_json(layout, args.pretty)?;
            println!("{json}");
            Ok(())
        }
        Command::Render => {
            let person = args.person.as_deref().ok_or(CliError::Usage(usage()))?;
            center_on(&mut explorer, person)?;
            let svg_options = SvgRenderOptions::default();

            match args.render_format {
                RenderFormat::Svg => {
                    write_text(&explorer.render_svg(&svg_options), args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let raster = RasterOptions {
                        scale: args.render_scale,
                        ..Default::default()
                    };
                    let bytes =
                        render_scene_png(explorer.navigator().scene(), &svg_options, &raster)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
