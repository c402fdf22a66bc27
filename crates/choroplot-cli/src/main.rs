use choroplot::export::{self, ExportFormat, RasterOptions};
use choroplot::{MapDataset, MapGenerator, ProxyConfig};
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Map(choroplot::HeadlessError),
    Export(export::ExportError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Map(err) => write!(f, "{err}"),
            CliError::Export(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<choroplot::HeadlessError> for CliError {
    fn from(value: choroplot::HeadlessError) -> Self {
        Self::Map(value)
    }
}

impl From<export::ExportError> for CliError {
    fn from(value: export::ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Generate,
    Render,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
    Html,
}

impl RenderFormat {
    fn export_format(self) -> ExportFormat {
        match self {
            Self::Svg => ExportFormat::Svg,
            Self::Png => ExportFormat::Png,
            Self::Jpeg => ExportFormat::Jpeg,
            Self::Pdf => ExportFormat::Pdf,
            Self::Html => ExportFormat::Html,
        }
    }
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            "html" => Ok(Self::Html),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    spreadsheet: Option<String>,
    describe: Option<String>,
    proxy_url: Option<String>,
    api_key: Option<String>,
    pretty: bool,
    data: Option<String>,
    boundaries: Option<String>,
    format: RenderFormat,
    scale: f32,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "choroplot-cli\n\
\n\
USAGE:\n\
  choroplot-cli generate [--spreadsheet <path>|--describe <text>] [--proxy-url <url> --api-key <key>] [--pretty]\n\
  choroplot-cli render [--data <path>|-] [--boundaries <dir>] [--format svg|png|jpg|pdf|html] [--scale <n>] [--background <hex>] [--out <path>]\n\
\n\
NOTES:\n\
  - generate prints the normalized dataset as JSON to stdout.\n\
  - --describe without --proxy-url uses the local description parser (no network).\n\
  - render reads a dataset JSON from --data (or stdin with '-') and writes the map.\n\
  - svg and html print to stdout by default; png/jpg/pdf default to ./world-sales-map.<ext>.\n\
  - --out '-' writes binary formats to stdout.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        scale: 1.0,
        ..Default::default()
    };
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "generate" if !command_seen => {
                args.command = Command::Generate;
                command_seen = true;
            }
            "render" if !command_seen => {
                args.command = Command::Render;
                command_seen = true;
            }
            "--spreadsheet" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.spreadsheet = Some(path.clone());
            }
            "--describe" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.describe = Some(text.clone());
            }
            "--proxy-url" => {
                let Some(url) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.proxy_url = Some(url.clone());
            }
            "--api-key" => {
                let Some(key) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.api_key = Some(key.clone());
            }
            "--pretty" => args.pretty = true,
            "--data" => {
                let Some(data) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.data = Some(data.clone());
            }
            "--boundaries" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.boundaries = Some(dir.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn read_data(data: Option<&str>) -> Result<MapDataset, CliError> {
    let text = match data {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    let dataset: MapDataset = serde_json::from_str(&text)?;
    dataset
        .validate()
        .map_err(choroplot::HeadlessError::from)?;
    Ok(dataset)
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

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        use std::io::Write;
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn build_generator(args: &Args) -> Result<MapGenerator, CliError> {
    let mut generator = MapGenerator::new();
    if let Some(dir) = &args.boundaries {
        generator = generator.with_boundary_dir(dir);
    }
    if let Some(url) = &args.proxy_url {
        let Some(key) = &args.api_key else {
            return Err(CliError::Usage(usage()));
        };
        generator = generator.with_proxy(ProxyConfig::new(url.clone(), key.clone()));
    }
    Ok(generator)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Generate => {
            let generator = build_generator(&args)?;
            let dataset = match (&args.spreadsheet, &args.describe) {
                (Some(path), None) => generator.generate_from_spreadsheet_sync(path)?,
                (None, Some(text)) => generator.generate_from_description_sync(text)?,
                _ => return Err(CliError::Usage(usage())),
            };
            if args.pretty {
                serde_json::to_writer_pretty(std::io::stdout().lock(), &dataset)?;
            } else {
                serde_json::to_writer(std::io::stdout().lock(), &dataset)?;
            }
            println!();
            Ok(())
        }
        Command::Render => {
            let dataset = read_data(args.data.as_deref())?;
            let generator = build_generator(&args)?;
            let svg = generator.render_svg_sync(&dataset)?;

            let options = RasterOptions {
                scale: args.scale,
                background: args.background.clone(),
                ..RasterOptions::default()
            };
            let default_out = || export::default_file_name(args.format.export_format());
            match args.format {
                // The size guard applies to saved artifacts; printing to
                // stdout stays unguarded.
                RenderFormat::Svg => match args.out.as_deref() {
                    None | Some("-") => write_text(&svg, None),
                    Some(out) => {
                        let bytes = export::export_svg(&svg)?;
                        write_bytes(&bytes, out)
                    }
                },
                RenderFormat::Html => {
                    let html = export::export_html(&dataset, &svg)?;
                    write_text(&html, args.out.as_deref())
                }
                RenderFormat::Png => {
                    let bytes = export::svg_to_png(&svg, &options)?;
                    write_bytes(&bytes, &args.out.clone().unwrap_or_else(default_out))
                }
                RenderFormat::Jpeg => {
                    let bytes = export::svg_to_jpeg(&svg, &options)?;
                    write_bytes(&bytes, &args.out.clone().unwrap_or_else(default_out))
                }
                RenderFormat::Pdf => {
                    let bytes = export::export_pdf(&svg)?;
                    write_bytes(&bytes, &args.out.clone().unwrap_or_else(default_out))
                }
            }
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
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
