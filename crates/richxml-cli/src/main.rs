use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use richxml::{Config, MarkRegistry};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "richxml",
    version,
    about = "Convert ProseMirror JSON documents to semantic XML and back"
)]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Input format (json, xml)
    #[arg(short, long, value_enum)]
    from: Option<FormatArg>,
    /// Output format (json, xml)
    #[arg(short, long, value_enum, required_unless_present = "check")]
    to: Option<FormatArg>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Only check the input syntax
    #[arg(long)]
    check: bool,
    /// Comma-separated mark names, replacing the default registry
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    marks: Option<Vec<String>>,
    /// Spaces per nesting level in XML output
    #[arg(long, value_name = "N")]
    indent: Option<usize>,
    /// Maximum nesting depth, 0 for unlimited
    #[arg(long, value_name = "N")]
    max_depth: Option<u16>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Xml,
}

impl From<FormatArg> for richxml::Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => richxml::Format::Json,
            FormatArg::Xml => richxml::Format::Xml,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let input_data = read_input(&args.input)?;
    let from: richxml::Format = match args.from {
        Some(format) => format.into(),
        None => match infer_format(&args.input) {
            Some(format) => format,
            None => bail!(
                "could not infer input format; pass --from or provide an input file with extension"
            ),
        },
    };
    debug!(?from, bytes = input_data.len(), "read input");

    let config = build_config(&args);

    if args.check {
        richxml::validate_with_config(&input_data, from, &config)?;
        info!("input is well-formed");
        write_output(&args.output, b"ok\n")?;
        return Ok(());
    }

    let Some(to) = args.to else {
        bail!("--to is required unless --check is given");
    };
    let output = richxml::convert_with_config(&input_data, from, to.into(), &config)?;

    write_output(&args.output, output.as_bytes())?;
    Ok(())
}

fn build_config(args: &Args) -> Config {
    let mut config = match &args.marks {
        Some(names) => Config::with_marks(MarkRegistry::new(
            names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()),
        )),
        None => Config::default(),
    };
    if let Some(indent) = args.indent {
        config = config.indent(indent);
    }
    if let Some(max_depth) = args.max_depth {
        config = config.max_depth(max_depth);
    }
    config
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn infer_format(path: &Option<PathBuf>) -> Option<richxml::Format> {
    let path = path.as_ref()?;
    let ext = path.extension().and_then(|s| s.to_str())?;
    richxml::Format::from_extension(ext)
}
