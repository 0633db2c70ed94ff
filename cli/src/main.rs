use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::{ArgAction, Parser};
use serde::Serialize;
use skeleton_json::{ReadOptions, SkeletonData, SkeletonJson};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "skeleton-json",
    version,
    about = "Decode skeleton JSON and print the resulting model"
)]
struct Args {
    /// Skeleton file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Multiplier applied to positions and sizes.
    #[arg(long, value_name = "factor", default_value_t = 1.0)]
    scale: f32,

    /// Indentation size; 0 prints compact JSON (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Print entity counts instead of the full model.
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize, Debug)]
struct Summary<'a> {
    bones: usize,
    slots: usize,
    skins: usize,
    animations: Vec<AnimationSummary<'a>>,
}

#[derive(Serialize, Debug)]
struct AnimationSummary<'a> {
    name: &'a str,
    timelines: usize,
    duration: f32,
}

impl<'a> From<&'a SkeletonData> for Summary<'a> {
    fn from(data: &'a SkeletonData) -> Self {
        Self {
            bones: data.bones.len(),
            slots: data.slots.len(),
            skins: data.skins.len(),
            animations: data
                .animations
                .iter()
                .map(|animation| AnimationSummary {
                    name: &animation.name,
                    timelines: animation.timelines.len(),
                    duration: animation.duration,
                })
                .collect(),
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = run(&args) {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut reader = SkeletonJson::new().with_options(ReadOptions::new().with_scale(args.scale));
    let data = match args.input.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            reader.read_skeleton_data(&buf)?
        }
        Some(path) => reader.read_skeleton_data_file(path)?,
    };

    let output = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output.path(), |writer| {
        if args.summary {
            write_json(writer, &Summary::from(&data), args.indent)
        } else {
            write_json(writer, &data, args.indent)
        }
    })?;
    if let OutputTarget::File(path) = &output {
        let input = args.input.as_deref().unwrap_or("stdin");
        println!("✔ Decoded {input} → {path}");
    }
    Ok(())
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json<T: Serialize>(
    writer: &mut dyn Write,
    value: &T,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(&mut *writer, value)?;
    } else {
        let indent_bytes = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        value.serialize(&mut serializer)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}
