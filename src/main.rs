//! CLI entry point for pulp

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use pulp::run::STDOUT_MARKER;
use pulp::{
    Mode, Preset, Profile, PulpError, StatusPrinter, build_tree, check_root, exclude_output,
    export, open_output, write_tree,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

/// Built-in profile names
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Everything except media, dependency dirs and components/ui
    Minimal,
    /// Page-section directories, scripts and entry stylesheets only
    Sections,
    /// Catalog-related directories, no JSON
    Catalog,
    /// Directory tree listing
    Tree,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Minimal => Preset::Minimal,
            PresetArg::Sections => Preset::Sections,
            PresetArg::Catalog => Preset::Catalog,
            PresetArg::Tree => Preset::Tree,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pulp")]
#[command(about = "Flatten a source tree into one text file")]
#[command(version)]
struct Args {
    /// Directory to export
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Built-in profile to start from
    #[arg(short, long, value_name = "NAME")]
    preset: Option<PresetArg>,

    /// Render a directory tree instead of concatenating files
    #[arg(short = 't', long = "tree")]
    tree: bool,

    /// Write the tree as JSON (implies --tree)
    #[arg(long = "json")]
    json: bool,

    /// TOML or JSON config file layered over the preset
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file ("-" for stdout); defaults to the preset's file name
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip directories with this name or glob (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "DIR")]
    ignore: Vec<String>,

    /// Skip files with this extension (can be used multiple times)
    #[arg(short = 'x', long = "exclude-ext", value_name = "EXT")]
    exclude_ext: Vec<String>,

    /// Only export directories whose path mentions this keyword (can be used multiple times)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    keyword: Vec<String>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Suppress the status summary
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Log to stderr; RUST_LOG overrides the verbosity flags.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulp={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve preset, config file and CLI overrides into one profile.
fn resolve_profile(args: &Args) -> Result<Profile, PulpError> {
    let wants_tree = args.tree || args.json;
    let preset = args.preset.map(Preset::from).unwrap_or(if wants_tree {
        Preset::Tree
    } else {
        Preset::Minimal
    });

    let mut profile = Profile::load(args.config.as_deref(), preset)?;
    if wants_tree {
        profile.mode = Mode::Tree;
    }
    if let Some(ref output) = args.output {
        profile.output = output.clone();
    }

    profile.filter.exclude_dirs.extend(args.ignore.iter().cloned());
    profile.filter.extensions.exclude(&args.exclude_ext);
    profile.filter.add_keywords(&args.keyword);
    Ok(profile)
}

fn run(args: &Args) -> Result<(), PulpError> {
    let mut profile = resolve_profile(args)?;

    let root = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(&args.path)
    };

    // A missing root must not truncate a previous output
    check_root(&root)?;

    let output = profile.output.clone();
    let to_stdout = output.as_os_str() == STDOUT_MARKER;
    let mut status =
        (!args.quiet && !to_stdout).then(|| StatusPrinter::stdout(should_use_color(args.color)));

    let mut out = open_output(&output)?;
    exclude_output(&mut profile.filter, &root, &output);

    match profile.mode {
        Mode::Concat => {
            let report = export(&root, &profile, &mut out, &output)?;
            drop(out);
            if let Some(ref mut status) = status {
                status
                    .exported(&report, &output)
                    .map_err(status_error)?;
            }
        }
        Mode::Tree => {
            let tree = build_tree(&root, &profile.filter)?;
            write_tree(&tree, args.json, &mut out, &output)?;
            drop(out);
            if let Some(ref mut status) = status {
                let (dirs, files) = tree.counts();
                status
                    .tree_written(&output, dirs, files)
                    .map_err(status_error)?;
            }
        }
    }

    Ok(())
}

fn status_error(source: std::io::Error) -> PulpError {
    PulpError::Output {
        path: PathBuf::from(STDOUT_MARKER),
        source,
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("pulp: {}", e);
        process::exit(1);
    }
}
