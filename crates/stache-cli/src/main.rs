use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "stache")]
#[command(about = "Stache: mustache template compiler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a template to its structured JSON form
    Build {
        /// Input template file
        path: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Check a template for errors without writing output
    Check {
        /// Input template file
        path: String,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Keep whitespace exactly as written
    #[arg(long)]
    preserve_whitespace: bool,

    /// Drop inline event handler attributes such as onclick
    #[arg(long)]
    sanitize_event_attributes: bool,
}

impl From<OptionArgs> for stache_parser::ParserOptions {
    fn from(args: OptionArgs) -> Self {
        Self {
            preserve_whitespace: args.preserve_whitespace,
            sanitize_event_attributes: args.sanitize_event_attributes,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            path,
            pretty,
            options,
        } => cmd_build(&path, pretty, options.into()),
        Command::Check { path, options } => cmd_check(&path, options.into()),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            process::exit(1);
        }
    }
}

fn compile(path: &str, options: stache_parser::ParserOptions) -> Value {
    let source = read_source(path);
    log::info!("compiling {path} ({} bytes)", source.len());

    let template = match stache_parser::Parser::parse(&source, options) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("{path}: {e}");
            process::exit(1);
        }
    };

    match stache_codegen::compile(&template) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{path}: {e}");
            process::exit(1);
        }
    }
}

fn cmd_build(path: &str, pretty: bool, options: stache_parser::ParserOptions) {
    let json = compile(path, options);

    let rendered = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error serializing {path}: {e}");
            process::exit(1);
        }
    };

    let Some(out_path) = output_path(Path::new(path)) else {
        eprintln!("Error: cannot derive an output name from {path}");
        process::exit(1);
    };

    if let Err(e) = std::fs::write(&out_path, rendered) {
        eprintln!("Error writing {}: {e}", out_path.display());
        process::exit(1);
    }

    eprintln!("Built: {}", out_path.display());
}

fn cmd_check(path: &str, options: stache_parser::ParserOptions) {
    compile(path, options);
    eprintln!("OK: {path}");
}

/// `templates/list.html` → `templates/list.json`
fn output_path(input: &Path) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    let dir = input.parent().unwrap_or(Path::new("."));
    let mut file = stem.to_os_string();
    file.push(".json");
    Some(dir.join(file))
}
