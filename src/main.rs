use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use annexure_pdf::{AutoFitTable, Error, LayoutConfig, Renderer};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Render the Annexure-I hospital empanelment PDF from a form JSON file")]
struct Args {
    /// Flat JSON object with the submitted form fields, or "-" for stdin
    input: PathBuf,

    /// Where to write the PDF
    #[arg(short, long, default_value = "Annexure-1.pdf")]
    output: PathBuf,

    /// Lay out the services and tie-up tables with auto-fitted columns
    #[arg(long, default_value_t = false)]
    auto_layout: bool,

    /// Page margin in points on every side
    #[arg(long)]
    margin: Option<f32>,

    /// Let a heading stay at the bottom of a page when its table starts on the next
    #[arg(long, default_value_t = false)]
    no_keep_with_next: bool,

    /// Log layout decisions (same as RUST_LOG=debug)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn build_renderer(args: &Args) -> Renderer {
    let mut config = LayoutConfig::default();
    if let Some(margin) = args.margin {
        config = config.with_margin(margin);
    }
    config.keep_heading_with_table = !args.no_keep_with_next;
    let renderer = Renderer::new(config);
    if args.auto_layout {
        renderer.with_auto_layout(AutoFitTable)
    } else {
        renderer
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let renderer = build_renderer(args);
    if args.input.as_os_str() == "-" {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        let bytes = annexure_pdf::convert_form_json(&json, &renderer)?;
        std::fs::write(&args.output, bytes)?;
        Ok(())
    } else {
        annexure_pdf::convert_form_file(&args.input, &args.output, &renderer)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => {
            println!("{}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
