mod engine;
mod utils;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use engine::cli::{CLI, CliCommand};
use engine::config::Tuning;
use engine::fields::FieldKind;
use engine::universe::{generate_field, scene_rng};
use engine::EngineResult;

fn main() {
    utils::logger::init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> EngineResult<()> {
    let cli = CLI::parse()?;

    let mut tuning = match &cli.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    if cli.seed.is_some() {
        tuning.seed = cli.seed;
    }

    match cli.command {
        CliCommand::Run => {
            let universe = engine::Universe::new(tuning)?;
            let renderer = engine::graphics::Renderer::new();
            engine::Windowing::run_app(universe, renderer)
        }
        CliCommand::Dump { kind, filename } => dump(&tuning, kind, &filename),
    }
}

fn dump(tuning: &Tuning, kind: FieldKind, path: &Path) -> EngineResult<()> {
    let mut rng = scene_rng(tuning.seed);
    let field = generate_field(tuning, kind, &mut rng)?;

    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &field)?;
    out.flush()?;

    log::info!("wrote {} {kind:?} particles to {}", field.len(), path.display());
    Ok(())
}
