use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use guicelint::archive::{internal_name, JarFile};
use guicelint::loader::ClassLoader;
use guicelint::resolve::{report, Resolver};

/// Finds Guice injection sites no reachable binding satisfies.
#[derive(Parser)]
#[command(name = "guicelint", version)]
struct Args {
    /// Packaged application (JAR) to analyze.
    archive: PathBuf,

    /// Call-graph generations to explore from the entry point.
    #[arg(long, default_value_t = 3)]
    depth: usize,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut jar = JarFile::open(&args.archive)
        .with_context(|| format!("failed to open {}", args.archive.display()))?;
    let main_class = jar
        .main_class()
        .with_context(|| format!("no entry point in {}", args.archive.display()))?;
    let entry_class = internal_name(&main_class);

    let mut loader = ClassLoader::new(jar);
    let mut resolver = Resolver::with_depth(&mut loader, args.depth);
    let unsatisfied = resolver.analyze(&entry_class)?;

    if unsatisfied.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    report::write_report(&mut std::io::stdout().lock(), &unsatisfied)?;
    Ok(ExitCode::FAILURE)
}
