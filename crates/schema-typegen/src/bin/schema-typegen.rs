use clap::Parser;
use miette::Result;
use schema_typegen::batch::Pipeline;
use schema_typegen::cli::TypegenArgs;
use schema_typegen::config::{BatchConfig, ConfigFile, config_path};
use schema_typegen::generator::QuicktypeGenerator;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = TypegenArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let file = match config_path(&args) {
        Some(path) => {
            tracing::debug!(config = %path.display(), "reading config");
            Some(ConfigFile::load(&path)?)
        }
        None => None,
    };
    let (config, program) = BatchConfig::resolve(&args, file)?;

    let generator = QuicktypeGenerator::new(program);
    let run = Pipeline::new(generator).run(&config).await?;

    println!(
        "Generated {} of {} schemas to {:?} ({} skipped, {} failed)",
        run.succeeded(),
        run.attempted(),
        config.output_dir(),
        run.skipped,
        run.failed()
    );

    if run.should_fail(args.fail_on_error) {
        std::process::exit(1);
    }

    Ok(())
}
