//! mindscope - training pipeline and prediction server entry point

use clap::Parser;
use mindscope::cli::{cmd_predict, cmd_serve, cmd_train, cmd_validate, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindscope=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Train { source } => {
            cmd_train(config, source.as_deref())?;
        }
        Commands::Predict { record } => {
            cmd_predict(config, &record)?;
        }
        Commands::Validate { train, test } => {
            if !cmd_validate(config, &train, &test)? {
                anyhow::bail!("Data validation failed");
            }
        }
        Commands::Serve { port, host } => {
            cmd_serve(config, host, port).await?;
        }
    }

    Ok(())
}
