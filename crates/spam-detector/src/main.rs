use clap::Parser;
use spam_detector::cli::{Cli, Commands, ServeArgs};
use spam_detector::server::run_server;
use spam_detector::train::train;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            init_logging(args.verbose);

            let config = args.to_config()?;

            println!();
            println!("  📧 SMS Spam Detector");
            println!();
            println!("  Artifact: {}", config.artifact_path.display());
            println!();

            run_server(config).await?;
        }

        Commands::Train(args) => {
            init_logging(args.verbose);

            let config = args.to_config();
            let report = train(&config)?;

            println!("Trained on {} messages, evaluated on {}", report.n_train, report.n_test);
            println!("  Features: {}", report.n_features);
            println!("  Accuracy: {:.2}%", report.accuracy * 100.0);
            println!("  Artifact: {}", report.output_path.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "spam_detector=debug,tower_http=debug"
    } else {
        "spam_detector=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
