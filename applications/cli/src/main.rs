/// SoundByte - SoundCloud and Fanburst from the terminal
use clap::Parser;
use soundbyte_cli::{AppContext, Cli};
use soundbyte_core::SoundByteConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundbyte=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = SoundByteConfig::load(cli.config.as_deref())?;
    let app = AppContext::new(config, cli.token)?;

    let mut stdout = std::io::stdout();
    app.run(cli.command, &mut stdout).await
}
