use anyhow::Result;
use clap::Parser;
use movie_recommender::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
