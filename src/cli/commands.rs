// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands: `train`, `serve`, `predict` and
// `evaluate`, and all their configurable flags.
//
// Serving flags can also come from the environment so the
// server can be configured in a container without a wrapper.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the recommender from a YAML config and save the artifact
    Train(TrainArgs),

    /// Serve predictions over HTTP from a trained artifact
    Serve(ServeArgs),

    /// Predict a single rating from a trained artifact
    Predict(PredictArgs),

    /// Score a ratings CSV against a trained artifact
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// YAML file with data, model and training sections
    #[arg(long, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory written by `train`
    #[arg(long, env = "RECOMMENDER_ARTIFACT_DIR", default_value = "trained_model")]
    pub artifact_dir: String,

    /// Movie catalog CSV (movieId,title,...) used to resolve titles
    #[arg(long, env = "RECOMMENDER_CATALOG", default_value = "data/movies.csv")]
    pub catalog: String,

    #[arg(long, env = "RECOMMENDER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "RECOMMENDER_PORT", default_value_t = 5000)]
    pub port: u16,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long)]
    pub user_id: String,

    /// Catalog title, or a raw movieId
    #[arg(long)]
    pub movie_title: String,

    #[arg(long, default_value = "trained_model")]
    pub artifact_dir: String,

    #[arg(long, default_value = "data/movies.csv")]
    pub catalog: String,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Ratings CSV (userId,movieId,rating[,timestamp])
    #[arg(long)]
    pub ratings: String,

    #[arg(long, default_value = "trained_model")]
    pub artifact_dir: String,
}
