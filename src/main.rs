use clap::Parser;
use tracing_subscriber::EnvFilter;
use trellis::config::Config;
use trellis::github::client::GitHubProvider;
use trellis::pipeline::build_graph;

#[derive(Parser)]
#[command(name = "trellis", about = "Build a repository's commit network graph")]
struct Cli {
    #[arg(help = "Repository as owner/name")]
    repo: String,

    #[arg(long, short, help = "Global commit budget")]
    max_commits: Option<usize>,
}

// The pipeline is purely I/O-bound; a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    let (owner, repo) = match cli.repo.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => (owner, repo),
        _ => {
            eprintln!("Error: expected repository as owner/name, got {:?}", cli.repo);
            std::process::exit(2);
        }
    };
    let max_commits = cli.max_commits.unwrap_or(config.max_commits);

    let provider = match GitHubProvider::new(config.github_token.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match build_graph(&provider, owner, repo, max_commits).await {
        Ok(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
