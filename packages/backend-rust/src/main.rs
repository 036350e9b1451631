use gebra_backend::config::Config;
use gebra_backend::logging::init_tracing;
use gebra_backend::services::progress::{lesson_overview, summarize};

const USAGE: &str = "usage: gebra-backend [summary <learner> | lessons <learner>]";

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };
    let _log_guard = init_tracing(&config.log_level);

    if let Err(err) = run(&config).await {
        tracing::error!(error = %err, "gebra-backend failed");
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = gebra_backend::create_state(config).await?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => {
            tracing::info!(db = %config.db.path.display(), "mastery store initialized");
        }
        ["summary", learner] => {
            let summary = summarize(&state, learner).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ["lessons", learner] => {
            let lessons = lesson_overview(&state, learner).await?;
            println!("{}", serde_json::to_string_pretty(&lessons)?);
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
