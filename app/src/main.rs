use clap::Parser;
use influence_app::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    influence_app::init_tracing();

    let cli = Cli::parse();
    match influence_app::run(cli).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&err)?);
            std::process::exit(1);
        }
    }
}
