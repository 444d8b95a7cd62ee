use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    guildcache::cli::main().await
}
