use clap::Parser;

use lydwatch::adapter::inbound::cli::{command::Cli, dispatch};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // reqwest and tokio-tungstenite both link rustls; pin one provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
