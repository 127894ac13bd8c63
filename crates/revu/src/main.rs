use clap::{Parser, Subcommand};
use revu_events::EventBus;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

#[derive(Parser)]
#[command(name = "revu")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve,
    /// Print the OpenAPI document and exit.
    Openapi,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve => {
            let db_path =
                std::env::var("REVU_DB_PATH").unwrap_or_else(|_| ".revu/reviews.db".to_string());
            if let Some(parent) = Path::new(&db_path).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let port = std::env::var("REVU_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(4810);
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);
            let event_bus = EventBus::new(1024);
            let state = revu_serve::AppState { db_path, event_bus };
            if let Err(err) = revu_serve::serve(state, addr).await {
                eprintln!("serve error: {err}");
            }
        }
        Command::Openapi => {
            let spec = revu_serve::openapi::generate_spec();
            println!("{spec}");
        }
    }
}
