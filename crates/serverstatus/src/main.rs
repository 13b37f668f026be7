use clap::Parser;
use serverstatus::is_running;

/// One-shot reachability check for a single server
#[derive(Parser)]
#[command(name = "serverstatus")]
struct Cli {
    /// Server address for status checking
    server_address: String,

    /// Port number for the server
    #[arg(long, default_value_t = 80)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if is_running(&cli.server_address, cli.port).await {
        println!("{} is running", cli.server_address);
    } else {
        println!("{} is not running", cli.server_address);
    }
}
