use clap::Parser;

/// Periodically checks one server and emails an alert after repeated
/// failures.
#[derive(Debug, Parser)]
#[command(name = "monitor")]
pub struct Cli {
    /// Server address for monitoring
    pub server_address: String,

    /// Port number for the server
    #[arg(long, default_value_t = 80)]
    pub port: u16,

    /// Days in the status check interval
    #[arg(long, default_value_t = 0)]
    pub days: u64,

    /// Hours in the status check interval
    #[arg(long, default_value_t = 0)]
    pub hours: u64,

    /// Minutes in the status check interval
    #[arg(long, default_value_t = 0)]
    pub minutes: u64,

    /// Seconds in the status check interval
    #[arg(long, default_value_t = 1)]
    pub seconds: u64,

    /// Consecutive failed checks tolerated before an alert email is sent
    #[arg(long, default_value_t = 5)]
    pub limit: u32,
}
