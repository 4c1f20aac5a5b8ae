//! Command-line arguments for the `echoload` binary.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use echoload::config::{
    DEFAULT_ENDPOINT, DEFAULT_LISTEN, DEFAULT_PATH, DEFAULT_PAYLOAD_SIZE, validate_endpoint,
};
use echoload::{Config, PayloadSize, ReplyMode, Result, ServerConfig, Timeouts};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "echoload")]
#[command(version)]
#[command(about = "WebSocket echo round trips for load testing", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run echo round trips against an endpoint, one after another
    Run(RunArgs),
    /// Serve a WebSocket target that echoes or sends a canned reply
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// WebSocket endpoint (ws:// or wss://)
    #[arg(short, long, env = "ECHOLOAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Payload characters per round trip
    #[arg(short, long, default_value_t = DEFAULT_PAYLOAD_SIZE as i64, allow_negative_numbers = true)]
    pub size: i64,

    /// Number of round trips
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,

    /// Iteration deadline in seconds
    #[arg(long, default_value_t = 60)]
    pub deadline_secs: u64,

    /// Close handshake timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub close_timeout_secs: u64,

    /// Fail an iteration when the reply differs from the sent envelope
    #[arg(long)]
    pub verify: bool,
}

impl RunArgs {
    /// Build and validate the round-trip configuration, checking the
    /// endpoint along the way.
    pub fn to_config(&self) -> Result<Config> {
        validate_endpoint(&self.endpoint)?;
        let size = PayloadSize::try_from(self.size)?;
        let config = Config::new()
            .with_payload_size(size.get())
            .with_timeouts(Timeouts::new(
                Duration::from_secs(self.deadline_secs),
                Duration::from_secs(self.close_timeout_secs),
            ))
            .with_verify_echo(self.verify);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(short, long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Upgrade path to accept
    #[arg(long, default_value = DEFAULT_PATH)]
    pub path: String,

    /// Send one canned reply with this many filler characters instead of echoing
    #[arg(long)]
    pub canned: Option<usize>,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        let mode = match self.canned {
            Some(size) => ReplyMode::Canned { size },
            None => ReplyMode::Echo,
        };
        ServerConfig::new()
            .with_listen(self.listen.clone())
            .with_path(self.path.clone())
            .with_mode(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoload::Error;

    fn run_args(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(std::iter::once("echoload").chain(args.iter().copied())).unwrap();
        match cli.command {
            Command::Run(args) => args,
            Command::Serve(_) => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let args = run_args(&["run", "--endpoint", "ws://localhost:8081/ws"]);
        let config = args.to_config().unwrap();
        assert_eq!(config.payload_size, 8192);
        assert_eq!(config.timeouts, Timeouts::default());
        assert_eq!(args.iterations, 1);
        assert!(!config.verify_echo);
    }

    #[test]
    fn test_run_negative_size_rejected() {
        let args = run_args(&["run", "--endpoint", "ws://localhost:8081/ws", "--size", "-1"]);
        assert!(matches!(args.to_config(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_run_bad_endpoint_rejected() {
        let args = run_args(&["run", "--endpoint", "http://localhost:8081/ws"]);
        assert!(matches!(args.to_config(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_run_endpoint_from_env() {
        // SAFETY: no other test in this binary depends on ECHOLOAD_ENDPOINT;
        // the others pass --endpoint or fail to parse regardless.
        unsafe { std::env::set_var("ECHOLOAD_ENDPOINT", "ws://10.0.0.7:9001/echo") };

        let from_env = run_args(&["run"]);
        let from_flag = run_args(&["run", "--endpoint", "ws://localhost:8081/ws"]);

        unsafe { std::env::remove_var("ECHOLOAD_ENDPOINT") };

        assert_eq!(from_env.endpoint, "ws://10.0.0.7:9001/echo");
        assert!(from_env.to_config().is_ok());
        assert_eq!(from_flag.endpoint, "ws://localhost:8081/ws");
    }

    #[test]
    fn test_run_zero_iterations_rejected() {
        let parsed = Cli::try_parse_from(["echoload", "run", "-n", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serve_modes() {
        let cli = Cli::try_parse_from(["echoload", "serve", "--canned", "16"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.to_config();
        assert_eq!(config.listen, "127.0.0.1:8081");
        assert_eq!(config.path, "/ws");
        assert_eq!(config.mode, ReplyMode::Canned { size: 16 });

        let cli = Cli::try_parse_from(["echoload", "serve", "-l", "0.0.0.0:9001"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.to_config().mode, ReplyMode::Echo);
    }
}
