use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use core::time::Duration;
use snowlink::{DEFAULT_EPOCH, NodeId, NodeIdSource, SkewPolicy, WallClock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest clock regression the CLI will agree to wait out.
const MAX_TOLERATED_SKEW_MS: u64 = 1_000;

/// Runtime configuration for the `snowlink` binary.
///
/// Generator settings are global flags so they apply to every subcommand.
/// Each one can also be supplied through a `SNOWLINK_*` environment variable
/// or a `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowlink",
    version,
    about = "Mint and inspect Snowflake IDs and their Base62 tokens"
)]
pub struct CliArgs {
    /// Explicit node ID in `[0, 1023]`.
    ///
    /// Takes precedence over the host hash. Every process minting IDs in
    /// the same namespace must use a distinct value.
    ///
    /// Environment variable: `SNOWLINK_NODE_ID`
    #[arg(long, env = "SNOWLINK_NODE_ID", global = true)]
    pub node_id: Option<u64>,

    /// Host identifier hashed into a node ID when `--node-id` is not set.
    ///
    /// Defaults to `HOSTNAME`, then `/etc/hostname`.
    ///
    /// Environment variable: `SNOWLINK_HOST`
    #[arg(long, env = "SNOWLINK_HOST", global = true)]
    pub host: Option<String>,

    /// Epoch as milliseconds since the Unix epoch.
    ///
    /// Must match across every process sharing an ID namespace.
    ///
    /// Environment variable: `SNOWLINK_EPOCH_MS`
    #[arg(long, env = "SNOWLINK_EPOCH_MS", global = true, default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Largest backwards clock step, in milliseconds, that is retried.
    ///
    /// Environment variable: `SNOWLINK_MAX_SKEW_MS`
    #[arg(long, env = "SNOWLINK_MAX_SKEW_MS", global = true, default_value_t = 5)]
    pub max_skew_ms: u64,

    /// Retries after the first attempt when the clock steps back.
    ///
    /// Environment variable: `SNOWLINK_SKEW_RETRIES`
    #[arg(long, env = "SNOWLINK_SKEW_RETRIES", global = true, default_value_t = 3)]
    pub skew_retries: u32,

    /// Log output format. Logs always go to stderr.
    ///
    /// Environment variable: `SNOWLINK_LOG_FORMAT`
    #[arg(long, env = "SNOWLINK_LOG_FORMAT", global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint IDs and print each as `<id> <token>`.
    Mint {
        /// Number of IDs to mint.
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Threads sharing one generator.
        #[arg(short, long, default_value_t = 1)]
        threads: usize,
    },
    /// Break an ID into its timestamp, node ID and sequence.
    Parse {
        /// Decimal ID.
        id: u64,
    },
    /// Base62-encode an unsigned 64-bit integer.
    Encode {
        value: u64,
    },
    /// Decode a Base62 token to its integer value.
    Decode {
        token: String,

        /// Also break the value into ID components.
        #[arg(long)]
        parse: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Validated configuration built from [`CliArgs`].
#[derive(Debug, Clone)]
pub struct Config {
    pub node_id: NodeId,
    pub node_source: NodeIdSource,
    pub clock: WallClock,
    pub policy: SkewPolicy,
    pub log_format: LogFormat,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let (node_id, node_source) =
            NodeId::resolve_with_source(args.node_id, args.host.as_deref())
                .context("invalid SNOWLINK_NODE_ID")?;

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before 1970")?
            .as_millis() as u64;
        if args.epoch_ms > now_ms {
            bail!(
                "SNOWLINK_EPOCH_MS ({}) is in the future (now = {})",
                args.epoch_ms,
                now_ms
            );
        }

        if args.max_skew_ms > MAX_TOLERATED_SKEW_MS {
            bail!(
                "SNOWLINK_MAX_SKEW_MS ({}) exceeds the supported maximum ({})",
                args.max_skew_ms,
                MAX_TOLERATED_SKEW_MS
            );
        }

        if let Command::Mint { count, threads } = args.command {
            if count == 0 {
                bail!("--count must be greater than 0");
            }
            if threads == 0 {
                bail!("--threads must be greater than 0");
            }
            if threads > count {
                bail!("--threads ({threads}) exceeds --count ({count})");
            }
        }

        let policy = SkewPolicy {
            max_retries: args.skew_retries,
            max_tolerated_skew: Duration::from_millis(args.max_skew_ms),
            ..SkewPolicy::default()
        };

        Ok(Self {
            node_id,
            node_source,
            clock: WallClock::with_epoch(Duration::from_millis(args.epoch_ms)),
            policy,
            log_format: args.log_format,
            command: args.command,
        })
    }
}
