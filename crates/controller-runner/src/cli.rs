//! Launcher flags (§6 CLI surface), overlaid onto `AppConfig::from_env`
//! the way the teacher's CLI-free runner leaves to environment
//! variables alone — grounded in `dfinity-icp-cli`'s clap-derive style,
//! the clap-heaviest example in the pack.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "gns3-controller", about = "GNS3 controller/compute orchestration core")]
pub struct Cli {
    /// Bind address; overrides GNS3_HOST.
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port; overrides GNS3_PORT.
    #[arg(long)]
    pub port: Option<u16>,

    /// Shorthand for --host 127.0.0.1.
    #[arg(long)]
    pub local: bool,

    /// TLS certificate file. Accepted and recorded; this binary does not
    /// terminate TLS itself (§9 Non-goals) so serving still happens over
    /// plain HTTP, same posture the spec takes toward transport framing.
    #[arg(long)]
    pub certfile: Option<String>,

    /// TLS private key file, paired with --certfile.
    #[arg(long)]
    pub certkey: Option<String>,

    /// Requests TLS termination; logged as unsupported when set without
    /// an external reverse proxy doing the actual termination.
    #[arg(long)]
    pub ssl: bool,

    /// Path to write the process id to after a successful bind.
    #[arg(long)]
    pub pid: Option<String>,

    /// Path to write logs to, in addition to stderr.
    #[arg(long)]
    pub log: Option<String>,

    /// Requests background daemonization. Accepted for compatibility;
    /// actual daemonization is a platform concern this binary leaves to
    /// the caller (systemd, docker, etc.) and instead just warns.
    #[arg(long)]
    pub daemon: bool,
}
