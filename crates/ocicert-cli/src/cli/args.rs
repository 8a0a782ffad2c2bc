use clap::{Args, Parser, Subcommand};
use ocicert_auth::AuthConfig;

#[derive(Parser, Debug)]
#[command(
    name = "ocicert",
    version,
    about = "Bearer-token authentication checks for OCI distribution registries"
)]
pub struct Cli {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the challenge/token handshake against a registry
    Probe(ProbeArgs),
    /// Authenticate against the URL's host, then send one request
    Get(GetArgs),
    Version,
}

/// Connection settings. Unset flags fall back to `OCICERT_*` environment
/// variables, then to built-in defaults.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Registry reference (host/repository[:tag]); overrides OCICERT_REGISTRY
    #[arg(long, global = true)]
    pub registry: Option<String>,

    /// Skip TLS certificate verification (insecure; test registries only)
    #[arg(long, global = true)]
    pub insecure_skip_verify: bool,

    /// Talk to the registry over plain HTTP
    #[arg(long, global = true)]
    pub plain_http: bool,

    /// Connect timeout in seconds
    #[arg(long, global = true)]
    pub connect_timeout: Option<u64>,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> AuthConfig {
        let mut config = AuthConfig::from_env();
        if let Some(registry) = &self.registry {
            config = config.with_registry(registry.clone());
        }
        if self.insecure_skip_verify {
            config = config.with_insecure_skip_verify(true);
        }
        if self.plain_http {
            config = config.with_plain_http(true);
        }
        if let Some(secs) = self.connect_timeout {
            config = config.with_connect_timeout(secs);
        }
        config
    }
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Registry host to probe (default: host of the configured registry)
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Full URL to request, e.g. https://registry-1.docker.io/v2/library/busybox/tags/list
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Print the response body
    #[arg(long)]
    pub show_body: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_flags_override_env() {
        std::env::set_var("OCICERT_REGISTRY", "quay.io/coreos/etcd");

        let cli = Cli::parse_from([
            "ocicert",
            "--registry",
            "localhost:5000/app",
            "--plain-http",
            "probe",
        ]);
        let config = cli.conn.to_config();
        std::env::remove_var("OCICERT_REGISTRY");

        assert_eq!(config.registry, "localhost:5000/app");
        assert!(config.plain_http);
        assert!(!config.insecure_skip_verify);
        assert!(matches!(cli.cmd, Command::Probe(ProbeArgs { host: None })));
    }

    #[test]
    #[serial]
    fn test_env_used_without_flags() {
        std::env::set_var("OCICERT_REGISTRY", "quay.io/coreos/etcd");

        let cli = Cli::parse_from(["ocicert", "probe", "quay.io"]);
        let config = cli.conn.to_config();
        std::env::remove_var("OCICERT_REGISTRY");

        assert_eq!(config.registry, "quay.io/coreos/etcd");
    }

    #[test]
    fn test_get_args() {
        let cli = Cli::parse_from([
            "ocicert",
            "get",
            "https://registry.test/v2/",
            "-X",
            "HEAD",
            "--insecure-skip-verify",
        ]);
        assert!(cli.conn.insecure_skip_verify);
        match cli.cmd {
            Command::Get(args) => {
                assert_eq!(args.url, "https://registry.test/v2/");
                assert_eq!(args.method, "HEAD");
                assert!(args.data.is_none());
            }
            other => panic!("expected get, got {:?}", other),
        }
    }
}
