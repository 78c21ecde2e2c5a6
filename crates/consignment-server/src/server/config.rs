use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;

/// Runtime configuration for the `consignment-server` binary.
///
/// The only setting is where to listen. Values come from CLI arguments or
/// environment variables (a `.env` file is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "consignment-server",
    version,
    about = "A gRPC service that records consignments and lists them back"
)]
pub struct CliArgs {
    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:50051" or "/tmp/consignment.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_addr: String,
    pub uds: bool,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.uds {
            if args.server_addr.is_empty() {
                anyhow::bail!("SERVER_ADDR must be a socket path when --uds is set");
            }
        } else {
            args.server_addr.parse::<SocketAddr>().with_context(|| {
                format!(
                    "SERVER_ADDR ({}) is not a valid TCP address",
                    args.server_addr
                )
            })?;
        }

        Ok(Self {
            server_addr: args.server_addr,
            uds: args.uds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<ServerConfig> {
        let args = CliArgs::try_parse_from(
            std::iter::once("consignment-server").chain(args.iter().copied()),
        )?;
        ServerConfig::try_from(args)
    }

    #[test]
    fn explicit_tcp_address_is_kept() {
        let config = parse(&["--server-addr", "127.0.0.1:6000"]).unwrap();
        assert_eq!(
            config,
            ServerConfig {
                server_addr: "127.0.0.1:6000".to_string(),
                uds: false,
            }
        );
    }

    #[test]
    fn invalid_tcp_address_is_rejected() {
        let err = parse(&["--server-addr", "not-an-address"]).unwrap_err();
        assert!(err.to_string().contains("not-an-address"));
    }

    #[test]
    fn uds_accepts_a_socket_path() {
        let config = parse(&["--uds", "--server-addr", "/tmp/consignment.sock"]).unwrap();
        assert!(config.uds);
        assert_eq!(config.server_addr, "/tmp/consignment.sock");
    }
}
