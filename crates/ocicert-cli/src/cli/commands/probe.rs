//! CLI command: ocicert probe
//!
//! Runs the bearer challenge handshake against one registry and prints what
//! was discovered.
//!
//! Usage:
//!   ocicert probe [HOST]
//!
//! Examples:
//!   ocicert probe registry-1.docker.io
//!   OCICERT_REGISTRY=quay.io/coreos/etcd ocicert probe

use anyhow::Context;
use ocicert_auth::AuthContext;

use crate::cli::args::{ConnectionArgs, ProbeArgs};
use crate::exit_codes::SUCCESS;

pub async fn run(conn: &ConnectionArgs, args: ProbeArgs) -> anyhow::Result<i32> {
    let config = conn.to_config();
    let host = match args.host {
        Some(host) => host,
        None => config.reference()?.host,
    };

    let mut ctx = AuthContext::new(config)?;
    ctx.prepare_auth(&host)
        .await
        .with_context(|| format!("authenticating against {}", host))?;

    println!("registry:  {}", host);
    println!("realm:     {}", ctx.realm());
    println!("service:   {}", ctx.service());
    println!("scope:     {}", ctx.scope());
    println!("token for: {}", ctx.request_host());

    Ok(SUCCESS)
}
