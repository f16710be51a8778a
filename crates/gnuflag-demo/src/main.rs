use std::time::Duration;

use anyhow::{Context, Result};
use gnuflag::command_line;
use tracing_subscriber::{EnvFilter, fmt};

struct Settings {
    tls: bool,
    debug: bool,
    listen: String,
    timeout: Duration,
    workers: u32,
    install: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();

    command_line::with(|flags| {
        flags.set_known_as("option");
        flags.set_allow_intersperse(true);
        flags.bool("tls", true, "serve over TLS", "");
        flags.present("d debug", "debug output");
        flags.string("l listen", ":7443", "listen address", "ADDR");
        flags.duration("t timeout", Duration::from_secs(30), "idle timeout", "DURATION");
        flags.uint32("w workers", 4, "worker threads", "N");
        flags.set_grouping("Packages");
        flags.string_slice("i install", "packages to install\nbefore serving", "PKG...");
    });

    let args = command_line::parse().context("parsing command line")?;
    let settings = command_line::with(|flags| read_settings(flags))?;
    tracing::debug!(positional = args.len(), "parsed command line");

    println!("tls={}", settings.tls);
    println!("debug={}", settings.debug);
    println!("listen={}", settings.listen);
    println!("timeout={}", gnuflag::duration::format(settings.timeout));
    println!("workers={}", settings.workers);
    println!("install=[{}]", settings.install.join(" "));
    println!("args=[{}]", args.join(" "));
    Ok(())
}

fn read_settings(flags: &gnuflag::FlagSet) -> Result<Settings> {
    Ok(Settings {
        tls: flags.get("tls").context("tls flag")?,
        debug: flags.get("debug").context("debug flag")?,
        listen: flags.get("listen").context("listen flag")?,
        timeout: flags.get("timeout").context("timeout flag")?,
        workers: flags.get("workers").context("workers flag")?,
        install: flags.get("install").context("install flag")?,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
