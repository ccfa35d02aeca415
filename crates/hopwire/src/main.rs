#![forbid(unsafe_code)]

use anyhow::anyhow;
use clap::Parser;
use hopwire_core::{defaults, Builder, Tracer};
use hopwire_privilege::Privilege;
use std::time::Duration;

/// Trace the route to a host.
#[derive(Parser, Debug)]
#[command(name = "hopwire", version, about)]
struct Args {
    /// The host to trace the route to, a hostname or IPv4 address.
    host: String,

    /// The ttl of the first hop to probe.
    #[arg(long, default_value_t = u16::from(defaults::DEFAULT_FIRST_HOP))]
    first_hop: u16,

    /// The maximum ttl to probe.
    #[arg(long, default_value_t = u16::from(defaults::DEFAULT_MAX_HOPS))]
    max_hops: u16,

    /// The number of times a silent hop is re-probed.
    #[arg(long, default_value_t = defaults::DEFAULT_RETRIES, conflicts_with = "probes")]
    retries: u8,

    /// The total number of probes per hop, an alias for retries + 1.
    #[arg(long)]
    probes: Option<u8>,

    /// The per-probe timeout in milliseconds.
    #[arg(long, default_value_t = defaults::DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// The probe datagram size in bytes, UDP header included.
    #[arg(long, default_value_t = defaults::DEFAULT_PACKET_SIZE)]
    packet_size: u16,

    /// The destination port of the first hop probe.
    #[arg(long, default_value_t = defaults::DEFAULT_PORT_BASE)]
    port_base: u16,

    /// Enable verbose output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let privilege = Privilege::acquire_privileges()?;
    if !privilege.has_privileges() {
        return Err(anyhow!(
            "hopwire requires elevated privileges to open raw sockets"
        ));
    }
    let tracer = make_tracer(&args)?;
    let (handle, records) = tracer.spawn()?;
    println!(
        "traceroute to {} ({}), {} hops max, {} byte packets",
        tracer.hostname(),
        handle.dest_addr(),
        tracer.max_hops().0,
        tracer.packet_size().0
    );
    for record in records {
        println!("{record}");
    }
    handle.wait().map_err(|err| anyhow!(err))
}

fn make_tracer(args: &Args) -> anyhow::Result<Tracer> {
    let builder = Builder::new(args.host.as_str())
        .first_hop(args.first_hop)
        .max_hops(args.max_hops)
        .timeout(Duration::from_millis(args.timeout_ms))
        .packet_size(args.packet_size)
        .port_base(args.port_base);
    let builder = match args.probes {
        Some(probes) => builder.probes(probes),
        None => builder.retries(args.retries),
    };
    Ok(builder.build()?)
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => return,
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
