use clap::{Parser, Subcommand, ValueEnum};
use pingtrace_core::defaults;
use pingtrace_dns::ResolveMethod;
use std::time::Duration;

/// Ping a host or trace the route to it using ICMP echo requests
#[derive(Parser, Debug)]
#[command(name = "pingtrace", author, version, about, long_about = None, arg_required_else_help(true))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// How to perform DNS queries
    #[arg(value_enum, long, global = true, default_value_t = DnsResolveMethodConfig::System)]
    pub dns_resolve_method: DnsResolveMethodConfig,

    /// The maximum time to wait to perform DNS queries, in seconds
    #[arg(long, global = true, value_parser = parse_secs, default_value = "5")]
    pub dns_timeout: Duration,

    /// Enable verbose debug logging
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The debug log format
    #[arg(value_enum, long, global = true, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// The debug log filter
    #[arg(long, global = true, default_value = "pingtrace=debug")]
    pub log_filter: String,

    /// The debug log span events
    #[arg(value_enum, long, global = true, default_value_t = LogSpanEvents::Off)]
    pub log_span_events: LogSpanEvents,
}

/// The tool to run.
#[derive(Subcommand, Debug, Eq, PartialEq)]
pub enum Command {
    /// Send echo requests to a host and report the replies
    Ping(PingArgs),
    /// Trace the route to a host
    Traceroute(TracerouteArgs),
}

#[derive(clap::Args, Debug, Eq, PartialEq)]
pub struct PingArgs {
    /// The hostname or IPv4 address to ping
    #[arg(long)]
    pub host: String,

    /// The number of echo requests to send
    #[arg(short = 'c', long, default_value_t = defaults::DEFAULT_PING_COUNT)]
    pub count: usize,

    /// The time to wait between echo requests, in seconds
    #[arg(short = 'i', long, value_parser = parse_secs, default_value = "1")]
    pub interval: Duration,

    /// The number of data bytes to send in each echo request
    #[arg(short = 's', long, default_value_t = defaults::DEFAULT_PING_PAYLOAD_SIZE)]
    pub size: u16,

    /// The time to wait for each reply, in seconds
    #[arg(short = 't', long, value_parser = parse_secs, default_value = "1")]
    pub timeout: Duration,

    /// The TTL of outgoing echo requests [default: OS default]
    #[arg(long)]
    pub ttl: Option<u8>,
}

#[derive(clap::Args, Debug, Eq, PartialEq)]
pub struct TracerouteArgs {
    /// The hostname or IPv4 address to trace
    #[arg(long)]
    pub host: String,

    /// Print hop addresses numerically rather than symbolically
    #[arg(short = 'n', long)]
    pub numeric: bool,

    /// Print a summary of unresponsive hops
    #[arg(short = 's', long)]
    pub summarize: bool,

    /// The TTL to start from
    #[arg(short = 'f', long, default_value_t = defaults::DEFAULT_TRACE_FIRST_TTL)]
    pub first_ttl: u8,

    /// The maximum number of hops, at most 30
    #[arg(short = 'm', long, default_value_t = defaults::DEFAULT_TRACE_MAX_TTL)]
    pub max_ttl: u8,

    /// The number of probes to send at each TTL
    #[arg(short = 'q', long, default_value_t = defaults::DEFAULT_TRACE_PROBES_PER_HOP)]
    pub queries: usize,

    /// The time to wait for each probe, in seconds
    #[arg(short = 'w', long, value_parser = parse_secs, default_value = "1")]
    pub timeout: Duration,
}

/// How DNS queries will be resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum DnsResolveMethodConfig {
    /// Resolve using the OS resolver.
    System,
    /// Resolve using the `/etc/resolv.conf` DNS configuration.
    Resolv,
    /// Resolve using the Google `8.8.8.8` DNS service.
    Google,
    /// Resolve using the Cloudflare `1.1.1.1` DNS service.
    Cloudflare,
}

impl From<DnsResolveMethodConfig> for ResolveMethod {
    fn from(value: DnsResolveMethodConfig) -> Self {
        match value {
            DnsResolveMethodConfig::System => Self::System,
            DnsResolveMethodConfig::Resolv => Self::Resolv,
            DnsResolveMethodConfig::Google => Self::Google,
            DnsResolveMethodConfig::Cloudflare => Self::Cloudflare,
        }
    }
}

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in a json format.
    Json,
}

/// How to log event spans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum LogSpanEvents {
    /// Do not display event spans.
    Off,
    /// Display enter and exit event spans.
    Active,
    /// Display all event spans.
    Full,
}

/// Parse a (possibly fractional) number of seconds.
fn parse_secs(value: &str) -> Result<Duration, String> {
    let secs = value
        .parse::<f64>()
        .map_err(|err| format!("invalid duration: {err}"))?;
    Duration::try_from_secs_f64(secs).map_err(|err| format!("invalid duration: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(cmd: &str) -> anyhow::Result<Args> {
        Ok(Args::try_parse_from(
            cmd.split(' ').map(std::ffi::OsString::from),
        )?)
    }

    #[test]
    fn test_ping_defaults() -> anyhow::Result<()> {
        let args = parse("pingtrace ping --host example.com")?;
        let expected = Command::Ping(PingArgs {
            host: String::from("example.com"),
            count: 4,
            interval: Duration::from_secs(1),
            size: 56,
            timeout: Duration::from_secs(1),
            ttl: None,
        });
        pretty_assertions::assert_eq!(expected, args.command);
        assert!(!args.verbose);
        assert_eq!(DnsResolveMethodConfig::System, args.dns_resolve_method);
        assert_eq!(Duration::from_secs(5), args.dns_timeout);
        assert_eq!("pingtrace=debug", args.log_filter);
        Ok(())
    }

    #[test]
    fn test_ping_short_flags() -> anyhow::Result<()> {
        let args = parse("pingtrace ping --host 1.1.1.1 -c 10 -i 0.2 -s 100 -t 2.5 --ttl 5")?;
        let expected = Command::Ping(PingArgs {
            host: String::from("1.1.1.1"),
            count: 10,
            interval: Duration::from_millis(200),
            size: 100,
            timeout: Duration::from_millis(2500),
            ttl: Some(5),
        });
        pretty_assertions::assert_eq!(expected, args.command);
        Ok(())
    }

    #[test]
    fn test_traceroute_defaults() -> anyhow::Result<()> {
        let args = parse("pingtrace traceroute --host example.com")?;
        let expected = Command::Traceroute(TracerouteArgs {
            host: String::from("example.com"),
            numeric: false,
            summarize: false,
            first_ttl: 1,
            max_ttl: 30,
            queries: 1,
            timeout: Duration::from_secs(1),
        });
        pretty_assertions::assert_eq!(expected, args.command);
        Ok(())
    }

    #[test]
    fn test_traceroute_short_flags() -> anyhow::Result<()> {
        let args = parse("pingtrace traceroute --host example.com -n -s -f 3 -m 12 -q 3 -w 0.5")?;
        let expected = Command::Traceroute(TracerouteArgs {
            host: String::from("example.com"),
            numeric: true,
            summarize: true,
            first_ttl: 3,
            max_ttl: 12,
            queries: 3,
            timeout: Duration::from_millis(500),
        });
        pretty_assertions::assert_eq!(expected, args.command);
        Ok(())
    }

    #[test]
    fn test_global_flags_after_subcommand() -> anyhow::Result<()> {
        let args = parse("pingtrace ping --host example.com -v --log-format json --log-span-events active --dns-resolve-method cloudflare --dns-timeout 0.5")?;
        assert!(args.verbose);
        assert_eq!(LogFormat::Json, args.log_format);
        assert_eq!(LogSpanEvents::Active, args.log_span_events);
        assert_eq!(DnsResolveMethodConfig::Cloudflare, args.dns_resolve_method);
        assert_eq!(Duration::from_millis(500), args.dns_timeout);
        Ok(())
    }

    #[test_case("pingtrace ping"; "missing host")]
    #[test_case("pingtrace ping --host example.com -c x"; "invalid count")]
    #[test_case("pingtrace ping --host example.com -i -1"; "negative interval")]
    #[test_case("pingtrace ping --host example.com -s 70000"; "size too large")]
    #[test_case("pingtrace traceroute --host example.com -m 256"; "max ttl too large")]
    #[test_case("pingtrace traceroute --host example.com --log-format chrome"; "unknown log format")]
    #[test_case("pingtrace trace --host example.com"; "unknown subcommand")]
    fn test_invalid(cmd: &str) {
        assert!(parse(cmd).is_err());
    }

    #[test_case("1", Duration::from_secs(1); "whole")]
    #[test_case("0.25", Duration::from_millis(250); "fractional")]
    #[test_case("0", Duration::ZERO; "zero")]
    fn test_parse_secs(value: &str, expected: Duration) {
        assert_eq!(Ok(expected), parse_secs(value));
    }

    #[test_case("abc"; "not a number")]
    #[test_case("-1"; "negative")]
    #[test_case("NaN"; "nan")]
    fn test_parse_secs_invalid(value: &str) {
        assert!(parse_secs(value).is_err());
    }

    #[test]
    fn test_resolve_method() {
        assert_eq!(
            ResolveMethod::Google,
            ResolveMethod::from(DnsResolveMethodConfig::Google)
        );
    }
}
