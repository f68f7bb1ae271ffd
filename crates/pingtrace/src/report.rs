use pingtrace_core::UnreachableReason;
use std::time::Duration;

pub mod ping;
pub mod trace;

/// Format a round trip time in milliseconds.
fn millis(rtt: Duration) -> String {
    format!("{:.3}", rtt.as_secs_f64() * 1000_f64)
}

fn describe_unreachable(reason: UnreachableReason) -> String {
    match reason {
        UnreachableReason::Network => String::from("Destination Net Unreachable"),
        UnreachableReason::Host => String::from("Destination Host Unreachable"),
        UnreachableReason::Protocol => String::from("Destination Protocol Unreachable"),
        UnreachableReason::Port => String::from("Destination Port Unreachable"),
        UnreachableReason::FragmentationNeeded => String::from("Frag needed and DF set"),
        UnreachableReason::SourceRouteFailed => String::from("Source Route Failed"),
        UnreachableReason::AdministrativelyProhibited => {
            String::from("Communication prohibited by filter")
        }
        UnreachableReason::Other(code) => format!("Dest Unreachable, Bad Code: {code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Duration::from_micros(1_500), "1.500"; "micros")]
    #[test_case(Duration::from_nanos(12_345_678), "12.346"; "rounded")]
    #[test_case(Duration::ZERO, "0.000"; "zero")]
    fn test_millis(rtt: Duration, expected: &str) {
        assert_eq!(expected, millis(rtt));
    }

    #[test]
    fn test_describe_unknown_code() {
        assert_eq!(
            "Dest Unreachable, Bad Code: 14",
            describe_unreachable(UnreachableReason::Other(14))
        );
    }
}
