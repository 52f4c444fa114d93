use clap::Parser;
use std::time::Duration;

/// mtr-style path monitor: discover the route once, then ping every hop
#[derive(Parser, Debug, Clone)]
#[command(name = "hopmon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Destination host to monitor (IP address or hostname)
    pub target: String,

    /// Number of rounds to run (0 = until interrupted)
    #[arg(short = 'c', long = "count", default_value = "0")]
    pub count: u64,

    /// Seconds between rounds
    #[arg(short = 'i', long = "interval", default_value = "1.0")]
    pub interval: f64,

    /// Maximum hops to probe during route discovery
    #[arg(short = 'm', long = "max-hops", default_value = "30")]
    pub max_hops: u8,

    /// Per-probe timeout in seconds
    #[arg(long = "timeout", default_value = "1.0")]
    pub timeout: f64,

    /// Print a text report at the end (batch mode, requires -c)
    #[arg(long = "report")]
    pub report: bool,

    /// Print final statistics as JSON (batch mode, requires -c)
    #[arg(long = "json")]
    pub json: bool,
}

impl Args {
    /// Get round interval as Duration
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    /// Get probe timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Check if running in batch mode (non-interactive)
    pub fn is_batch_mode(&self) -> bool {
        self.json || self.report
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.is_batch_mode() && self.count == 0 {
            return Err("Batch output modes (--json, --report) require -c to be set".into());
        }

        // Both durations must convert to a non-zero Duration: NaN, infinite,
        // negative, oversized, and sub-nanosecond values are all usage errors.
        if !Duration::try_from_secs_f64(self.interval).is_ok_and(|d| !d.is_zero()) {
            return Err("Interval must be a positive number of seconds".into());
        }

        if !Duration::try_from_secs_f64(self.timeout).is_ok_and(|d| !d.is_zero()) {
            return Err("Timeout must be a positive number of seconds".into());
        }

        if self.max_hops == 0 {
            return Err("Max hops must be at least 1".into());
        }

        const MAX_SAFE_HOPS: u8 = 64;
        if self.max_hops > MAX_SAFE_HOPS {
            return Err(format!("Max hops cannot exceed {}", MAX_SAFE_HOPS));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            target: "example.net".to_string(),
            count: 0,
            interval: 1.0,
            max_hops: 30,
            timeout: 1.0,
            report: false,
            json: false,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(args().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_interval() {
        // Every one of these would otherwise panic when lowered to a
        // Duration or handed to the round timer.
        for bad in [f64::NAN, f64::INFINITY, 0.0, -1.0, 1e-10, 1e30] {
            let mut a = args();
            a.interval = bad;
            assert!(a.validate().is_err(), "interval {bad} accepted");
        }
    }

    #[test]
    fn test_validate_rejects_unusable_timeout() {
        for bad in [f64::NAN, f64::INFINITY, 0.0, -1.0, 1e-10, 1e30] {
            let mut a = args();
            a.timeout = bad;
            assert!(a.validate().is_err(), "timeout {bad} accepted");
        }
    }

    #[test]
    fn test_validate_batch_requires_count() {
        let mut a = args();
        a.json = true;
        assert!(a.validate().is_err());
        a.count = 5;
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_max_hops() {
        let mut a = args();
        a.max_hops = 0;
        assert!(a.validate().is_err());
        a.max_hops = 65;
        assert!(a.validate().is_err());
        a.max_hops = 64;
        assert!(a.validate().is_ok());
    }
}
