use std::process::ExitCode;

use backstep_core::{DelayPolicyConfig, attempt_for};
use tracing::{error, info};

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_COUNT: i64 = 8;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let count = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<i64>() {
            Ok(count) => count,
            Err(_) => {
                error!(%arg, "fail count must be an integer");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_COUNT,
    };

    let policy = match DelayPolicyConfig::from_env().and_then(|config| config.into_policy()) {
        Ok(policy) => policy,
        Err(err) => {
            error!(%err, "invalid delay policy configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(?policy, count, "printing delay table");

    println!("{:>10} {:>8} {:>16}", "fail_count", "attempt", "delay");
    for fail_count in 0..=count {
        let delay = policy.delay(fail_count);
        println!(
            "{:>10} {:>8} {:>16}",
            fail_count,
            attempt_for(fail_count),
            format!("{delay:?}")
        );
    }

    ExitCode::SUCCESS
}
