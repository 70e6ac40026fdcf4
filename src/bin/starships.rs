//! Lists every SWAPI starship with its resolved pilots.

use std::process::ExitCode;

use swapi_resolver::logging::setup_tracing;
use swapi_resolver::report::{render, ReportLabels};
use swapi_resolver::{Resolver, ResolverConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_tracing();

    let resolver = match Resolver::new(ResolverConfig::default()) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!(error = %e, "Could not build resolver");
            return ExitCode::FAILURE;
        }
    };

    match resolver.run_default().await {
        Ok(result) => {
            print!("{}", render(&result, &ReportLabels::default()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching data");
            ExitCode::FAILURE
        }
    }
}
