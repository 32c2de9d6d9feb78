//! rke2-genconfig - RKE2 node configuration generator
//!
//! Configures an RKE2 node to run an EKS Distro style Kubernetes release:
//! core component images go into the node `config.yaml`, packaged add-ons get
//! `HelmChartConfig` image overrides, node binaries are extracted from the
//! release archive and private ECR registries get pull credentials.

use clap::Parser;
use tracing::Dispatch;

mod archive;
mod cli;
mod commands;
mod config;
mod error;
mod http;
mod logging;
mod paths;
mod registry;
mod release;

#[cfg(test)]
mod test_fixtures;

use cli::Cli;
use commands::generate::{self, GenerateArgs, GenerateReport};
use error::GenconfigError;
use registry::EcrTokenSource;

fn main() {
    let cli = Cli::parse();
    let dispatch = logging::dispatch(cli.verbose);

    let code = tracing::dispatcher::with_default(&dispatch, || run(&cli, &dispatch));
    std::process::exit(code);
}

/// Outcome of the generation task as seen from the signal race
enum Outcome {
    Finished(Result<error::Result<GenerateReport>, tokio::task::JoinError>),
    Interrupted,
}

fn run(cli: &Cli, dispatch: &Dispatch) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return 1;
        }
    };

    let args = GenerateArgs::from(cli);
    let handle = runtime.handle().clone();
    let worker_dispatch = dispatch.clone();

    let outcome = runtime.block_on(async move {
        // The pipeline is blocking I/O; only the ECR client needs the runtime
        let task = tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&worker_dispatch, || {
                let token_source = EcrTokenSource::new(handle);
                generate::run(&args, &token_source)
            })
        });

        tokio::select! {
            joined = task => Outcome::Finished(joined),
            Ok(()) = tokio::signal::ctrl_c() => Outcome::Interrupted,
        }
    });

    let code = exit_code(outcome);
    // A blocking task still running after an interrupt must not hold up exit
    runtime.shutdown_background();
    code
}

fn exit_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Interrupted => {
            tracing::info!("Interrupted, exiting");
            0
        }
        Outcome::Finished(Ok(Ok(report))) => {
            tracing::debug!(
                "Configured release {} in {} ({} chart configs, {} executables, {} registries)",
                report.release_name,
                report.node_config.display(),
                report.chart_configs.len(),
                report.executables.len(),
                report.registry_endpoints.len()
            );
            0
        }
        Outcome::Finished(Ok(Err(err))) => report_failure(&err),
        Outcome::Finished(Err(join_error)) => {
            tracing::error!("Generation task failed: {}", join_error);
            1
        }
    }
}

fn report_failure(err: &GenconfigError) -> i32 {
    tracing::error!("{}", err);
    if let Some(help) = miette::Diagnostic::help(err) {
        tracing::debug!("help: {}", help);
    }
    1
}
