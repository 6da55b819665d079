use std::process::ExitCode;

use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::sim;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let reports = match sim::run_all(&app.config) {
        Ok(reports) => reports,
        Err(err) => {
            error!(error = %err, "simulation_failed");
            return ExitCode::FAILURE;
        }
    };

    for report in &reports {
        info!(
            scenario = report.name,
            ticks = report.ticks,
            outcomes = ?report.outcomes,
            "scenario_completed"
        );
        for message in &report.messages {
            info!(scenario = report.name, text = %message, "agent_message");
        }
    }
    info!(scenarios = reports.len(), "simulation_completed");
    ExitCode::SUCCESS
}
