use std::process::ExitCode;

use cgviz::{run, SceneConfig, ViewerWindow};

fn main() -> ExitCode {
    let _ = env_logger::try_init();

    let config = SceneConfig::default();
    let mut viewer = ViewerWindow::from_config(&config);

    match run(&config, &mut viewer) {
        Ok(report) => {
            if !report.skipped.is_empty() {
                log::info!("{} object records were skipped", report.skipped.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
