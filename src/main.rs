use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use sales_dashboard::cache::DatasetCache;
use sales_dashboard::report;
use sales_dashboard::settings::{OutputFormat, Settings};
use sales_dashboard::state::DashboardState;

fn main() -> ExitCode {
    let settings = Settings::parse();

    let default_level = if settings.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&settings) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to build dashboard: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<String> {
    let cache = DatasetCache::new(settings.load_options());
    let dataset = cache.get_or_load(&settings.data)?;

    let mut state = DashboardState::new(dataset);
    if settings.list_options {
        let options = state.options();
        return match settings.format {
            OutputFormat::Text => report::render_options_text(&options),
            OutputFormat::Json => report::render_options_json(&options),
        };
    }
    state.apply(settings.controls(&state.dataset));

    let view = state.view();
    match settings.format {
        OutputFormat::Text => report::render_text(&view),
        OutputFormat::Json => report::render_json(&view),
    }
}
