use clap::ValueEnum;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use wam_tracker::config::AppConfig;
use wam_tracker::error::AppError;
use wam_tracker::grades::goal::HIGH_PASS_INPUT;
use wam_tracker::grades::{
    parse_number, parse_target_percent, GoalTarget, GradebookService, JsonFileRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) share_base_url: Arc<str>,
}

/// Gradebook backed by the configured JSON file.
pub(crate) fn open_gradebook(
    config: &AppConfig,
) -> Result<Arc<GradebookService<JsonFileRepository>>, AppError> {
    let repository = Arc::new(JsonFileRepository::new(
        &config.storage.data_dir,
        &config.storage.key,
    ));
    tracing::debug!(path = %repository.path().display(), "opening gradebook storage");
    Ok(Arc::new(GradebookService::new(repository)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum GoalPreset {
    /// 60%
    LowPass,
    /// Requested percentage settled into 60..=100
    HighPass,
}

impl GoalPreset {
    pub(crate) fn target(self, percentage: Option<f64>) -> GoalTarget {
        match self {
            GoalPreset::LowPass => GoalTarget::LowPass,
            GoalPreset::HighPass => GoalTarget::HighPass(percentage.unwrap_or(HIGH_PASS_INPUT.min)),
        }
    }
}

pub(crate) fn parse_target(raw: &str) -> Result<f64, String> {
    parse_target_percent(raw).map_err(|err| err.to_string())
}

/// Any finite number; the high-pass preset settles it into its own range.
pub(crate) fn parse_percentage(raw: &str) -> Result<f64, String> {
    parse_number("percentage", raw).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_rejects_out_of_range_values() {
        assert_eq!(parse_target(" 82.5 "), Ok(82.5));
        let message = parse_target("101").expect_err("above range");
        assert!(message.contains("between 0 and 100"));
        assert!(parse_target("abc").is_err());
    }

    #[test]
    fn parse_percentage_leaves_range_to_the_preset() {
        assert_eq!(parse_percentage("120"), Ok(120.0));
        assert_eq!(parse_percentage("-5"), Ok(-5.0));
        assert!(parse_percentage("inf").is_err());
        assert!(parse_percentage("").is_err());
    }

    #[test]
    fn high_pass_preset_defaults_and_settles() {
        assert_eq!(GoalPreset::LowPass.target(Some(90.0)).percent(), 60.0);
        assert_eq!(GoalPreset::HighPass.target(None).percent(), 60.0);
        assert_eq!(GoalPreset::HighPass.target(Some(42.0)).percent(), 60.0);
        assert_eq!(GoalPreset::HighPass.target(Some(84.6)).percent(), 85.0);
    }
}
