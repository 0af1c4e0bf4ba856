use clap::Parser;

use deptree_core::CaseMode;

use crate::visibility::DrawOptions;

#[derive(Debug, Clone, Parser)]
#[command(name = "deptree")]
#[command(about = "Render a module dependency graph as a colorized package tree")]
pub struct Config {
    /// Percentile separating cold from hot nodes, e.g. 99.9
    #[arg(short = 'q', long, default_value = "95", value_parser = percentile_in_range)]
    pub quantile: f64,

    /// Hide modules without any relations
    #[arg(long)]
    pub hide_zero: bool,

    /// Hide modules discovered only as dependencies
    #[arg(long)]
    pub hide_deps: bool,

    /// Show nothing but dependencies
    #[arg(long = "deps")]
    pub only_deps: bool,

    /// Skip the statistics summary
    #[arg(long)]
    pub hide_stats: bool,

    /// Keep the case of import paths instead of lower-casing them
    #[arg(long)]
    pub preserve_case: bool,
}

fn percentile_in_range(value: &str) -> Result<f64, String> {
    let percentile: f64 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=100.0).contains(&percentile) {
        Ok(percentile)
    } else {
        Err(format!("percentile must lie between 0 and 100, got {percentile}"))
    }
}

impl Config {
    pub fn case_mode(&self) -> CaseMode {
        if self.preserve_case { CaseMode::Preserve } else { CaseMode::Lower }
    }

    /// Render options for the given global label threshold
    pub fn draw_options(&self, dependencies_quantile: usize) -> DrawOptions {
        DrawOptions {
            dependencies_quantile,
            skip_dependencies: self.hide_deps,
            only_deps: self.only_deps,
            skip_zero: self.hide_zero,
        }
    }
}
