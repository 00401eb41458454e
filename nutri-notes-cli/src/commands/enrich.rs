use chrono::{Local, NaiveDate};
use clap::Args;
use nutri_notes_core::{load_knowledge_base, EnrichOptions, NotesEnricher};
use std::path::PathBuf;
use std::time::Instant;

use super::{knowledge_base_file, parse_date, NotesLocation};
use crate::analyzer::build_analyzer;
use crate::config::{AnalyzerProvider, Config};

#[derive(Args)]
pub struct EnrichCommand {
    #[command(flatten)]
    pub location: NotesLocation,

    /// Analyzer to use (defaults to analyzer.provider from config)
    #[arg(long, value_enum)]
    pub analyzer: Option<AnalyzerProvider>,

    /// Only enrich this day (MM/DD/YYYY)
    #[arg(long, value_parser = parse_date)]
    pub only_date: Option<NaiveDate>,

    /// Write the enriched notes here instead of over the notes file
    #[arg(long)]
    pub write_notes_to: Option<PathBuf>,

    /// Recompute breakdowns that are still current
    #[arg(long)]
    pub override_existing: bool,

    /// Knowledge base file (defaults to <notes_dir>/<year>/<nutrition_dir>/knowledge_base.md)
    #[arg(long)]
    pub knowledge_base: Option<PathBuf>,
}

impl EnrichCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let start = Instant::now();
        let today = Local::now().date_naive();

        let notes_file = self.location.notes_file(config, today)?;
        let nutrition_dir = self.location.nutrition_dir(config);
        let knowledge_base_path = self.knowledge_base.clone().unwrap_or_else(|| {
            knowledge_base_file(&self.location.notes_dir(config), &nutrition_dir, today)
        });
        let knowledge_base = load_knowledge_base(&knowledge_base_path)?;

        let provider = self.analyzer.unwrap_or(config.analyzer.provider.value);
        let analyzer = build_analyzer(provider, &config.analyzer)?;
        tracing::debug!(
            "Enriching {} with {} (breakdowns in {})",
            notes_file.display(),
            provider,
            nutrition_dir
        );

        let mut options = EnrichOptions::default().with_override_existing(self.override_existing);
        if let Some(date) = self.only_date {
            options = options.with_only_date(date);
        }
        if let Some(path) = &self.write_notes_to {
            options = options.with_write_notes_to(path);
        }

        let enriched = NotesEnricher::new(analyzer).enrich(
            &notes_file,
            &knowledge_base,
            &nutrition_dir,
            &options,
        )?;

        if enriched {
            tracing::info!(
                "Done enriching daily notes. Took {:.2} seconds",
                start.elapsed().as_secs_f64()
            );
        }
        Ok(())
    }
}
