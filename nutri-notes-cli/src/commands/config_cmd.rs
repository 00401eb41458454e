use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# nutri configuration

# Root directory of the daily notes; notes files live in <notes_dir>/<year>/<MM Month>.md
# notes_dir: ~/Documents/daily

# Subdirectory, next to each notes file, holding the breakdown documents
nutrition_dir: n101

analyzer:
  # claude or grok
  provider: claude
  # anthropic_api_key: sk-ant-...
  # xai_api_key: xai-...
  # model: claude-3-7-sonnet-latest
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                cli_config_path
                                    .unwrap_or_else(Config::default_config_path)
                                    .display()
                            );
                        }
                        println!();

                        println!("notes_dir: {}", config.notes_dir.value.display());
                        println!("  source: {}", config.notes_dir.source);
                        println!();

                        println!("nutrition_dir: {}", config.nutrition_dir.value);
                        println!("  source: {}", config.nutrition_dir.source);
                        println!();

                        let analyzer = &config.analyzer;
                        println!("analyzer.provider: {}", analyzer.provider.value);
                        println!("  source: {}", analyzer.provider.source);
                        println!(
                            "analyzer.model: {}",
                            analyzer.model.as_deref().unwrap_or("(provider default)")
                        );
                        println!(
                            "analyzer.anthropic_api_key: {}",
                            key_status(&analyzer.anthropic_api_key)
                        );
                        println!(
                            "analyzer.xai_api_key: {}",
                            key_status(&analyzer.xai_api_key)
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'nutri config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn key_status(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "set"
    } else {
        "not set"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyzerProvider, ConfigSource};
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nutri").join("config.yaml");
        let config = Config::load_with_env(Some(config_path.clone()), |_| None).unwrap();

        let cmd = ConfigCommand {
            command: ConfigSubcommand::Init,
        };
        cmd.run(&config, Some(config_path.clone())).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_with_env(Some(config_path), |_| None).unwrap();
        assert_eq!(loaded.nutrition_dir.value, "n101");
        assert_eq!(loaded.nutrition_dir.source, ConfigSource::File);
        assert_eq!(loaded.analyzer.provider.value, AnalyzerProvider::Claude);
        assert_eq!(loaded.notes_dir.source, ConfigSource::Default);
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "nutrition_dir: mine\n").unwrap();
        let config = Config::load_with_env(Some(config_path.clone()), |_| None).unwrap();

        let cmd = ConfigCommand {
            command: ConfigSubcommand::Init,
        };
        cmd.run(&config, Some(config_path.clone())).unwrap();
        assert_eq!(fs::read_to_string(config_path).unwrap(), "nutrition_dir: mine\n");
    }
}
