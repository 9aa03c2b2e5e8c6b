use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "enrollments")]
#[command(about = "Manage enrollments and resolve CEP addresses")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file (defaults to environment variables)")]
    pub config: Option<String>,

    #[arg(long, help = "Override the ViaCEP base URL")]
    pub via_cep_api: Option<String>,

    #[arg(long, help = "Override the data directory")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve a CEP to address data
    Cep { cep: String },
    /// Print the enrollment of a user
    Show {
        #[arg(long)]
        user_id: i32,
    },
    /// Create or update an enrollment from a JSON file
    Upsert {
        #[arg(long)]
        input: String,
    },
}

impl CliConfig {
    /// 設定檔或環境變數，再套用命令列覆寫
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env()?,
        };

        if let Some(base_url) = &self.via_cep_api {
            config.via_cep.base_url = base_url.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
