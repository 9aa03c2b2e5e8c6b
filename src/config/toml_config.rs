use crate::adapters::json_store::DEFAULT_FILE_NAME;
use crate::core::ConfigProvider;
use crate::utils::error::{EnrollmentError, Result};
use crate::utils::validation::{
    validate_base_url, validate_data_dir, validate_file_name, validate_timeout_seconds, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_VIA_CEP_API: &str = "https://viacep.com.br/ws";
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub via_cep: ViaCepConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaCepConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    pub file_name: Option<String>,
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            via_cep: ViaCepConfig {
                base_url: DEFAULT_VIA_CEP_API.to_string(),
                timeout_seconds: None,
            },
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrollmentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EnrollmentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 只從環境變數讀取 (VIA_CEP_API, ENROLLMENTS_DATA_DIR, VIA_CEP_TIMEOUT_SECONDS)
    pub fn from_env() -> Result<Self> {
        let timeout_seconds = match std::env::var("VIA_CEP_TIMEOUT_SECONDS") {
            Ok(value) => Some(value.parse::<u64>().map_err(|e| {
                EnrollmentError::InvalidConfigValueError {
                    field: "VIA_CEP_TIMEOUT_SECONDS".to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?),
            Err(_) => None,
        };

        Ok(Self {
            via_cep: ViaCepConfig {
                base_url: std::env::var("VIA_CEP_API")
                    .unwrap_or_else(|_| DEFAULT_VIA_CEP_API.to_string()),
                timeout_seconds,
            },
            storage: StorageConfig {
                data_dir: std::env::var("ENROLLMENTS_DATA_DIR")
                    .unwrap_or_else(|_| default_data_dir()),
                file_name: None,
            },
        })
    }

    /// 替換環境變數 (例如 ${VIA_CEP_API})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EnrollmentError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn file_name(&self) -> &str {
        self.storage.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }
}

impl ConfigProvider for AppConfig {
    fn via_cep_api(&self) -> &str {
        &self.via_cep.base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.via_cep.timeout_seconds.map(Duration::from_secs)
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_base_url("via_cep.base_url", &self.via_cep.base_url)?;

        if let Some(timeout) = self.via_cep.timeout_seconds {
            validate_timeout_seconds("via_cep.timeout_seconds", timeout)?;
        }

        validate_data_dir("storage.data_dir", &self.storage.data_dir)?;

        if let Some(file_name) = &self.storage.file_name {
            validate_file_name("storage.file_name", file_name)?;
        }

        Ok(())
    }
}
