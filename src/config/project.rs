use crate::utils::error::{Result, RizzaError};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PROJECT_CONFIG_PATH: &str = "rizza.toml";

/// Optional project-level defaults loaded from `rizza.toml` in the
/// working directory. Command line values take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub brute: Option<BruteDefaults>,
    #[serde(default)]
    pub target: Option<TargetDefaults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BruteDefaults {
    pub entities: Option<Vec<String>>,
    pub max_fields: Option<usize>,
    pub max_inputs: Option<usize>,
    pub field_exclude: Option<Vec<String>>,
    pub method_exclude: Option<Vec<String>>,
    pub log_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetDefaults {
    pub label: Option<String>,
    pub config_path: Option<String>,
}

impl ProjectConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RizzaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| RizzaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SATELLITE_LABEL})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 載入工作目錄下的 rizza.toml，不存在時回傳 None
    pub fn load_default() -> Result<Option<Self>> {
        if Path::new(PROJECT_CONFIG_PATH).exists() {
            Ok(Some(Self::from_file(PROJECT_CONFIG_PATH)?))
        } else {
            Ok(None)
        }
    }
}

impl Validate for ProjectConfig {
    fn validate(&self) -> Result<()> {
        if let Some(brute) = &self.brute {
            if let Some(max_fields) = brute.max_fields {
                validate_positive_number("brute.max_fields", max_fields, 1)?;
            }
            if let Some(max_inputs) = brute.max_inputs {
                validate_positive_number("brute.max_inputs", max_inputs, 1)?;
            }
            if let Some(entities) = &brute.entities {
                for entity in entities {
                    validate_non_empty_string("brute.entities", entity)?;
                }
            }
        }

        if let Some(target) = &self.target {
            if let Some(label) = &target.label {
                validate_non_empty_string("target.label", label)?;
            }
        }

        Ok(())
    }
}
