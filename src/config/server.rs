use crate::domain::ports::TargetProvider;
use crate::utils::error::{Result, RizzaError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LABEL: &str = "default";
/// Well-known location the container image provisions a config into.
pub const FALLBACK_PATH: &str = "config/server_configs.json";

/// One saved target server, stored in a JSON map of label → entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<(String, String)>,
    #[serde(default)]
    pub verify: bool,
}

impl ServerConfig {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("RIZZA_HOME")
            .or_else(|_| std::env::var("HOME"))
            .unwrap_or_else(|_| ".".to_string());
        Path::new(&home).join(".config/rizza/server_configs.json")
    }

    pub fn get(label: &str, path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let store = load_store(&path)?;
        store
            .get(label)
            .cloned()
            .ok_or_else(|| RizzaError::ConfigError {
                message: format!(
                    "no configuration saved under label '{}' in {}",
                    label,
                    path.display()
                ),
            })
    }

    pub fn save(&self, label: &str, path: Option<&Path>) -> Result<()> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let mut store = load_store_or_empty(&path)?;
        store.insert(label.to_string(), self.clone());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&store)?)?;
        Ok(())
    }

    /// brute 執行前的設定解析：明確路徑 → 預設路徑 → 容器內建路徑
    pub fn auto_load(label: &str, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::get(label, Some(path));
        }
        Self::resolve(label, &Self::default_path(), Path::new(FALLBACK_PATH))
    }

    fn resolve(label: &str, default_path: &Path, fallback: &Path) -> Result<Self> {
        match Self::get(label, Some(default_path)) {
            Ok(config) => Ok(config),
            Err(_) => {
                let config = Self::get(label, Some(fallback))?;
                // 快取一份到預設位置，之後的執行不再依賴工作目錄
                config.save(label, Some(default_path))?;
                Ok(config)
            }
        }
    }

    /// Credential merge for the `config` subcommand: one half of the pair
    /// may be updated while the other is kept from the saved entry.
    /// Returns false when a half was given but nothing exists to complete
    /// it.
    pub fn merge_credentials(&mut self, user: Option<&str>, password: Option<&str>) -> bool {
        match (user, password, self.auth.take()) {
            (Some(u), Some(p), _) => {
                self.auth = Some((u.to_string(), p.to_string()));
                true
            }
            (Some(u), None, Some((_, p))) => {
                self.auth = Some((u.to_string(), p));
                true
            }
            (None, Some(p), Some((u, _))) => {
                self.auth = Some((u, p.to_string()));
                true
            }
            (None, None, existing) => {
                self.auth = existing;
                true
            }
            (_, _, None) => false,
        }
    }
}

fn load_store(path: &Path) -> Result<BTreeMap<String, ServerConfig>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// 檔案不存在視為空的 store，但已損壞的內容不能默默覆蓋掉
fn load_store_or_empty(path: &Path) -> Result<BTreeMap<String, ServerConfig>> {
    if path.exists() {
        load_store(path)
    } else {
        Ok(BTreeMap::new())
    }
}

impl TargetProvider for ServerConfig {
    fn base_url(&self) -> &str {
        &self.url
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        self.auth
            .as_ref()
            .map(|(user, pass)| (user.as_str(), pass.as_str()))
    }

    fn verify_ssl(&self) -> bool {
        self.verify
    }
}
