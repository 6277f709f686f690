use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 日付セルの既定位置（1始まりの行・列）
    pub date_cell: (u32, u32),
    /// 文字列セルを日付として解釈するときの既定フォーマット
    pub date_format: String,
    /// 連続性検査の既定しきい値（日数）
    pub discontinuity_days: i64,
    /// 行マーカー検索の既定開始行
    pub default_start_row: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AuditError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sheet-audit").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_cell: (1, 1),
            date_format: "%Y-%m-%d".into(),
            discontinuity_days: 7,
            default_start_row: 1,
        }
    }
}
