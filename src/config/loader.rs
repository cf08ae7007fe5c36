//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    ImportSettings,
};

/// ワークスペース設定ファイルの名前
const CONFIG_FILE_NAME: &str = ".i18n-import.json";

/// ワークスペースから設定を読み込む
///
/// `.i18n-import.json` ファイルを探して読み込む
///
/// # Arguments
/// * `workspace_root` - ワークスペースのルートパス
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<ImportSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: ImportSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// ワークスペース設定を解決する
///
/// 設定ファイルがなければデフォルト設定を使い、読み込んだ設定は
/// バリデーションを通す
///
/// # Errors
/// - ファイル読み込みまたはパースエラー
/// - バリデーションエラー
pub fn resolve_settings(workspace_root: &Path) -> Result<ImportSettings, ConfigError> {
    let settings = load_from_workspace(workspace_root)?.unwrap_or_default();
    settings.validate().map_err(ConfigError::ValidationErrors)?;
    Ok(settings)
}
