use candela_core::config::AppConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// 环境变量前缀，嵌套字段以 `__` 分隔，例如 `CANDELA__MERGE__CAPACITY`。
pub const ENV_PREFIX: &str = "CANDELA";

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为底。
/// 2. 叠加可选的 TOML 文件，文件不存在时跳过。
/// 3. 叠加 `CANDELA__*` 环境变量。
///
/// # Arguments
/// * `path`: 配置文件路径。
///
/// # Returns
/// 合并后的配置；文件格式或字段类型错误时返回 `ConfigError`。
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()
}
