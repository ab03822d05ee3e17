/// Name of the environment variable containing the path to the configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/folreport/config.toml` or `$HOME/.config/folreport/config.toml`
///  (2) on Windows: `%APPDATA%\folreport\config.toml`
pub const ENV_CONFIG_PATH: &str = "FOLREPORT_CONFIG";

/// Directory and file name of the default configuration location.
pub const CONFIG_DIR_NAME: &str = "folreport";
pub const CONFIG_FILE_NAME: &str = "config.toml";
