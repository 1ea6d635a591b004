//! Server configuration (command-line flags and environment variables).

use clap::Parser;

/// Hiroba chat server
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HIROBA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "HIROBA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Comma-separated allowed origins, or `*` for any origin
    #[arg(long, env = "HIROBA_CORS_ALLOWED", default_value = "*")]
    pub cors_allowed: String,

    /// SQLite database file (`:memory:` keeps everything in process)
    #[arg(long, env = "HIROBA_DATABASE_PATH", default_value = "hiroba.db")]
    pub database_path: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed origins, or `None` when any origin is accepted
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let value = self.cors_allowed.trim();
        if value.is_empty() || value == "*" {
            return None;
        }
        Some(
            value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed: "*".to_string(),
            database_path: "hiroba.db".to_string(),
            log_level: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_args() {
        // テスト項目: 引数なしでは既定値が使われる
        // when (操作):
        let config = ServerConfig::try_parse_from(["hiroba-server"]).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, ServerConfig::default().port);
        assert_eq!(config.cors_allowed, "*");
        assert_eq!(config.allowed_origins(), None);
        assert_eq!(config.database_path, ServerConfig::default().database_path);
    }

    #[test]
    fn test_flags_override_defaults() {
        // テスト項目: フラグで待ち受けアドレスと許可オリジンを指定できる
        // when (操作):
        let config = ServerConfig::try_parse_from([
            "hiroba-server",
            "--host",
            "127.0.0.1",
            "--port",
            "3000",
            "--cors-allowed",
            "http://localhost:5173, https://chat.example.com,",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(
            config.allowed_origins(),
            Some(vec![
                "http://localhost:5173".to_string(),
                "https://chat.example.com".to_string(),
            ])
        );
    }

    #[test]
    fn test_database_path_flag() {
        // テスト項目: データベースのパスをフラグで指定できる
        // when (操作):
        let config =
            ServerConfig::try_parse_from(["hiroba-server", "--database-path", "/var/lib/hiroba/chat.db"])
                .unwrap();

        // then (期待する結果):
        assert_eq!(config.database_path, "/var/lib/hiroba/chat.db");
    }

    #[test]
    fn test_blank_origin_list_means_any() {
        // テスト項目: 空の許可オリジンは任意のオリジンを許可する
        let config = ServerConfig {
            cors_allowed: "  ".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(config.allowed_origins(), None);
    }
}
