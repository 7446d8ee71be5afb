use crate::errors::AppError;
use std::env;
use std::net::SocketAddr;

/// 永続化バックエンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StorageBackend::DynamoDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "unknown STORAGE_BACKEND: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub dynamodb_table: String,
    /// DynamoDB Local などの接続先（未指定なら AWS の既定エンドポイント）
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    pub environment: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる（テスト用に分離）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => StorageBackend::parse(&value)?,
            None => StorageBackend::DynamoDb,
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| AppError::Configuration(format!("invalid PORT: {value}")))?,
            None => 4567,
        };

        Ok(Config {
            storage_backend,
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or_else(|| "todos".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|s| !s.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "ap-northeast-1".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| AppError::Configuration(format!("invalid HOST: {}", self.host)))
    }

    /// 開発環境ではエラー詳細をレスポンスに含める
    pub fn include_error_details(&self) -> bool {
        matches!(self.environment.as_str(), "dev" | "local")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.storage_backend, StorageBackend::DynamoDb);
        assert_eq!(config.dynamodb_table, "todos");
        assert_eq!(config.dynamodb_endpoint, None);
        assert_eq!(config.port, 4567);
        assert!(config.include_error_details());
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:4567");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("ENVIRONMENT", "prod"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert!(!config.include_error_details());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        let bad_port = Config::from_lookup(lookup_from(&[("PORT", "eighty")]));
        let bad_backend = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "mongo")]));

        assert!(matches!(bad_port, Err(AppError::Configuration(_))));
        assert!(matches!(bad_backend, Err(AppError::Configuration(_))));
    }
}
