use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub token_secret: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            table_name: env::var("TABLE_NAME").unwrap_or_else(|_| "todo-table".to_string()),
            token_secret: env::var("TOKEN_SECRET")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
        })
    }
}
