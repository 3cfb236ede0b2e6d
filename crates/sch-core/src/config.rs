use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// Every option can be given as a flag or through its environment
/// variable. Flags take precedence. Defaults target local development.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "School directory HTTP backend")]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
    /// Number of actix worker threads.
    #[arg(long, env = "WORKERS", default_value_t = 4)]
    pub workers: usize,
    /// Full connection string; overrides the individual database options.
    #[arg(long, env = "DB_URL")]
    pub db_url: Option<String>,
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,
    #[arg(long, env = "DB_PASSWORD", default_value = "123456")]
    pub db_password: String,
    #[arg(long, env = "DB_NAME", default_value = "school_db")]
    pub db_name: String,
    /// Connect timeout in seconds.
    #[arg(long, env = "DB_TIMEOUT", default_value_t = 60)]
    pub db_timeout: u64,
    /// Directory where uploaded images are stored.
    #[arg(long = "uploads", env = "UPLOADS_DIR", default_value = "uploads")]
    pub uploads: PathBuf,
    /// Install the schools table and its unique name index on startup.
    #[arg(long, env = "MIGRATE")]
    pub migrate: bool,
    /// Serve from an in-memory store instead of PostgreSQL.
    #[arg(long, env = "MEMORY")]
    pub memory: bool,
}

impl Config {
    /// Socket address string for the HTTP listener.
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout)
    }

    /// Connection string understood by `tokio_postgres`.
    /// Uses `db_url` verbatim when present, otherwise the key/value form.
    /// The connect timeout is applied separately, see [`Config::timeout`].
    pub fn db_url(&self) -> String {
        match self.db_url {
            Some(ref url) => url.clone(),
            None => format!(
                "host={} port={} user={} password={} dbname={}",
                quote(&self.db_host),
                self.db_port,
                quote(&self.db_user),
                quote(&self.db_password),
                quote(&self.db_name),
            ),
        }
    }
}

/// Quote a value for the key/value connection string format.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("backend").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn flags_build_key_value_url() {
        let config = parse(&[
            "--db-host", "db.local",
            "--db-port", "6543",
            "--db-user", "admin",
            "--db-password", "s3cret",
            "--db-name", "schools",
            "--db-timeout", "5",
        ]);
        assert_eq!(
            config.db_url(),
            "host='db.local' port=6543 user='admin' password='s3cret' dbname='schools'"
        );
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn explicit_url_wins() {
        let config = parse(&["--db-url", "postgres://u:p@h/d", "--db-host", "ignored", "--db-timeout", "5"]);
        assert_eq!(config.db_url(), "postgres://u:p@h/d");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("two words"), "'two words'");
    }

    #[test]
    fn bind_joins_host_and_port() {
        let config = parse(&["--host", "127.0.0.1", "--port", "8080"]);
        assert_eq!(config.bind(), "127.0.0.1:8080");
    }

    #[test]
    fn switches_parse() {
        let config = parse(&["--migrate", "--memory", "--uploads", "/tmp/img"]);
        assert!(config.migrate);
        assert!(config.memory);
        assert_eq!(config.uploads, PathBuf::from("/tmp/img"));
    }
}
