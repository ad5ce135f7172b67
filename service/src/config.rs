use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;

/// Default security token time-to-live in seconds when no container-specific value is set.
pub const DEFAULT_SECURITY_TOKEN_TTL_SECS: u32 = 3600;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// How token payloads are protected on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCrypter {
    /// Claims are encrypted and authenticated (AES-256-GCM).
    Encrypted,
    /// Claims are signed but readable by the bearer (HMAC-SHA256).
    Signed,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TokenCrypterParseError;

impl FromStr for TokenCrypter {
    type Err = TokenCrypterParseError;
    fn from_str(kind: &str) -> Result<TokenCrypter, Self::Err> {
        match kind.to_lowercase().as_str() {
            "encrypted" => Ok(TokenCrypter::Encrypted),
            "signed" => Ok(TokenCrypter::Signed),
            _ => Err(TokenCrypterParseError),
        }
    }
}

impl fmt::Display for TokenCrypter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenCrypter::Encrypted => write!(f, "encrypted"),
            TokenCrypter::Signed => write!(f, "signed"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Default security token time-to-live in seconds, used for containers without
    /// their own entry in `container_token_ttls` (gadgets.securityTokenTTL).
    #[arg(long, env, default_value_t = DEFAULT_SECURITY_TOKEN_TTL_SECS)]
    pub security_token_ttl: u32,

    /// Per-container token time-to-lives as a comma separated list of container=seconds.
    #[arg(long, env, value_delimiter = ',', use_value_delimiter = true)]
    container_token_ttls: Vec<String>,

    /// Per-container token keys as a comma separated list of container=<64 hex chars>.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        hide_env_values = true,
        value_parser = clap::builder::NonEmptyStringValueParser::new().map(SecretString::new),
    )]
    container_token_keys: Vec<SecretString>,

    /// Seconds of clock skew tolerated when checking token age.
    #[arg(long, env, default_value_t = 0)]
    pub token_clock_skew_secs: u32,

    /// How token payloads are protected: encrypted or signed.
    #[arg(
        long,
        env,
        default_value_t = TokenCrypter::Encrypted,
        value_parser = clap::builder::PossibleValuesParser::new([
            "ENCRYPTED", "SIGNED", "encrypted", "signed"
        ])
            .map(|s| s.parse::<TokenCrypter>().unwrap()),
    )]
    pub token_crypter: TokenCrypter,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Per-container TTL entries, formatted as container=seconds.
    pub fn container_token_ttls(&self) -> &[String] {
        &self.container_token_ttls
    }

    pub fn set_container_token_ttls(mut self, entries: Vec<String>) -> Self {
        self.container_token_ttls = entries;
        self
    }

    /// Per-container key entries, formatted as container=<hex key>.
    pub fn container_token_keys(&self) -> &[SecretString] {
        &self.container_token_keys
    }

    pub fn set_container_token_keys(mut self, entries: Vec<String>) -> Self {
        self.container_token_keys = entries.into_iter().map(SecretString::new).collect();
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["gadget_token_rs"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.security_token_ttl, DEFAULT_SECURITY_TOKEN_TTL_SECS);
        assert_eq!(config.token_clock_skew_secs, 0);
        assert_eq!(config.token_crypter, TokenCrypter::Encrypted);
        assert!(config.container_token_ttls().is_empty());
    }

    #[test]
    fn test_container_lists_are_comma_delimited() {
        let config = parse(&[
            "--container-token-ttls",
            "acme=3600,globex=60",
            "--container-token-keys",
            "acme=00,globex=11",
        ]);
        assert_eq!(
            config.container_token_ttls(),
            &["acme=3600".to_string(), "globex=60".to_string()]
        );
        assert_eq!(config.container_token_keys().len(), 2);
        assert_eq!(
            config.container_token_keys()[1].expose_secret(),
            "globex=11"
        );
    }

    #[test]
    fn test_debug_output_redacts_keys() {
        let config = parse(&["--container-token-keys", "acme=deadbeef"]);
        assert!(!format!("{config:?}").contains("deadbeef"));
    }

    #[test]
    fn test_token_crypter_parses_case_insensitively() {
        let config = parse(&["--token-crypter", "SIGNED"]);
        assert_eq!(config.token_crypter, TokenCrypter::Signed);
    }

    #[test]
    fn test_token_crypter_display_round_trips() {
        for crypter in [TokenCrypter::Encrypted, TokenCrypter::Signed] {
            assert_eq!(crypter.to_string().parse::<TokenCrypter>(), Ok(crypter));
        }
    }

    #[test]
    fn test_rust_env_from_str() {
        assert_eq!("Production".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("nope".parse::<RustEnv>(), Err(RustEnvParseError));
    }

    #[test]
    fn test_setters_replace_entries() {
        let config = parse(&[])
            .set_container_token_ttls(vec!["acme=10".to_string()])
            .set_container_token_keys(vec!["acme=ab".to_string()]);
        assert_eq!(config.container_token_ttls(), &["acme=10".to_string()]);
        assert_eq!(config.container_token_keys().len(), 1);
    }
}
