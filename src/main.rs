use clap::{Parser, Subcommand};
use domain::error::{DomainErrorKind, Error, InternalErrorKind};
use domain::security_token::SecurityTokens;
use domain::ClaimSet;
use dotenvy::dotenv;
use log::*;
use service::{config::Config, logging::Logger};

#[derive(Parser)]
#[command(name = "gadget_token_rs")]
#[command(about = "Mint and verify gadget security tokens")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mint a token for a gadget and print it to stdout
    Mint(MintArgs),
    /// Verify a token and print its claims as JSON
    Verify {
        /// The token handed back by the gadget
        #[arg(long)]
        token: String,

        /// Rebind the verified claims to this request URL
        #[arg(long)]
        active_url: Option<String>,
    },
    /// Print the effective token TTL in seconds for a container
    Ttl {
        #[arg(long)]
        container: String,
    },
}

#[derive(clap::Args)]
struct MintArgs {
    #[arg(long)]
    owner: String,

    #[arg(long)]
    viewer: String,

    #[arg(long)]
    app: String,

    #[arg(long)]
    container: String,

    #[arg(long, default_value = "")]
    app_url: String,

    #[arg(long, default_value_t = 0)]
    module_id: i64,

    #[arg(long, default_value = "")]
    domain: String,

    #[arg(long)]
    active_url: Option<String>,

    /// Opaque JSON passed through to the gadget untouched
    #[arg(long)]
    trusted_json: Option<String>,

    #[arg(long)]
    anonymous: bool,

    /// Print the token with its container and TTL as JSON
    #[arg(long)]
    json: bool,
}

impl MintArgs {
    fn claims(&self) -> ClaimSet {
        let mut builder = ClaimSet::builder()
            .owner_id(&self.owner)
            .viewer_id(&self.viewer)
            .app_id(&self.app)
            .app_url(&self.app_url)
            .module_id(self.module_id)
            .container(&self.container)
            .domain(&self.domain)
            .anonymous(self.anonymous);
        if let Some(active_url) = &self.active_url {
            builder = builder.active_url(active_url);
        }
        if let Some(trusted_json) = &self.trusted_json {
            builder = builder.trusted_json(trusted_json);
        }
        builder.build()
    }
}

fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    Logger::init_logger(&cli.config);

    info!(
        "Starting gadget_token_rs [{}] in {} mode",
        env!("CARGO_PKG_VERSION"),
        cli.config.runtime_env()
    );

    let tokens = match SecurityTokens::from_config(&cli.config) {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("Failed to configure security tokens: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&tokens, cli.command) {
        match e.error_kind {
            DomainErrorKind::Token(_) => error!("Token operation failed: {e}"),
            DomainErrorKind::Internal(_) => error!("Internal error: {e}"),
        }
        std::process::exit(1);
    }
}

fn run(tokens: &SecurityTokens, command: Command) -> Result<(), Error> {
    match command {
        Command::Mint(args) => {
            let minted = tokens.mint(&args.claims())?;
            if args.json {
                println!("{}", to_json(&minted)?);
            } else {
                println!("{}", minted.token);
            }
        }
        Command::Verify { token, active_url } => {
            let claims = tokens.verify(&token, active_url.as_deref())?;
            println!("{}", to_json(&claims)?);
        }
        Command::Ttl { container } => {
            println!("{}", tokens.ttl_seconds(&container));
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "failed to serialize output".to_string(),
        )),
    })
}
