use anyhow::Result;
use std::env;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use xmtp_session::{Client, ClientOptions, Environment, IdentitySource, SigningKey, WalletKey};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <recovery_file_path> [--persist]", args[0]);
        eprintln!("Example: {} recovery.pkarr --persist", args[0]);
        std::process::exit(1);
    }

    print!("Enter passphrase: ");
    io::stdout().flush()?;
    let passphrase = rpassword::read_password()?;

    let recovery_file_bytes = std::fs::read(&args[1])?;
    let wallet = WalletKey::from_recovery_file(&recovery_file_bytes, Some(&passphrase))?;
    println!("Wallet address: {}", wallet.address());

    let mut options = ClientOptions::default();
    options.api.env = Environment::Local;
    options.api.is_secure = false;
    options.persist_generated_keys = args.iter().any(|arg| arg == "--persist");

    println!("Bootstrapping identity...");
    let client = Client::create(&wallet, options).await?;
    match client.identity_source() {
        IdentitySource::Recovered => println!("Recovered existing identity"),
        IdentitySource::Generated => println!("Generated a new identity"),
    }

    client.publish_user_contact().await?;
    println!("Published contact bundle");

    Ok(())
}
