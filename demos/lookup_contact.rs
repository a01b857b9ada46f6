use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;
use xmtp_session::{Client, ClientOptions, Environment, WalletKey};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <peer_address>", args[0]);
        std::process::exit(1);
    }

    let mut options = ClientOptions::default();
    options.api.env = Environment::Local;
    options.api.is_secure = false;

    // A throwaway wallet is enough for reading the directory
    let client = Client::create(&WalletKey::random(), options).await?;

    match client.get_user_contact(&args[1]).await? {
        Some(contact) => {
            let keys = contact.key_bundle();
            let created = chrono::DateTime::from_timestamp_nanos(keys.identity_key.key.created_ns as i64);
            println!("Identity key: {}", hex::encode(keys.identity_key.key_bytes()));
            println!("  Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
            println!("Pre-key: {}", hex::encode(keys.pre_key.key_bytes()));
            match keys.verify(&args[1]) {
                Ok(()) => println!("  Verified: true"),
                Err(e) => println!("  Verified: false ({})", e),
            }
        }
        None => println!("No contact published for {}", args[1]),
    }

    Ok(())
}
