use anyhow::Result;
use bip39::Mnemonic;
use xmtp_session::{
    Client, ClientOptions, IdentitySource, Language, MemoryTransport, SigningKey, WalletKey,
};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn test_recovery_phrase_is_deterministic() -> Result<()> {
    let wallet1 = WalletKey::from_recovery_phrase(MNEMONIC, None, None)?;
    let wallet2 = WalletKey::from_recovery_phrase(MNEMONIC, None, Some(Language::English))?;

    assert_eq!(wallet1.address(), wallet2.address());
    Ok(())
}

#[test]
fn test_passphrase_changes_address() -> Result<()> {
    let plain = WalletKey::from_recovery_phrase(MNEMONIC, None, None)?;
    let salted = WalletKey::from_recovery_phrase(MNEMONIC, Some("my_secure_passphrase"), None)?;
    let salted_again =
        WalletKey::from_recovery_phrase(MNEMONIC, Some("my_secure_passphrase"), None)?;

    assert_ne!(plain.address(), salted.address());
    assert_eq!(salted.address(), salted_again.address());
    Ok(())
}

#[test]
fn test_invalid_recovery_phrases() {
    let invalid_cases = vec![
        "invalid mnemonic phrase here",
        "abandon abandon abandon",
        "",
        "ABANDON ABANDON ABANDON ABANDON ABANDON ABANDON ABANDON ABANDON ABANDON ABANDON ABANDON ABOUT",
    ];

    for phrase in invalid_cases {
        assert!(
            WalletKey::from_recovery_phrase(phrase, None, None).is_err(),
            "Should fail for invalid mnemonic: '{}'",
            phrase
        );
    }
}

#[test]
fn test_generated_mnemonic_round_trip() -> Result<()> {
    let mnemonic = Mnemonic::from_entropy(&[7u8; 16])
        .map_err(|e| anyhow::anyhow!("Failed to generate mnemonic: {}", e))?;
    let wallet1 = WalletKey::from_recovery_phrase(&mnemonic.to_string(), None, None)?;
    let wallet2 = WalletKey::from_recovery_phrase(&mnemonic.to_string(), None, None)?;

    assert_eq!(wallet1.address(), wallet2.address());
    Ok(())
}

#[test]
fn test_bad_recovery_file_is_rejected() {
    assert!(WalletKey::from_recovery_file(b"definitely not a recovery file", Some("pw")).is_err());
}

#[tokio::test]
async fn test_restored_wallet_recovers_stored_identity() -> Result<()> {
    let transport = MemoryTransport::new();

    // First device: generate and persist
    let device1 = WalletKey::from_recovery_phrase(MNEMONIC, None, None)?;
    let options = ClientOptions {
        persist_generated_keys: true,
        ..Default::default()
    };
    let first = Client::create_with_transport(&device1, transport.clone(), options).await?;
    assert_eq!(first.identity_source(), IdentitySource::Generated);

    // Second device: same phrase, same identity
    let device2 = WalletKey::from_recovery_phrase(MNEMONIC, None, None)?;
    let second =
        Client::create_with_transport(&device2, transport.clone(), ClientOptions::default())
            .await?;
    assert_eq!(second.identity_source(), IdentitySource::Recovered);
    assert_eq!(second.keys(), first.keys());
    Ok(())
}
