mod common;

use anyhow::Result;
use common::{garbage, sealed_keys, LockedWallet, SplitTransport};
use xmtp_session::{
    Client, ClientError, ClientOptions, Envelope, IdentitySource, MemoryTransport, SigningKey,
    Topic, WalletKey,
};

async fn bootstrap(wallet: &WalletKey, records: Vec<Envelope>) -> Result<Client<MemoryTransport>> {
    let transport = MemoryTransport::new();
    for envelope in records {
        transport.seed(envelope).await;
    }
    Ok(Client::create_with_transport(wallet, transport, ClientOptions::default()).await?)
}

#[tokio::test]
async fn test_skips_corrupt_and_foreign_records() -> Result<()> {
    let alice = WalletKey::random();
    let bob = WalletKey::random();
    let store = Topic::UserPrivateStoreKeyBundle(alice.address());

    // Corrupt bytes, Bob's keys filed under Alice, then Alice's real keys
    let (_, bobs) = sealed_keys(&bob, &alice.address(), 2).await?;
    let (alices_keys, alices) = sealed_keys(&alice, &alice.address(), 3).await?;

    let client = bootstrap(&alice, vec![garbage(&store, 1), bobs, alices]).await?;

    assert_eq!(client.identity_source(), IdentitySource::Recovered);
    assert_eq!(client.keys(), &alices_keys);
    Ok(())
}

#[tokio::test]
async fn test_recovery_is_order_independent() -> Result<()> {
    let alice = WalletKey::random();
    let bob = WalletKey::random();
    let store = Topic::UserPrivateStoreKeyBundle(alice.address());

    let (_, bobs) = sealed_keys(&bob, &alice.address(), 2).await?;
    let (alices_keys, alices) = sealed_keys(&alice, &alice.address(), 3).await?;
    let records = [garbage(&store, 1), bobs, alices];

    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let shuffled = order.iter().map(|&i| records[i].clone()).collect();
        let client = bootstrap(&alice, shuffled).await?;

        assert_eq!(client.identity_source(), IdentitySource::Recovered, "order {:?}", order);
        assert_eq!(client.keys(), &alices_keys, "order {:?}", order);
    }
    Ok(())
}

#[tokio::test]
async fn test_first_decryptable_record_wins() -> Result<()> {
    let alice = WalletKey::random();
    let (first, first_envelope) = sealed_keys(&alice, &alice.address(), 1).await?;
    let (_, second_envelope) = sealed_keys(&alice, &alice.address(), 2).await?;

    let client = bootstrap(&alice, vec![first_envelope, second_envelope]).await?;
    assert_eq!(client.keys(), &first);
    Ok(())
}

#[tokio::test]
async fn test_empty_store_generates_attested_keys() -> Result<()> {
    let alice = WalletKey::random();
    let client = bootstrap(&alice, vec![]).await?;

    assert_eq!(client.identity_source(), IdentitySource::Generated);
    client.public_key_bundle()?.verify(&alice.address())?;

    // Nothing is written back unless asked for
    let store = Topic::UserPrivateStoreKeyBundle(alice.address());
    assert!(client.transport().envelopes(&store).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_only_bad_records_generates() -> Result<()> {
    let alice = WalletKey::random();
    let bob = WalletKey::random();
    let store = Topic::UserPrivateStoreKeyBundle(alice.address());
    let (bobs_keys, bobs) = sealed_keys(&bob, &alice.address(), 2).await?;
    let future_version = Envelope::new(&store, 3, br#"{"v2": {"ciphertext": "AA=="}}"#.to_vec());

    let client = bootstrap(&alice, vec![garbage(&store, 1), bobs, future_version]).await?;

    assert_eq!(client.identity_source(), IdentitySource::Generated);
    assert_ne!(client.keys(), &bobs_keys);
    client.public_key_bundle()?.verify(&alice.address())?;
    Ok(())
}

#[tokio::test]
async fn test_generation_failure_is_fatal() -> Result<()> {
    let wallet = LockedWallet {
        address: WalletKey::random().address(),
    };

    let result =
        Client::create_with_transport(&wallet, MemoryTransport::new(), ClientOptions::default())
            .await;
    assert!(matches!(result, Err(ClientError::Identity(_))));
    Ok(())
}

#[tokio::test]
async fn test_persisted_identity_survives_sessions() -> Result<()> {
    let alice = WalletKey::random();
    let transport = MemoryTransport::new();

    let first =
        Client::create_with_transport(&alice, transport.clone(), ClientOptions::default()).await?;
    assert_eq!(first.identity_source(), IdentitySource::Generated);
    first.persist_private_keys(&alice).await?;

    let second =
        Client::create_with_transport(&alice, transport.clone(), ClientOptions::default()).await?;
    assert_eq!(second.identity_source(), IdentitySource::Recovered);
    assert_eq!(second.keys(), first.keys());
    Ok(())
}

#[tokio::test]
async fn test_unpersisted_sessions_diverge() -> Result<()> {
    let alice = WalletKey::random();
    let transport = MemoryTransport::new();

    let first =
        Client::create_with_transport(&alice, transport.clone(), ClientOptions::default()).await?;
    let second =
        Client::create_with_transport(&alice, transport.clone(), ClientOptions::default()).await?;

    assert_eq!(second.identity_source(), IdentitySource::Generated);
    assert_ne!(second.keys(), first.keys());
    Ok(())
}

#[tokio::test]
async fn test_cannot_persist_for_another_account() -> Result<()> {
    let alice = WalletKey::random();
    let client = bootstrap(&alice, vec![]).await?;

    let result = client.persist_private_keys(&WalletKey::random()).await;
    assert!(matches!(result, Err(ClientError::Identity(_))));
    Ok(())
}

#[tokio::test]
async fn test_unreadable_store_is_not_written_to() -> Result<()> {
    let wallet = WalletKey::random();
    let relay = MemoryTransport::new();
    let store = Topic::UserPrivateStoreKeyBundle(wallet.address());
    let options = ClientOptions {
        persist_generated_keys: true,
        ..Default::default()
    };

    let first = Client::create_with_transport(&wallet, relay.clone(), options.clone()).await?;
    assert_eq!(first.identity_source(), IdentitySource::Generated);
    assert_eq!(relay.envelopes(&store).await.len(), 1);

    // The query drops but publishes still go through
    let flaky = SplitTransport {
        inner: relay.clone(),
        fail_query: true,
        fail_publish: false,
    };
    let second = Client::create_with_transport(&wallet, flaky, options.clone()).await?;
    assert_eq!(second.identity_source(), IdentitySource::Generated);
    assert_eq!(relay.envelopes(&store).await.len(), 1);

    // Once the store is readable again the original identity comes back
    let third = Client::create_with_transport(&wallet, relay.clone(), options).await?;
    assert_eq!(third.identity_source(), IdentitySource::Recovered);
    assert_eq!(third.keys(), first.keys());
    Ok(())
}

#[tokio::test]
async fn test_failed_persist_does_not_fail_bootstrap() -> Result<()> {
    let wallet = WalletKey::random();
    let relay = MemoryTransport::new();
    let options = ClientOptions {
        persist_generated_keys: true,
        ..Default::default()
    };

    let read_only = SplitTransport {
        inner: relay.clone(),
        fail_query: false,
        fail_publish: true,
    };
    let client = Client::create_with_transport(&wallet, read_only, options).await?;
    assert_eq!(client.identity_source(), IdentitySource::Generated);
    assert!(relay
        .envelopes(&Topic::UserPrivateStoreKeyBundle(wallet.address()))
        .await
        .is_empty());
    Ok(())
}
