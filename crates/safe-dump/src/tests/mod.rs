use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use multisend::{decode_multi_send_call, decode_multi_send_data, MULTI_SEND_CALL_ONLY_V1_3_0};
use safe_multisig::{gateway::AddressInfo, SafeOverview, SafeTransactionData, SignedSafeTransaction};

use crate::{
    adapters::{MockSafeProtocol, MockWalletTransport, WalletSession, WalletTransport},
    dump::{DumpError, DumpPlan, DumpState, Dumper},
};

const CHAIN_ID: u64 = 11155111;
const OWNER: Address = Address::repeat_byte(0xee);

/// Gateway summary of `safe` owned by [`OWNER`] and enough co-owners to reach `threshold`.
pub(crate) fn overview(safe: Address, threshold: u64) -> SafeOverview {
    let owners = std::iter::once(OWNER)
        .chain((1..threshold).map(|i| Address::with_last_byte(i as u8)))
        .map(|value| AddressInfo { value, name: None, logo_uri: None })
        .collect();

    SafeOverview {
        address: AddressInfo { value: safe, name: None, logo_uri: None },
        chain_id: CHAIN_ID.to_string(),
        threshold,
        owners,
        fiat_total: Some("0.00".to_string()),
        queued: 0,
        awaiting_confirmation: None,
    }
}

fn protocol() -> MockSafeProtocol {
    let mut protocol = MockSafeProtocol::new();
    protocol.expect_create_swap_owner_tx().returning(|safe, old_owner, _| {
        assert_eq!(old_owner, OWNER);
        Ok(SafeTransactionData::call(safe, Bytes::from(safe.to_vec()), U256::ZERO))
    });
    protocol.expect_sign_transaction().returning(|safe, tx| {
        Ok(SignedSafeTransaction { safe, tx, signatures: Bytes::from(vec![0x1b; 65]) })
    });
    protocol
}

fn connected_wallet() -> MockWalletTransport {
    let mut wallet = MockWalletTransport::new();
    wallet
        .expect_session()
        .return_const(Some(WalletSession { chain_id: CHAIN_ID, address: OWNER }));
    wallet
}

/// Safes targeted by a `multiSend(bytes)` calldata, in batch order.
fn batch_targets(calldata: &[u8]) -> Vec<Address> {
    let payload = decode_multi_send_call(calldata).unwrap();
    decode_multi_send_data(&payload).unwrap().into_iter().map(|tx| tx.to).collect()
}

#[tokio::test]
async fn multisig_safes_are_left_out_of_the_batch() {
    let a = Address::repeat_byte(0xa1);
    let b = Address::repeat_byte(0xb2);

    let plan = DumpPlan::partition([overview(a, 1), overview(b, 2)]);
    assert_eq!(plan.eligible_addresses(), vec![a]);
    assert_eq!(plan.excluded.len(), 1);
    assert_eq!(plan.excluded[0].safe_address(), b);

    let mut wallet = connected_wallet();
    wallet
        .expect_send_transaction()
        .withf(move |to, calldata| {
            *to == MULTI_SEND_CALL_ONLY_V1_3_0 && batch_targets(calldata) == vec![a]
        })
        .times(1)
        .returning(|_, _| Ok(B256::repeat_byte(0x42)));

    let mut dumper = Dumper::new(protocol(), wallet);
    let tx_hash = dumper.submit(&plan).await.unwrap();

    assert_eq!(tx_hash, B256::repeat_byte(0x42));
    assert_eq!(dumper.state(), &DumpState::Success(tx_hash));
}

#[tokio::test]
async fn misplaced_multisig_safe_is_never_built() {
    let a = Address::repeat_byte(0xa1);
    let b = Address::repeat_byte(0xb2);

    let mut protocol = MockSafeProtocol::new();
    protocol
        .expect_create_swap_owner_tx()
        .withf(move |safe, _, _| *safe == a)
        .times(1)
        .returning(|safe, _, _| Ok(SafeTransactionData::call(safe, Bytes::new(), U256::ZERO)));
    protocol.expect_sign_transaction().returning(|safe, tx| {
        Ok(SignedSafeTransaction { safe, tx, signatures: Bytes::from(vec![0x1b; 65]) })
    });

    let mut wallet = connected_wallet();
    wallet
        .expect_send_transaction()
        .withf(move |_, calldata| batch_targets(calldata) == vec![a])
        .times(1)
        .returning(|_, _| Ok(B256::ZERO));

    let plan = DumpPlan { eligible: vec![overview(a, 1), overview(b, 3)], excluded: vec![] };

    Dumper::new(protocol, wallet).submit(&plan).await.unwrap();
}

#[tokio::test]
async fn batch_preserves_selection_order() {
    let safes = [Address::repeat_byte(3), Address::repeat_byte(1), Address::repeat_byte(2)];
    let plan = DumpPlan::partition(safes.iter().map(|safe| overview(*safe, 1)));

    let mut dumper = Dumper::new(protocol(), connected_wallet());
    let batch = dumper.prepare(&plan).await.unwrap();

    assert_eq!(batch.to, MULTI_SEND_CALL_ONLY_V1_3_0);
    assert_eq!(batch_targets(&batch.calldata), safes.to_vec());
    assert_eq!(batch.transactions.len(), 3);
    assert_eq!(dumper.state(), &DumpState::Idle);
}

#[tokio::test]
async fn signing_failure_aborts_the_whole_batch() {
    let safes = [Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3)];
    let failing = safes[1];

    let mut protocol = MockSafeProtocol::new();
    protocol
        .expect_create_swap_owner_tx()
        .returning(|safe, _, _| Ok(SafeTransactionData::call(safe, Bytes::new(), U256::ZERO)));
    protocol.expect_sign_transaction().returning(move |safe, tx| {
        if safe == failing {
            return Err(eyre::eyre!("User rejected the request.\n\nDetails: denied by user"));
        }
        Ok(SignedSafeTransaction { safe, tx, signatures: Bytes::from(vec![0x1b; 65]) })
    });

    let mut wallet = connected_wallet();
    wallet.expect_send_transaction().never();

    let plan = DumpPlan::partition(safes.iter().map(|safe| overview(*safe, 1)));
    let mut dumper = Dumper::new(protocol, wallet);

    let err = dumper.submit(&plan).await.unwrap_err();

    assert!(matches!(err, DumpError::Sign { safe, .. } if safe == failing));
    assert_eq!(err.short_message(), "User rejected the request.");
    assert_eq!(dumper.state(), &DumpState::Failed("User rejected the request.".to_string()));
}

#[tokio::test]
async fn nothing_eligible_never_reaches_the_wallet() {
    let mut protocol = MockSafeProtocol::new();
    protocol.expect_create_swap_owner_tx().never();
    protocol.expect_sign_transaction().never();

    let mut wallet = connected_wallet();
    wallet.expect_send_transaction().never();

    let mut dumper = Dumper::new(protocol, wallet);

    let empty = DumpPlan::default();
    assert!(matches!(dumper.submit(&empty).await, Err(DumpError::NothingToDump)));

    let only_multisig = DumpPlan::partition([overview(Address::repeat_byte(9), 2)]);
    assert!(!only_multisig.is_submittable());
    assert!(matches!(dumper.submit(&only_multisig).await, Err(DumpError::NothingToDump)));

    assert_eq!(dumper.state(), &DumpState::Idle);
}

#[tokio::test]
async fn disconnected_wallet_is_rejected() {
    let mut wallet = MockWalletTransport::new();
    wallet.expect_session().return_const(None::<WalletSession>);
    wallet.expect_send_transaction().never();

    let plan = DumpPlan::partition([overview(Address::repeat_byte(1), 1)]);
    let mut dumper = Dumper::new(MockSafeProtocol::new(), wallet);

    assert!(matches!(dumper.submit(&plan).await, Err(DumpError::WalletNotConnected)));
}

#[tokio::test]
async fn failed_broadcast_can_be_retried() {
    let mut wallet = connected_wallet();
    let mut seq = mockall::Sequence::new();
    wallet
        .expect_send_transaction()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(eyre::eyre!("insufficient funds for gas * price + value")));
    wallet
        .expect_send_transaction()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(B256::repeat_byte(7)));

    let plan = DumpPlan::partition([overview(Address::repeat_byte(1), 1)]);
    let mut dumper = Dumper::new(protocol(), wallet);

    let err = dumper.submit(&plan).await.unwrap_err();
    assert!(matches!(err, DumpError::Broadcast(_)));
    assert_eq!(
        dumper.state(),
        &DumpState::Failed("insufficient funds for gas * price + value".to_string())
    );

    assert_eq!(dumper.submit(&plan).await.unwrap(), B256::repeat_byte(7));
}

#[tokio::test]
async fn unsupported_chain_version_fails_at_encoding() {
    let mut wallet = connected_wallet();
    wallet.expect_send_transaction().never();

    let plan = DumpPlan::partition([overview(Address::repeat_byte(1), 1)]);
    let mut dumper = Dumper::new(protocol(), wallet).with_safe_version("1.4.1");

    let err = dumper.submit(&plan).await.unwrap_err();
    assert!(matches!(err, DumpError::Encode(_)));
}

/// Wallet whose broadcast never completes.
struct StalledWallet;

#[async_trait]
impl WalletTransport for StalledWallet {
    fn session(&self) -> Option<WalletSession> {
        Some(WalletSession { chain_id: CHAIN_ID, address: OWNER })
    }

    async fn refresh(&mut self) -> eyre::Result<bool> {
        Ok(false)
    }

    async fn send_transaction(&self, _to: Address, _data: Bytes) -> eyre::Result<B256> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn abandoned_submission_leaves_dumper_idle() {
    let safe = Address::repeat_byte(1);
    let plan = DumpPlan::partition([overview(safe, 1)]);
    let mut dumper = Dumper::new(protocol(), StalledWallet);

    let timed_out = tokio::time::timeout(Duration::from_millis(50), dumper.submit(&plan)).await;
    assert!(timed_out.is_err());
    assert_eq!(dumper.state(), &DumpState::Idle);

    let batch = dumper.prepare(&plan).await.unwrap();
    assert_eq!(batch_targets(&batch.calldata), vec![safe]);
}

#[tokio::test]
async fn batch_entries_call_exec_transaction_on_each_safe() {
    let safes = [Address::repeat_byte(1), Address::repeat_byte(2)];
    let plan = DumpPlan::partition(safes.iter().map(|safe| overview(*safe, 1)));

    let batch = Dumper::new(protocol(), connected_wallet()).prepare(&plan).await.unwrap();

    for (tx, safe) in batch.transactions.iter().zip(safes) {
        assert_eq!(tx.to, safe);
        assert_eq!(tx.value, U256::ZERO);
        // execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)
        assert_eq!(tx.data[..4], [0x6a, 0x76, 0x12, 0x02]);
    }
}
