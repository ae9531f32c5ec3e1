//! Build, sign, seal and fee-bump transactions through the public API only.
use stellar_txkit::{
    domain::{StellarTransaction, TransactionBuilder, TransactionPreconditions},
    models::{
        Asset, EnvelopeType, Keypair, Memo, Network, Operation, OperationBody, ReadXdr,
        SignatureError, TimeBounds, TransactionEnvelope, TransactionError,
    },
    utils::{base64_encode, from_fixed_point, to_fixed_point},
};

fn keypair(byte: u8) -> Keypair {
    Keypair::from_raw_seed(&[byte; 32])
}

fn payment_transaction(source: &Keypair, destination: &Keypair) -> StellarTransaction {
    let amount = to_fixed_point("12.5").unwrap();
    TransactionBuilder::new(source.muxed_account(None), 1_001, 100)
        .add_operation(
            Operation::payment(destination.muxed_account(None), Asset::Native, amount).unwrap(),
        )
        .memo(Memo::text("invoice 42").unwrap())
        .time_bounds(TimeBounds {
            min_time: 0,
            max_time: 1_900_000_000,
        })
        .build()
        .unwrap()
}

#[test]
fn test_sign_seal_and_decode() {
    let network = Network::testnet();
    let source = keypair(7);
    let destination = keypair(8);

    let mut tx = payment_transaction(&source, &destination);
    assert_eq!(tx.fee(), 100);
    tx.sign(&source, &network).unwrap();

    let sealed = tx.clone().seal().unwrap();
    assert_eq!(sealed.hash(&network), tx.hash(&network));

    let decoded = TransactionEnvelope::from_xdr_base64(&sealed.to_xdr_base64()).unwrap();
    assert_eq!(decoded.envelope_type(), EnvelopeType::Tx);
    assert_eq!(decoded.signatures().len(), 1);

    let reloaded = StellarTransaction::from_envelope(decoded);
    assert_eq!(reloaded, tx);
    assert_eq!(reloaded.hash(&network), tx.hash(&network));
    assert!(source.verify(&tx.hash(&network).0, &reloaded.signatures()[0].signature));

    let payment = &reloaded.transaction().unwrap().operations[0];
    match &payment.body {
        OperationBody::Payment(op) => {
            assert_eq!(from_fixed_point(op.amount), "12.5");
        }
        other => panic!("expected a payment, got {other:?}"),
    }
}

#[test]
fn test_signatures_are_network_bound() {
    let source = keypair(7);
    let destination = keypair(8);
    let mut tx = payment_transaction(&source, &destination);
    tx.sign(&source, &Network::public()).unwrap();

    let testnet_hash = tx.hash(&Network::testnet());
    assert!(!source.verify(&testnet_hash.0, &tx.signatures()[0].signature));
}

#[test]
fn test_multi_party_signing_through_unsigned_envelope() {
    let network = Network::testnet();
    let source = keypair(7);
    let cosigner = keypair(9);
    let destination = keypair(8);

    let tx = payment_transaction(&source, &destination);
    let unsigned = tx.unsigned_envelope_xdr().unwrap();

    // the cosigner works on their own decoded copy
    let theirs = StellarTransaction::from_envelope_xdr_base64(&unsigned).unwrap();
    let raw = cosigner.sign(&theirs.hash(&network).0).unwrap();

    let mut ours = tx;
    ours.sign(&source, &network).unwrap();
    ours.add_signature(&cosigner.address(), &base64_encode(&raw), &network)
        .unwrap();
    assert_eq!(ours.signatures().len(), 2);
    assert_eq!(ours.signatures()[1].hint, cosigner.signature_hint());

    // a signature over some other payload is refused
    let bogus = cosigner.sign(b"something else").unwrap();
    assert!(matches!(
        ours.add_signature(&cosigner.address(), &base64_encode(&bogus), &network),
        Err(TransactionError::Signature(SignatureError::InvalidSignature(_)))
    ));
    assert!(matches!(
        ours.unsigned_envelope_xdr(),
        Err(TransactionError::Signature(SignatureError::TooMany))
    ));
}

#[test]
fn test_fee_bump_of_signed_transaction() {
    let network = Network::testnet();
    let source = keypair(7);
    let payer = keypair(10);
    let destination = keypair(8);

    let mut inner = payment_transaction(&source, &destination);
    inner.sign(&source, &network).unwrap();

    let mut bump = inner.fee_bump(payer.muxed_account(None), Some(400)).unwrap();
    assert_eq!(bump.fee(), 800);
    assert_eq!(bump.source_account(), payer.muxed_account(None));
    bump.sign(&payer, &network).unwrap();

    let envelope = bump.seal().unwrap().into_envelope();
    match &envelope {
        TransactionEnvelope::TxFeeBump(env) => {
            let wrapped = env.tx.inner_envelope();
            assert_eq!(wrapped.signatures.len(), 1);
            assert_eq!(wrapped.signatures[0], inner.signatures()[0]);
        }
        other => panic!("expected a fee bump envelope, got {other:?}"),
    }
}

#[test]
fn test_v2_preconditions_survive_the_wire() {
    let source = keypair(7);
    let destination = keypair(8);
    let preconditions = TransactionPreconditions::default()
        .with_min_sequence_number(900)
        .with_min_sequence_ledger_gap(3);

    let tx = TransactionBuilder::new(source.muxed_account(None), 1_001, 100)
        .add_operation(
            Operation::payment(destination.muxed_account(None), Asset::Native, 1).unwrap(),
        )
        .preconditions(preconditions.clone())
        .build()
        .unwrap();

    let decoded =
        StellarTransaction::from_envelope_xdr_base64(&tx.unsigned_envelope_xdr().unwrap())
            .unwrap();
    assert_eq!(decoded.preconditions(), preconditions);
}
