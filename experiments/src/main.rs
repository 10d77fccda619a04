// End-to-end walkthrough of one cross-chain atomic swap over two in-memory
// ledgers. Run with RUST_LOG=debug to see the ledger-level trace.

use log::info;
use swaplock_protocol::{
    access::{AccessValidator, CredentialValidator},
    config::ProtocolConfig,
    crypto::{generate_keypair, generate_secret, hashlock_of, sign},
    data_structures::{Address, OrderHash, TokenId},
    escrow::{DstImmutablesComplement, Immutables, Stage},
    factory::EscrowFactory,
    ledger::Ledger,
};

const CHAIN_A_ID: u64 = 1;
const CHAIN_B_ID: u64 = 10;

const AMOUNT_A: u64 = 100;
const AMOUNT_B: u64 = 90;
const SAFETY_DEPOSIT: u64 = 5;

fn main() {
    env_logger::init();

    let maker = Address::from_low_u64(0xA11CE);
    let resolver = Address::from_low_u64(0xB0B);
    let token_a = TokenId(Address::from_low_u64(0xAAAA));
    let token_b = TokenId(Address::from_low_u64(0xBBBB));
    let order_hash = OrderHash([0x42; 32]);

    // The resolver proves it is whitelisted before touching either chain.
    let resolver_key = generate_keypair();
    let mut whitelist = CredentialValidator::new();
    whitelist.register(resolver, resolver_key.verifying_key());
    let credential = sign(&order_hash.0, &resolver_key);
    assert!(whitelist.is_authorized(resolver, &order_hash, &credential));
    info!("resolver {} authorized for order {:?}", resolver, order_hash);

    // The secret stays with the resolver until the destination leg is funded.
    let secret = generate_secret();
    let hashlock = hashlock_of(&secret);
    let config = ProtocolConfig::default();

    // --- Source chain: lock the maker's asset ---

    let mut factory_a = EscrowFactory::new(Address::from_low_u64(0xF0A));
    let mut chain_a = Ledger::new(CHAIN_A_ID, 1_700_000_000);
    chain_a.mint_native(resolver, 1_000);
    chain_a.mint_token(token_a, resolver, AMOUNT_A);
    chain_a.approve(resolver, factory_a.address(), token_a, AMOUNT_A);

    let src_terms = Immutables {
        order_hash,
        hashlock,
        maker,
        taker: resolver,
        token: token_a,
        amount: AMOUNT_A,
        safety_deposit: SAFETY_DEPOSIT,
        timelocks: config.default_timelocks(),
    };
    let complement = DstImmutablesComplement {
        maker,
        amount: AMOUNT_B,
        token: token_b,
        safety_deposit: SAFETY_DEPOSIT,
        chain_id: CHAIN_B_ID,
    };

    let src_escrow = factory_a
        .create_src_escrow(&mut chain_a, resolver, src_terms, complement, SAFETY_DEPOSIT)
        .expect("source escrow creation");
    info!(
        "source escrow {} holds {} of {:?} plus {} native",
        src_escrow,
        chain_a.token_balance_of(token_a, src_escrow),
        token_a,
        chain_a.native_balance_of(src_escrow)
    );

    // --- Destination chain: mirror the published terms ---

    let stamped = chain_a
        .escrow_at(src_escrow)
        .expect("deployed source escrow")
        .immutables;
    let src_cancellation = stamped.timelocks.get(Stage::SrcCancellation);

    let mut factory_b = EscrowFactory::new(Address::from_low_u64(0xF0B));
    let mut chain_b = Ledger::new(CHAIN_B_ID, 1_700_000_000);
    chain_b.mint_native(resolver, 1_000);
    chain_b.mint_token(token_b, resolver, AMOUNT_B);
    chain_b.approve(resolver, factory_b.address(), token_b, AMOUNT_B);

    let dst_terms = Immutables {
        token: token_b,
        amount: AMOUNT_B,
        ..stamped
    };
    let dst_escrow = factory_b
        .create_dst_escrow(
            &mut chain_b,
            resolver,
            dst_terms,
            src_cancellation,
            SAFETY_DEPOSIT,
        )
        .expect("destination escrow creation");
    info!("destination escrow {} funded", dst_escrow);

    // --- Settlement: one secret, both legs ---

    chain_a.advance_time(u64::from(config.src_withdrawal_offset) + 10);
    chain_b.advance_time(u64::from(config.dst_withdrawal_offset) + 10);

    chain_b
        .withdraw_from_escrow(dst_escrow, resolver, secret)
        .expect("destination withdrawal");
    chain_a
        .withdraw_from_escrow(src_escrow, resolver, secret)
        .expect("source withdrawal");

    println!("swap settled with secret {:?}", secret);
    println!(
        "maker received {} of {:?} on chain {}",
        chain_b.token_balance_of(token_b, maker),
        token_b,
        CHAIN_B_ID
    );
    println!(
        "resolver received {} of {:?} on chain {}",
        chain_a.token_balance_of(token_a, resolver),
        token_a,
        CHAIN_A_ID
    );
    println!("published records on chain {}:", CHAIN_A_ID);
    for event in factory_a.events() {
        println!("  {:?}", event);
    }
    for event in factory_b.events() {
        println!("  {:?}", event);
    }
}
