//! Instruction handlers driven with hand-built accounts.
//!
//! Only code that needs neither sysvars nor CPI runs here. Account creation
//! and full sweeps go through the in-memory engine tests instead; the swap
//! reserve venue is driven directly.

use borsh::BorshSerialize;
use solana_program::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};
use tax_token::{
    config::InitializeParams,
    error::TaxTokenError,
    instructions::{shared::move_lamports, sweep_tax_vault::ReserveOracle},
    processor::{process_instruction, TaxTokenInstruction},
    state::{self, HolderAccount, RewardPool, SwapRate, TokenConfig},
    swap::{SwapFailure, SwapOracle, SwapRequest},
};

struct TestAccount {
    key: Pubkey,
    owner: Pubkey,
    lamports: u64,
    data: Vec<u8>,
    is_signer: bool,
    is_writable: bool,
}

impl TestAccount {
    fn wallet(key: Pubkey) -> Self {
        Self {
            key,
            owner: Pubkey::default(),
            lamports: 0,
            data: Vec::new(),
            is_signer: true,
            is_writable: true,
        }
    }

    fn program<T: BorshSerialize>(key: Pubkey, value: &T, len: usize) -> Self {
        let mut data = vec![0u8; len];
        state::store(value, &mut data).unwrap();
        Self {
            key,
            owner: tax_token::ID,
            lamports: 1_000_000,
            data,
            is_signer: false,
            is_writable: true,
        }
    }

    fn info(&mut self) -> AccountInfo<'_> {
        AccountInfo::new(
            &self.key,
            self.is_signer,
            self.is_writable,
            &mut self.lamports,
            &mut self.data,
            &self.owner,
            false,
            0,
        )
    }

    fn read<T: borsh::BorshDeserialize>(&self) -> T {
        state::load(&self.data).unwrap()
    }
}

struct Fixture {
    authority: Pubkey,
    mint: Pubkey,
    config: TestAccount,
    pool: TestAccount,
}

impl Fixture {
    fn new(supply: u64) -> Self {
        let program_id = tax_token::ID;
        let authority = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (config_key, config_bump) =
            Pubkey::find_program_address(&[TokenConfig::SEED, mint.as_ref()], &program_id);
        let (pool_key, pool_bump) =
            Pubkey::find_program_address(&[RewardPool::SEED, mint.as_ref()], &program_id);

        let config = InitializeParams::new("Tax Token", "TAX", 0, 500)
            .with_initial_supply(supply)
            .into_config(mint, authority, config_bump)
            .unwrap();
        let pool = RewardPool::new(mint, pool_bump, 0);

        Self {
            authority,
            mint,
            config: TestAccount::program(config_key, &config, TokenConfig::LEN),
            pool: TestAccount::program(pool_key, &pool, RewardPool::LEN),
        }
    }

    fn holder(&self, owner: Pubkey, balance: u64) -> TestAccount {
        let (key, bump) = Pubkey::find_program_address(
            &[HolderAccount::SEED, self.mint.as_ref(), owner.as_ref()],
            &tax_token::ID,
        );
        let mut holder = HolderAccount::new(self.mint, owner, bump);
        holder.balance = balance;
        TestAccount::program(key, &holder, HolderAccount::LEN)
    }
}

fn data(instruction: &TaxTokenInstruction) -> Vec<u8> {
    borsh::to_vec(instruction).unwrap()
}

fn custom(err: TaxTokenError) -> ProgramError {
    err.into()
}

#[test]
fn transfer_updates_holder_accounts_and_tax_vault() {
    let mut fx = Fixture::new(1_000);
    let recipient = Pubkey::new_unique();
    let mut sender = TestAccount::wallet(fx.authority);
    let mut from = fx.holder(fx.authority, 1_000);
    let mut to = fx.holder(recipient, 0);

    let accounts = [
        sender.info(),
        fx.config.info(),
        fx.pool.info(),
        from.info(),
        to.info(),
    ];
    process_instruction(
        &tax_token::ID,
        &accounts,
        &data(&TaxTokenInstruction::Transfer { amount: 1_000 }),
    )
    .unwrap();
    drop(accounts);

    assert_eq!(from.read::<HolderAccount>().balance, 0);
    assert_eq!(to.read::<HolderAccount>().balance, 950);
    let pool: RewardPool = fx.pool.read();
    assert_eq!(pool.tax_vault, 50);
    assert_eq!(pool.total_tax_collected, 50);
}

#[test]
fn transfer_requires_holder_owner_signature() {
    let mut fx = Fixture::new(1_000);
    let mut from = fx.holder(fx.authority, 1_000);
    let mut to = fx.holder(Pubkey::new_unique(), 0);

    let mut impostor = TestAccount::wallet(Pubkey::new_unique());
    let accounts = [
        impostor.info(),
        fx.config.info(),
        fx.pool.info(),
        from.info(),
        to.info(),
    ];
    assert_eq!(
        process_instruction(
            &tax_token::ID,
            &accounts,
            &data(&TaxTokenInstruction::Transfer { amount: 10 }),
        ),
        Err(custom(TaxTokenError::InvalidHolderAccount))
    );
    drop(accounts);

    let mut sender = TestAccount::wallet(fx.authority);
    sender.is_signer = false;
    let accounts = [
        sender.info(),
        fx.config.info(),
        fx.pool.info(),
        from.info(),
        to.info(),
    ];
    assert_eq!(
        process_instruction(
            &tax_token::ID,
            &accounts,
            &data(&TaxTokenInstruction::Transfer { amount: 10 }),
        ),
        Err(custom(TaxTokenError::NotSigner))
    );
    drop(accounts);

    assert_eq!(from.read::<HolderAccount>().balance, 1_000);
}

#[test]
fn foreign_holder_account_is_rejected() {
    let mut fx = Fixture::new(1_000);
    let mut sender = TestAccount::wallet(fx.authority);
    let mut from = fx.holder(fx.authority, 1_000);
    let mut to = fx.holder(Pubkey::new_unique(), 0);
    to.owner = Pubkey::new_unique();

    let accounts = [
        sender.info(),
        fx.config.info(),
        fx.pool.info(),
        from.info(),
        to.info(),
    ];
    assert_eq!(
        process_instruction(
            &tax_token::ID,
            &accounts,
            &data(&TaxTokenInstruction::Transfer { amount: 10 }),
        ),
        Err(custom(TaxTokenError::InvalidAccountOwner))
    );
}

#[test]
fn claim_moves_lamports_from_pool_to_owner() {
    let mut fx = Fixture::new(1_000);
    let owner = Pubkey::new_unique();

    let mut pool: RewardPool = fx.pool.read();
    pool.reward_vault = 4_000;
    pool.accumulator.on_reward_deposit(4_000, 1_000).unwrap();
    state::store(&pool, &mut fx.pool.data).unwrap();
    fx.pool.lamports += 4_000;

    let mut wallet = TestAccount::wallet(owner);
    let mut holder = fx.holder(owner, 100);
    let accounts = [
        wallet.info(),
        fx.config.info(),
        fx.pool.info(),
        holder.info(),
    ];
    process_instruction(&tax_token::ID, &accounts, &data(&TaxTokenInstruction::Claim)).unwrap();
    drop(accounts);

    assert_eq!(wallet.lamports, 400);
    assert_eq!(fx.pool.lamports, 1_003_600);
    assert_eq!(fx.pool.read::<RewardPool>().reward_vault, 3_600);
    assert_eq!(holder.read::<HolderAccount>().checkpoint.unclaimed_reward, 0);

    let accounts = [
        wallet.info(),
        fx.config.info(),
        fx.pool.info(),
        holder.info(),
    ];
    assert_eq!(
        process_instruction(&tax_token::ID, &accounts, &data(&TaxTokenInstruction::Claim)),
        Err(custom(TaxTokenError::NothingToClaim))
    );
}

#[test]
fn admin_instructions_are_authority_only() {
    let mut fx = Fixture::new(1_000);

    let mut stranger = TestAccount::wallet(Pubkey::new_unique());
    let accounts = [stranger.info(), fx.config.info()];
    assert_eq!(
        process_instruction(
            &tax_token::ID,
            &accounts,
            &data(&TaxTokenInstruction::UpdateTaxRate { tax_rate_bps: 100 }),
        ),
        Err(custom(TaxTokenError::Unauthorized))
    );
    drop(accounts);

    let mut authority = TestAccount::wallet(fx.authority);
    let accounts = [authority.info(), fx.config.info()];
    process_instruction(
        &tax_token::ID,
        &accounts,
        &data(&TaxTokenInstruction::UpdateTaxRate { tax_rate_bps: 100 }),
    )
    .unwrap();
    process_instruction(
        &tax_token::ID,
        &accounts,
        &data(&TaxTokenInstruction::SetPaused { paused: true }),
    )
    .unwrap();
    drop(accounts);

    let config: TokenConfig = fx.config.read();
    assert_eq!(config.tax_rate_bps, 100);
    assert!(config.paused);
}

#[test]
fn paused_transfer_leaves_accounts_untouched() {
    let mut fx = Fixture::new(1_000);
    let mut config: TokenConfig = fx.config.read();
    config.paused = true;
    state::store(&config, &mut fx.config.data).unwrap();

    let mut sender = TestAccount::wallet(fx.authority);
    let mut from = fx.holder(fx.authority, 1_000);
    let mut to = fx.holder(Pubkey::new_unique(), 0);
    let accounts = [
        sender.info(),
        fx.config.info(),
        fx.pool.info(),
        from.info(),
        to.info(),
    ];
    assert_eq!(
        process_instruction(
            &tax_token::ID,
            &accounts,
            &data(&TaxTokenInstruction::Transfer { amount: 10 }),
        ),
        Err(custom(TaxTokenError::TransfersPaused))
    );
    drop(accounts);

    assert_eq!(from.read::<HolderAccount>().balance, 1_000);
    assert_eq!(fx.pool.read::<RewardPool>().tax_vault, 0);
}

#[test]
fn garbage_instruction_data_is_rejected() {
    assert_eq!(
        process_instruction(&tax_token::ID, &[], &[0xff, 0x01]),
        Err(custom(TaxTokenError::InvalidInstruction))
    );
}

const RENT_FLOOR: u64 = 1_000;
const RATE: SwapRate = SwapRate {
    lamports_per_unit: 36,
    units_per_quote: 1,
};

fn reserve(fx: &Fixture, lamports: u64) -> TestAccount {
    let (key, bump) = Pubkey::find_program_address(
        &[HolderAccount::RESERVE_SEED, fx.mint.as_ref()],
        &tax_token::ID,
    );
    let mut reserve =
        TestAccount::program(key, &HolderAccount::new(fx.mint, key, bump), HolderAccount::LEN);
    reserve.lamports = lamports;
    reserve
}

fn sell(amount_in: u64, min_amount_out: u64, deadline: i64) -> SwapRequest {
    SwapRequest {
        amount_in,
        min_amount_out,
        deadline,
    }
}

#[test]
fn reserve_pays_exactly_the_quote() {
    let mut fx = Fixture::new(1_000);
    let mut reserve = reserve(&fx, RENT_FLOOR + 5_000);

    let (reserve_info, pool_info) = (reserve.info(), fx.pool.info());
    let mut oracle = ReserveOracle::new(&reserve_info, &pool_info, RATE, RENT_FLOOR, 0);
    assert_eq!(oracle.venue(), *reserve_info.key);
    assert_eq!(oracle.liquidity(), 5_000);
    assert_eq!(oracle.swap(&sell(100, 3_600, 60)), Ok(3_600));
    assert_eq!(oracle.liquidity(), 1_400);
    drop((reserve_info, pool_info));

    assert_eq!(reserve.lamports, RENT_FLOOR + 1_400);
    assert_eq!(fx.pool.lamports, 1_003_600);
}

#[test]
fn reserve_never_pays_out_its_rent_floor() {
    let mut fx = Fixture::new(1_000);
    let mut reserve = reserve(&fx, RENT_FLOOR + 3_599);

    let (reserve_info, pool_info) = (reserve.info(), fx.pool.info());
    let mut oracle = ReserveOracle::new(&reserve_info, &pool_info, RATE, RENT_FLOOR, 0);
    assert_eq!(
        oracle.swap(&sell(100, 0, 60)),
        Err(SwapFailure::LiquidityUnavailable)
    );
    drop((reserve_info, pool_info));

    assert_eq!(reserve.lamports, RENT_FLOOR + 3_599);
    assert_eq!(fx.pool.lamports, 1_000_000);
}

#[test]
fn reserve_refuses_low_quotes_and_past_deadlines() {
    let mut fx = Fixture::new(1_000);
    let mut reserve = reserve(&fx, RENT_FLOOR + 5_000);

    let (reserve_info, pool_info) = (reserve.info(), fx.pool.info());
    let mut oracle = ReserveOracle::new(&reserve_info, &pool_info, RATE, RENT_FLOOR, 61);
    assert_eq!(
        oracle.swap(&sell(100, 0, 60)),
        Err(SwapFailure::Timeout)
    );
    assert_eq!(
        oracle.swap(&sell(100, 3_601, 61)),
        Err(SwapFailure::SlippageExceeded {
            quoted: 3_600,
            minimum: 3_601
        })
    );
    drop((reserve_info, pool_info));

    assert_eq!(reserve.lamports, RENT_FLOOR + 5_000);
    assert_eq!(fx.pool.lamports, 1_000_000);
}

#[test]
fn lamport_shortfall_is_an_invariant_violation() {
    let mut fx = Fixture::new(1_000);
    let mut wallet = TestAccount::wallet(Pubkey::new_unique());

    let (pool_info, wallet_info) = (fx.pool.info(), wallet.info());
    assert_eq!(
        move_lamports(&pool_info, &wallet_info, 1_000_001),
        Err(TaxTokenError::InsufficientVaultBalance)
    );
    drop((pool_info, wallet_info));

    assert_eq!(fx.pool.lamports, 1_000_000);
    assert_eq!(wallet.lamports, 0);
}
