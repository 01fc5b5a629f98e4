use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::TaxTokenError,
    state::{SweepPolicy, SwapRate, TokenConfig},
};

/// Read access to the token configuration.
pub trait ConfigStore {
    fn mint(&self) -> Pubkey;
    fn authority(&self) -> Pubkey;
    fn tax_rate_bps(&self) -> u16;
    fn total_supply(&self) -> u64;
    fn tax_self_transfers(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn sweep_policy(&self) -> SweepPolicy;
    fn permissionless_sweep(&self) -> bool;
    fn swap_timeout_secs(&self) -> i64;
}

impl ConfigStore for TokenConfig {
    fn mint(&self) -> Pubkey {
        self.mint
    }

    fn authority(&self) -> Pubkey {
        self.authority
    }

    fn tax_rate_bps(&self) -> u16 {
        self.tax_rate_bps
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn tax_self_transfers(&self) -> bool {
        self.tax_self_transfers
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn sweep_policy(&self) -> SweepPolicy {
        self.sweep_policy
    }

    fn permissionless_sweep(&self) -> bool {
        self.permissionless_sweep
    }

    fn swap_timeout_secs(&self) -> i64 {
        self.swap_timeout_secs
    }
}

/// Parameters accepted by `initialize`. Everything after `tax_rate_bps` is optional.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub tax_rate_bps: u16,
    /// Raw units minted to the authority. Defaults to 1B whole tokens.
    pub initial_supply: Option<u64>,
    pub sweep_policy: Option<SweepPolicy>,
    pub permissionless_sweep: Option<bool>,
    pub tax_self_transfers: Option<bool>,
    pub swap_rate: Option<SwapRate>,
    pub swap_timeout_secs: Option<i64>,
}

impl InitializeParams {
    pub fn new(name: &str, symbol: &str, decimals: u8, tax_rate_bps: u16) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            tax_rate_bps,
            initial_supply: None,
            sweep_policy: None,
            permissionless_sweep: None,
            tax_self_transfers: None,
            swap_rate: None,
            swap_timeout_secs: None,
        }
    }

    pub fn with_initial_supply(mut self, supply: u64) -> Self {
        self.initial_supply = Some(supply);
        self
    }

    pub fn with_sweep_policy(mut self, policy: SweepPolicy) -> Self {
        self.sweep_policy = Some(policy);
        self
    }

    pub fn with_permissionless_sweep(mut self, permissionless: bool) -> Self {
        self.permissionless_sweep = Some(permissionless);
        self
    }

    pub fn with_tax_self_transfers(mut self, taxed: bool) -> Self {
        self.tax_self_transfers = Some(taxed);
        self
    }

    pub fn with_swap_timeout_secs(mut self, secs: i64) -> Self {
        self.swap_timeout_secs = Some(secs);
        self
    }

    /// Validates the parameters and fills in defaults.
    pub fn into_config(
        self,
        mint: Pubkey,
        authority: Pubkey,
        bump: u8,
    ) -> Result<TokenConfig, TaxTokenError> {
        validate_tax_rate(self.tax_rate_bps)?;
        if self.name.len() > TokenConfig::MAX_NAME_LEN
            || self.symbol.len() > TokenConfig::MAX_SYMBOL_LEN
        {
            return Err(TaxTokenError::InvalidMetadata);
        }
        let swap_rate = self.swap_rate.unwrap_or(TokenConfig::DEFAULT_SWAP_RATE);
        if swap_rate.units_per_quote == 0 {
            return Err(TaxTokenError::InvalidAmount);
        }

        let sweep_policy = self.sweep_policy.unwrap_or(SweepPolicy::Interval {
            min_secs: TokenConfig::DEFAULT_SWEEP_INTERVAL_SECS,
        });
        if let SweepPolicy::Interval { min_secs } = sweep_policy {
            validate_interval(min_secs)?;
        }
        let swap_timeout_secs = self
            .swap_timeout_secs
            .unwrap_or(TokenConfig::DEFAULT_SWAP_TIMEOUT_SECS);
        validate_interval(swap_timeout_secs)?;

        let total_supply = match self.initial_supply {
            Some(supply) => supply,
            None => 10u64
                .checked_pow(self.decimals as u32)
                .and_then(|unit| unit.checked_mul(TokenConfig::DEFAULT_SUPPLY_TOKENS))
                .ok_or(TaxTokenError::ArithmeticOverflow)?,
        };

        Ok(TokenConfig {
            is_initialized: true,
            mint,
            authority,
            name: self.name,
            symbol: self.symbol,
            decimals: self.decimals,
            tax_rate_bps: self.tax_rate_bps,
            total_supply,
            tax_self_transfers: self.tax_self_transfers.unwrap_or(true),
            paused: false,
            sweep_policy,
            permissionless_sweep: self.permissionless_sweep.unwrap_or(true),
            swap_rate,
            swap_timeout_secs,
            bump,
        })
    }
}

pub fn validate_tax_rate(tax_rate_bps: u16) -> Result<(), TaxTokenError> {
    if tax_rate_bps > TokenConfig::MAX_TAX_RATE_BPS {
        return Err(TaxTokenError::InvalidTaxRate);
    }
    Ok(())
}

/// Sweep intervals and swap timeouts count forward from now.
pub fn validate_interval(secs: i64) -> Result<(), TaxTokenError> {
    if secs < 0 {
        return Err(TaxTokenError::InvalidInterval);
    }
    Ok(())
}

fn require_authority(config: &TokenConfig, signer: &Pubkey) -> Result<(), TaxTokenError> {
    if !config.is_initialized {
        return Err(TaxTokenError::NotInitialized);
    }
    if config.authority != *signer {
        return Err(TaxTokenError::Unauthorized);
    }
    Ok(())
}

/// Authority-gated tax rate change. Applies to transfers after this call.
pub fn update_tax_rate(
    config: &mut TokenConfig,
    signer: &Pubkey,
    tax_rate_bps: u16,
) -> Result<(), TaxTokenError> {
    require_authority(config, signer)?;
    validate_tax_rate(tax_rate_bps)?;
    msg!(
        "Tax rate updated from {} to {} bps",
        config.tax_rate_bps,
        tax_rate_bps
    );
    config.tax_rate_bps = tax_rate_bps;
    Ok(())
}

/// Pausing blocks transfers only; sweeps and claims keep working.
pub fn set_paused(
    config: &mut TokenConfig,
    signer: &Pubkey,
    paused: bool,
) -> Result<(), TaxTokenError> {
    require_authority(config, signer)?;
    msg!("Transfers paused: {}", paused);
    config.paused = paused;
    Ok(())
}
