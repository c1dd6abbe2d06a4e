//! Cross-contract calls to the title registry and the payment token.

use soroban_sdk::{contractclient, token, Address, Env};

use crate::types::ContractError;

/// Interface of the external title registry that owns the listed assets.
#[contractclient(name = "AssetRegistryClient")]
pub trait AssetRegistry {
    /// Moves `asset_id` from `from` to `to`. Fails if `from` is not the owner.
    fn transfer_ownership(env: Env, asset_id: u64, from: Address, to: Address);

    fn owner_of(env: Env, asset_id: u64) -> Address;
}

pub fn transfer_title(
    env: &Env,
    registry: &Address,
    asset_id: u64,
    from: &Address,
    to: &Address,
) -> Result<(), ContractError> {
    let client = AssetRegistryClient::new(env, registry);
    match client.try_transfer_ownership(&asset_id, from, to) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Moves `amount` of the escrow token. Zero amounts are a no-op.
pub fn transfer_value(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }

    let client = token::Client::new(env, token);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}
