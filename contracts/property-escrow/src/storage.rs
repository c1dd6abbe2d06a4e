use soroban_sdk::Env;

use crate::types::{ContractError, DataKey, EscrowConfig, Listing};

const DAY_IN_LEDGERS: u32 = 17_280;
const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BUMP_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn load_config(env: &Env) -> Option<EscrowConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn config(env: &Env) -> Result<EscrowConfig, ContractError> {
    load_config(env).ok_or(ContractError::NotInitialized)
}

pub fn set_config(env: &Env, config: &EscrowConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
}

pub fn listing(env: &Env, asset_id: u64) -> Option<Listing> {
    env.storage().persistent().get(&DataKey::Listing(asset_id))
}

/// Listing for `asset_id` if it is currently listed.
pub fn active_listing(env: &Env, asset_id: u64) -> Result<Listing, ContractError> {
    match listing(env, asset_id) {
        Some(listing) if listing.is_listed => Ok(listing),
        _ => Err(ContractError::NotListed),
    }
}

pub fn set_listing(env: &Env, listing: &Listing) {
    let key = DataKey::Listing(listing.asset_id);
    env.storage().persistent().set(&key, listing);
    env.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_AMOUNT);
    env.storage()
        .instance()
        .extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
}
