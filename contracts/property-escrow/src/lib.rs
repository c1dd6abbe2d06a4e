//! Property Escrow Contract
//!
//! Escrows a tokenized real-estate title against payment. The seller lists a
//! title, which moves into the contract's custody; the buyer deposits earnest
//! money; the inspector records the inspection result; buyer, seller and
//! lender approve. Finalizing pays the custody balance to the seller and hands
//! the title to the buyer. Cancelling refunds the balance and returns the title
//! to the seller.

#![no_std]

mod registry;
mod storage;
mod types;

pub use registry::{AssetRegistry, AssetRegistryClient};
pub use types::{ContractError, EscrowConfig, Listing, Role, APPROVING_ROLES};

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol, Vec};

const INITIALIZED: Symbol = symbol_short!("init");
const LISTED: Symbol = symbol_short!("listed");
const DEPOSITED: Symbol = symbol_short!("deposit");
const INSPECTED: Symbol = symbol_short!("inspect");
const APPROVED: Symbol = symbol_short!("approve");
const FINALIZED: Symbol = symbol_short!("finalize");
const CANCELLED: Symbol = symbol_short!("cancel");

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct PropertyEscrow;

#[contractimpl]
impl PropertyEscrow {
    /// Fix the title registry, payment token and the three global roles.
    ///
    /// # Errors
    /// * `AlreadyInitialized` - If the contract was already initialized
    pub fn initialize(
        env: Env,
        asset_registry: Address,
        token: Address,
        seller: Address,
        inspector: Address,
        lender: Address,
    ) -> Result<(), ContractError> {
        if storage::has_config(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        let config = EscrowConfig {
            asset_registry,
            token,
            seller,
            inspector,
            lender,
        };
        storage::set_config(&env, &config);

        env.events().publish(
            (INITIALIZED,),
            (config.seller, config.inspector, config.lender),
        );

        Ok(())
    }

    /// List a title for sale. The title moves from the seller into the
    /// contract's custody.
    ///
    /// # Arguments
    /// * `caller` - Must be the seller
    /// * `asset_id` - Title identifier in the registry
    /// * `purchase_price` - Total sale price
    /// * `buyer` - Account allowed to deposit and receive the title
    /// * `escrow_amount` - Earnest deposit expected from the buyer
    ///
    /// # Errors
    /// * `Unauthorized` - If caller is not the seller
    /// * `InvalidAmount` - If the price or escrow amount is negative
    /// * `AlreadyListed` - If the asset is currently listed
    /// * `TransferFailed` - If the seller does not own the title
    pub fn list(
        env: Env,
        caller: Address,
        asset_id: u64,
        purchase_price: i128,
        buyer: Address,
        escrow_amount: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let config = storage::config(&env)?;
        if caller != config.seller {
            return Err(ContractError::Unauthorized);
        }

        if purchase_price < 0 || escrow_amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        if storage::active_listing(&env, asset_id).is_ok() {
            return Err(ContractError::AlreadyListed);
        }

        registry::transfer_title(
            &env,
            &config.asset_registry,
            asset_id,
            &config.seller,
            &env.current_contract_address(),
        )?;

        let listing = Listing::new(&env, asset_id, purchase_price, buyer, escrow_amount);
        storage::set_listing(&env, &listing);

        env.events().publish(
            (LISTED, asset_id),
            (listing.buyer, purchase_price, escrow_amount),
        );

        Ok(())
    }

    /// Deposit earnest money into the listing's custody balance.
    ///
    /// Any positive amount is accepted; it is not checked against the
    /// listing's `escrow_amount`.
    ///
    /// # Errors
    /// * `NotListed` - If the asset is not listed
    /// * `Unauthorized` - If caller is not the listing's buyer
    /// * `InvalidAmount` - If amount is not positive, or the custody balance
    ///   would overflow
    /// * `TransferFailed` - If the token transfer is rejected
    pub fn deposit_earnest(
        env: Env,
        caller: Address,
        asset_id: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let config = storage::config(&env)?;
        let mut listing = storage::active_listing(&env, asset_id)?;
        if caller != listing.buyer {
            return Err(ContractError::Unauthorized);
        }

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let balance = listing
            .custody_balance
            .checked_add(amount)
            .ok_or(ContractError::InvalidAmount)?;

        registry::transfer_value(
            &env,
            &config.token,
            &caller,
            &env.current_contract_address(),
            amount,
        )?;

        listing.custody_balance = balance;
        storage::set_listing(&env, &listing);

        env.events()
            .publish((DEPOSITED, asset_id), (caller, amount, balance));

        Ok(())
    }

    /// Record the inspection result. Last write wins.
    ///
    /// # Errors
    /// * `Unauthorized` - If caller is not the inspector
    /// * `NotListed` - If the asset is not listed
    pub fn update_inspection_status(
        env: Env,
        caller: Address,
        asset_id: u64,
        passed: bool,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let config = storage::config(&env)?;
        if caller != config.inspector {
            return Err(ContractError::Unauthorized);
        }

        let mut listing = storage::active_listing(&env, asset_id)?;
        listing.inspection_passed = passed;
        storage::set_listing(&env, &listing);

        env.events().publish((INSPECTED, asset_id), (passed,));

        Ok(())
    }

    /// Approve the sale on behalf of every approving role the caller holds.
    /// Approving twice is a no-op.
    ///
    /// # Errors
    /// * `NotListed` - If the asset is not listed
    /// * `Unauthorized` - If caller is not the buyer, seller or lender
    pub fn approve_sale(env: Env, caller: Address, asset_id: u64) -> Result<(), ContractError> {
        caller.require_auth();

        let config = storage::config(&env)?;
        let mut listing = storage::active_listing(&env, asset_id)?;

        let roles = config.approver_roles(&env, &listing, &caller);
        if roles.is_empty() {
            return Err(ContractError::Unauthorized);
        }

        let mut changed = false;
        for role in roles.iter() {
            changed |= listing.approve(role);
        }
        if !changed {
            return Ok(());
        }
        storage::set_listing(&env, &listing);

        env.events().publish((APPROVED, asset_id), (caller, roles));

        Ok(())
    }

    /// Settle the sale: pay the whole custody balance to the seller and hand
    /// the title to the buyer. Anyone may call this once the listing's gates
    /// are met.
    ///
    /// The custody balance is not compared with the purchase price.
    ///
    /// # Errors
    /// * `NotListed` - If the asset is not listed
    /// * `InspectionNotPassed` - If the inspector has not passed the asset
    /// * `InsufficientApprovals` - If buyer, seller and lender have not all approved
    /// * `TransferFailed` - If the payout or title transfer is rejected
    pub fn finalize_sale(env: Env, asset_id: u64) -> Result<(), ContractError> {
        let config = storage::config(&env)?;
        let mut listing = storage::active_listing(&env, asset_id)?;

        if !listing.inspection_passed {
            return Err(ContractError::InspectionNotPassed);
        }
        if !listing.is_fully_approved() {
            return Err(ContractError::InsufficientApprovals);
        }

        let escrow = env.current_contract_address();
        let payout = listing.custody_balance;
        registry::transfer_value(&env, &config.token, &escrow, &config.seller, payout)?;
        registry::transfer_title(
            &env,
            &config.asset_registry,
            asset_id,
            &escrow,
            &listing.buyer,
        )?;

        listing.is_listed = false;
        listing.custody_balance = 0;
        storage::set_listing(&env, &listing);

        env.events()
            .publish((FINALIZED, asset_id), (listing.buyer, payout));

        Ok(())
    }

    /// Abort the sale. The custody balance goes back to the buyer unless the
    /// inspection passed, in which case it goes to the seller. The title
    /// always returns to the seller.
    ///
    /// # Errors
    /// * `NotListed` - If the asset is not listed
    /// * `Unauthorized` - If caller is neither the seller nor the buyer
    /// * `TransferFailed` - If the refund or title transfer is rejected
    pub fn cancel_sale(env: Env, caller: Address, asset_id: u64) -> Result<(), ContractError> {
        caller.require_auth();

        let config = storage::config(&env)?;
        let mut listing = storage::active_listing(&env, asset_id)?;
        if caller != config.seller && caller != listing.buyer {
            return Err(ContractError::Unauthorized);
        }

        let recipient = if listing.inspection_passed {
            config.seller.clone()
        } else {
            listing.buyer.clone()
        };

        let escrow = env.current_contract_address();
        let refund = listing.custody_balance;
        registry::transfer_value(&env, &config.token, &escrow, &recipient, refund)?;
        registry::transfer_title(
            &env,
            &config.asset_registry,
            asset_id,
            &escrow,
            &config.seller,
        )?;

        listing.is_listed = false;
        listing.custody_balance = 0;
        storage::set_listing(&env, &listing);

        env.events()
            .publish((CANCELLED, asset_id), (recipient, refund));

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_listed(env: Env, asset_id: u64) -> bool {
        storage::listing(&env, asset_id)
            .map(|l| l.is_listed)
            .unwrap_or(false)
    }

    pub fn purchase_price(env: Env, asset_id: u64) -> i128 {
        storage::listing(&env, asset_id)
            .map(|l| l.purchase_price)
            .unwrap_or(0)
    }

    pub fn escrow_amount(env: Env, asset_id: u64) -> i128 {
        storage::listing(&env, asset_id)
            .map(|l| l.escrow_amount)
            .unwrap_or(0)
    }

    pub fn buyer(env: Env, asset_id: u64) -> Option<Address> {
        storage::listing(&env, asset_id).map(|l| l.buyer)
    }

    /// Custody balance held for the asset.
    pub fn get_balance(env: Env, asset_id: u64) -> i128 {
        storage::listing(&env, asset_id)
            .map(|l| l.custody_balance)
            .unwrap_or(0)
    }

    pub fn inspection_passed(env: Env, asset_id: u64) -> bool {
        storage::listing(&env, asset_id)
            .map(|l| l.inspection_passed)
            .unwrap_or(false)
    }

    pub fn approvals(env: Env, asset_id: u64) -> Vec<Role> {
        storage::listing(&env, asset_id)
            .map(|l| l.approvals)
            .unwrap_or_else(|| Vec::new(&env))
    }

    /// Whether `account` has approved the sale in any role it holds for it.
    pub fn approval(env: Env, asset_id: u64, account: Address) -> bool {
        let (Some(config), Some(listing)) =
            (storage::load_config(&env), storage::listing(&env, asset_id))
        else {
            return false;
        };

        config
            .approver_roles(&env, &listing, &account)
            .iter()
            .any(|role| listing.approvals.contains(role))
    }

    pub fn get_listing(env: Env, asset_id: u64) -> Option<Listing> {
        storage::listing(&env, asset_id)
    }

    pub fn config(env: Env) -> Option<EscrowConfig> {
        storage::load_config(&env)
    }

    pub fn asset_registry(env: Env) -> Option<Address> {
        storage::load_config(&env).map(|c| c.asset_registry)
    }

    pub fn token(env: Env) -> Option<Address> {
        storage::load_config(&env).map(|c| c.token)
    }

    pub fn seller(env: Env) -> Option<Address> {
        storage::load_config(&env).map(|c| c.seller)
    }

    pub fn inspector(env: Env) -> Option<Address> {
        storage::load_config(&env).map(|c| c.inspector)
    }

    pub fn lender(env: Env) -> Option<Address> {
        storage::load_config(&env).map(|c| c.lender)
    }
}
