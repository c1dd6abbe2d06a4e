use soroban_sdk::{contracterror, contracttype, Address, Env, Vec};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    Unauthorized = 1,
    NotListed = 2,
    AlreadyListed = 3,
    InspectionNotPassed = 4,
    InsufficientApprovals = 5,
    TransferFailed = 6,
    AlreadyInitialized = 7,
    NotInitialized = 8,
    InvalidAmount = 9,
}

/// Parties of the escrow. Seller, Inspector and Lender are fixed at
/// initialization; the Buyer is named per listing.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Seller = 0,
    Inspector = 1,
    Lender = 2,
    Buyer = 3,
}

/// Roles whose approval is required before a sale can be finalized.
pub const APPROVING_ROLES: [Role; 3] = [Role::Buyer, Role::Seller, Role::Lender];

/// Deployment-wide configuration, written once by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowConfig {
    /// Title registry holding ownership of the listed assets.
    pub asset_registry: Address,
    /// Token used for earnest deposits and payouts.
    pub token: Address,
    pub seller: Address,
    pub inspector: Address,
    pub lender: Address,
}

impl EscrowConfig {
    /// Approving roles `account` holds for `listing`. One account may hold
    /// several, e.g. a lender buying its own listing.
    pub fn approver_roles(&self, env: &Env, listing: &Listing, account: &Address) -> Vec<Role> {
        let mut roles = Vec::new(env);
        if *account == listing.buyer {
            roles.push_back(Role::Buyer);
        }
        if *account == self.seller {
            roles.push_back(Role::Seller);
        }
        if *account == self.lender {
            roles.push_back(Role::Lender);
        }
        roles
    }
}

/// Sale terms and custody state of one asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    pub asset_id: u64,
    pub is_listed: bool,
    pub purchase_price: i128,
    pub escrow_amount: i128,
    pub buyer: Address,
    /// Value held by the contract for this asset.
    pub custody_balance: i128,
    pub inspection_passed: bool,
    /// Approving roles, in the order they approved.
    pub approvals: Vec<Role>,
}

impl Listing {
    pub fn new(
        env: &Env,
        asset_id: u64,
        purchase_price: i128,
        buyer: Address,
        escrow_amount: i128,
    ) -> Self {
        Listing {
            asset_id,
            is_listed: true,
            purchase_price,
            escrow_amount,
            buyer,
            custody_balance: 0,
            inspection_passed: false,
            approvals: Vec::new(env),
        }
    }

    /// Records `role` unless it already approved. Returns whether it was new.
    pub fn approve(&mut self, role: Role) -> bool {
        if self.approvals.contains(role) {
            return false;
        }
        self.approvals.push_back(role);
        true
    }

    pub fn is_fully_approved(&self) -> bool {
        APPROVING_ROLES
            .iter()
            .all(|role| self.approvals.contains(*role))
    }
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config,
    Listing(u64),
}
