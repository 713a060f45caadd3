use soroban_sdk::contracterror;

/// Error codes shared by every fundraising contract.
///
/// A single enum keeps codes stable when a failure propagates through a
/// cross-contract call (controller -> market maker -> reserve, ...).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- Lifecycle (1–2) ---
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // --- Authorization (3) ---
    Unauthorized = 3,

    // --- State machine (4–6) ---
    InvalidState = 4,
    BatchNotClosed = 5,
    AlreadyClaimed = 6,

    // --- Tokens and balances (7–8) ---
    UnknownCollateralToken = 7,
    InsufficientBalance = 8,

    // --- Input validation (9–10) ---
    InvalidAmount = 9,
    InvalidConfig = 10,

    // --- Market maker bookkeeping (11–13) ---
    CollateralAlreadyWhitelisted = 11,
    PendingOrders = 12,
    OrderNotFound = 13,

    // --- Permission registry (14–15) ---
    PermissionExists = 14,
    PermissionNotFound = 15,

    // --- Safety (16–18) ---
    ReentrantCall = 16,
    MathOverflow = 17,
    SlippageExceeded = 18,

    // --- Lookups (19–20) ---
    BatchNotFound = 19,
    AppAlreadyRegistered = 20,
}
