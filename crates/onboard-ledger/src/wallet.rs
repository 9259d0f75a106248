//! # Wallet Bridge
//!
//! Account connection and network identity, consumed as capability calls
//! against whatever wallet the environment provides. The session layer
//! needs exactly four things: the active account (if any), an explicit
//! connection request, the current chain, and the ability to move the
//! wallet onto the registry's chain.
//!
//! [`ensure_network`] implements the switch-then-add recovery: if the
//! wallet does not know the target chain it is taught the chain profile
//! and the switch is retried once.

use parking_lot::Mutex;

use crate::config::ChainProfile;
use crate::error::WalletError;

/// Trait interface for the wallet collaborator.
///
/// Object-safe and `Send + Sync`, like [`CustomerRegistry`]; the session
/// holds it behind a shared reference.
///
/// [`CustomerRegistry`]: crate::registry::CustomerRegistry
pub trait WalletBridge: Send + Sync {
    /// The currently connected account, if the user has already approved
    /// a connection. Never prompts.
    fn active_account(&self) -> Result<Option<String>, WalletError>;

    /// Request a connection, prompting the user if necessary. Returns the
    /// approved account address.
    fn request_account(&self) -> Result<String, WalletError>;

    /// Numeric chain ID the wallet is currently on.
    fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to switch to the given chain.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnknownChain`] if the wallet has no entry
    /// for the chain; callers may [`add_chain`](Self::add_chain) and retry.
    fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Teach the wallet a network it does not know.
    fn add_chain(&self, chain: &ChainProfile) -> Result<(), WalletError>;
}

/// Move the wallet onto the target chain, adding it first if unknown.
///
/// Any failure other than an unknown chain is propagated as-is; a second
/// switch failure after a successful add is also propagated.
pub fn ensure_network(wallet: &dyn WalletBridge, chain: &ChainProfile) -> Result<(), WalletError> {
    if wallet.chain_id()? == chain.chain_id {
        return Ok(());
    }
    match wallet.switch_chain(chain.chain_id) {
        Ok(()) => Ok(()),
        Err(WalletError::UnknownChain { chain_id }) => {
            tracing::warn!(chain_id, chain_name = %chain.chain_name, "wallet does not know chain, adding it");
            wallet.add_chain(chain)?;
            wallet.switch_chain(chain.chain_id)
        }
        Err(err) => Err(err),
    }
}

/// Deterministic in-memory wallet for tests and development.
///
/// Starts disconnected on chain 1 (mainnet) knowing only that chain;
/// builders adjust the scenario:
/// - [`with_account`](Self::with_account) pre-approves a connection;
/// - [`on_chain`](Self::on_chain) sets the current chain;
/// - [`knowing_chain`](Self::knowing_chain) adds a chain the wallet can
///   switch to without being taught;
/// - [`reject_connection`](Self::reject_connection) /
///   [`reject_switch`](Self::reject_switch) simulate user denial.
#[derive(Debug)]
pub struct MockWalletBridge {
    state: Mutex<MockWalletState>,
    reject_connection: bool,
    reject_switch: bool,
}

#[derive(Debug)]
struct MockWalletState {
    account: Option<String>,
    chain_id: u64,
    known_chains: Vec<u64>,
    added_chains: Vec<ChainProfile>,
}

impl Default for MockWalletBridge {
    fn default() -> Self {
        Self {
            state: Mutex::new(MockWalletState {
                account: None,
                chain_id: 1,
                known_chains: vec![1],
                added_chains: Vec::new(),
            }),
            reject_connection: false,
            reject_switch: false,
        }
    }
}

impl MockWalletBridge {
    /// Disconnected wallet on chain 1, knowing only chain 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-approve a connected account.
    pub fn with_account(self, account: impl Into<String>) -> Self {
        self.state.lock().account = Some(account.into());
        self
    }

    /// Set the chain the wallet is currently on (also marks it known).
    pub fn on_chain(self, chain_id: u64) -> Self {
        {
            let mut state = self.state.lock();
            state.chain_id = chain_id;
            if !state.known_chains.contains(&chain_id) {
                state.known_chains.push(chain_id);
            }
        }
        self
    }

    /// Mark a chain as known, so a switch succeeds without an add.
    pub fn knowing_chain(self, chain_id: u64) -> Self {
        self.state.lock().known_chains.push(chain_id);
        self
    }

    /// Deny connection requests.
    pub fn reject_connection(mut self) -> Self {
        self.reject_connection = true;
        self
    }

    /// Deny switch requests even for known chains.
    pub fn reject_switch(mut self) -> Self {
        self.reject_switch = true;
        self
    }

    /// Chain profiles the wallet has been taught via `add_chain`.
    pub fn added_chains(&self) -> Vec<ChainProfile> {
        self.state.lock().added_chains.clone()
    }
}

impl WalletBridge for MockWalletBridge {
    fn active_account(&self) -> Result<Option<String>, WalletError> {
        Ok(self.state.lock().account.clone())
    }

    fn request_account(&self) -> Result<String, WalletError> {
        if self.reject_connection {
            return Err(WalletError::UserRejected);
        }
        let mut state = self.state.lock();
        if state.account.is_none() {
            state.account = Some("0x00000000000000000000000000000000000000aa".to_string());
        }
        Ok(state.account.clone().unwrap_or_default())
    }

    fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.state.lock().chain_id)
    }

    fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        if self.reject_switch {
            return Err(WalletError::UserRejected);
        }
        let mut state = self.state.lock();
        if !state.known_chains.contains(&chain_id) {
            return Err(WalletError::UnknownChain { chain_id });
        }
        state.chain_id = chain_id;
        Ok(())
    }

    fn add_chain(&self, chain: &ChainProfile) -> Result<(), WalletError> {
        let mut state = self.state.lock();
        state.known_chains.push(chain.chain_id);
        state.added_chains.push(chain.clone());
        Ok(())
    }
}
