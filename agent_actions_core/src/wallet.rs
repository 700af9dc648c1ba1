use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::fmt::Debug;
use std::sync::Arc;

/// trait for the wallet an agent acts on behalf of.
/// signing stays with the backends that build transactions; actions only need the address.
pub trait Wallet: Send + Sync + Debug {
    fn pubkey(&self) -> Pubkey;
}

/// wallet implementation using a local Solana Keypair.
#[derive(Debug)]
pub struct KeypairWallet {
    pub keypair: Arc<Keypair>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// fresh random keypair, handy for tests and local demos.
    pub fn random() -> Self {
        Self::new(Keypair::new())
    }
}

impl Wallet for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}
