//! Native-asset balances with optional receive hooks

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use ascent_core::{HostResult, NativeBank};
use ascent_types::{Address, Rejection};

/// Code run when an address receives native value: `(sender, amount)`.
/// Returning an error refuses the transfer.
pub type ReceiveHook = Rc<dyn Fn(Address, u128) -> HostResult<()>>;

#[derive(Clone, Default)]
pub struct NativeBalances {
    balances: BTreeMap<Address, u128>,
    hooks: BTreeMap<Address, ReceiveHook>,
}

impl NativeBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create value out of thin air for `owner`
    pub fn credit(&mut self, owner: Address, amount: u128) {
        let balance = self.balances.entry(owner).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn set_receive_hook(&mut self, owner: Address, hook: ReceiveHook) {
        self.hooks.insert(owner, hook);
    }

    pub fn clear_receive_hook(&mut self, owner: Address) {
        self.hooks.remove(&owner);
    }

    /// Sum of all balances
    pub fn total(&self) -> u128 {
        self.balances.values().sum()
    }

    fn debit(&mut self, owner: Address, amount: u128) -> HostResult<()> {
        let balance = self.balances.entry(owner).or_default();
        if *balance < amount {
            return Err(Rejection::new(format!(
                "insufficient native balance: {} has {}, needs {}",
                owner, balance, amount
            )));
        }
        *balance -= amount;
        Ok(())
    }
}

impl NativeBank for NativeBalances {
    fn balance_of(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> HostResult<()> {
        self.debit(from, amount)?;
        self.credit(to, amount);

        if let Some(hook) = self.hooks.get(&to).cloned() {
            if let Err(rejection) = hook(from, amount) {
                // Receiver refused: undo the move
                self.debit(to, amount)?;
                self.credit(from, amount);
                return Err(rejection);
            }
        }

        Ok(())
    }
}

impl fmt::Debug for NativeBalances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBalances")
            .field("balances", &self.balances)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
