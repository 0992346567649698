//! Allowance-based token books for the asset and the wrapped native asset

use std::collections::BTreeMap;

use ascent_core::{AssetLedger, FungibleToken, HostResult, NativeBank, WrappedNative};
use ascent_types::{Address, Rejection};

// ============================================================================
// Token Book
// ============================================================================

/// Balances, allowances and supply of one token
#[derive(Debug, Clone, Default)]
pub struct TokenBook {
    balances: BTreeMap<Address, u128>,
    allowances: BTreeMap<(Address, Address), u128>,
    total_supply: u128,
}

impl TokenBook {
    pub fn balance_of(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: u128) {
        self.allowances.insert((owner, spender), amount);
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> HostResult<()> {
        self.debit(from, amount)?;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> HostResult<()> {
        if spender != from {
            let allowance = self.allowance(from, spender);
            if allowance < amount {
                return Err(Rejection::new(format!(
                    "allowance exceeded: {} may spend {} of {}, needs {}",
                    spender, allowance, from, amount
                )));
            }
            // Infinite approvals are never drawn down
            if allowance != u128::MAX {
                self.allowances.insert((from, spender), allowance - amount);
            }
        }
        self.transfer(from, to, amount)
    }

    pub fn mint(&mut self, to: Address, amount: u128) -> HostResult<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| Rejection::new("total supply overflow"))?;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    pub fn burn(&mut self, from: Address, amount: u128) -> HostResult<()> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    fn debit(&mut self, owner: Address, amount: u128) -> HostResult<()> {
        let balance = self.balances.entry(owner).or_default();
        if *balance < amount {
            return Err(Rejection::new(format!(
                "insufficient token balance: {} has {}, needs {}",
                owner, balance, amount
            )));
        }
        *balance -= amount;
        Ok(())
    }
}

// ============================================================================
// Asset Ledger
// ============================================================================

/// The curve's asset. Minting and burning are reserved to one minter.
#[derive(Debug, Clone)]
pub struct Erc20Ledger {
    address: Address,
    decimals: u8,
    minter: Option<Address>,
    book: TokenBook,
}

impl Erc20Ledger {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            minter: None,
            book: TokenBook::default(),
        }
    }

    pub fn set_minter(&mut self, minter: Address) {
        self.minter = Some(minter);
    }

    pub fn minter(&self) -> Option<Address> {
        self.minter
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.book.allowance(owner, spender)
    }

    /// Holder-initiated transfer
    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> HostResult<()> {
        self.book.transfer(from, to, amount)
    }

    fn ensure_minter(&self, caller: Address) -> HostResult<()> {
        if self.minter != Some(caller) {
            return Err(Rejection::new(format!("{} is not the minter", caller)));
        }
        Ok(())
    }
}

impl FungibleToken for Erc20Ledger {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, owner: Address) -> u128 {
        self.book.balance_of(owner)
    }

    fn total_supply(&self) -> u128 {
        self.book.total_supply()
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: u128) -> HostResult<()> {
        self.book.approve(owner, spender, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> HostResult<()> {
        self.book.transfer_from(spender, from, to, amount)
    }
}

impl AssetLedger for Erc20Ledger {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn mint(&mut self, caller: Address, to: Address, amount: u128) -> HostResult<()> {
        self.ensure_minter(caller)?;
        self.book.mint(to, amount)
    }

    fn burn(&mut self, caller: Address, from: Address, amount: u128) -> HostResult<()> {
        self.ensure_minter(caller)?;
        self.book.burn(from, amount)
    }

    fn as_fungible(&mut self) -> &mut dyn FungibleToken {
        self
    }
}

// ============================================================================
// Wrapped Native
// ============================================================================

/// One token per unit of locked native value
#[derive(Debug, Clone)]
pub struct WrappedNativeToken {
    address: Address,
    book: TokenBook,
}

impl WrappedNativeToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            book: TokenBook::default(),
        }
    }
}

impl FungibleToken for WrappedNativeToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, owner: Address) -> u128 {
        self.book.balance_of(owner)
    }

    fn total_supply(&self) -> u128 {
        self.book.total_supply()
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: u128) -> HostResult<()> {
        self.book.approve(owner, spender, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> HostResult<()> {
        self.book.transfer_from(spender, from, to, amount)
    }
}

impl WrappedNative for WrappedNativeToken {
    fn deposit(&mut self, bank: &mut dyn NativeBank, owner: Address, value: u128) -> HostResult<()> {
        bank.transfer(owner, self.address, value)?;
        self.book.mint(owner, value)
    }

    fn withdraw(&mut self, bank: &mut dyn NativeBank, owner: Address, amount: u128) -> HostResult<()> {
        self.book.burn(owner, amount)?;
        bank.transfer(self.address, owner, amount)
    }

    fn as_fungible(&mut self) -> &mut dyn FungibleToken {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::NativeBalances;

    #[test]
    fn test_allowances() {
        let owner = Address::from_low_u64(1);
        let spender = Address::from_low_u64(2);
        let mut book = TokenBook::default();
        book.mint(owner, 100).unwrap();

        assert!(book.transfer_from(spender, owner, spender, 1).is_err());
        book.approve(owner, spender, 30);
        book.transfer_from(spender, owner, spender, 20).unwrap();
        assert_eq!(book.allowance(owner, spender), 10);
        assert!(book.transfer_from(spender, owner, spender, 11).is_err());

        book.approve(owner, spender, u128::MAX);
        book.transfer_from(spender, owner, spender, 50).unwrap();
        assert_eq!(book.allowance(owner, spender), u128::MAX);

        // Owners move their own balance freely
        book.transfer_from(owner, owner, spender, 30).unwrap();
        assert_eq!(book.balance_of(owner), 0);
        assert_eq!(book.balance_of(spender), 100);
        assert_eq!(book.total_supply(), 100);
    }

    #[test]
    fn test_only_minter_mints_and_burns() {
        let curve = Address::from_low_u64(0xc0);
        let user = Address::from_low_u64(1);
        let mut ledger = Erc20Ledger::new(Address::from_low_u64(0xa5), 18);

        assert!(ledger.mint(curve, user, 5).is_err());
        ledger.set_minter(curve);
        ledger.mint(curve, user, 5).unwrap();
        assert!(ledger.mint(user, user, 5).is_err());
        assert!(ledger.burn(user, user, 5).is_err());
        ledger.burn(curve, user, 2).unwrap();
        assert_eq!(ledger.balance_of(user), 3);
        assert_eq!(FungibleToken::total_supply(&ledger), 3);
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let owner = Address::from_low_u64(1);
        let mut bank = NativeBalances::new();
        bank.credit(owner, 100);
        let mut wrapped = WrappedNativeToken::new(Address::from_low_u64(0x7e));

        wrapped.deposit(&mut bank, owner, 60).unwrap();
        assert_eq!(bank.balance_of(owner), 40);
        assert_eq!(wrapped.balance_of(owner), 60);
        assert!(wrapped.deposit(&mut bank, owner, 41).is_err());

        wrapped.withdraw(&mut bank, owner, 25).unwrap();
        assert_eq!(bank.balance_of(owner), 65);
        assert_eq!(wrapped.total_supply(), 35);
        assert!(wrapped.withdraw(&mut bank, owner, 36).is_err());
    }
}
