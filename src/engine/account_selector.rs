//! # engine::account_selector
//!
//! Picks the broker account that receives order placements.
//!
//! ```text
//! 1 account           → that account
//! several accounts    → the one named "trade" (any case)
//! otherwise           → none
//! ```

use crate::models::Account;

/// Name of the dedicated trading account on multi-account exchanges.
pub const TRADE_ACCOUNT_NAME: &str = "trade";

/// Select the trade account from the broker's current account set.
///
/// Pure: the answer depends on `accounts` only, never on earlier selections.
pub fn select_trade_account<'a, I>(accounts: I) -> Option<&'a Account>
where
    I: IntoIterator<Item = &'a Account>,
{
    let accounts: Vec<&Account> = accounts.into_iter().collect();

    match accounts.as_slice() {
        [only] => Some(*only),
        many => many
            .iter()
            .copied()
            .find(|a| a.name.eq_ignore_ascii_case(TRADE_ACCOUNT_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_account_selected_unconditionally() {
        let accounts = [Account::new("a1", "main")];
        assert_eq!(select_trade_account(&accounts).map(|a| a.id.as_str()), Some("a1"));
    }

    #[test]
    fn test_trade_account_selected_among_many() {
        let accounts = [Account::new("a1", "main"), Account::new("a2", "trade")];
        assert_eq!(select_trade_account(&accounts).map(|a| a.id.as_str()), Some("a2"));
    }

    #[test]
    fn test_trade_name_match_ignores_case() {
        let accounts = [Account::new("a1", "Main"), Account::new("a2", "TRADE")];
        assert_eq!(select_trade_account(&accounts).map(|a| a.id.as_str()), Some("a2"));
    }

    #[test]
    fn test_no_trade_account_among_many() {
        let accounts = [Account::new("a1", "main"), Account::new("a2", "savings")];
        assert!(select_trade_account(&accounts).is_none());
    }

    #[test]
    fn test_empty_set_selects_nothing() {
        let accounts: [Account; 0] = [];
        assert!(select_trade_account(&accounts).is_none());
    }

    #[test]
    fn test_name_must_match_exactly() {
        let accounts = [Account::new("a1", "main"), Account::new("a2", "trader")];
        assert!(select_trade_account(&accounts).is_none());
    }
}
