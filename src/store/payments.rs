use time::OffsetDateTime;
use tracing::info;

use super::{newest_first, Store, StoreError};
use crate::model::{Deposit, Id, PaymentMethod, Status, Withdrawal};
use crate::money::Coins;

impl Store {
    /// File a deposit request. Balances only change once an admin approves it.
    pub fn create_deposit(
        &self,
        user_id: Id,
        amount: Coins,
        method: PaymentMethod,
        receipt_url: Option<String>,
    ) -> Result<Deposit, StoreError> {
        if !amount.is_positive() {
            return Err(StoreError::NonPositiveAmount);
        }
        let user = self.user(user_id)?;
        if user.is_banned {
            return Err(StoreError::Banned);
        }
        let deposit = Deposit {
            id: self.ids.deposits.next(),
            user_id,
            username: user.username,
            amount,
            payment_method: method,
            receipt_url: receipt_url.filter(|u| !u.trim().is_empty()),
            status: Status::Pending,
            created_at: OffsetDateTime::now_utc(),
        };
        self.deposits.insert(deposit.id, deposit.clone());
        info!(user_id, deposit_id = deposit.id, amount = %amount, ?method, "deposit requested");
        Ok(deposit)
    }

    pub fn decide_deposit(&self, id: Id, approve: bool) -> Result<Deposit, StoreError> {
        let mut deposit = self.deposits.get_mut(&id).ok_or(StoreError::DepositNotFound)?;
        if deposit.status != Status::Pending {
            return Err(StoreError::AlreadyDecided);
        }
        if approve {
            let mut user = self.users.get_mut(&deposit.user_id).ok_or(StoreError::UserNotFound)?;
            user.coin_balance = user.coin_balance.checked_add(deposit.amount).ok_or(StoreError::Overflow)?;
            deposit.status = Status::Approved;
        } else {
            deposit.status = Status::Rejected;
        }
        info!(deposit_id = id, user_id = deposit.user_id, amount = %deposit.amount, approve, "deposit decided");
        Ok(deposit.clone())
    }

    /// Withdrawals hold the coins at request time; a rejection gives them back.
    pub fn create_withdrawal(
        &self,
        user_id: Id,
        amount: Coins,
        method: PaymentMethod,
        account_details: &str,
    ) -> Result<Withdrawal, StoreError> {
        if !amount.is_positive() {
            return Err(StoreError::NonPositiveAmount);
        }
        let account_details = account_details.trim();
        if account_details.is_empty() {
            return Err(StoreError::Invalid("Account details are required"));
        }

        let mut user = self.users.get_mut(&user_id).ok_or(StoreError::UserNotFound)?;
        if user.is_banned {
            return Err(StoreError::Banned);
        }
        if user.coin_balance < amount {
            return Err(StoreError::InsufficientBalance);
        }
        user.coin_balance = user.coin_balance.checked_sub(amount).ok_or(StoreError::Overflow)?;
        let withdrawal = Withdrawal {
            id: self.ids.withdrawals.next(),
            user_id,
            username: user.username.clone(),
            amount,
            withdrawal_method: method,
            account_details: account_details.to_owned(),
            status: Status::Pending,
            created_at: OffsetDateTime::now_utc(),
        };
        drop(user);

        self.withdrawals.insert(withdrawal.id, withdrawal.clone());
        info!(user_id, withdrawal_id = withdrawal.id, amount = %amount, ?method, "withdrawal requested");
        Ok(withdrawal)
    }

    pub fn decide_withdrawal(&self, id: Id, approve: bool) -> Result<Withdrawal, StoreError> {
        let mut withdrawal = self.withdrawals.get_mut(&id).ok_or(StoreError::WithdrawalNotFound)?;
        if withdrawal.status != Status::Pending {
            return Err(StoreError::AlreadyDecided);
        }
        if approve {
            withdrawal.status = Status::Approved;
        } else {
            let mut user = self.users.get_mut(&withdrawal.user_id).ok_or(StoreError::UserNotFound)?;
            user.coin_balance = user.coin_balance.checked_add(withdrawal.amount).ok_or(StoreError::Overflow)?;
            withdrawal.status = Status::Rejected;
        }
        info!(
            withdrawal_id = id,
            user_id = withdrawal.user_id,
            amount = %withdrawal.amount,
            approve,
            "withdrawal decided"
        );
        Ok(withdrawal.clone())
    }

    pub fn user_deposits(&self, user_id: Id) -> Vec<Deposit> {
        self.deposits_where(|d| d.user_id == user_id)
    }

    pub fn pending_deposits(&self) -> Vec<Deposit> {
        self.deposits_where(|d| d.status == Status::Pending)
    }

    pub fn user_withdrawals(&self, user_id: Id) -> Vec<Withdrawal> {
        self.withdrawals_where(|w| w.user_id == user_id)
    }

    pub fn pending_withdrawals(&self) -> Vec<Withdrawal> {
        self.withdrawals_where(|w| w.status == Status::Pending)
    }

    fn deposits_where(&self, keep: impl Fn(&Deposit) -> bool) -> Vec<Deposit> {
        let rows = self.deposits.iter().filter(|d| keep(d)).map(|d| d.clone()).collect();
        newest_first(rows, |d: &Deposit| (d.created_at, d.id))
    }

    fn withdrawals_where(&self, keep: impl Fn(&Withdrawal) -> bool) -> Vec<Withdrawal> {
        let rows = self.withdrawals.iter().filter(|w| keep(w)).map(|w| w.clone()).collect();
        newest_first(rows, |w: &Withdrawal| (w.created_at, w.id))
    }
}
