use time::OffsetDateTime;
use tracing::info;

use super::{Store, StoreError};
use crate::model::{Id, MiningActivity, MiningStats};
use crate::money::Bbc;

impl Store {
    pub fn record_mining(&self, user_id: Id, clicks: u32, mined: Bbc) -> Result<MiningActivity, StoreError> {
        if clicks == 0 {
            return Err(StoreError::Invalid("Clicks must be at least 1"));
        }
        if !mined.is_positive() {
            return Err(StoreError::NonPositiveAmount);
        }

        let mut user = self.users.get_mut(&user_id).ok_or(StoreError::UserNotFound)?;
        if user.is_banned {
            return Err(StoreError::Banned);
        }
        user.bbc_balance = user.bbc_balance.checked_add(mined).ok_or(StoreError::Overflow)?;
        drop(user);

        let activity = MiningActivity {
            id: self.ids.mining.next(),
            user_id,
            bbc_mined: mined,
            clicks,
            created_at: OffsetDateTime::now_utc(),
        };
        self.mining.insert(activity.id, activity.clone());
        info!(user_id, mined = %mined, clicks, "mined BBC");
        Ok(activity)
    }

    pub fn mining_stats(&self, user_id: Id) -> MiningStats {
        let (total_mined, total_clicks) = self
            .mining
            .iter()
            .filter(|m| m.user_id == user_id)
            .fold((Bbc::ZERO, 0u64), |(mined, clicks), m| {
                (mined.checked_add(m.bbc_mined).unwrap_or(mined), clicks + u64::from(m.clicks))
            });
        MiningStats { total_mined, total_clicks }
    }
}
