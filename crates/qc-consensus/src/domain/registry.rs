//! `ValidatorRegistry`: the stake-weighted validator set backing leader
//! selection. All mutating operations invalidate the cached active-set
//! snapshot; it is rebuilt lazily on the next read.

use super::errors::ConsensusError;
use shared_types::{Address, PublicKey, Validator, ValidatorStatus};
use std::collections::HashMap;

/// Configuration for registry-level policy.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Minimum stake a validator must hold to remain `Active`.
    pub minimum_stake: u64,
    /// Seconds a validator stays ineligible after a penalty.
    pub cooldown_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            minimum_stake: 10_000,
            cooldown_seconds: 3600,
        }
    }
}

/// The validator set: registration, stake bookkeeping, penalties, rewards.
pub struct ValidatorRegistry {
    config: RegistryConfig,
    validators: HashMap<Address, Validator>,
    /// Cached `getActive()` result, invalidated by any mutation.
    active_cache: Option<Vec<Address>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry under `config`.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            validators: HashMap::new(),
            active_cache: None,
        }
    }

    fn invalidate_cache(&mut self) {
        self.active_cache = None;
    }

    /// Registers a new validator with an initial stake, active immediately
    /// if stake already meets the minimum.
    pub fn add(
        &mut self,
        address: Address,
        public_key: PublicKey,
        stake: u64,
        commission_rate_bps: u32,
        now: u64,
    ) -> Result<(), ConsensusError> {
        if self.validators.contains_key(&address) {
            return Err(ConsensusError::AlreadyRegistered(address));
        }
        let status = if stake >= self.config.minimum_stake {
            ValidatorStatus::Active
        } else {
            ValidatorStatus::Inactive
        };
        self.validators.insert(
            address,
            Validator {
                address,
                public_key,
                stake,
                status,
                commission_rate_bps,
                blocks_produced: 0,
                blocks_missed: 0,
                penalties_count: 0,
                last_activity_block: 0,
                registered_at: now,
                cooldown_until: 0,
                rewards_ledger: 0,
            },
        );
        self.invalidate_cache();
        Ok(())
    }

    /// Removes a validator entirely (voluntary exit).
    pub fn remove(&mut self, address: &Address) -> Result<Validator, ConsensusError> {
        let validator = self
            .validators
            .remove(address)
            .ok_or(ConsensusError::ValidatorNotFound(*address))?;
        self.invalidate_cache();
        Ok(validator)
    }

    /// `increaseStake`: adds to a validator's stake, reactivating it if the
    /// new total clears the minimum.
    pub fn increase_stake(&mut self, address: &Address, amount: u64) -> Result<u64, ConsensusError> {
        let validator = self
            .validators
            .get_mut(address)
            .ok_or(ConsensusError::ValidatorNotFound(*address))?;
        validator.stake += amount;
        if validator.status == ValidatorStatus::Inactive && validator.stake >= self.config.minimum_stake {
            validator.status = ValidatorStatus::Active;
        }
        let stake = validator.stake;
        self.invalidate_cache();
        Ok(stake)
    }

    /// `decreaseStake`: rejects the operation with `BelowMinimum` if it
    /// would drop the validator under the configured floor while still
    /// `Active`; an `Unbonding`/`Jailed` validator may withdraw freely.
    pub fn decrease_stake(&mut self, address: &Address, amount: u64) -> Result<u64, ConsensusError> {
        let validator = self
            .validators
            .get_mut(address)
            .ok_or(ConsensusError::ValidatorNotFound(*address))?;
        let resulting = validator.stake.saturating_sub(amount);
        if validator.status == ValidatorStatus::Active && resulting < self.config.minimum_stake {
            return Err(ConsensusError::BelowMinimum {
                address: *address,
                resulting,
                minimum: self.config.minimum_stake,
            });
        }
        validator.stake = resulting;
        if resulting < self.config.minimum_stake {
            validator.status = ValidatorStatus::Inactive;
        }
        self.invalidate_cache();
        Ok(resulting)
    }

    /// `penalize`: subtracts `amount` from stake, increments the penalty
    /// counter. Drops to `Jailed` with a cooldown if stake falls below the
    /// minimum, otherwise stays `Active` but still serves a cooldown before
    /// being eligible for leader selection again.
    pub fn penalize(
        &mut self,
        address: &Address,
        amount: u64,
        now: u64,
        height: u64,
    ) -> Result<(), ConsensusError> {
        let validator = self
            .validators
            .get_mut(address)
            .ok_or(ConsensusError::ValidatorNotFound(*address))?;
        validator.stake = validator.stake.saturating_sub(amount);
        validator.penalties_count += 1;
        validator.last_activity_block = height;
        validator.cooldown_until = now + self.config.cooldown_seconds;
        if validator.stake < self.config.minimum_stake {
            validator.status = ValidatorStatus::Jailed;
        }
        self.invalidate_cache();
        Ok(())
    }

    /// `reward`: credits the rewards ledger, distinct from staked balance.
    pub fn reward(&mut self, address: &Address, amount: u64, height: u64) -> Result<(), ConsensusError> {
        let validator = self
            .validators
            .get_mut(address)
            .ok_or(ConsensusError::ValidatorNotFound(*address))?;
        validator.rewards_ledger += amount;
        validator.blocks_produced += 1;
        validator.last_activity_block = height;
        // Rewards don't change the active set; no cache invalidation needed.
        Ok(())
    }

    /// `getActive()`: validators that are `Active`, clear the minimum
    /// stake, and are past any cooldown, ordered by descending stake with
    /// earliest-registration as the tie-break (the same order leader
    /// selection walks).
    pub fn get_active(&mut self, now: u64) -> Vec<&Validator> {
        let mut addrs: Vec<Address> = self
            .validators
            .values()
            .filter(|v| {
                v.status == ValidatorStatus::Active
                    && v.stake >= self.config.minimum_stake
                    && v.cooldown_until <= now
            })
            .map(|v| v.address)
            .collect();
        addrs.sort_by_key(|a| {
            let v = &self.validators[a];
            (std::cmp::Reverse(v.stake), v.registered_at)
        });
        self.active_cache = Some(addrs.clone());
        addrs.into_iter().map(|a| &self.validators[&a]).collect()
    }

    /// Looks up a validator by address.
    #[must_use]
    pub fn get(&self, address: &Address) -> Option<&Validator> {
        self.validators.get(address)
    }

    /// Number of registered validators (any status).
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        [b; 20]
    }

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::new(RegistryConfig {
            minimum_stake: 1_000,
            cooldown_seconds: 100,
        })
    }

    #[test]
    fn add_below_minimum_is_inactive() {
        let mut r = registry();
        r.add(addr(1), [0u8; 33], 500, 0, 1_000).unwrap();
        assert_eq!(r.get(&addr(1)).unwrap().status, ValidatorStatus::Inactive);
        assert!(r.get_active(1_000).is_empty());
    }

    #[test]
    fn decrease_below_minimum_rejected_while_active() {
        let mut r = registry();
        r.add(addr(1), [0u8; 33], 2_000, 0, 1_000).unwrap();
        let err = r.decrease_stake(&addr(1), 1_500).unwrap_err();
        assert!(matches!(err, ConsensusError::BelowMinimum { .. }));
    }

    #[test]
    fn penalize_jails_when_stake_drops_below_minimum() {
        let mut r = registry();
        r.add(addr(1), [0u8; 33], 1_500, 0, 1_000).unwrap();
        r.penalize(&addr(1), 1_000, 2_000, 5).unwrap();
        let v = r.get(&addr(1)).unwrap();
        assert_eq!(v.status, ValidatorStatus::Jailed);
        assert_eq!(v.penalties_count, 1);
        assert_eq!(v.cooldown_until, 2_100);
    }

    #[test]
    fn get_active_orders_by_stake_then_registration() {
        let mut r = registry();
        r.add(addr(1), [0u8; 33], 2_000, 0, 1_000).unwrap();
        r.add(addr(2), [0u8; 33], 3_000, 0, 999).unwrap();
        r.add(addr(3), [0u8; 33], 3_000, 0, 1_001).unwrap();
        let active = r.get_active(2_000);
        assert_eq!(active[0].address, addr(2));
        assert_eq!(active[1].address, addr(3));
        assert_eq!(active[2].address, addr(1));
    }

    #[test]
    fn reward_accrues_separately_from_stake() {
        let mut r = registry();
        r.add(addr(1), [0u8; 33], 2_000, 0, 1_000).unwrap();
        r.reward(&addr(1), 50, 10).unwrap();
        let v = r.get(&addr(1)).unwrap();
        assert_eq!(v.stake, 2_000);
        assert_eq!(v.rewards_ledger, 50);
        assert_eq!(v.blocks_produced, 1);
    }
}
