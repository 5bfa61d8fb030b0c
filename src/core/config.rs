//! Rule constants.
//!
//! Every number the rules engine consults lives in `RulesConfig`. The
//! defaults reproduce the classic ruleset; embedders override individual
//! values with the `with_*` builders or load a JSON document where missing
//! keys fall back to the defaults.

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Rule constants for a game session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cash each player starts with.
    pub starting_money: i64,

    /// Salary credited for passing or landing on GO.
    pub go_salary: i64,

    /// Fixed fee to leave jail without a qualifying roll.
    pub bail: i64,

    /// Failed release rolls before bail is charged automatically.
    pub max_jail_turns: u32,

    /// Consecutive doubles that send the roller to jail.
    pub doubles_to_jail: u32,

    /// Interest charged on unmortgage, in percent of the mortgage value.
    pub unmortgage_interest_percent: i64,

    /// Ring buffer capacity of the event log.
    pub event_log_capacity: usize,

    /// Most recent committed actions kept in the action history.
    pub history_capacity: usize,

    /// Number of trailing log lines included in a snapshot.
    pub snapshot_messages: usize,

    /// Minimum registered players needed to start.
    pub min_players: usize,

    /// Maximum players that may register.
    pub max_players: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_money: 1500,
            go_salary: 200,
            bail: 50,
            max_jail_turns: 3,
            doubles_to_jail: 3,
            unmortgage_interest_percent: 10,
            event_log_capacity: 50,
            history_capacity: 200,
            snapshot_messages: 10,
            min_players: 2,
            max_players: 4,
        }
    }
}

impl RulesConfig {
    /// Parse a config from JSON. Missing keys take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.min_players < 2 {
            return Err(GameError::InvalidConfig("min_players must be at least 2".into()));
        }
        if self.max_players < self.min_players {
            return Err(GameError::InvalidConfig(
                "max_players must not be below min_players".into(),
            ));
        }
        if self.max_players > u8::MAX as usize {
            return Err(GameError::InvalidConfig("at most 255 players supported".into()));
        }
        if self.event_log_capacity == 0 || self.history_capacity == 0 {
            return Err(GameError::InvalidConfig("log capacities must be positive".into()));
        }
        if self.doubles_to_jail == 0 || self.max_jail_turns == 0 {
            return Err(GameError::InvalidConfig("jail thresholds must be positive".into()));
        }
        if self.starting_money < 0 || self.go_salary < 0 || self.bail < 0 {
            return Err(GameError::InvalidConfig("amounts must not be negative".into()));
        }
        Ok(())
    }

    /// Cost of lifting a mortgage worth `mortgage_value`.
    #[must_use]
    pub fn unmortgage_cost(&self, mortgage_value: i64) -> i64 {
        mortgage_value * (100 + self.unmortgage_interest_percent) / 100
    }

    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    #[must_use]
    pub fn with_go_salary(mut self, salary: i64) -> Self {
        self.go_salary = salary;
        self
    }

    #[must_use]
    pub fn with_bail(mut self, bail: i64) -> Self {
        self.bail = bail;
        self
    }

    #[must_use]
    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_player_limits(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }
}
