//! Bridges a plan evaluation to the rule engine.
//!
//! [`PlanEnvironment`] owns plan-local state (variables, the event log, the
//! finished flag, the RNG) and forwards every world call to the
//! [`GameEngine`], recording one [`GameEvent`] per call with the cursor
//! position captured before the call ran.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use terraplan_lang::{GameWorld, LangError, Variables};
use terraplan_protocol::{Direction, EventData, GameEvent, PlayerId};

use crate::engine::{now_ms, GameEngine};
use crate::error::GameError;

pub struct PlanEnvironment {
    engine: GameEngine,
    player_id: PlayerId,
    vars: HashMap<String, i64>,
    events: Vec<GameEvent>,
    finished: bool,
    rng: StdRng,
}

impl PlanEnvironment {
    pub fn new(engine: GameEngine, player_id: PlayerId, seed: u64) -> Self {
        Self {
            engine,
            player_id,
            vars: HashMap::new(),
            events: Vec::new(),
            finished: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }

    fn cursor(&self) -> Result<(i64, i64), LangError> {
        self.engine.cursor().map_err(world)
    }

    fn record(&mut self, data: EventData) {
        self.events.push(GameEvent {
            data,
            at_ms: now_ms(),
        });
    }
}

fn world(err: GameError) -> LangError {
    LangError::World(err.to_string())
}

impl Variables for PlanEnvironment {
    fn get_var(&self, name: &str) -> Option<i64> {
        self.vars.get(name).copied()
    }

    fn set_var(&mut self, name: &str, value: i64) {
        self.vars.insert(name.to_string(), value);
    }
}

impl GameWorld for PlanEnvironment {
    fn move_cursor(&mut self, dir: Direction) -> Result<bool, LangError> {
        let (row, col) = self.cursor()?;
        let out = self.engine.move_cursor(&self.player_id, dir).map_err(world)?;
        self.record(EventData::Move {
            dir,
            success: out.success,
            row,
            col,
        });
        Ok(out.success)
    }

    fn relocate(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let out = self.engine.relocate(&self.player_id).map_err(world)?;
        self.record(EventData::Relocate {
            amount: out.value,
            success: out.success,
            row,
            col,
        });
        Ok(out.value)
    }

    fn invest(&mut self, amount: i64) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let out = self.engine.invest(&self.player_id, amount).map_err(world)?;
        self.record(EventData::Invest {
            amount: out.value,
            success: out.success,
            row,
            col,
        });
        Ok(out.value)
    }

    fn collect(&mut self, amount: i64) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let out = self.engine.collect(&self.player_id, amount).map_err(world)?;
        self.record(EventData::Collect {
            amount: out.value,
            success: out.success,
            row,
            col,
        });
        Ok(out.value)
    }

    fn shoot(&mut self, dir: Direction, money: i64) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let out = self
            .engine
            .shoot(&self.player_id, dir, money)
            .map_err(world)?;
        self.record(EventData::Shoot {
            dir,
            damage: out.value,
            success: out.success,
            row,
            col,
        });
        Ok(out.value)
    }

    fn opponent(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let out = self.engine.opponent(&self.player_id).map_err(world)?;
        self.record(EventData::Opponent {
            score: out.value,
            row,
            col,
        });
        Ok(out.value)
    }

    fn nearby(&mut self, dir: Direction) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let out = self.engine.nearby(&self.player_id, dir).map_err(world)?;
        self.record(EventData::Nearby {
            dir,
            score: out.value,
            row,
            col,
        });
        Ok(out.value)
    }

    fn done(&mut self) -> Result<(), LangError> {
        let (row, col) = self.cursor()?;
        self.finished = true;
        self.record(EventData::Done { row, col });
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.finished
    }

    fn rows(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.engine.rows();
        self.record(EventData::Rows { value, row, col });
        Ok(value)
    }

    fn cols(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.engine.cols();
        self.record(EventData::Cols { value, row, col });
        Ok(value)
    }

    fn current_row(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        self.record(EventData::CurrentRow {
            value: row,
            row,
            col,
        });
        Ok(row)
    }

    fn current_col(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        self.record(EventData::CurrentCol {
            value: col,
            row,
            col,
        });
        Ok(col)
    }

    fn budget(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.engine.budget(&self.player_id).map_err(world)?;
        self.record(EventData::Budget { value, row, col });
        Ok(value)
    }

    fn deposit(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.engine.deposit().map_err(world)?;
        self.record(EventData::Deposit { value, row, col });
        Ok(value)
    }

    fn interest(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.engine.interest();
        self.record(EventData::Interest { value, row, col });
        Ok(value)
    }

    fn max_deposit(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.engine.max_deposit().map_err(world)?;
        self.record(EventData::MaxDeposit { value, row, col });
        Ok(value)
    }

    fn random(&mut self) -> Result<i64, LangError> {
        let (row, col) = self.cursor()?;
        let value = self.rng.gen_range(0..100);
        self.record(EventData::Random { value, row, col });
        Ok(value)
    }
}
