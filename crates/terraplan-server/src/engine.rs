//! The territory rule engine.
//!
//! Every action follows the same protocol:
//! 1. reject action-specific bad input — no charge, no mutation;
//! 2. abort with a zero result when the acting player's budget is already
//!    spent — no charge;
//! 3. otherwise debit the flat 1-unit attempt cost, success or not;
//! 4. check feasibility (bounds, ownership, adjacency, resources) — failure
//!    returns zero and the debit stands;
//! 5. on success mutate region and player through the store and return the
//!    achieved magnitude.
//!
//! The engine never keeps references into the world between calls: each step
//! re-fetches through the store to match store-of-record semantics.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use terraplan_protocol::{Direction, GameConfig, GameId, Player, PlayerId};
use tracing::debug;

use crate::error::GameError;
use crate::store::GameStore;

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Result of one action attempt. `value` is the achieved magnitude (amount
/// moved/invested/collected, damage dealt, scan score); failed attempts carry
/// zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub value: i64,
    pub success: bool,
}

impl ActionOutcome {
    fn success(value: i64) -> Self {
        Self {
            value,
            success: true,
        }
    }

    fn failure() -> Self {
        Self {
            value: 0,
            success: false,
        }
    }
}

/// Rule engine bound to one game. Cheap to construct per plan run.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    game_id: GameId,
    config: GameConfig,
}

impl GameEngine {
    pub fn new(store: Arc<dyn GameStore>, game_id: GameId) -> Result<Self, GameError> {
        let config = store.get_game_config(&game_id)?;
        Ok(Self {
            store,
            game_id,
            config,
        })
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The acting cursor position for the turn in progress.
    pub fn cursor(&self) -> Result<(i64, i64), GameError> {
        let state = self.store.get_current_state(&self.game_id)?;
        Ok((state.row, state.col))
    }

    /// Budget gate + flat attempt cost. Returns the post-debit player record,
    /// or `None` when the gate failed (no charge taken).
    fn gate_and_charge(&self, player_id: &PlayerId) -> Result<Option<Player>, GameError> {
        let mut player = self.store.get_player(&self.game_id, player_id)?;
        if player.budget <= 0 {
            return Ok(None);
        }
        player.adjust_budget(-1);
        self.store
            .update_player_budget(&self.game_id, player_id, player.budget)?;
        Ok(Some(player))
    }

    /// Step the cursor one region in `dir`. Succeeds onto wasteland or the
    /// player's own territory.
    pub fn move_cursor(
        &self,
        player_id: &PlayerId,
        dir: Direction,
    ) -> Result<ActionOutcome, GameError> {
        let Some(_) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        let (row, col) = self.cursor()?;
        let (target_row, target_col) = dir.step(row, col);
        if !self.config.in_bounds(target_row, target_col) {
            debug!(%player_id, %dir, "move out of bounds");
            return Ok(ActionOutcome::failure());
        }
        let region = self.store.get_region(&self.game_id, target_row, target_col)?;
        if region.owner.as_ref().is_some_and(|o| o != player_id) {
            debug!(%player_id, %dir, "move blocked by opponent territory");
            return Ok(ActionOutcome::failure());
        }
        self.store
            .update_current_position(&self.game_id, target_row, target_col)?;
        Ok(ActionOutcome::success(1))
    }

    /// Move the city center to the cursor region. Requires ownership of both
    /// the old center and the target, plus the configured relocation cost.
    pub fn relocate(&self, player_id: &PlayerId) -> Result<ActionOutcome, GameError> {
        let Some(player) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        let (row, col) = self.cursor()?;
        let target = self.store.get_region(&self.game_id, row, col)?;
        let center = self
            .store
            .get_region(&self.game_id, player.city_row, player.city_col)?;
        if !target.is_owned_by(player_id) || !center.is_owned_by(player_id) {
            return Ok(ActionOutcome::failure());
        }
        if player.budget < self.config.relocation_cost {
            return Ok(ActionOutcome::failure());
        }

        let mut old_center = center;
        old_center.owner = None;
        self.store.update_region(&self.game_id, &old_center)?;

        // Re-fetch in case the target and the old center were the same tile.
        let mut new_center = self.store.get_region(&self.game_id, row, col)?;
        new_center.owner = Some(player_id.clone());
        new_center.deposit = new_center
            .deposit
            .max(self.config.city_deposit.min(new_center.max_deposit));
        self.store.update_region(&self.game_id, &new_center)?;

        let mut player = self.store.get_player(&self.game_id, player_id)?;
        player.city_row = row;
        player.city_col = col;
        player.adjust_budget(-self.config.relocation_cost);
        self.store.save_player(&self.game_id, &player)?;

        debug!(%player_id, row, col, "relocated city center");
        Ok(ActionOutcome::success(self.config.relocation_cost))
    }

    /// Grow the cursor region's deposit and claim it. Only allowed on the
    /// player's frontier: the region itself or one of its six neighbors must
    /// already be owned by the player.
    pub fn invest(&self, player_id: &PlayerId, amount: i64) -> Result<ActionOutcome, GameError> {
        if amount <= 0 {
            return Ok(ActionOutcome::failure());
        }
        let Some(player) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        let (row, col) = self.cursor()?;
        let mut region = self.store.get_region(&self.game_id, row, col)?;
        if region.owner.as_ref().is_some_and(|o| o != player_id) {
            return Ok(ActionOutcome::failure());
        }
        if !self.on_frontier(player_id, row, col)? {
            return Ok(ActionOutcome::failure());
        }
        if player.budget < amount {
            return Ok(ActionOutcome::failure());
        }

        let invested = amount.min(region.remaining_capacity());
        region.deposit += invested;
        region.owner = Some(player_id.clone());
        self.store.update_region(&self.game_id, &region)?;
        self.store
            .increment_player_budget(&self.game_id, player_id, -invested)?;

        debug!(%player_id, row, col, invested, "invest");
        Ok(ActionOutcome::success(invested))
    }

    /// Withdraw exactly `amount` from the cursor region. No partial
    /// collection: an insufficient deposit fails outright.
    pub fn collect(&self, player_id: &PlayerId, amount: i64) -> Result<ActionOutcome, GameError> {
        if amount <= 0 {
            return Ok(ActionOutcome::failure());
        }
        let Some(_) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        let (row, col) = self.cursor()?;
        let mut region = self.store.get_region(&self.game_id, row, col)?;
        if !region.is_owned_by(player_id) || region.deposit < amount {
            return Ok(ActionOutcome::failure());
        }

        region.deposit -= amount;
        if region.deposit == 0 {
            region.owner = None;
        }
        self.store.update_region(&self.game_id, &region)?;
        self.store
            .increment_player_budget(&self.game_id, player_id, amount)?;

        debug!(%player_id, row, col, amount, "collect");
        Ok(ActionOutcome::success(amount))
    }

    /// Fire at the neighbor region in `dir`, capturing up to `money` of its
    /// deposit. Destroying a city center eliminates its owner.
    pub fn shoot(
        &self,
        player_id: &PlayerId,
        dir: Direction,
        money: i64,
    ) -> Result<ActionOutcome, GameError> {
        if money <= 0 {
            return Ok(ActionOutcome::failure());
        }
        let Some(player) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        if player.budget < money {
            return Ok(ActionOutcome::failure());
        }
        let (row, col) = self.cursor()?;
        let (target_row, target_col) = dir.step(row, col);
        if !self.config.in_bounds(target_row, target_col) {
            return Ok(ActionOutcome::failure());
        }

        let mut region = self.store.get_region(&self.game_id, target_row, target_col)?;
        let damage = money.min(region.deposit);
        region.deposit -= damage;
        let destroyed = damage > 0 && region.deposit == 0;
        if destroyed {
            region.owner = None;
        }
        self.store.update_region(&self.game_id, &region)?;

        if destroyed {
            self.eliminate_city_owner(target_row, target_col)?;
        }

        self.store
            .increment_player_budget(&self.game_id, player_id, damage)?;

        debug!(%player_id, %dir, damage, "shoot");
        Ok(ActionOutcome::success(damage))
    }

    fn eliminate_city_owner(&self, row: i64, col: i64) -> Result<(), GameError> {
        for mut victim in self.store.get_game_players(&self.game_id)? {
            if victim.city_row == row && victim.city_col == col && !victim.is_eliminated() {
                victim.eliminate();
                self.store.save_player(&self.game_id, &victim)?;
                debug!(player = %victim.id, "city center destroyed, player eliminated");
            }
        }
        Ok(())
    }

    /// Scan outward along all six directions at once for the nearest
    /// opponent-owned region. Encodes the winning distance as `9 + 2·d`,
    /// or 0 when nothing is found before every ray leaves the grid.
    pub fn opponent(&self, player_id: &PlayerId) -> Result<ActionOutcome, GameError> {
        let Some(_) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        let (row, col) = self.cursor()?;

        let mut rays: Vec<(Direction, i64, i64, bool)> = Direction::ALL
            .iter()
            .map(|&dir| (dir, row, col, true))
            .collect();

        for distance in 1..=self.config.rows.max(self.config.cols) {
            let mut any_alive = false;
            for ray in rays.iter_mut() {
                let (dir, r, c, alive) = *ray;
                if !alive {
                    continue;
                }
                let (nr, nc) = dir.step(r, c);
                if !self.config.in_bounds(nr, nc) {
                    ray.3 = false;
                    continue;
                }
                any_alive = true;
                *ray = (dir, nr, nc, true);
                let region = self.store.get_region(&self.game_id, nr, nc)?;
                if region.owner.as_ref().is_some_and(|o| o != player_id) {
                    return Ok(ActionOutcome::success(score_for_distance(distance)));
                }
            }
            if !any_alive {
                break;
            }
        }
        Ok(ActionOutcome::success(0))
    }

    /// Single-ray variant of [`GameEngine::opponent`].
    pub fn nearby(&self, player_id: &PlayerId, dir: Direction) -> Result<ActionOutcome, GameError> {
        let Some(_) = self.gate_and_charge(player_id)? else {
            return Ok(ActionOutcome::failure());
        };
        let (mut row, mut col) = self.cursor()?;
        let mut distance = 0;
        loop {
            let (nr, nc) = dir.step(row, col);
            if !self.config.in_bounds(nr, nc) {
                return Ok(ActionOutcome::success(0));
            }
            row = nr;
            col = nc;
            distance += 1;
            let region = self.store.get_region(&self.game_id, row, col)?;
            if region.owner.as_ref().is_some_and(|o| o != player_id) {
                return Ok(ActionOutcome::success(score_for_distance(distance)));
            }
        }
    }

    fn on_frontier(&self, player_id: &PlayerId, row: i64, col: i64) -> Result<bool, GameError> {
        let region = self.store.get_region(&self.game_id, row, col)?;
        if region.is_owned_by(player_id) {
            return Ok(true);
        }
        for dir in Direction::ALL {
            let (nr, nc) = dir.step(row, col);
            if !self.config.in_bounds(nr, nc) {
                continue;
            }
            if self
                .store
                .get_region(&self.game_id, nr, nc)?
                .is_owned_by(player_id)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // Pure queries: no budget gate, no charge.

    pub fn rows(&self) -> i64 {
        self.config.rows
    }

    pub fn cols(&self) -> i64 {
        self.config.cols
    }

    pub fn interest(&self) -> i64 {
        self.config.interest_percent
    }

    pub fn budget(&self, player_id: &PlayerId) -> Result<i64, GameError> {
        Ok(self.store.get_player(&self.game_id, player_id)?.budget)
    }

    /// Deposit of the cursor region.
    pub fn deposit(&self) -> Result<i64, GameError> {
        let (row, col) = self.cursor()?;
        Ok(self.store.get_region(&self.game_id, row, col)?.deposit)
    }

    /// Deposit cap of the cursor region.
    pub fn max_deposit(&self) -> Result<i64, GameError> {
        let (row, col) = self.cursor()?;
        Ok(self.store.get_region(&self.game_id, row, col)?.max_deposit)
    }
}

fn score_for_distance(distance: i64) -> i64 {
    9 + 2 * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use terraplan_protocol::{CurrentState, GameInfo, GameStatus, Region};

    struct Fixture {
        store: Arc<MemoryStore>,
        engine: GameEngine,
        game: GameId,
        alice: PlayerId,
        bob: PlayerId,
    }

    /// 10×10 world, alice's city at (5,5) with deposit 50, bob's at (1,1).
    /// Cursor starts on alice's city center.
    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let game = GameId::new("ENGINE");
        let config = GameConfig::default();
        let info = GameInfo {
            status: GameStatus::InProgress,
            max_players: 2,
            current_turn: 0,
            round: 0,
            winner: None,
            created_at_ms: 0,
            updated_at_ms: 0,
        };
        store.create_game(&game, &info, &config).unwrap();

        let alice = PlayerId::new("alice");
        let bob = PlayerId::new("bob");
        for (id, row, col) in [(&alice, 5_i64, 5_i64), (&bob, 1, 1)] {
            store
                .add_player_to_game(
                    &game,
                    &Player {
                        id: id.clone(),
                        name: id.to_string(),
                        budget: 100,
                        city_row: row,
                        city_col: col,
                    },
                )
                .unwrap();
            let mut city = Region::wasteland(row, col, config.max_deposit);
            city.deposit = config.city_deposit;
            city.owner = Some(id.clone());
            store.update_region(&game, &city).unwrap();
        }
        store
            .update_current_player(
                &game,
                &CurrentState {
                    player_id: alice.clone(),
                    row: 5,
                    col: 5,
                },
            )
            .unwrap();

        let engine = GameEngine::new(store.clone(), game.clone()).unwrap();
        Fixture {
            store,
            engine,
            game,
            alice,
            bob,
        }
    }

    fn budget_of(f: &Fixture, id: &PlayerId) -> i64 {
        f.store.get_player(&f.game, id).unwrap().budget
    }

    #[test]
    fn move_onto_wasteland_updates_cursor_and_charges_one() {
        let f = fixture();
        let out = f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        assert!(out.success);
        assert_eq!(f.engine.cursor().unwrap(), (4, 5));
        assert_eq!(budget_of(&f, &f.alice), 99);
    }

    #[test]
    fn move_against_opponent_territory_fails_but_still_charges() {
        let f = fixture();
        let mut hostile = Region::wasteland(4, 5, 100);
        hostile.deposit = 10;
        hostile.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &hostile).unwrap();

        let out = f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        assert!(!out.success);
        assert_eq!(f.engine.cursor().unwrap(), (5, 5));
        assert_eq!(budget_of(&f, &f.alice), 99);
    }

    #[test]
    fn move_off_the_grid_fails() {
        let f = fixture();
        f.store.update_current_position(&f.game, 1, 5).unwrap();
        let out = f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        assert!(!out.success);
        assert_eq!(f.engine.cursor().unwrap(), (1, 5));
    }

    #[test]
    fn move_round_trips_under_parity() {
        let f = fixture();
        for dir in Direction::ALL {
            for start in [(5, 5), (5, 6)] {
                f.store
                    .update_current_position(&f.game, start.0, start.1)
                    .unwrap();
                assert!(f.engine.move_cursor(&f.alice, dir).unwrap().success);
                assert!(f
                    .engine
                    .move_cursor(&f.alice, dir.opposite())
                    .unwrap()
                    .success);
                assert_eq!(f.engine.cursor().unwrap(), start, "{dir:?} from {start:?}");
            }
        }
    }

    #[test]
    fn zero_budget_gates_without_charge() {
        let f = fixture();
        f.store
            .update_player_budget(&f.game, &f.alice, 0)
            .unwrap();
        let out = f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        assert!(!out.success);
        assert_eq!(budget_of(&f, &f.alice), 0);
    }

    #[test]
    fn invest_caps_at_remaining_capacity() {
        let f = fixture();
        // Cursor one step up from the city: wasteland adjacent to owned land.
        f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        f.store
            .update_region(&f.game, &Region::wasteland(4, 5, 50))
            .unwrap();

        let out = f.engine.invest(&f.alice, 60).unwrap();
        assert!(out.success);
        assert_eq!(out.value, 50);

        let region = f.store.get_region(&f.game, 4, 5).unwrap();
        assert_eq!(region.deposit, 50);
        assert_eq!(region.owner, Some(f.alice.clone()));
        // 100 - 1 (move) - 1 (invest attempt) - 50 (invested)
        assert_eq!(budget_of(&f, &f.alice), 48);
    }

    #[test]
    fn invest_requires_frontier_adjacency() {
        let f = fixture();
        // Jump the cursor to open wasteland far from alice's territory.
        f.store.update_current_position(&f.game, 9, 9).unwrap();
        let out = f.engine.invest(&f.alice, 10).unwrap();
        assert!(!out.success);
        // The attempt still cost the flat fee.
        assert_eq!(budget_of(&f, &f.alice), 99);
    }

    #[test]
    fn invest_rejects_non_positive_amount_without_charge() {
        let f = fixture();
        let out = f.engine.invest(&f.alice, -5).unwrap();
        assert!(!out.success);
        assert_eq!(budget_of(&f, &f.alice), 100);
    }

    #[test]
    fn invest_fails_when_budget_cannot_cover_amount() {
        let f = fixture();
        f.store
            .update_player_budget(&f.game, &f.alice, 5)
            .unwrap();
        let out = f.engine.invest(&f.alice, 50).unwrap();
        assert!(!out.success);
        assert_eq!(budget_of(&f, &f.alice), 4);
    }

    #[test]
    fn collect_exact_deposit_clears_ownership() {
        let f = fixture();
        let mut region = Region::wasteland(5, 5, 200);
        region.deposit = 100;
        region.owner = Some(f.alice.clone());
        f.store.update_region(&f.game, &region).unwrap();

        let out = f.engine.collect(&f.alice, 100).unwrap();
        assert!(out.success);
        assert_eq!(out.value, 100);

        let region = f.store.get_region(&f.game, 5, 5).unwrap();
        assert_eq!(region.deposit, 0);
        assert_eq!(region.owner, None);
        // 100 - 1 + 100
        assert_eq!(budget_of(&f, &f.alice), 199);
    }

    #[test]
    fn collect_refuses_partial_withdrawal() {
        let f = fixture();
        let out = f.engine.collect(&f.alice, 80).unwrap();
        assert!(!out.success);
        let region = f.store.get_region(&f.game, 5, 5).unwrap();
        assert_eq!(region.deposit, 50);
        assert_eq!(region.owner, Some(f.alice.clone()));
        assert_eq!(budget_of(&f, &f.alice), 99);
    }

    #[test]
    fn shoot_captures_deposit_and_clears_owner() {
        let f = fixture();
        let mut target = Region::wasteland(4, 5, 100);
        target.deposit = 50;
        target.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &target).unwrap();

        let out = f.engine.shoot(&f.alice, Direction::Up, 50).unwrap();
        assert!(out.success);
        assert_eq!(out.value, 50);

        let region = f.store.get_region(&f.game, 4, 5).unwrap();
        assert_eq!(region.deposit, 0);
        assert_eq!(region.owner, None);
        // 100 - 1 + 50 captured
        assert_eq!(budget_of(&f, &f.alice), 149);
    }

    #[test]
    fn shoot_damage_is_capped_by_target_deposit() {
        let f = fixture();
        let mut target = Region::wasteland(4, 5, 100);
        target.deposit = 20;
        target.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &target).unwrap();

        let out = f.engine.shoot(&f.alice, Direction::Up, 80).unwrap();
        assert!(out.success);
        assert_eq!(out.value, 20);
    }

    #[test]
    fn shoot_requires_stake_within_budget() {
        let f = fixture();
        let out = f.engine.shoot(&f.alice, Direction::Up, 500).unwrap();
        assert!(!out.success);
        assert_eq!(budget_of(&f, &f.alice), 99);
    }

    #[test]
    fn destroying_a_city_center_eliminates_its_owner() {
        let f = fixture();
        // Park bob's city next to the cursor.
        let mut bob = f.store.get_player(&f.game, &f.bob).unwrap();
        bob.city_row = 4;
        bob.city_col = 5;
        f.store.save_player(&f.game, &bob).unwrap();
        let mut city = Region::wasteland(4, 5, 100);
        city.deposit = 50;
        city.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &city).unwrap();

        let out = f.engine.shoot(&f.alice, Direction::Up, 50).unwrap();
        assert_eq!(out.value, 50);

        let bob = f.store.get_player(&f.game, &f.bob).unwrap();
        assert!(bob.is_eliminated());

        let survivors: Vec<_> = f
            .store
            .get_game_players(&f.game)
            .unwrap()
            .into_iter()
            .filter(|p| !p.is_eliminated())
            .collect();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, f.alice);
    }

    #[test]
    fn opponent_scores_encode_distance() {
        let f = fixture();
        // Nearest opponent region exactly one step up.
        let mut near = Region::wasteland(4, 5, 100);
        near.deposit = 5;
        near.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &near).unwrap();

        assert_eq!(f.engine.opponent(&f.alice).unwrap().value, 11);

        // Replace it with one two steps up: next-best hit wins.
        f.store
            .update_region(&f.game, &Region::wasteland(4, 5, 100))
            .unwrap();
        let mut far = Region::wasteland(3, 5, 100);
        far.deposit = 5;
        far.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &far).unwrap();

        assert_eq!(f.engine.opponent(&f.alice).unwrap().value, 13);
    }

    #[test]
    fn opponent_without_any_hit_scores_zero_but_charges() {
        let f = fixture();
        // Remove bob's only holding.
        f.store
            .update_region(&f.game, &Region::wasteland(1, 1, 100))
            .unwrap();
        let out = f.engine.opponent(&f.alice).unwrap();
        assert_eq!(out.value, 0);
        assert_eq!(budget_of(&f, &f.alice), 99);
    }

    #[test]
    fn nearby_only_scans_one_ray() {
        let f = fixture();
        let mut near = Region::wasteland(4, 5, 100);
        near.deposit = 5;
        near.owner = Some(f.bob.clone());
        f.store.update_region(&f.game, &near).unwrap();

        assert_eq!(f.engine.nearby(&f.alice, Direction::Up).unwrap().value, 11);
        assert_eq!(f.engine.nearby(&f.alice, Direction::Down).unwrap().value, 0);
    }

    #[test]
    fn relocate_moves_center_and_charges_cost() {
        let f = fixture();
        // Claim the region above the city, then walk onto it.
        f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        f.engine.invest(&f.alice, 10).unwrap();

        let out = f.engine.relocate(&f.alice).unwrap();
        assert!(out.success);
        assert_eq!(out.value, 10); // relocation_cost

        let alice = f.store.get_player(&f.game, &f.alice).unwrap();
        assert_eq!((alice.city_row, alice.city_col), (4, 5));

        let old_center = f.store.get_region(&f.game, 5, 5).unwrap();
        assert_eq!(old_center.owner, None);

        let new_center = f.store.get_region(&f.game, 4, 5).unwrap();
        assert_eq!(new_center.owner, Some(f.alice.clone()));
        // Topped up to the configured city deposit.
        assert_eq!(new_center.deposit, 50);
    }

    #[test]
    fn relocate_requires_owning_the_target() {
        let f = fixture();
        f.engine.move_cursor(&f.alice, Direction::Up).unwrap();
        let out = f.engine.relocate(&f.alice).unwrap();
        assert!(!out.success);
        let alice = f.store.get_player(&f.game, &f.alice).unwrap();
        assert_eq!((alice.city_row, alice.city_col), (5, 5));
    }
}
