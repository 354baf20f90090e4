//! A turn-based duel. Both fighters pick a spell each turn, the spells resolve in seat order,
//! and the first fighter to fall loses.

use super::{Environment, MatchResult, Outcome};
use crate::{agent::Agent, constants::LADDER_BATTLE_MOVE_CAP};
use core::fmt;
use serde::Serialize;

/// Energy both fighters regain at the end of every turn
const REGEN: f64 = 0.0625;
const BLOCK_FACTOR: f64 = 0.666666666666;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    Block,
    Meditate,
    Heal,
    MinorDamage,
    MajorDamage,
    Reflect,
    Absorb,
    Reverse,
    Copy,
    /// Nothing chosen, or the chosen spell wasn't castable
    Idle,
}

impl Action {
    /// Every choosable action, in network output order
    pub const ALL: [Action; 9] = [
        Action::Block,
        Action::Meditate,
        Action::Heal,
        Action::MinorDamage,
        Action::MajorDamage,
        Action::Reflect,
        Action::Absorb,
        Action::Reverse,
        Action::Copy,
    ];

    pub fn index(self) -> Option<usize> {
        Action::ALL.iter().position(|&a| a == self)
    }

    pub fn spell(self) -> &'static Spell {
        match self.index() {
            Some(idx) => &SPELLS[idx],
            None => &IDLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fighter {
    pub health: f64,
    pub energy: f64,
    pub last: Action,
}

impl Default for Fighter {
    fn default() -> Self {
        Self {
            health: 1.,
            energy: 1.,
            last: Action::Idle,
        }
    }
}

impl Fighter {
    fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount).min(1.);
    }

    fn battery(&mut self, amount: f64) {
        self.energy = (self.energy + amount).min(1.);
    }
}

/// How a damaging spell lands depends on what the target is casting this turn
fn apply_damage(caster: &mut Fighter, target: &mut Fighter, amount: f64) {
    match target.last {
        Action::Block => target.health -= amount * BLOCK_FACTOR,
        Action::Reflect => caster.health -= amount,
        Action::Absorb => target.battery(amount / 2.),
        Action::Reverse => target.heal(amount / 2.),
        _ => target.health -= amount,
    }
}

pub struct Spell {
    pub name: &'static str,
    pub description: &'static str,
    /// Energy spent on casting. Zero cost spells can be cast at any energy.
    pub cost: f64,
    requires: fn(&Fighter, &Fighter) -> bool,
    effect: fn(&mut Fighter, &mut Fighter),
}

impl Spell {
    pub fn castable(&self, caster: &Fighter, target: &Fighter) -> bool {
        (self.cost == 0. || caster.energy >= self.cost) && (self.requires)(caster, target)
    }

    /// Spend the cost and resolve the effect. Castability is not checked.
    pub fn perform(&self, caster: &mut Fighter, target: &mut Fighter) {
        caster.energy -= self.cost;
        (self.effect)(caster, target);
    }
}

impl fmt::Debug for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spell")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .finish()
    }
}

fn always(_: &Fighter, _: &Fighter) -> bool {
    true
}

fn nothing(_: &mut Fighter, _: &mut Fighter) {}

fn drained(caster: &Fighter, _: &Fighter) -> bool {
    caster.energy < 1.
}

fn meditate(caster: &mut Fighter, _: &mut Fighter) {
    caster.battery(0.0625);
}

fn wounded(caster: &Fighter, _: &Fighter) -> bool {
    caster.health < 1.
}

fn heal(caster: &mut Fighter, _: &mut Fighter) {
    caster.heal(0.09375);
}

fn minor_damage(caster: &mut Fighter, target: &mut Fighter) {
    apply_damage(caster, target, 0.125);
}

fn major_damage(caster: &mut Fighter, target: &mut Fighter) {
    apply_damage(caster, target, 0.25);
}

fn copy(caster: &mut Fighter, target: &mut Fighter) {
    if target.last != Action::Copy {
        target.last.spell().perform(caster, target);
    }
}

static IDLE: Spell = Spell {
    name: "None",
    description: "Nothing happens",
    cost: 0.,
    requires: always,
    effect: nothing,
};

pub static SPELLS: [Spell; 9] = [
    Spell {
        name: "Block",
        description: "Reduce damage by 33%",
        cost: 0.,
        requires: always,
        effect: nothing,
    },
    Spell {
        name: "Meditate",
        description: "Gain 0.0625 energy",
        cost: 0.,
        requires: drained,
        effect: meditate,
    },
    Spell {
        name: "Heal",
        description: "Gain 0.09375 health",
        cost: 0.125,
        requires: wounded,
        effect: heal,
    },
    Spell {
        name: "Minor Damage",
        description: "Deal 0.125 damage",
        cost: 0.125,
        requires: always,
        effect: minor_damage,
    },
    Spell {
        name: "Major Damage",
        description: "Deal 0.25 damage",
        cost: 0.25,
        requires: always,
        effect: major_damage,
    },
    Spell {
        name: "Reflect",
        description: "Reflect damage back to enemy",
        cost: 0.125,
        requires: always,
        effect: nothing,
    },
    Spell {
        name: "Absorb",
        description: "Absorb damage as energy",
        cost: 0.125,
        requires: always,
        effect: nothing,
    },
    Spell {
        name: "Reverse",
        description: "Reverse damage as health",
        cost: 0.125,
        requires: always,
        effect: nothing,
    },
    Spell {
        name: "Copy",
        description: "Copy enemy's spell",
        cost: 0.125,
        requires: always,
        effect: copy,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    fighters: [Fighter; 2],
    move_cap: usize,
}

impl Default for Battle {
    fn default() -> Self {
        Self::with_move_cap(LADDER_BATTLE_MOVE_CAP)
    }
}

impl Battle {
    /// A battle called off after `move_cap` turns. At least one turn is always played.
    pub fn with_move_cap(move_cap: usize) -> Self {
        Self {
            fighters: [Fighter::default(); 2],
            move_cap,
        }
    }

    pub fn reset(&mut self) {
        self.fighters = [Fighter::default(); 2];
    }

    #[inline]
    pub fn fighter(&self, seat: Seat) -> &Fighter {
        &self.fighters[seat.index()]
    }

    #[inline]
    pub fn fighter_mut(&mut self, seat: Seat) -> &mut Fighter {
        &mut self.fighters[seat.index()]
    }

    /// Resolve one turn. A spell its caster can't cast becomes [Action::Idle], then seat one's
    /// spell lands before seat two's and both fighters regain energy.
    pub fn turn(&mut self, one: Action, two: Action) {
        let [a, b] = &mut self.fighters;
        a.last = if one.spell().castable(a, b) { one } else { Action::Idle };
        b.last = if two.spell().castable(b, a) { two } else { Action::Idle };
        a.last.spell().perform(a, b);
        b.last.spell().perform(b, a);
        a.battery(REGEN);
        b.battery(REGEN);
    }

    /// Both fighters still standing
    pub fn is_on(&self) -> bool {
        self.fighters.iter().all(|f| f.health > 0.)
    }

    /// `seat` won if its enemy fell and it holds more health
    pub fn won(&self, seat: Seat) -> bool {
        let me = self.fighter(seat);
        let enemy = self.fighter(seat.other());
        enemy.health <= 0. && me.health > enemy.health
    }

    pub fn outcome(&self) -> Outcome {
        if self.won(Seat::One) {
            Outcome::First
        } else if self.won(Seat::Two) {
            Outcome::Second
        } else {
            Outcome::Draw
        }
    }

    fn describe(f: &mut fmt::Formatter<'_>, who: &str, fighter: &Fighter) -> fmt::Result {
        writeln!(
            f,
            "{who}: health: {:.4} energy: {:.4} last: {}",
            fighter.health,
            fighter.energy,
            fighter.last.spell().name
        )
    }
}

fn encode_last(action: Action) -> f64 {
    action.index().map_or(0., |idx| (idx + 1) as f64)
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::describe(f, "player 1", &self.fighters[0])?;
        Self::describe(f, "player 2", &self.fighters[1])
    }
}

struct SeatView<'a>(&'a Battle, Seat);

impl fmt::Display for SeatView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Battle::describe(f, "self", self.0.fighter(self.1))?;
        Battle::describe(f, "enemy", self.0.fighter(self.1.other()))
    }
}

impl Environment for Battle {
    type Side = Seat;
    type Action = Action;

    const NAME: &'static str = "battle";
    const SIDES: [Seat; 2] = [Seat::One, Seat::Two];
    const OBSERVATION: usize = 6;
    const ACTIONS: usize = Action::ALL.len();

    fn action(idx: usize) -> Action {
        Action::ALL[idx]
    }

    fn label(action: Action) -> String {
        let spell = action.spell();
        if spell.cost > 0. {
            format!(
                "{}\n     - {} (energy cost: {})",
                spell.name, spell.description, spell.cost
            )
        } else {
            format!("{}\n     - {}", spell.name, spell.description)
        }
    }

    /// Own health, energy and last action, then the enemy's. A last action is 0 for none and its
    /// index plus one otherwise.
    fn encode(&self, side: Seat, out: &mut [f64]) {
        let me = self.fighter(side);
        let enemy = self.fighter(side.other());
        out[..Self::OBSERVATION].copy_from_slice(&[
            me.health,
            me.energy,
            encode_last(me.last),
            enemy.health,
            enemy.energy,
            encode_last(enemy.last),
        ]);
    }

    fn legal(&self, action: Action, side: Seat) -> bool {
        action
            .spell()
            .castable(self.fighter(side), self.fighter(side.other()))
    }

    fn render(&self, side: Seat) -> String {
        SeatView(self, side).to_string()
    }

    /// Turns are played until a fighter falls or the move cap is reached. A missing decision
    /// casts nothing.
    fn play_match(
        &mut self,
        first: &mut dyn Agent<Self>,
        second: &mut dyn Agent<Self>,
    ) -> MatchResult {
        self.reset();
        let mut moves = 0;
        loop {
            let one = first.decide(self, Seat::One).unwrap_or(Action::Idle);
            let two = second.decide(self, Seat::Two).unwrap_or(Action::Idle);
            self.turn(one, two);
            moves += 1;
            if !self.is_on() || moves >= self.move_cap {
                break;
            }
        }
        MatchResult::new(self.outcome(), moves)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{agent::Scripted, assert_f64_approx};
    use approx::assert_relative_eq;

    fn always_cast(action: Action) -> impl Agent<Battle> {
        Scripted(move |_: &Battle, _: Seat| Some(action))
    }

    #[test]
    fn test_registry_order() {
        for (idx, action) in Action::ALL.into_iter().enumerate() {
            assert_eq!(action.index(), Some(idx));
            assert_eq!(Battle::action(idx), action);
        }
        assert_eq!(Action::Idle.index(), None);
        assert_eq!(Action::Idle.spell().name, "None");
        assert_eq!(Action::MinorDamage.spell().name, "Minor Damage");
    }

    #[test]
    fn test_all_block_draws_at_cap() {
        let mut battle = Battle::default();
        let result = battle.play_match(&mut always_cast(Action::Block), &mut always_cast(Action::Block));
        assert_eq!(result.moves, LADDER_BATTLE_MOVE_CAP);
        assert_eq!(result.outcome, Outcome::Draw);
        assert_eq!(battle.fighter(Seat::One).health, 1.);
        assert_eq!(battle.fighter(Seat::Two).energy, 1.);
    }

    #[test]
    fn test_minor_damage() {
        let mut battle = Battle::default();
        battle.turn(Action::MinorDamage, Action::Meditate);
        // meditate needs energy below 1, so seat two idles
        assert_eq!(battle.fighter(Seat::Two).last, Action::Idle);
        assert_f64_approx!(battle.fighter(Seat::Two).health, 0.875);
        assert_f64_approx!(battle.fighter(Seat::One).energy, 0.9375);
    }

    #[test]
    fn test_block_reduces() {
        let mut battle = Battle::default();
        battle.turn(Action::MajorDamage, Action::Block);
        assert_relative_eq!(
            battle.fighter(Seat::Two).health,
            1. - 0.25 * BLOCK_FACTOR
        );
    }

    #[test]
    fn test_reflect_hits_caster() {
        let mut battle = Battle::default();
        battle.turn(Action::MajorDamage, Action::Reflect);
        assert_f64_approx!(battle.fighter(Seat::One).health, 0.75);
        assert_f64_approx!(battle.fighter(Seat::Two).health, 1.);
    }

    #[test]
    fn test_absorb_and_reverse() {
        let mut battle = Battle::default();
        battle.turn(Action::MajorDamage, Action::Absorb);
        // the refund lands on a full battery before absorb is paid for
        assert_f64_approx!(battle.fighter(Seat::Two).energy, 0.9375);
        assert_f64_approx!(battle.fighter(Seat::Two).health, 1.);

        let mut battle = Battle::default();
        battle.fighter_mut(Seat::Two).health = 0.5;
        battle.turn(Action::MajorDamage, Action::Reverse);
        assert_f64_approx!(battle.fighter(Seat::Two).health, 0.625);
    }

    #[test]
    fn test_heal_caps() {
        let mut battle = Battle::default();
        assert!(!battle.legal(Action::Heal, Seat::One));
        battle.fighter_mut(Seat::One).health = 0.95;
        assert!(battle.legal(Action::Heal, Seat::One));
        battle.turn(Action::Heal, Action::Block);
        assert_f64_approx!(battle.fighter(Seat::One).health, 1.);
    }

    #[test]
    fn test_copy() {
        let mut battle = Battle::default();
        battle.turn(Action::Copy, Action::MinorDamage);
        // seat one copies the minor damage, paying for both spells
        assert_f64_approx!(battle.fighter(Seat::Two).health, 0.875);
        assert_f64_approx!(battle.fighter(Seat::One).health, 0.875);
        assert_f64_approx!(battle.fighter(Seat::One).energy, 0.8125);

        let mut battle = Battle::default();
        battle.turn(Action::Copy, Action::Copy);
        assert_f64_approx!(battle.fighter(Seat::One).energy, 0.9375);
        assert_f64_approx!(battle.fighter(Seat::Two).energy, 0.9375);
    }

    #[test]
    fn test_energy_gates() {
        let mut battle = Battle::default();
        battle.fighter_mut(Seat::One).energy = 0.2;
        assert!(battle.legal(Action::MinorDamage, Seat::One));
        assert!(!battle.legal(Action::MajorDamage, Seat::One));
        assert!(battle.legal(Action::Meditate, Seat::One));
        battle.fighter_mut(Seat::One).energy = -0.1;
        assert!(battle.legal(Action::Block, Seat::One));
        assert!(!battle.legal(Action::Copy, Seat::One));
    }

    #[test]
    fn test_major_damage_wins() {
        let mut battle = Battle::default();
        let result = battle.play_match(
            &mut always_cast(Action::MajorDamage),
            &mut always_cast(Action::Block),
        );
        assert_eq!(result.outcome, Outcome::First);
        assert!(result.moves < LADDER_BATTLE_MOVE_CAP);
        assert!(battle.won(Seat::One));
        assert!(!battle.won(Seat::Two));
    }

    #[test]
    fn test_encode() {
        let mut battle = Battle::default();
        battle.turn(Action::MinorDamage, Action::Block);
        let mut one = [0.; 6];
        let mut two = [0.; 6];
        battle.encode(Seat::One, &mut one);
        battle.encode(Seat::Two, &mut two);
        assert_eq!(one[2], 4.);
        assert_eq!(one[5], 1.);
        assert_eq!(two[0], one[3]);
        assert_eq!(two[2], 1.);
        assert_eq!(two[5], 4.);
    }

    #[test]
    fn test_render_perspective() {
        let battle = Battle::default();
        let seen = battle.render(Seat::Two);
        assert!(seen.starts_with("self: health"));
        assert!(seen.contains("enemy: health"));
    }
}
