//! Resolution of move orders: legality, strength, bounces, dislodgement,
//! head-to-head battles.

use crate::geo::{LocationId, Map};
use crate::order::{DiplomacyOrders, MoveOrder, Order, OrderStatus};
use crate::power::PowerId;
use crate::variant::Variant;

impl MoveOrder {
    /// One tightening step for a move order.
    pub(crate) fn resolve(&mut self, variant: &Variant, orders: &DiplomacyOrders) {
        if self.bounds.min_status() == OrderStatus::Illegal {
            self.resolve_legality(variant.map(), orders);
        }
        if self.bounds.min_status() == OrderStatus::Illegal {
            return;
        }

        if !self.strengths_resolved() {
            self.compute_move_strengths(variant, orders);
        }

        match orders.order_in(self.target_province) {
            None => self.resolve_empty(orders),
            Some(attacked) => {
                if self.repelled_by(attacked) {
                    self.resolve_repels(orders, attacked);
                } else if self.opposed_by(attacked) {
                    let opponent = attacked.as_move().expect("opposed orders are moves");
                    self.resolve_opposed(orders, opponent);
                } else if supports_attack_on(attacked, self) {
                    self.resolve_support_on_source(orders, attacked);
                } else {
                    self.resolve_attack(orders, attacked);
                }
            }
        }
    }

    /// Legality of the route. A direct move needs location adjacency; a
    /// convoyed move needs a chain of convoying fleets. Either way an
    /// impossible route closes the order out entirely.
    fn resolve_legality(&mut self, map: &Map, orders: &DiplomacyOrders) {
        if !self.convoy {
            if map.reaches_location(self.unit.location, self.target) {
                self.bounds.raise_min_status(OrderStatus::NoEffect);
            } else {
                self.set_illegal();
            }
            return;
        }

        let certain = self.convoy_fleets(orders, |status| status.0 == OrderStatus::Valid);
        if map.has_path(self.province, self.target_province, &certain) {
            self.bounds.raise_min_status(OrderStatus::Valid);
            return;
        }
        let possible = self.convoy_fleets(orders, |status| status.1 == OrderStatus::Valid);
        if !map.has_path(self.province, self.target_province, &possible) {
            self.set_illegal();
        }
        // Otherwise legality cannot be determined yet.
    }

    /// The locations of convoying fleets whose (min, max) status passes
    /// the given filter.
    fn convoy_fleets(
        &self,
        orders: &DiplomacyOrders,
        filter: impl Fn((OrderStatus, OrderStatus)) -> bool,
    ) -> Vec<LocationId> {
        orders
            .convoys_of_move(self.province, self.target_province)
            .filter(|c| filter((c.bounds.min_status(), c.bounds.max_status())))
            .map(|c| c.unit.location)
            .collect()
    }

    /// Tightens the per-power move-strength tables from the supports
    /// aiding this move. Supports are tallied by their owning power so
    /// that strength can later be read discounting any one power.
    fn compute_move_strengths(&mut self, variant: &Variant, orders: &DiplomacyOrders) {
        let mut possible: Vec<PowerId> = Vec::new();
        let mut known: Vec<PowerId> = Vec::new();
        for support in orders.supports_of_move(self.province, self.target_province) {
            if support.bounds.max_status() == OrderStatus::Valid {
                possible.push(support.unit.owner);
            }
            if support.bounds.min_status() == OrderStatus::Valid {
                known.push(support.unit.owner);
            }
        }

        let count = |powers: &[PowerId], power: PowerId| {
            powers.iter().filter(|&&p| p == power).count() as u8
        };
        let max_base = 1 + possible.len() as u8;
        let min_base = 1 + known.len() as u8;
        self.max_move.lower_to(
            max_base,
            variant
                .power_ids()
                .map(|p| (p, max_base - count(&possible, p))),
        );
        self.min_move.raise_to(
            min_base,
            variant
                .power_ids()
                .map(|p| (p, min_base - count(&known, p))),
        );
    }

    /// Whether the order in the target province is moving away rather than
    /// facing this move head-on.
    fn repelled_by(&self, attacked: &Order) -> bool {
        match attacked.as_move() {
            None => false,
            Some(m) => self.convoy || m.convoy || m.target_province != self.province,
        }
    }

    /// Whether the order in the target province is the other half of a
    /// head-to-head battle.
    fn opposed_by(&self, attacked: &Order) -> bool {
        match attacked.as_move() {
            None => false,
            Some(m) => {
                !self.convoy
                    && !m.convoy
                    && m.target_province == self.province
                    && m.bounds.max_status() != OrderStatus::Illegal
            }
        }
    }

    /// Whether this move is bounced by some other move into its target
    /// province, discounting this move's own supports from `except`.
    fn bounces(&self, orders: &DiplomacyOrders, except: Option<PowerId>) -> Option<bool> {
        let possible: Vec<&MoveOrder> = orders
            .moves_to(self.target_province, self)
            .filter(|m| m.bounds.max_status() == OrderStatus::Valid)
            .collect();

        // Strictly stronger than every possible challenger: no bounce.
        let strongest_possible = possible.iter().map(|m| m.max_move.get(None)).max();
        match strongest_possible {
            None => return Some(false),
            Some(strongest) if self.min_move.get(except) > strongest => return Some(false),
            _ => {}
        }

        // Some definitely-valid challenger is at least as strong: bounce.
        let strongest_known = possible
            .iter()
            .filter(|m| m.bounds.min_status() == OrderStatus::Valid)
            .map(|m| m.min_move.get(None))
            .max();
        if let Some(strongest) = strongest_known {
            if self.max_move.get(except) <= strongest {
                return Some(true);
            }
        }

        None
    }

    /// Whether the attack dislodges the defender. Strength is read
    /// discounting the defender's own supports, and a defender of the
    /// same power is never dislodged.
    fn attacks(&self, attacked: &Order) -> Option<bool> {
        let defender = attacked.unit().owner;
        if defender == self.unit.owner {
            return Some(false);
        }
        if self.min_move.get(Some(defender)) > attacked.bounds().max_hold() {
            return Some(true);
        }
        if self.max_move.get(Some(defender)) <= attacked.bounds().min_hold() {
            return Some(false);
        }
        None
    }

    /// Outcome of a head-to-head battle against `opponent`, discounting
    /// this move's supports from `except`.
    fn wins_head_to_head(
        &self,
        opponent: &MoveOrder,
        except: Option<PowerId>,
    ) -> Option<bool> {
        if opponent.bounds.min_status() == OrderStatus::Illegal {
            // Cannot resolve until the opponent is known to be legal.
            return None;
        }
        if opponent.unit.owner == self.unit.owner {
            return Some(false);
        }
        if self.min_move.get(except) > opponent.max_move.get(None) {
            return Some(true);
        }
        if self.max_move.get(except) <= opponent.min_move.get(None) {
            return Some(false);
        }
        None
    }

    /// A move into an empty (or emptied) province: nothing to cut, nothing
    /// to dislodge, only other attackers to bounce against.
    fn resolve_empty(&mut self, orders: &DiplomacyOrders) {
        self.bounds.raise_min_status(OrderStatus::Valid);
        let bounced = self.bounces(orders, None);
        self.cutting.set(false);
        self.dislodging.set(false);
        self.failed.set_known(bounced);
    }

    /// A move onto a unit that is moving away. Even while that move is
    /// unresolved, a definite bounce already settles this one.
    fn resolve_repels(&mut self, orders: &DiplomacyOrders, attacked: &Order) {
        self.bounds.raise_min_status(OrderStatus::Valid);
        self.cutting.set(false);

        let departing = attacked.as_move().expect("repelling orders are moves");
        match departing.failed.get() {
            Some(false) => self.resolve_empty(orders),
            Some(true) => self.resolve_attack(orders, attacked),
            None => {
                if self.bounces(orders, None) == Some(true) {
                    self.dislodging.set(false);
                    self.failed.set(true);
                }
            }
        }
    }

    /// A head-to-head battle.
    fn resolve_opposed(&mut self, orders: &DiplomacyOrders, opponent: &MoveOrder) {
        self.cutting.set(false);

        let bounced = self.bounces(orders, Some(opponent.unit.owner));
        let wins = self.wins_head_to_head(opponent, None);
        let wins_discounted = self.wins_head_to_head(opponent, Some(opponent.unit.owner));

        if opponent.bounds.min_status() == OrderStatus::Illegal {
            // Await the opponent's legality.
        } else if opponent.failed.is_false() {
            self.bounds.lower_max_status(OrderStatus::NoEffect);
            self.dislodging.set(false);
            self.failed.set(true);
        } else if opponent.failed.is_true() || wins == Some(true) {
            self.bounds.raise_min_status(OrderStatus::Valid);
            if let (Some(bounced), Some(wins)) = (bounced, wins_discounted) {
                self.dislodging.set(!bounced && wins);
                self.failed.set(bounced || !wins);
            }
        } else if wins == Some(false) {
            self.dislodging.set(false);
            self.failed.set(true);
        }
    }

    /// A move onto a unit supporting an attack against this move's own
    /// source. Such a support is cut only by an outright dislodgement.
    fn resolve_support_on_source(&mut self, orders: &DiplomacyOrders, attacked: &Order) {
        self.bounds.raise_min_status(OrderStatus::Valid);
        if self.dislodging.is_false() {
            self.cutting.set(false);
            self.failed.set(true);
        }

        let attack = self.attacks(attacked);
        let bounced = self.bounces(orders, Some(attacked.unit().owner));
        if let (Some(bounced), Some(attack)) = (bounced, attack) {
            self.cutting.set(!bounced && attack);
            self.dislodging.set(!bounced && attack);
            self.failed.set(bounced || !attack);
        }
    }

    /// An ordinary attack on a defending unit.
    fn resolve_attack(&mut self, orders: &DiplomacyOrders, attacked: &Order) {
        self.bounds.raise_min_status(OrderStatus::Valid);
        self.cutting.set(true);
        if self.dislodging.is_false() {
            self.failed.set(true);
        }

        let attack = self.attacks(attacked);
        let bounced = self.bounces(orders, Some(attacked.unit().owner));
        if let (Some(bounced), Some(attack)) = (bounced, attack) {
            self.dislodging.set(!bounced && attack);
            self.failed.set(bounced || !attack);
        }
    }
}

/// Whether `attacked` is a support order aiding an attack on the source
/// province of `this`.
fn supports_attack_on(attacked: &Order, this: &MoveOrder) -> bool {
    match attacked {
        Order::Support(s) => s.supports_move_on(this.province),
        _ => false,
    }
}
