//! The textual order parser.
//!
//! Input is case-insensitive, dot-tolerant, and abbreviation-friendly:
//! single-letter force and verb codes, three-letter province codes, and
//! coast short forms are expanded word by word, then provinces, powers,
//! verbs, numbers, and coast specifiers are scanned out of the normalized
//! string by position. The grammar per phase:
//!
//! ```text
//! Move:         <force> <province> - <province> [via Convoy]
//! Hold:         <force> <province> H
//! Support hold: <force> <province> S <force> <province> [H]
//! Support move: <force> <province> S <force> <province> - <province>
//!               (webDip reversed: ... S ... - ... from ...)
//! Convoy:       <force> <province> C <force> <province> - <province>
//! Retreat:      <force> <province> R <province>  |  <force> <province> disbands
//! Build:        <power> B <n> <force> <province> [<coast>]
//!               <power> B <n> postpone|default|"do not use"
//! Disband:      <power> D <n> <province>
//! ```

use crate::error::Error;
use crate::game::{Game, PhaseOrders};
use crate::geo::{ForceId, LocationId, LocationRef, Map, ProvinceId};
use crate::order::{
    ConvoyOrder, ConvoyedMove, HoldOrder, MoveOrder, Order, OrderKind, RetreatAction,
    SupportOrder, SupportedOrder,
};
use crate::power::PowerId;
use crate::season::Phase;
use crate::unit::Unit;

/// Parses an order string against the game's current phase and installs
/// the result in the phase's order collection.
pub(crate) fn submit(game: &mut Game, text: &str) -> Result<(), Error> {
    let text = Text::normalize(game.map(), text);
    match game.season().phase() {
        Phase::Diplomacy => parse_diplomacy(game, &text),
        Phase::Retreats => parse_retreats(game, &text),
        Phase::Builds => parse_builds(game, &text),
        _ => Err(Error::order_input("the current phase expects no orders")),
    }
}

/// A normalized order string with word offsets for positional scans.
struct Text {
    joined: String,
    words: Vec<(usize, String)>,
}

/// An entity found in the input, with its byte position.
#[derive(Debug, Clone, Copy)]
struct Found<T> {
    pos: usize,
    item: T,
}

impl Text {
    fn normalize(map: &Map, text: &str) -> Text {
        let expanded: Vec<String> = text
            .split_whitespace()
            .map(|w| w.replace('.', "").to_lowercase())
            .filter(|w| !w.is_empty())
            .map(|w| expand_word(map, &w))
            .collect();

        let mut joined = String::new();
        let mut words = Vec::new();
        for word in expanded {
            if !joined.is_empty() {
                joined.push(' ');
            }
            words.push((joined.len(), word.clone()));
            joined.push_str(&word);
        }
        Text { joined, words }
    }

    fn contains(&self, needle: &str) -> bool {
        self.joined.contains(needle)
    }

    /// Word-boundary substring scan for a set of names, longest match
    /// first, non-overlapping, ordered by position.
    fn scan_names<T: Copy>(&self, names: &[(String, T)]) -> Vec<Found<T>> {
        let bytes = self.joined.as_bytes();
        let mut hits: Vec<(usize, usize, T)> = Vec::new();
        for (name, item) in names {
            if name.is_empty() {
                continue;
            }
            let mut start = 0;
            while let Some(offset) = self.joined[start..].find(name.as_str()) {
                let pos = start + offset;
                let end = pos + name.len();
                let before_ok = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
                let after_ok =
                    end == self.joined.len() || !bytes[end].is_ascii_alphanumeric();
                if before_ok && after_ok {
                    hits.push((pos, name.len(), *item));
                }
                start = pos + 1;
            }
        }
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut found = Vec::new();
        let mut covered = 0;
        for (pos, len, item) in hits {
            if pos >= covered {
                found.push(Found { pos, item });
                covered = pos + len;
            }
        }
        found
    }

    fn provinces(&self, map: &Map) -> Vec<Found<ProvinceId>> {
        let names: Vec<(String, ProvinceId)> = map
            .provinces()
            .iter()
            .map(|p| (p.name.to_lowercase(), p.id))
            .collect();
        self.scan_names(&names)
    }

    fn specifiers<'m>(&self, map: &'m Map) -> Vec<Found<&'m str>> {
        let names: Vec<(String, &str)> = map
            .forces()
            .iter()
            .flat_map(|f| f.specifiers.iter())
            .map(|s| (s.to_lowercase(), s.as_str()))
            .collect();
        self.scan_names(&names)
    }

    fn verbs(&self) -> Vec<Found<OrderKind>> {
        self.words
            .iter()
            .filter_map(|(pos, word)| {
                OrderKind::from_name(word).map(|kind| Found {
                    pos: *pos,
                    item: kind,
                })
            })
            .collect()
    }

    fn forces(&self, map: &Map) -> Vec<Found<ForceId>> {
        self.words
            .iter()
            .filter_map(|(pos, word)| {
                map.force_id(word).map(|force| Found {
                    pos: *pos,
                    item: force,
                })
            })
            .collect()
    }

    fn numbers(&self) -> Vec<Found<u32>> {
        self.words
            .iter()
            .filter_map(|(pos, word)| {
                word.parse().ok().map(|n| Found { pos: *pos, item: n })
            })
            .collect()
    }

    fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|(_, w)| w == word)
    }
}

/// Expands one lowercased word: verb letters, force letters, province
/// abbreviations, coast short forms, and the Saint contraction.
fn expand_word(map: &Map, word: &str) -> String {
    match word {
        "st" => return "saint".to_string(),
        "-" | "moves" => return "move".to_string(),
        "s" | "supports" => return "support".to_string(),
        "c" | "convoys" => return "convoy".to_string(),
        "h" | "holds" => return "hold".to_string(),
        "r" | "retreats" => return "retreat".to_string(),
        "b" | "builds" => return "build".to_string(),
        "d" | "disbands" => return "disband".to_string(),
        _ => {}
    }
    for force in map.forces() {
        let name = force.name.to_lowercase();
        if word == name || word == &name[..1] {
            return name;
        }
        for (short, long) in force.short_forms.iter().zip(&force.specifiers) {
            if word == short.to_lowercase() {
                return long.to_lowercase();
            }
        }
    }
    for (short, full) in map.abbreviations() {
        if word == short.to_lowercase() {
            return full.to_lowercase();
        }
    }
    word.to_string()
}

fn province_name(map: &Map, id: ProvinceId) -> String {
    map.province(id).name.to_lowercase()
}

/// The specifier (if any) first appearing in the given position window.
fn specifier_in<'m>(
    specifiers: &[Found<&'m str>],
    after: Option<usize>,
    before: Option<usize>,
) -> Option<&'m str> {
    specifiers
        .iter()
        .find(|s| after.map_or(true, |a| s.pos > a) && before.map_or(true, |b| s.pos < b))
        .map(|s| s.item)
}

fn diplomacy_orders<'a>(game: &'a Game<'a>) -> &'a crate::order::DiplomacyOrders {
    match game.orders() {
        PhaseOrders::Diplomacy(orders) => orders,
        _ => unreachable!("checked by submit"),
    }
}

fn install(game: &mut Game, order: Order) {
    match game.orders_mut() {
        PhaseOrders::Diplomacy(orders) => orders.replace(order),
        _ => unreachable!("checked by submit"),
    }
}

fn parse_diplomacy(game: &mut Game, text: &Text) -> Result<(), Error> {
    let map = game.map();
    let provinces = text.provinces(map);
    let first = provinces
        .first()
        .ok_or_else(|| Error::order_input("no province named in the order"))?;
    let unit = *game
        .unit_in(first.item)
        .ok_or_else(|| Error::order_input("could not identify the unit"))?;

    let verbs = text.verbs();
    let verb = verbs
        .first()
        .copied()
        .ok_or_else(|| Error::order_input("no order verb recognized"))?;

    match verb.item {
        OrderKind::Hold => {
            let max = diplomacy_orders(game).max_strength();
            install(game, HoldOrder::new(unit, first.item, max).into());
            Ok(())
        }
        OrderKind::Move => parse_move(game, text, unit, &provinces),
        OrderKind::Support => parse_support(game, text, unit, &provinces, &verbs, verb.pos),
        OrderKind::Convoy => parse_convoy(game, text, unit, &provinces),
        _ => Err(Error::order_input(
            "only Hold, Move, Support, and Convoy orders are valid now",
        )),
    }
}

fn parse_move(
    game: &mut Game,
    text: &Text,
    unit: Unit,
    provinces: &[Found<ProvinceId>],
) -> Result<(), Error> {
    let map = game.map();
    let convoy = text.contains("convoy");
    if convoy && !map.force(unit.force).may_receive(OrderKind::Convoy) {
        return Err(Error::order_input("this unit may not be convoyed"));
    }

    let target = provinces
        .get(1)
        .ok_or_else(|| Error::order_input("no move target named"))?;
    let specifiers = text.specifiers(map);
    let specifier = specifier_in(&specifiers, Some(target.pos), None);

    let location = locate_required(
        map,
        unit.force,
        target.item,
        Some(unit.location),
        specifier,
        false,
    )?;
    let target_province = map.location(location).province;
    if target_province == unit.province(map) {
        return Err(Error::order_input("a unit cannot move to its own province"));
    }

    let max = diplomacy_orders(game).max_strength();
    install(
        game,
        MoveOrder::new(
            unit,
            unit.province(map),
            location,
            target_province,
            convoy,
            max,
        )
        .into(),
    );
    Ok(())
}

fn parse_support(
    game: &mut Game,
    text: &Text,
    unit: Unit,
    provinces: &[Found<ProvinceId>],
    verbs: &[Found<OrderKind>],
    support_pos: usize,
) -> Result<(), Error> {
    let map = game.map();
    let reversed = text.has_word("from");
    let object_index = 1 + usize::from(reversed);
    let object = provinces
        .get(object_index)
        .ok_or_else(|| Error::order_input("no supported unit named"))?;
    let object_unit = *game
        .unit_in(object.item)
        .ok_or_else(|| Error::order_input("could not identify the object unit"))?;

    let next_verb = verbs.iter().find(|v| v.pos > support_pos);
    let supported = match next_verb.map(|v| v.item) {
        None | Some(OrderKind::Hold) => SupportedOrder::Hold {
            unit: object_unit,
            province: object.item,
        },
        Some(OrderKind::Move) => {
            let target_index = 2 - usize::from(reversed);
            let target = provinces
                .get(target_index)
                .ok_or_else(|| Error::order_input("no supported move target named"))?;

            let specifiers = text.specifiers(map);
            let specifier = if reversed {
                specifier_in(&specifiers, Some(target.pos), Some(object.pos))
            } else {
                specifier_in(&specifiers, Some(target.pos), None)
            };

            let location = locate_required(
                map,
                object_unit.force,
                target.item,
                Some(object_unit.location),
                specifier,
                true,
            )?;
            SupportedOrder::Move {
                unit: object_unit,
                province: object.item,
                target: location,
                target_province: map.location(location).province,
            }
        }
        Some(_) => {
            return Err(Error::order_input(
                "the object of a support may not be a support or convoy",
            ))
        }
    };

    let max = diplomacy_orders(game).max_strength();
    install(
        game,
        SupportOrder::new(unit, unit.province(map), supported, max).into(),
    );
    Ok(())
}

fn parse_convoy(
    game: &mut Game,
    text: &Text,
    unit: Unit,
    provinces: &[Found<ProvinceId>],
) -> Result<(), Error> {
    let map = game.map();
    let geography = map.geography(map.location(unit.location).geography);
    if !geography.offers(OrderKind::Convoy) {
        return Err(Error::order_input("this unit may not convoy"));
    }

    let reversed = text.has_word("from");
    let object = provinces
        .get(1 + usize::from(reversed))
        .ok_or_else(|| Error::order_input("no convoyed unit named"))?;
    let object_unit = *game
        .unit_in(object.item)
        .ok_or_else(|| Error::order_input("could not identify the object unit"))?;
    if !map.force(object_unit.force).may_receive(OrderKind::Convoy) {
        return Err(Error::order_input("the object unit may not be convoyed"));
    }

    let target = provinces
        .get(2 - usize::from(reversed))
        .ok_or_else(|| Error::order_input("no convoy target named"))?;
    let location = locate_required(map, object_unit.force, target.item, None, None, false)?;

    let max = diplomacy_orders(game).max_strength();
    install(
        game,
        ConvoyOrder::new(
            unit,
            unit.province(map),
            ConvoyedMove {
                unit: object_unit,
                province: object.item,
                target: location,
                target_province: map.location(location).province,
            },
            max,
        )
        .into(),
    );
    Ok(())
}

fn parse_retreats(game: &mut Game, text: &Text) -> Result<(), Error> {
    let map = game.map();
    let provinces = text.provinces(map);
    let first = provinces
        .first()
        .ok_or_else(|| Error::order_input("no province named in the order"))?;

    let retreat = game
        .retreat_in(first.item)
        .ok_or_else(|| Error::order_input("no unit is retreating from that province"))?;
    let retreating = retreat.unit;

    let action = if provinces.len() == 1 {
        RetreatAction::Disband
    } else {
        let target = provinces[1];
        let specifiers = text.specifiers(map);
        let specifier = specifier_in(&specifiers, Some(target.pos), None);
        let location = locate_required(
            map,
            retreating.force,
            target.item,
            Some(retreating.location),
            specifier,
            false,
        )?;
        RetreatAction::Move {
            target: location,
            target_province: map.location(location).province,
        }
    };

    match game.orders_mut() {
        PhaseOrders::Retreats(orders) => {
            orders
                .order_in_mut(first.item)
                .expect("presence checked above")
                .set_action(action);
            Ok(())
        }
        _ => unreachable!("checked by submit"),
    }
}

fn parse_builds(game: &mut Game, text: &Text) -> Result<(), Error> {
    let map = game.map();
    let number = text
        .numbers()
        .first()
        .map(|n| n.item)
        .ok_or_else(|| Error::order_input("no adjustment number given"))?;
    let power = scan_power(game, text)
        .ok_or_else(|| Error::order_input("no power named in the order"))?;

    let kind = match game.adjustment_order(number, power) {
        Some(crate::order::AdjustmentOrder::Build(_)) => OrderKind::Build,
        Some(crate::order::AdjustmentOrder::Disband(_)) => OrderKind::Disband,
        None => return Err(Error::order_input("no such adjustment order")),
    };

    match kind {
        OrderKind::Build => {
            if text.contains("postpone")
                || text.contains("do not use")
                || text.contains("default")
            {
                set_build(game, number, power, None)?;
                return Ok(());
            }
            let force = text
                .forces(map)
                .first()
                .map(|f| f.item)
                .ok_or_else(|| Error::order_input("no force named for the build"))?;
            let province = text
                .provinces(map)
                .first()
                .map(|p| p.item)
                .ok_or_else(|| Error::order_input("no province named for the build"))?;
            let specifiers = text.specifiers(map);
            let specifier = specifier_in(&specifiers, None, None);
            let location = locate_required(map, force, province, None, specifier, false)?;
            set_build(game, number, power, Some((force, location)))
        }
        OrderKind::Disband => {
            let province = text
                .provinces(map)
                .first()
                .map(|p| p.item)
                .ok_or_else(|| Error::order_input("no province named for the disband"))?;
            let unit = *game
                .unit_in(province)
                .ok_or_else(|| Error::order_input("no unit in that province"))?;
            if unit.owner != power {
                return Err(Error::order_input("cannot disband a foreign unit"));
            }
            set_disband(game, number, power, unit)
        }
        _ => unreachable!("adjustment slots are builds or disbands"),
    }
}

fn scan_power(game: &Game, text: &Text) -> Option<PowerId> {
    let variant = game.variant();
    let names: Vec<(String, PowerId)> = variant
        .power_ids()
        .map(|id| (variant.power(id).name.to_lowercase(), id))
        .collect();
    text.scan_names(&names).first().map(|f| f.item)
}

fn set_build(
    game: &mut Game,
    id: u32,
    power: PowerId,
    target: Option<(ForceId, LocationId)>,
) -> Result<(), Error> {
    match game.orders_mut() {
        PhaseOrders::Builds(orders) => {
            if let Some(crate::order::AdjustmentOrder::Build(build)) =
                orders.adjustment_order_mut(id, power)
            {
                match target {
                    Some((force, location)) => build.set_target(force, location),
                    None => build.postpone(),
                }
                Ok(())
            } else {
                Err(Error::order_input("no such build order"))
            }
        }
        _ => unreachable!("checked by submit"),
    }
}

fn set_disband(game: &mut Game, id: u32, power: PowerId, unit: Unit) -> Result<(), Error> {
    match game.orders_mut() {
        PhaseOrders::Builds(orders) => {
            if let Some(crate::order::AdjustmentOrder::Disband(disband)) =
                orders.adjustment_order_mut(id, power)
            {
                disband.unit = Some(unit);
                Ok(())
            } else {
                Err(Error::order_input("no such disband order"))
            }
        }
        _ => unreachable!("checked by submit"),
    }
}

/// `locate` that resolves province ids to names and treats a missing
/// result as an order-input error.
fn locate_required(
    map: &Map,
    force: ForceId,
    province: ProvinceId,
    origin: Option<LocationId>,
    specifier: Option<&str>,
    either: bool,
) -> Result<LocationId, Error> {
    let name = province_name(map, province);
    map.locate(force, LocationRef::Named(&name), origin, specifier, either)?
        .ok_or_else(|| {
            Error::order_input(format!("no reachable {name} location for that unit"))
        })
}

#[cfg(test)]
mod tests {
    use crate::game::Game;
    use crate::order::{Order, OrderKind, SupportedOrder};
    use crate::variant;

    fn game() -> Game<'static> {
        let mut game = Game::new(variant::classic());
        game.start().unwrap();
        game
    }

    fn order_in<'g>(game: &'g Game, province: &str) -> &'g Order {
        let id = game.map().province_named(province).unwrap().id;
        game.order_in(id).unwrap()
    }

    #[test]
    fn symbols_and_abbreviations_expand() {
        let mut game = game();
        game.order("A Vie - Gal").unwrap();
        let order = order_in(&game, "Vienna");
        match order {
            Order::Move(m) => {
                assert!(!m.convoy);
                assert_eq!(game.map().location(m.target).name, "Galicia");
            }
            _ => panic!("expected a move, got {:?}", order.kind()),
        }
    }

    #[test]
    fn saint_and_coast_short_forms_expand() {
        let mut game = game();
        game.order("F StP (sc) - BOT").unwrap();
        let order = order_in(&game, "Saint Petersburg");
        match order {
            Order::Move(m) => {
                assert_eq!(game.map().location(m.target).name, "Gulf of Bothnia");
            }
            _ => panic!("expected a move"),
        }
    }

    #[test]
    fn prose_orders_are_understood() {
        let mut game = game();
        game.order("Vienna moves to Galicia").unwrap();
        assert_eq!(order_in(&game, "Vienna").kind(), OrderKind::Move);
    }

    #[test]
    fn reversed_support_names_target_before_source() {
        let mut game = game();
        game.order("Budapest supports the move to Galicia from Vienna")
            .unwrap();
        let order = order_in(&game, "Budapest");
        match order {
            Order::Support(s) => match &s.object {
                SupportedOrder::Move {
                    province,
                    target_province,
                    ..
                } => {
                    assert_eq!(game.map().province(*province).name, "Vienna");
                    assert_eq!(game.map().province(*target_province).name, "Galicia");
                }
                object => panic!("expected a supported move, got {object:?}"),
            },
            _ => panic!("expected a support"),
        }
    }

    #[test]
    fn convoy_orders_bind_the_carried_move() {
        let mut game = game();
        game.add_unit("Fleet", "England", "North Sea").unwrap();
        game.add_unit("Army", "England", "Yorkshire").unwrap();
        game.order("F NTH C A Yor - Nwy").unwrap();
        let order = order_in(&game, "North Sea");
        match order {
            Order::Convoy(c) => {
                assert_eq!(game.map().province(c.object.province).name, "Yorkshire");
                assert_eq!(game.map().location(c.object.target).name, "Norway");
            }
            _ => panic!("expected a convoy"),
        }
    }

    #[test]
    fn resolution_suffixes_are_ignored_on_replay() {
        let mut game = game();
        game.order("A Vienna - Galicia (succeeds)").unwrap();
        assert_eq!(order_in(&game, "Vienna").kind(), OrderKind::Move);
    }
}
