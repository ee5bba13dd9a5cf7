#![allow(dead_code)]
#![cfg(test)]

use armistice::{variant, Game};

/// A classic game advanced into Spring 1901 Diplomacy.
pub fn started_classic() -> Game<'static> {
    let mut game = Game::new(variant::classic());
    game.start().expect("fresh game should start");
    game
}

/// A classic game whose starting pieces are replaced by the given
/// `(force, power, location)` units, in the style of scenario setup.
pub fn game_with(units: &[(&str, &str, &str)]) -> Game<'static> {
    let mut game = started_classic();
    let map = game.map();
    let provinces: Vec<String> = game
        .units()
        .iter()
        .map(|u| map.province(u.province(map)).name.clone())
        .collect();
    for province in provinces {
        game.remove_unit(&province).expect("starting unit exists");
    }
    for (force, power, location) in units {
        game.add_unit(force, power, location)
            .unwrap_or_else(|e| panic!("cannot place {force} {location}: {e}"));
    }
    game
}

pub fn submit_all(game: &mut Game, orders: &[&str]) {
    for order in orders {
        game.order(order)
            .unwrap_or_else(|e| panic!("order '{order}' rejected: {e}"));
    }
}

/// Whether the `entry`-th archived order set contains exactly `needle`.
pub fn archived(game: &Game, entry: usize, needle: &str) -> bool {
    game.order_archive()
        .loc(entry)
        .map_or(false, |orders| orders.iter().any(|o| o == needle))
}

#[macro_export]
macro_rules! assert_archived {
    ($game:expr, $entry:expr, $($needle:expr),+ $(,)?) => {
        $(
            assert!(
                archived(&$game, $entry, $needle),
                "missing archived order: {:?}\narchive entry {}: {:#?}",
                $needle,
                $entry,
                $game.order_archive().loc($entry)
            );
        )+
    };
}
