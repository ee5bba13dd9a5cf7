//! Scenarios from the Diplomacy Adjudicator Test Cases, driven through
//! the textual order surface the way a full game would submit them.

#[path = "./util.rs"]
mod util;

use armistice::error::Error;
use util::*;

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.1
#[test]
fn t6a01_move_to_non_neighbor_fails() {
    let mut game = started_classic();
    game.order("F Bre - NTH").unwrap();
    game.adjudicate(true).unwrap();
    assert_archived!(game, 0, "F Brest - North Sea (fails)");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.2
#[test]
fn t6a02_move_army_to_sea_is_rejected() {
    let mut game = started_classic();
    let err = game.order("A Mar - GOL").unwrap_err();
    assert!(matches!(err, Error::OrderInput(_)), "got {err}");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.3
#[test]
fn t6a03_move_fleet_to_inland_is_rejected() {
    let mut game = started_classic();
    let err = game.order("F Tri - Tyr").unwrap_err();
    assert!(matches!(err, Error::OrderInput(_)), "got {err}");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.4
#[test]
fn t6a04_move_to_own_province_is_rejected() {
    let mut game = started_classic();
    let err = game.order("A Bud - Bud").unwrap_err();
    assert!(matches!(err, Error::OrderInput(_)), "got {err}");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.5
#[test]
fn t6a05_move_to_own_province_via_convoy_is_rejected() {
    let mut game = started_classic();
    let err = game.order("A Mar - Mar via Convoy").unwrap_err();
    assert!(matches!(err, Error::OrderInput(_)), "got {err}");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.7
#[test]
fn t6a07_only_armies_can_be_convoyed() {
    let mut game = game_with(&[
        ("Fleet", "Austria", "Trieste"),
        ("Fleet", "Austria", "Adriatic Sea"),
    ]);
    let err = game.order("F Tri - Apu via Convoy").unwrap_err();
    assert!(matches!(err, Error::OrderInput(_)), "got {err}");
    let err = game.order("F ADR C F Tri - Apu").unwrap_err();
    assert!(matches!(err, Error::OrderInput(_)), "got {err}");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.8
#[test]
fn t6a08_support_to_hold_yourself_fails() {
    let mut game = game_with(&[
        ("Army", "Italy", "Venice"),
        ("Army", "Italy", "Tyrolia"),
        ("Fleet", "Austria", "Trieste"),
    ]);
    submit_all(
        &mut game,
        &["A Ven - Tri", "A Tyr S A Ven - Tri", "F Tri S F Tri"],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "A Venice - Trieste (succeeds)",
        "A Tyrolia S A Venice - Trieste (succeeds)",
        "F Trieste S F Trieste H (fails)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.A.11
#[test]
fn t6a11_simple_bounce() {
    let mut game = started_classic();
    submit_all(&mut game, &["A Vie - Tyr", "A Ven - Tyr"]);
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "A Vienna - Tyrolia (fails)",
        "A Venice - Tyrolia (fails)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.B.1
#[test]
fn t6b01_moving_to_an_unspecified_coast_is_ambiguous() {
    let mut game = game_with(&[("Fleet", "France", "Portugal")]);
    let err = game.order("F Por - Spa").unwrap_err();
    assert!(matches!(err, Error::Map(_)), "got {err}");

    game.order("F Por - Spa (nc)").unwrap();
    game.adjudicate(true).unwrap();
    assert_archived!(game, 0, "F Portugal - Spain (north coast) (succeeds)");
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.C.1
#[test]
fn t6c01_three_army_rotation() {
    let mut game = started_classic();
    game.add_unit("Army", "France", "Galicia").unwrap();
    submit_all(&mut game, &["A Vie - Gal", "A Gal - Bud", "A Bud - Vie"]);
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "A Vienna - Galicia (succeeds)",
        "A Galicia - Budapest (succeeds)",
        "A Budapest - Vienna (succeeds)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.C.2
#[test]
fn t6c02_three_army_rotation_with_support() {
    let mut game = started_classic();
    game.add_unit("Army", "France", "Galicia").unwrap();
    submit_all(
        &mut game,
        &[
            "A Vie - Gal",
            "A Gal - Bud",
            "A Bud - Vie",
            "A War S A Vie - Gal",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "A Vienna - Galicia (succeeds)",
        "A Galicia - Budapest (succeeds)",
        "A Budapest - Vienna (succeeds)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.D.1
#[test]
fn t6d01_supported_hold_prevents_dislodgement() {
    let mut game = game_with(&[
        ("Army", "Austria", "Trieste"),
        ("Army", "Austria", "Tyrolia"),
        ("Army", "Italy", "Venice"),
        ("Army", "Italy", "Rome"),
    ]);
    submit_all(
        &mut game,
        &[
            "A Tri - Ven",
            "A Tyr S A Tri - Ven",
            "A Ven H",
            "A Rom S A Ven H",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "A Trieste - Venice (fails)",
        "A Rome S A Venice H (succeeds)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.D.13
#[test]
fn t6d13_a_power_never_dislodges_its_own_unit() {
    let mut game = game_with(&[
        ("Army", "Germany", "Berlin"),
        ("Fleet", "Germany", "Kiel"),
        ("Army", "Russia", "Ruhr"),
    ]);
    submit_all(&mut game, &["A Ber - Kie", "F Kie H", "A Ruh S A Ber - Kie"]);
    game.adjudicate(true).unwrap();
    assert_archived!(game, 0, "A Berlin - Kiel (fails)");
    let kiel = game.map().province_named("Kiel").unwrap().id;
    assert!(game.unit_in(kiel).is_some());
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.D.17
#[test]
fn t6d17_unwanted_support_cannot_dislodge_self() {
    let mut game = game_with(&[
        ("Fleet", "Austria", "Constantinople"),
        ("Fleet", "Austria", "Black Sea"),
        ("Army", "France", "Smyrna"),
        ("Army", "France", "Armenia"),
        ("Fleet", "France", "Ankara"),
    ]);
    submit_all(
        &mut game,
        &[
            "F BLA - Ank",
            "F Con S F BLA - Ank",
            "F Ank - Con",
            "A Arm - Ank",
            "A Smy S F Ank - Con",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "F Black Sea - Ankara (fails)",
        "F Ankara - Constantinople (succeeds)",
        "A Armenia - Ankara (fails)",
        "A Smyrna S F Ankara - Constantinople (succeeds)",
    );
}

/// Convoy disruption: dislodging the convoying fleet stops the army.
/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.F.6 (simplified cousin)
#[test]
fn convoy_disruption_stops_the_convoyed_move() {
    let mut game = game_with(&[
        ("Army", "England", "London"),
        ("Fleet", "England", "English Channel"),
        ("Fleet", "France", "Brest"),
        ("Fleet", "France", "Mid-Atlantic Ocean"),
    ]);
    submit_all(
        &mut game,
        &[
            "A Lon - Bel via Convoy",
            "F ENG C A Lon - Bel",
            "F Bre - ENG",
            "F MAO S F Bre - ENG",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "F Brest - English Channel (succeeds)",
        "F English Channel C A London - Belgium (fails)",
        "A London - Belgium via Convoy (fails)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.F.6
#[test]
fn t6f06_convoy_disrupted_by_dislodgement_of_the_fleet() {
    let mut game = game_with(&[
        ("Army", "France", "Picardy"),
        ("Army", "France", "Burgundy"),
        ("Fleet", "England", "North Sea"),
        ("Army", "England", "London"),
        ("Army", "Germany", "Holland"),
        ("Army", "Germany", "Belgium"),
        ("Fleet", "Germany", "Heligoland Bight"),
        ("Fleet", "Germany", "Skagerrak"),
    ]);
    submit_all(
        &mut game,
        &[
            "A Lon - Hol via Convoy",
            "F NTH C A Lon - Hol",
            "A Hol S A Bel",
            "A Bel S A Hol",
            "F HEL S F SKA - NTH",
            "F SKA - NTH",
            "A Pic - Bel",
            "A Bur S A Pic - Bel",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "A London - Holland via Convoy (fails)",
        "F Skagerrak - North Sea (succeeds)",
        "A Holland S A Belgium H (succeeds)",
        "A Picardy - Belgium (fails)",
    );
}

/// The Szykman rule: a paradoxical convoyed move fails without cutting
/// the support aimed at its own convoy.
/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.F.21
#[test]
fn szykman_convoy_paradox_resolves_against_the_convoy() {
    let mut game = game_with(&[
        ("Army", "England", "London"),
        ("Fleet", "England", "English Channel"),
        ("Fleet", "France", "Brest"),
        ("Fleet", "France", "Belgium"),
    ]);
    submit_all(
        &mut game,
        &[
            "A Lon - Bel via Convoy",
            "F ENG C A Lon - Bel",
            "F Bre - ENG",
            "F Bel S F Bre - ENG",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "F Brest - English Channel (succeeds)",
        "F Belgium S F Brest - English Channel (succeeds)",
        "A London - Belgium via Convoy (fails)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.G.17
#[test]
fn t6g17_convoy_swap_to_adjacent_province() {
    let mut game = game_with(&[
        ("Fleet", "England", "Baltic Sea"),
        ("Fleet", "England", "North Sea"),
        ("Fleet", "England", "Skagerrak"),
        ("Army", "England", "Norway"),
        ("Army", "England", "Denmark"),
        ("Army", "Russia", "Sweden"),
        ("Fleet", "Russia", "Norwegian Sea"),
    ]);
    submit_all(
        &mut game,
        &[
            "A Nwy - Swe via Convoy",
            "A Den S A Nwy - Swe",
            "F BAL S A Nwy - Swe",
            "F NTH - Nwy",
            "A Swe - Nwy",
            "F SKA C A Nwy - Swe",
            "F NRG S A Swe - Nwy",
        ],
    );
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        0,
        "F North Sea - Norway (fails)",
        "A Norway - Sweden via Convoy (succeeds)",
        "A Sweden - Norway (succeeds)",
    );
}

/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.H.9
#[test]
fn t6h09_retreat_to_a_province_vacated_by_the_head_to_head_winner() {
    let mut game = game_with(&[
        ("Fleet", "England", "Heligoland Bight"),
        ("Fleet", "England", "Denmark"),
        ("Army", "Germany", "Berlin"),
        ("Army", "Germany", "Silesia"),
        ("Fleet", "Germany", "Kiel"),
        ("Army", "Russia", "Prussia"),
    ]);
    submit_all(
        &mut game,
        &[
            "F HEL - Kie",
            "F Den S F HEL - Kie",
            "A Ber - Pru",
            "F Kie H",
            "A Sil S A Ber - Pru",
            "A Pru - Ber",
        ],
    );
    game.adjudicate(true).unwrap();

    game.order("F Kie R Ber").unwrap();
    game.adjudicate(true).unwrap();
    assert_archived!(game, 1, "F Kiel R Berlin (succeeds)");

    let map = game.map();
    let berlin = map.province_named("Berlin").unwrap().id;
    let fleet = map.force_id("Fleet").unwrap();
    assert_eq!(game.unit_in(berlin).map(|u| u.force), Some(fleet));
}

/// Two retreats to the same province bounce; both units disband.
/// https://webdiplomacy.net/doc/DATC_v3_0.html#6.H.4
#[test]
fn t6h04_retreats_to_the_same_province_all_disband() {
    let mut game = game_with(&[
        ("Army", "Germany", "Munich"),
        ("Army", "France", "Burgundy"),
        ("Army", "France", "Ruhr"),
        ("Army", "Austria", "Bohemia"),
        ("Army", "Russia", "Silesia"),
        ("Army", "Russia", "Galicia"),
    ]);
    submit_all(
        &mut game,
        &[
            "A Mun H",
            "A Bur - Mun",
            "A Ruh S A Bur - Mun",
            "A Boh H",
            "A Sil - Boh",
            "A Gal S A Sil - Boh",
        ],
    );
    game.adjudicate(true).unwrap();

    game.order("A Mun R Tyr").unwrap();
    game.order("A Boh R Tyr").unwrap();
    game.adjudicate(true).unwrap();
    assert_archived!(
        game,
        1,
        "A Munich R Tyrolia (fails)",
        "A Bohemia R Tyrolia (fails)",
    );

    let tyrolia = game.map().province_named("Tyrolia").unwrap().id;
    assert!(game.unit_in(tyrolia).is_none());
    assert_eq!(game.units().len(), 4);
}
