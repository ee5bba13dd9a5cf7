use armistice::{variant, Game};
use criterion::{criterion_group, criterion_main, Criterion};

const OPENING: &[&str] = &[
    "A Vie - Gal",
    "A Bud - Ser",
    "F Tri - Alb",
    "F Edi - NTH",
    "F Lon - ENG",
    "A Lvp - Yor",
    "F Bre - MAO",
    "A Par - Bur",
    "A Mar S A Par - Bur",
    "A Ber - Kie",
    "F Kie - Den",
    "A Mun - Ruh",
    "F Nap - ION",
    "A Rom - Apu",
    "A Ven H",
    "A Mos - Ukr",
    "F Sev - BLA",
    "F StP (sc) - BOT",
    "A War - Gal",
    "F Ank - BLA",
    "A Con - Bul",
    "A Smy - Con",
];

fn classic_opening(c: &mut Criterion) {
    c.bench_function("adjudicate classic opening", |b| {
        b.iter(|| {
            let mut game = Game::new(variant::classic());
            game.start().expect("game starts");
            for order in OPENING {
                game.order(order).expect("opening order parses");
            }
            game.adjudicate(true).expect("opening resolves");
        })
    });
}

criterion_group!(benches, classic_opening);
criterion_main!(benches);
