use pokertrack::*;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        starting_random_hand,
        applying_legal_action,
        playing_random_hand,
        computing_side_pots,
        settling_showdown,
        replaying_stored_hand,
}

fn starting_random_hand(c: &mut criterion::Criterion) {
    c.bench_function("start a Hand from a random Setup", |b| {
        let setup = Setup::random();
        b.iter(|| Hand::start(&setup))
    });
}

fn applying_legal_action(c: &mut criterion::Criterion) {
    let hand = Hand::random();
    let position = hand.next_to_act().expect("fresh hand has an actor");
    let action = hand.legal(position)[0];
    c.bench_function("apply a legal Action", |b| {
        b.iter(|| hand.try_apply(position, action))
    });
}

fn playing_random_hand(c: &mut criterion::Criterion) {
    c.bench_function("play a random Hand to completion", |b| {
        b.iter(|| Hand::random().playout().last())
    });
}

fn computing_side_pots(c: &mut criterion::Criterion) {
    let seats = Hands::new()
        .take(64)
        .max_by_key(|hand| hand.layers().len())
        .map(|hand| hand.seats().to_vec())
        .unwrap_or_default();
    c.bench_function("compute side pots for a finished Hand", |b| {
        b.iter(|| compute_side_pots(&seats))
    });
}

fn settling_showdown(c: &mut criterion::Criterion) {
    let seats = Hands::new()
        .take(64)
        .max_by_key(|hand| hand.layers().len())
        .map(|hand| hand.seats().to_vec())
        .unwrap_or_default();
    let live = seats
        .iter()
        .filter(|s| s.state().is_active())
        .map(|s| s.position())
        .collect::<Vec<_>>();
    c.bench_function("settle a multiway Showdown", |b| {
        b.iter(|| {
            let verdicts = verdicts(&live);
            let ledger = seats
                .iter()
                .map(|s| {
                    let verdict = verdicts
                        .iter()
                        .find(|(p, _)| *p == s.position())
                        .map(|(_, v)| *v);
                    Settlement::new(s.position(), s.spent(), s.state(), verdict)
                })
                .collect::<Vec<_>>();
            Showdown::from((ledger, layers(&seats))).settle()
        })
    });
}

fn replaying_stored_hand(c: &mut criterion::Criterion) {
    let stored = Hands::new()
        .next()
        .and_then(|hand| hand.record().ok())
        .expect("random hands complete");
    c.bench_function("replay a StoredHand", |b| b.iter(|| stored.replay()));
}
