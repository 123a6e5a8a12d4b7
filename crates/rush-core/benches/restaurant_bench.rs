//! Criterion benchmarks for the restaurant frame pipeline.
//!
//! Two benchmark groups:
//! - `lunch_rush`: one of every fixture at level 3 with five employees,
//!   warmed up until queues and tables are busy
//! - `food_court`: eight counters and forty tables, to see how the seat
//!   search and customer loop scale

use criterion::{Criterion, criterion_group, criterion_main};
use rush_core::config::RestaurantConfig;
use rush_core::ledger::{RestaurantLedger, Upgrade};
use rush_core::restaurant::Restaurant;
use rush_core::test_utils::*;

// ===========================================================================
// Restaurant builders
// ===========================================================================

fn staffed(config: RestaurantConfig, employees: u32) -> Restaurant {
    let ledger = RestaurantLedger::new(config.starting_money, config.upgrade_price.curve())
        .with_levels(&[(Upgrade::EmployeeAmount, employees), (Upgrade::EmployeeCapacity, 2)]);
    let Ok(mut r) = Restaurant::with_ledger(config, Box::new(ledger)) else {
        panic!("default config must validate");
    };
    r.place_player(nowhere());
    r
}

fn build_lunch_rush() -> Restaurant {
    let mut r = staffed(RestaurantConfig::default(), 5);
    r.add_food_machine(pos(0.0, 0.0), 3);
    r.add_food_machine(pos(0.0, 3.0), 3);
    let counter = r.add_counter(counter_site(3));
    let drive_thru = r.add_drive_thru(drive_thru_site(3));
    r.add_packing_table(packing_site(3));
    for i in 0..6 {
        r.add_seating(seating_site(3, i as f64 * 4.0));
    }
    r.add_trash_bin(pos(-5.0, 0.0));
    let food = counter_food(&r, counter);
    let packages = drive_thru_packages(&r, drive_thru);
    stock_stack(&mut r, food, 45);
    stock_stack(&mut r, packages, 45);
    r.run(frames(60.0));
    r
}

fn build_food_court() -> Restaurant {
    let mut r = staffed(RestaurantConfig::default(), 10);
    for i in 0..8 {
        let mut site = counter_site(3);
        let dx = i as f64 * 12.0;
        site.food_stack.x += fixed(dx);
        site.money_pile.x += fixed(dx);
        site.work_spot.x += fixed(dx);
        site.spawn.x += fixed(dx);
        site.exit.x += fixed(dx);
        for p in &mut site.queue {
            p.x += fixed(dx);
        }
        let counter = r.add_counter(site);
        let food = counter_food(&r, counter);
        stock_stack(&mut r, food, 45);
        r.add_food_machine(pos(dx, 3.0), 3);
    }
    for i in 0..40 {
        r.add_seating(seating_site(3, i as f64 * 3.0));
    }
    r.add_trash_bin(pos(-5.0, 0.0));
    r.run(frames(60.0));
    r
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_lunch_rush(c: &mut Criterion) {
    let mut group = c.benchmark_group("lunch_rush");
    group.sample_size(50);

    let mut r = build_lunch_rush();

    group.bench_function("one_frame", |b| {
        b.iter(|| {
            r.step();
            r.drain_events();
        });
    });

    group.finish();
}

fn bench_food_court(c: &mut Criterion) {
    let mut group = c.benchmark_group("food_court");
    group.sample_size(30);

    let mut r = build_food_court();

    group.bench_function("8_counters_40_tables", |b| {
        b.iter(|| {
            r.step();
            r.drain_events();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lunch_rush, bench_food_court);
criterion_main!(benches);
