use platbody::*;
use std::time::Instant;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit_rand(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn main() {
    let mut physics = Physics::new(PhysicsConfig { max_contacts: 1_000_000, ..Default::default() })
        .expect("config is valid");

    let n = 60usize; // a busy room
    let mut seed = 1u32;
    let mut movers = Vec::new();
    for i in 0..n {
        let pos = Vec2::new(unit_rand(&mut seed) * 100.0, unit_rand(&mut seed) * 100.0);
        let body = Body::new(pos, Vec2::splat(1.0));
        if i % 3 == 0 {
            physics.add_body(body.solid(true).group(CollisionGroups::WALLS));
        } else {
            movers.push(physics.add_body(body));
        }
    }

    let ticks = 10_000;
    let t0 = Instant::now();
    let mut travelled = 0.0f32;
    for _ in 0..ticks {
        for &id in &movers {
            let delta = Vec2::new(unit_rand(&mut seed) * 2.0 - 1.0, unit_rand(&mut seed) * 2.0 - 1.0);
            travelled += physics.move_body(id, delta) * delta.length();
        }
        physics.check_for_overlaps();
    }
    let dt = t0.elapsed().as_secs_f64();
    let contacts = physics.drain_contacts().len();
    println!(
        "N={} ticks={} secs={:.3} ticks/s={:.0} contacts={} travelled={:.1}",
        n,
        ticks,
        dt,
        ticks as f64 / dt,
        contacts,
        travelled
    );
    println!("{:?}", physics.debug_stats());
}
