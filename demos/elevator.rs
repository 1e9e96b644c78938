use platbody::*;

fn main() {
    let mut physics = Physics::new(PhysicsConfig::default()).expect("default config is valid");

    let elevator = physics.add_body(
        Body::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.5))
            .solid(true)
            .pusher(true)
            .group(CollisionGroups::WALLS)
            .collides_with(CollisionGroups::PLAYER),
    );
    let ceiling = physics.add_body(
        Body::new(Vec2::new(-5.0, 6.0), Vec2::new(20.0, 1.0))
            .solid(true)
            .group(CollisionGroups::WALLS),
    );
    let player = physics.add_body(
        Body::new(Vec2::new(1.0, 2.0), Vec2::new(0.8, 1.5))
            .capabilities(Capabilities::PLAYER | Capabilities::DAMAGEABLE)
            .on_collision(|c| println!("  player touched {:?} ({:?})", c.other, c.kind)),
    );

    println!("Inserted elevator={:?} ceiling={:?} player={:?}", elevator, ceiling, player);

    // Let the player land on the elevator
    physics.move_body(player, Vec2::new(0.0, -3.0));

    for tick in 0..12 {
        physics.move_body(elevator, Vec2::new(0.0, 0.5));
        physics.check_for_overlaps();

        let p = physics.body(player).expect("player is registered");
        println!(
            "tick {:2}: player=({:.3},{:.3}) floor={:?} crushed={}",
            tick, p.pos.x, p.pos.y, p.floor, p.crushed
        );
        if physics.take_crushed(player) {
            println!("player crushed against the ceiling, respawning");
            physics.remove_body(player);
            break;
        }
    }

    for c in physics.drain_contacts() {
        println!("Contact: {:?} <- {:?} kind={:?}", c.receiver, c.other, c.kind);
    }
    println!("{:?}", physics.debug_stats());
}
