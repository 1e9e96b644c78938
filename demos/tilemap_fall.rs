use std::rc::Rc;

use platbody::*;

fn main() {
    // 32x8 room: ground row, a step and a floating ledge
    let mut tiles = TileGrid::new(32, 8);
    for x in 0..32 {
        tiles.set(IVec2::new(x, 0), 1);
    }
    for x in 10..14 {
        tiles.set(IVec2::new(x, 1), 1);
    }
    for x in 18..22 {
        tiles.set(IVec2::new(x, 4), 1);
    }
    let tiles = Rc::new(tiles);

    let mut physics = Physics::new(PhysicsConfig::default()).expect("default config is valid");
    let room = physics.add_body(
        Body::tilemap(Vec2::ZERO, Vec2::ONE, Rc::new(ShapeTilemap::new(&tiles)))
            .group(CollisionGroups::WALLS),
    );
    let player = physics.add_body(
        Body::new(Vec2::new(2.0, 6.0), Vec2::new(0.8, 1.5)).collides_with(CollisionGroups::WALLS),
    );

    let mut vel = Vec2::new(0.25, 0.0);
    for tick in 0..60 {
        vel.y = (vel.y - 0.05).max(-0.8);

        // Resolve each axis separately so a blocked fall does not stop walking
        let fx = physics.move_body(player, Vec2::new(vel.x, 0.0));
        let fy = physics.move_body(player, Vec2::new(0.0, vel.y));
        if fy < 1.0 {
            vel.y = 0.0;
        }
        if fx < 1.0 {
            // Hop over the step
            vel.y = 0.4;
        }

        let p = physics.body(player).expect("player is registered");
        println!(
            "tick {:2}: pos=({:6.3},{:6.3}) fx={:.3} fy={:.3} on_ground={}",
            tick,
            p.pos.x,
            p.pos.y,
            fx,
            fy,
            p.floor == Some(room)
        );
    }

    let ahead = Rect::new(Vec2::new(18.0, 4.0), Vec2::ONE);
    println!("ledge solid: {}", physics.is_solid(ahead, Some(player)));
}
