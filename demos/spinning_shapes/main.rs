//! # Spinning Shapes Demo
//!
//! The scene this engine was built around: a purple cone, an ochre torus,
//! and a textured cube spinning in front of a three-light rig, plus an
//! OBJ model loaded asynchronously.
//!
//! ## Usage:
//! ```bash
//! cargo run --example spinning_shapes
//! ```
//!
//! The texture and model paths below are looked up relative to the working
//! directory; missing files are logged and the scene simply renders without
//! them.
//!
//! Drag to orbit, scroll to zoom, Escape to quit.

use anyhow::Result;
use whirl::prelude::*;

const WALL_TEXTURE: &str = "demos/spinning_shapes/assets/wall.jpg";
const CAT_MATERIALS: &str = "demos/spinning_shapes/assets/cat.mtl";
const CAT_GEOMETRY: &str = "demos/spinning_shapes/assets/cat.obj";

fn main() -> Result<()> {
    env_logger::init();

    let mut app = whirl::default();

    // Camera two units back from the origin, wide lens, tight clip range
    app.viewport_mut().set_projection(Deg(100.0), 0.1, 10.0);

    // Three-light rig: ambient fill, one key light, sky/ground gradient
    let scene = app.scene_mut();
    scene.add_light(Light::Ambient {
        color: [1.0, 1.0, 1.0],
        intensity: 0.3,
    });
    scene.add_light(Light::Directional {
        color: [1.0, 1.0, 1.0],
        intensity: 1.0,
        position: Vector3::new(-1.0, 2.0, 4.0),
    });
    scene.add_light(Light::Hemisphere {
        sky_color: rgb_from_hex(0xB1E1FF),
        ground_color: rgb_from_hex(0xB97A20),
        intensity: 0.4,
    });

    let cone = scene.add_primitive(
        PrimitiveShape::Cone {
            radius: 1.0,
            height: 1.0,
        },
        rgb_from_hex(0x8844AA),
        Vector3::new(-2.0, 0.0, 0.0),
    );
    let torus = scene.add_primitive(
        PrimitiveShape::Torus {
            radius: 0.5,
            tube_radius: 0.25,
        },
        rgb_from_hex(0xAA8844),
        Vector3::new(2.0, 0.0, 0.0),
    );
    let cube = scene.add_primitive(
        PrimitiveShape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        },
        [1.0, 1.0, 1.0],
        Vector3::new(0.0, 0.0, 0.0),
    );

    // The cube renders plain white until the texture resolves
    let wall = app.load_texture(WALL_TEXTURE);
    app.scene_mut().set_texture(cube, wall);

    // Materials load first, then geometry; on failure the scene just
    // renders without the cat
    app.load_model(CAT_MATERIALS, CAT_GEOMETRY);

    // Registration order fixes the speed ladder: 1.0, 1.1, 1.2
    for id in [cone, torus, cube] {
        app.animation_mut().register(id);
    }

    app.run();
    Ok(())
}
