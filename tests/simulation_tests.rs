use glam::Vec2;
use neptune::analysis::max_interior_divergence;
use neptune::{Field, FluidScene, FluidSimulation, Solver2D, SubstanceCreator2D};

fn world_fields(resolution: (usize, usize)) -> (Field, Field) {
    let aspect = resolution.0 as f32 / resolution.1 as f32;
    let size = Vec2::new(10.0, 10.0 / aspect);
    let start = -size / 2.0;
    let substance = Field::new(start, size, resolution, 4);
    let velocity = Field::new(start, size, resolution, 2);
    (substance, velocity)
}

#[test]
fn test_idle_injector_leaves_fields_untouched() {
    let (mut substance, mut velocity) = world_fields((32, 32));
    substance.fill_read(|i, j, cell| cell[0] = (i + j) as f32);

    let before_substance = substance.read().to_vec();
    let before_velocity = velocity.read().to_vec();
    let substance_front = substance.front_index();

    let mut injector = SubstanceCreator2D::new();
    injector.set_position(Vec2::ZERO);
    injector.step(1.0 / 60.0, &mut substance, &mut velocity);

    assert_eq!(
        substance.read(),
        &before_substance[..],
        "idle injector must not write substance"
    );
    assert_eq!(velocity.read(), &before_velocity[..]);
    assert_eq!(
        substance.front_index(),
        substance_front,
        "idle injector must not swap"
    );
}

#[test]
fn test_active_injector_adds_dye_inside_radius() {
    let (mut substance, mut velocity) = world_fields((64, 64));

    let mut injector = SubstanceCreator2D::new();
    // Default radius 0.1 is narrower than a 64-cell grid spacing; widen it so
    // the splat covers several cell centers.
    injector.radius = 0.5;
    injector.set_active(true);
    injector.set_position(Vec2::ZERO);
    injector.step(1.0 / 60.0, &mut substance, &mut velocity);

    let center = substance.index(32, 32);
    let dye: f32 = substance.read()[center..center + 3].iter().sum();
    assert!(dye > 0.0, "dye must appear at the pointer, got {dye}");

    // A distant cell stays clean.
    let far = substance.index(5, 5);
    let dye: f32 = substance.read()[far..far + 3].iter().sum();
    assert_eq!(dye, 0.0, "dye must stay inside the splat radius");
}

#[test]
fn test_injector_falloff_is_radial() {
    let (mut substance, mut velocity) = world_fields((64, 64));

    let mut injector = SubstanceCreator2D::new();
    injector.radius = 1.0;
    injector.set_active(true);
    injector.set_position(Vec2::ZERO);
    injector.step(1.0 / 60.0, &mut substance, &mut velocity);

    let at = |i: usize, j: usize| -> f32 {
        let idx = substance.index(i, j);
        substance.read()[idx..idx + 3].iter().sum()
    };
    // Dye decays monotonically away from the pointer.
    assert!(at(32, 32) > at(34, 32));
    assert!(at(34, 32) > at(36, 32));
}

#[test]
fn test_pointer_drag_injects_momentum() {
    let (mut substance, mut velocity) = world_fields((64, 64));

    let mut injector = SubstanceCreator2D::new();
    injector.radius = 0.5;
    injector.set_active(true);
    // Drag to the right: the offset between positions becomes the force.
    injector.set_position(Vec2::new(-0.2, 0.0));
    injector.set_position(Vec2::new(0.2, 0.0));
    injector.step(1.0 / 60.0, &mut substance, &mut velocity);

    let idx = velocity.index(33, 32);
    let vx = velocity.read()[idx];
    let vy = velocity.read()[idx + 1];
    assert!(vx > 0.0, "drag right must push velocity right, got {vx}");
    assert!(vy.abs() < vx, "push must be mostly horizontal");
}

#[test]
fn test_substance_color_cycles_within_range() {
    let mut injector = SubstanceCreator2D::new();
    let (mut substance, mut velocity) = world_fields((16, 16));

    for _ in 0..200 {
        injector.step(0.05, &mut substance, &mut velocity);
        let (r, g, b) = injector.substance_color();
        for channel in [r, g, b] {
            assert!(
                (0.0..=2.0 / 3.0 + 1e-6).contains(&channel),
                "channel out of range: {channel}"
            );
        }
        // The three phases never vanish together.
        assert!(r + g + b > 0.5);
    }
}

#[test]
fn test_projection_removes_divergence() {
    let (mut substance, mut velocity) = world_fields((32, 32));

    // Curl-free velocity from a Gaussian potential: all of it is divergence,
    // so the projection must cancel nearly everything.
    let amplitude = 0.02;
    let sigma = 1.5;
    let start = velocity.start();
    let size = velocity.size();
    velocity.fill_read(|i, j, cell| {
        let p = start
            + size * Vec2::new((i as f32 + 0.5) / 32.0, (j as f32 + 0.5) / 32.0);
        let gauss = amplitude * (-p.length_squared() / (2.0 * sigma * sigma)).exp();
        cell[0] = -p.x / (sigma * sigma) * gauss;
        cell[1] = -p.y / (sigma * sigma) * gauss;
    });

    let before = max_interior_divergence(&velocity);
    assert!(before > 1e-3, "test field must start divergent, got {before}");

    let mut solver = Solver2D::new(start, size, (32, 32));
    // The default 50 Jacobi sweeps are tuned for interactive frames; give the
    // Poisson solve room to actually converge here.
    solver.pressure_iterations = 2000;
    solver.step(1.0 / 60.0, &mut substance, &mut velocity);

    let after = max_interior_divergence(&velocity);
    assert!(
        after < 2e-3,
        "projection must leave the field nearly divergence-free, got {after}"
    );
    assert!(
        after < before / 5.0,
        "divergence must drop substantially: before {before}, after {after}"
    );
}

#[test]
fn test_advection_carries_dye_downstream() {
    let (mut substance, mut velocity) = world_fields((64, 64));

    // Uniform rightward flow.
    velocity.fill_read(|_, _, cell| {
        cell[0] = 2.0;
        cell[1] = 0.0;
    });
    // A dye column left of center.
    substance.fill_read(|i, _, cell| {
        if (20..24).contains(&i) {
            cell[0] = 1.0;
        }
    });

    let column_mass = |field: &Field, range: std::ops::Range<usize>| -> f32 {
        let mut total = 0.0;
        for j in 0..64 {
            for i in range.clone() {
                total += field.read()[field.index(i, j)];
            }
        }
        total
    };
    let upstream_before = column_mass(&substance, 20..24);

    let mut solver = Solver2D::new(substance.start(), substance.size(), (64, 64));
    for _ in 0..30 {
        solver.step(1.0 / 60.0, &mut substance, &mut velocity);
    }

    // After half a second at 2 units/s the dye has moved about a world unit,
    // six cells to the right.
    let upstream_after = column_mass(&substance, 20..24);
    let downstream = column_mass(&substance, 24..36);
    assert!(
        upstream_after < upstream_before * 0.5,
        "dye must leave the source column: {upstream_before} -> {upstream_after}"
    );
    assert!(
        downstream > upstream_before * 0.5,
        "dye must arrive downstream, got {downstream}"
    );
}

#[test]
fn test_single_step_injection_at_origin() {
    let mut scene = FluidScene::new((64, 64));
    scene.injector_mut().radius = 0.5;

    scene.activate();
    // A short stroke ending at the origin, so a force accompanies the dye.
    scene.move_to_world(Vec2::new(-0.2, 0.0));
    scene.move_to_world(Vec2::ZERO);
    scene.step(0.016);

    let substance = scene.substance();
    let radius = 0.5;
    let mut total = 0.0;
    let mut inside = 0.0;
    let (width, height) = substance.resolution();
    for j in 0..height {
        for i in 0..width {
            let idx = substance.index(i, j);
            let dye: f32 = substance.read()[idx..idx + 3].iter().sum();
            total += dye;
            if substance.world_position(i, j).length() <= radius {
                inside += dye;
            }
        }
    }
    assert!(total > 0.0, "one active step must deposit dye");
    assert!(
        inside > total * 0.99,
        "dye must sit within the splat radius after one step: {inside} of {total}"
    );

    // Momentum lands near the origin and nowhere else.
    let velocity = scene.velocity();
    let near = velocity.index(32, 32);
    let near_speed = Vec2::new(velocity.read()[near], velocity.read()[near + 1]).length();
    assert!(near_speed > 0.0, "velocity must appear at the pointer");

    let far = velocity.index(5, 58);
    let far_speed = Vec2::new(velocity.read()[far], velocity.read()[far + 1]).length();
    assert!(
        far_speed < near_speed * 0.05,
        "velocity must stay near the origin: near {near_speed}, far {far_speed}"
    );
}

#[test]
fn test_scene_end_to_end_injection() {
    let mut scene = FluidScene::new((64, 64));
    scene.injector_mut().radius = 0.5;

    scene.activate();
    // Two pointer samples establish a rightward stroke.
    scene.move_to_world(Vec2::new(-0.3, 0.0));
    scene.move_to_world(Vec2::new(0.3, 0.0));
    for _ in 0..5 {
        scene.step(1.0 / 60.0);
    }
    scene.deactivate();

    let substance = scene.substance();
    let mut total = 0.0;
    let mut near_origin = 0.0;
    let (width, height) = substance.resolution();
    for j in 0..height {
        for i in 0..width {
            let idx = substance.index(i, j);
            let dye: f32 = substance.read()[idx..idx + 3].iter().sum();
            total += dye;
            if (24..40).contains(&i) && (24..40).contains(&j) {
                near_origin += dye;
            }
        }
    }
    assert!(total > 0.0, "five active steps must deposit dye");
    assert!(
        near_origin > total * 0.5,
        "dye must stay concentrated near the stroke: {near_origin} of {total}"
    );

    // Further idle steps keep the sim stable and the dye finite.
    for _ in 0..10 {
        scene.step(1.0 / 60.0);
    }
    assert!(
        scene.substance().read().iter().all(|v| v.is_finite()),
        "simulation must stay finite"
    );
}

#[test]
fn test_move_to_maps_through_camera() {
    let mut scene = FluidScene::new((64, 64));
    scene.injector_mut().radius = 0.5;

    scene.activate();
    // Normalized (0.5, 0.5) is the world origin; dye must land mid-grid.
    scene.move_to(0.5, 0.5);
    scene.step(1.0 / 60.0);

    let substance = scene.substance();
    let center = substance.index(32, 32);
    let dye: f32 = substance.read()[center..center + 3].iter().sum();
    assert!(dye > 0.0, "dye must land at the grid center");
}
