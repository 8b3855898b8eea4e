use glam::Vec2;
use neptune::{Camera2D, Field, FluidScene, SolverParams};

#[test]
fn test_field_construction() {
    let field = Field::new(Vec2::new(-5.0, -5.0), Vec2::new(10.0, 10.0), (64, 64), 4);
    assert_eq!(field.resolution(), (64, 64));
    assert_eq!(field.channels(), 4);
    assert_eq!(field.read().len(), 64 * 64 * 4);
    assert!((field.cell_size() - 10.0 / 64.0).abs() < 1e-6);

    // Fresh fields start zeroed.
    assert!(field.read().iter().all(|&v| v == 0.0), "new field must be zero");
}

#[test]
fn test_field_swap_flips_roles() {
    let mut field = Field::new(Vec2::ZERO, Vec2::new(4.0, 4.0), (4, 4), 1);
    field.fill_read(|_, _, cell| cell[0] = 1.0);
    assert_eq!(field.read()[0], 1.0);

    // Write 2.0 into the back buffer, then swap it to the front.
    {
        let (_, dst) = field.pair_mut();
        for v in dst.iter_mut() {
            *v = 2.0;
        }
    }
    field.swap();
    assert_eq!(field.read()[0], 2.0, "swap must expose the written buffer");

    field.swap();
    assert_eq!(field.read()[0], 1.0, "second swap must restore the original");
}

#[test]
fn test_field_world_and_grid_positions() {
    let field = Field::new(Vec2::new(-5.0, -5.0), Vec2::new(10.0, 10.0), (10, 10), 1);

    // Cell (0, 0) is centered half a cell in from the lower-left corner.
    let p = field.world_position(0, 0);
    assert!((p.x - -4.5).abs() < 1e-6);
    assert!((p.y - -4.5).abs() < 1e-6);

    // world_position and grid_position are inverses at cell centers.
    let g = field.grid_position(field.world_position(3, 7));
    assert!((g.x - 3.0).abs() < 1e-5);
    assert!((g.y - 7.0).abs() < 1e-5);
}

#[test]
fn test_field_resize_is_rejected() {
    let mut field = Field::new(Vec2::ZERO, Vec2::new(1.0, 1.0), (8, 8), 2);
    assert!(field.resize((16, 16)).is_err(), "resize is not supported");
    assert_eq!(field.resolution(), (8, 8));
}

#[test]
fn test_camera_screen_to_world_corners() {
    let camera = Camera2D::new(Vec2::new(-5.0, -2.5), Vec2::new(10.0, 5.0));

    // Screen top-left maps to the world top-left: Y flips between the spaces.
    let top_left = camera.screen_to_world(0.0, 0.0);
    assert!((top_left.x - -5.0).abs() < 1e-6);
    assert!((top_left.y - 2.5).abs() < 1e-6);

    let bottom_right = camera.screen_to_world(1.0, 1.0);
    assert!((bottom_right.x - 5.0).abs() < 1e-6);
    assert!((bottom_right.y - -2.5).abs() < 1e-6);

    let center = camera.screen_to_world(0.5, 0.5);
    assert!(center.x.abs() < 1e-6);
    assert!(center.y.abs() < 1e-6);
}

#[test]
fn test_camera_matrices() {
    let camera = Camera2D::new(Vec2::new(-5.0, -2.5), Vec2::new(10.0, 5.0));

    // View translates the viewport center (0, 0 here) to the origin.
    let view = camera.view_matrix();
    let moved = view.transform_point3(glam::Vec3::new(1.0, 1.0, 0.0));
    assert!((moved.x - 1.0).abs() < 1e-6);
    assert!((moved.y - 1.0).abs() < 1e-6);

    // Projection scales the half-width to clip 1 and aspect-corrects Y.
    let proj = camera.projection_matrix();
    let cols = proj.to_cols_array_2d();
    assert!((cols[0][0] - 1.0 / 5.0).abs() < 1e-6);
    assert!((cols[1][1] - 2.0 / 5.0).abs() < 1e-6);
}

#[test]
fn test_solver_coefficients() {
    // Unit cell, viscosity 0.001, 16ms frame.
    let params = SolverParams::new(0.016, 1.0, 0.001);

    let alpha = params.diffuse_alpha();
    assert!(
        (alpha - 62500.0).abs() < 1.0,
        "diffuse alpha: got {alpha}, expected 62500"
    );
    // Beta is alpha plus the four-neighbor stencil count.
    let beta = params.diffuse_beta();
    assert!(
        (beta - 62504.0).abs() < 1.0,
        "diffuse beta: got {beta}, expected 62504"
    );

    assert!((params.pressure_alpha() - -1.0).abs() < 1e-6);
    assert_eq!(params.pressure_beta(), 4.0);
}

#[test]
fn test_solver_coefficients_scale_with_cell_size() {
    // Halving the cell size divides alpha by four.
    let params = SolverParams::new(0.016, 0.5, 0.001);
    let alpha = params.diffuse_alpha();
    assert!(
        (alpha - 15625.0).abs() < 1.0,
        "alpha must scale with cell^2, got {alpha}"
    );
    assert!((params.diffuse_beta() - 15629.0).abs() < 1.0);
    assert!((params.pressure_alpha() - -0.25).abs() < 1e-6);
}

#[test]
fn test_scene_world_extent() {
    let scene = FluidScene::new((128, 64));

    // Width is fixed at 10; height follows the grid aspect ratio.
    let size = scene.substance().size();
    assert!((size.x - 10.0).abs() < 1e-6);
    assert!((size.y - 5.0).abs() < 1e-6);

    // The domain is centered on the origin.
    let start = scene.substance().start();
    assert!((start.x - -5.0).abs() < 1e-6);
    assert!((start.y - -2.5).abs() < 1e-6);

    // Substance carries RGBA, velocity two components.
    assert_eq!(scene.substance().channels(), 4);
    assert_eq!(scene.velocity().channels(), 2);
}
