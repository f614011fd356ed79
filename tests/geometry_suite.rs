use hypertile::geometry::{Complex64, Geometry, GeometryError, Viewport, mobius};

fn geom(p: u32, q: i64) -> Geometry {
    Geometry::new(p, q, false, false, 100).expect("hyperbolic parameters should validate")
}

/// Disk points on a regular grid, radius capped so every sample sits well
/// inside the unit circle.
fn disk_grid(max_radius: f64) -> Vec<Complex64> {
    let mut points = Vec::new();
    for i in -20i32..=20 {
        for j in -20i32..=20 {
            let z = Complex64::new(f64::from(i) / 20.0, f64::from(j) / 20.0) * max_radius;
            if z.norm_sqr() < max_radius * max_radius {
                points.push(z);
            }
        }
    }
    points
}

// ── parameter validation ────────────────────────────────────────────────────

#[test]
fn non_hyperbolic_parameters_rejected() {
    for (p, q) in [(3, 3), (3, 5), (4, 4), (5, 3), (6, 3), (3, 6)] {
        let err = Geometry::new(p, q, false, false, 100)
            .expect_err("flat or spherical (p, q) must fail");
        assert!(
            matches!(err, GeometryError::NotHyperbolic { .. }),
            "unexpected error for ({p}, {q}): {err}"
        );
    }
}

#[test]
fn hyperbolic_parameters_accepted() {
    for (p, q) in [(3, 7), (7, 3), (4, 5), (5, 4), (8, 3)] {
        assert!(Geometry::new(p, q, false, false, 100).is_ok(), "({p}, {q}) should be hyperbolic");
    }
}

#[test]
fn negative_q_means_infinity() {
    // {3, inf} is hyperbolic even though {3, 3} is not.
    assert!(Geometry::new(3, -1, false, false, 100).is_ok());
}

#[test]
fn alternating_rejects_odd_p() {
    let err = Geometry::new(7, 3, true, false, 100).expect_err("odd p cannot alternate");
    assert!(matches!(err, GeometryError::AlternatingOddP { p: 7 }));
    assert!(Geometry::new(8, 3, true, false, 100).is_ok());
}

#[test]
fn validation_errors_display_the_parameters() {
    let err = Geometry::new(4, 4, false, false, 100).unwrap_err();
    assert!(err.to_string().contains("not hyperbolic"));
    let err = Geometry::new(5, 4, true, false, 100).unwrap_err();
    assert!(err.to_string().contains("odd p"));
}

// ── fundamental-domain reduction ────────────────────────────────────────────

#[test]
fn point_already_in_domain_is_untouched() {
    let g = geom(7, 3);
    let z = Complex64::new(0.1, 0.01);
    assert!(g.in_domain(z));
    let fold = g.reduce(z);
    assert!(fold.converged());
    assert_eq!(fold.parity, 0);
    assert_eq!(fold.z, z);
}

#[test]
fn reduction_always_terminates_and_lands_in_domain() {
    for (p, q) in [(7i64, 3i64), (3, 7), (4, 5), (5, 5)] {
        let g = geom(p as u32, q);
        for z in disk_grid(0.95) {
            let fold = g.reduce(z);
            if fold.converged() {
                assert!(g.in_domain(fold.z), "converged outside domain for z = {z} ({p},{q})");
            } else {
                assert!(fold.nonconvergent || fold.escaped);
            }
        }
    }
}

#[test]
fn interior_points_converge_within_budget() {
    let g = geom(7, 3);
    let points = disk_grid(0.9);
    let converged = points.iter().filter(|&&z| g.reduce(z).converged()).count();
    // Slow convergence is expected only near the disk boundary.
    assert!(
        converged * 100 >= points.len() * 95,
        "only {converged}/{} interior points converged",
        points.len()
    );
}

#[test]
fn reduction_never_increases_the_modulus() {
    let g = geom(7, 3);
    for z in disk_grid(0.95) {
        let fold = g.reduce(z);
        assert!(
            fold.z.norm_sqr() <= z.norm_sqr() + 1e-9,
            "fold grew |z|: {} -> {}",
            z.norm(),
            fold.z.norm()
        );
    }
}

#[test]
fn wedge_boundary_orbits_terminate() {
    // With p = 4 the wedge boundary is the diagonal, so pixels with equal
    // coordinate magnitudes rotate onto it exactly and rounding decides
    // which side they land on. The fold must still return within budget.
    let g = Geometry::new(4, 5, false, false, 50).unwrap();
    for t in [0.1, 0.335, 0.5, 0.665] {
        for z in [
            Complex64::new(-t, -t),
            Complex64::new(-t, t),
            Complex64::new(t, -t),
        ] {
            let fold = g.reduce(z);
            if fold.converged() {
                assert!(g.in_domain(fold.z), "converged outside domain for z = {z}");
            }
        }
    }
}

#[test]
fn accepted_inversions_strictly_contract() {
    for (p, q) in [(7i64, 3i64), (4, 5), (8, 4)] {
        let g = geom(p as u32, q);
        for z in disk_grid(0.95) {
            if let Some(inverted) = g.invert(z) {
                assert!(
                    inverted.norm_sqr() < z.norm_sqr(),
                    "inversion failed to contract z = {z} for ({p},{q})"
                );
            }
        }
    }
}

#[test]
fn alternating_mode_doubles_the_wedge() {
    let plain = Geometry::new(8, 3, false, false, 100).unwrap();
    let alt = Geometry::new(8, 3, true, false, 100).unwrap();
    // Angle 0.6 rad: past the single-sector slope tan(pi/8) but inside the
    // doubled wedge bounded by tan(pi/4).
    let z = Complex64::from_polar(0.2, 0.6);
    assert!(!plain.in_domain(z));
    assert!(alt.in_domain(z));
}

#[test]
fn alternating_reduction_terminates() {
    let g = Geometry::new(8, 3, true, false, 100).unwrap();
    for z in disk_grid(0.9) {
        let fold = g.reduce(z);
        if fold.converged() {
            assert!(g.in_domain(fold.z));
        }
    }
}

// ── pixel-to-disk mapping ───────────────────────────────────────────────────

#[test]
fn affine_view_centers_on_translate() {
    let translate = Complex64::new(0.3, 0.1);
    let view = Viewport::Affine { zoom: 1.0, translate };
    let z = view.to_disk(128, 128, 256).expect("center pixel is inside the disk");
    assert!((z - translate).norm() < 1e-12);
}

#[test]
fn affine_corners_fall_outside_the_disk() {
    let view = Viewport::Affine {
        zoom: 1.0,
        translate: Complex64::new(0.0, 0.0),
    };
    assert!(view.to_disk(0, 0, 256).is_none());
    assert!(view.to_disk(255, 255, 256).is_none());
}

#[test]
fn affine_zoom_scales_the_view() {
    let view = Viewport::Affine {
        zoom: 0.25,
        translate: Complex64::new(0.0, 0.0),
    };
    // With zoom 1/4 even the corner pixel lands inside the disk.
    let z = view.to_disk(0, 0, 256).expect("zoomed corner is inside");
    assert!((z - Complex64::new(-0.25, -0.25)).norm() < 1e-12);
}

#[test]
fn half_plane_maps_into_the_disk() {
    let view = Viewport::HalfPlane;
    // w = i maps to the disk origin.
    let z = view.to_disk(0, 128, 256).expect("w = i is in the upper half-plane");
    assert!(z.norm() < 1e-12);
    for (x, y) in [(0, 0), (13, 200), (255, 1), (100, 255)] {
        if let Some(z) = view.to_disk(x, y, 256) {
            assert!(z.norm_sqr() <= 1.0);
        }
    }
}

#[test]
fn mobius_with_zero_parameter_is_identity() {
    let z = Complex64::new(0.4, -0.2);
    assert_eq!(mobius(z, Complex64::new(0.0, 0.0)), z);
}

#[test]
fn mobius_sends_origin_to_the_parameter() {
    let m = Complex64::new(0.3, 0.25);
    let z = mobius(Complex64::new(0.0, 0.0), m);
    assert!((z - m).norm() < 1e-12);
}
