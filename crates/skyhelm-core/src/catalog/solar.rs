/// The built-in default system: the Sun, nine planets and the major moons,
/// with the scaled parameter set the simulation was tuned around.
///
/// Distances are km from the parent, radii km, periods in Earth days
/// (orbital) and sidereal hours (rotation; negative = retrograde), surface
/// gravity m/s². Eccentricity is the width-over-breadth ratio of the orbit,
/// not the astronomical eccentricity.
use crate::catalog::manifest::{BodyManifest, BodyParams};

#[allow(clippy::too_many_arguments)]
fn body(
    name: &str,
    parent: Option<&str>,
    depth: u32,
    mass: f32,
    distance: f32,
    radius: f32,
    inclination_deg: f32,
    orbital_period_days: f32,
    rotation_period_hours: f32,
    surface_gravity: f32,
    eccentricity: f32,
) -> BodyParams {
    BodyParams {
        name: name.into(),
        parent: parent.map(String::from),
        depth,
        mass,
        distance,
        radius,
        inclination_deg,
        orbital_period_days,
        rotation_period_hours,
        surface_gravity,
        eccentricity,
    }
}

/// The default catalog. Build it with [`BodyManifest::build`].
pub fn solar_system() -> BodyManifest {
    let sun = Some("Sun");
    let bodies = vec![
        body("Sun", None, 0, 1.989e30, 0.0, 695_000.0, 0.0, 0.0, 1.17, 28.0 * 9.78, 1.0),
        body("Mercury", sun, 1, 3.3e23, 57_910_000.0, 2_440.0, 7.0, 87.9, 1_407.6, 3.7, 0.659_026),
        body("Venus", sun, 1, 9.869e23, 108_200_000.0, 6_051.8, 3.39, 224.701, 5_832.5, 8.87, 0.987_144_17),
        body("Earth", sun, 1, 5.972e24, 179_600_000.0, 6_378.15, 9.0, 365.256, -23.9345, 9.78, 0.967_126_9),
        body("Mars", sun, 1, 6.4219e24, 427_940_000.0, 3_397.0, 1.85, 686.98, 24.6229, 3.69, 0.829_053),
        body("Jupiter", sun, 1, 1.9e27, 778_330_000.0, 71_492.0, 1.305, 4_332.589, 9.925, 23.12, 0.907_598_04),
        body("Saturn", sun, 1, 5.68e26, 1_429_400_000.0, 60_268.0, 2.484, 10_759.22, 10.5, 8.96, 0.894_583_1),
        body("Uranus", sun, 1, 8.683e25, 2_870_990_000.0, 25_559.0, 0.7, 30_685.4, 17.24, 8.69, 0.909_756_4),
        body("Neptune", sun, 1, 1.0247e26, 4_504_000_000.0, 24_766.0, 1.7, 60_189.0, 16.11, 11.0, 0.982_977_6),
        body("Pluto", sun, 1, 1.27e22, 5_913_520_000.0, 1_137.0, 17.4, 90_465.0, 153.2928, 0.66, 0.602_314),
        body("Moon", Some("Earth"), 2, 7.35e22, 384_000.0 / 4.0, 1_738.0, 5.145, -27.322, 655.728, 1.62, 0.98),
        body("Phobos", Some("Mars"), 2, 1.08e16, 7_000.0, 800.0, 1.08, 0.31891, 0.31891, 0.01, 0.98),
        body("Deimos", Some("Mars"), 2, 1.8e15, 18_000.0, 400.0, 1.79, 1.26244, 0.07, 0.01, 0.98),
        body("Io", Some("Jupiter"), 2, 8.94e22, 422_000.0, 1_815.0, 2.0, 1.769_138, 0.07, 0.183 * 9.78, 0.98),
        body("Europa", Some("Jupiter"), 2, 4.8e22, 671_000.0, 1_569.0, 3.0, 3.551_81, 0.07, 0.145 * 9.78, 0.98),
        body("Ganymede", Some("Jupiter"), 2, 1.48e23, 1_070_000.0, 2_631.0, 4.0, 7.154_553, 0.07, 0.145 * 9.78, 0.98),
        body("Callisto", Some("Jupiter"), 2, 1.08e23, 1_883_000.0, 2_400.0, 5.0, 16.689_018, 0.07, 0.127 * 9.78, 0.98),
        body("Mimas", Some("Saturn"), 2, 3.8e19, 186_000.0, 196.0, 1.0, 0.942_421_8, 0.07, 0.008 * 9.78, 0.98),
        body("Enceladus", Some("Saturn"), 2, 8.4e19, 238_000.0, 260.0, 19.0, 1.370_218, 0.07, 0.008 * 9.78, 0.98),
        body("Tethys", Some("Saturn"), 2, 7.55e20, 295_000.0, 530.0, 3.0, 1.887_802, 0.07, 0.018 * 9.78, 0.98),
        body("Dione", Some("Saturn"), 2, 1.05e21, 377_000.0, 560.0, 4.0, 2.736_915, 0.07, 0.223, 0.98),
        body("Rhea", Some("Saturn"), 2, 2.49e21, 527_000.0, 765.0, 5.0, 4.5175, 0.07, 0.029 * 9.78, 0.98),
        body("Titan", Some("Saturn"), 2, 1.35e23, 1_222_000.0, 2_575.0, 6.0, 15.945_421, 0.07, 9.78 / 7.0, 0.98),
        body("Iapetus", Some("Saturn"), 2, 1.88e21, 3_561_000.0, 730.0, 8.0, 463.0, 0.07, 0.107, 0.98),
    ];
    BodyManifest { bodies }
}
