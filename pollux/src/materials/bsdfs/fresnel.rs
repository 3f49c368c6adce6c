// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Fresnel_Incidence_Effects

/// Unpolarized Fresnel reflectance of a dielectric interface. `eta_i` is the index on the side
/// the normal points to, negative `cos_theta_i` flips the sides.
pub fn fr_dielectric(cos_theta_i: f32, eta_i: f32, eta_t: f32) -> f32 {
    let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);

    let entering = cos_theta_i > 0.0;
    let (eta_i, eta_t, cos_theta_i) = if entering {
        (eta_i, eta_t, cos_theta_i)
    } else {
        (eta_t, eta_i, cos_theta_i.abs())
    };

    // Snell's law
    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    let total_internal_reflection = sin_theta_t >= 1.0;
    if total_internal_reflection {
        return 1.0;
    }

    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();

    let r_parallel = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perpendicular = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));

    (r_parallel * r_parallel + r_perpendicular * r_perpendicular) / 2.0
}
