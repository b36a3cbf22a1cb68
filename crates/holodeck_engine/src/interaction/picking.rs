//! Ray picking against per-kind hit volumes
//!
//! Resolves a pointer position to the nearest intersecting entity. Hit
//! volumes are deliberately simple bounding shapes — a sphere for graph
//! nodes and the orb, an axis-aligned box for plugin cards — because
//! picking precision matters far less than picking cost at dashboard
//! scale.

use crate::entity::EntityKey;
use crate::foundation::math::Vec3;

/// A ray for pointer picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in scene space
    pub origin: Vec3,
    /// The direction of the ray (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Simplified bounding shape used for pick tests, chosen per entity kind
#[derive(Debug, Clone, Copy)]
pub enum HitVolume {
    /// Bounding sphere (graph nodes, emotion orb)
    Sphere {
        /// Center in scene space
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned bounding box (plugin cards)
    Box {
        /// Center in scene space
        center: Vec3,
        /// Half extents along each axis
        half_extents: Vec3,
    },
}

impl HitVolume {
    /// Test ray intersection, returning the entry distance if hit.
    ///
    /// A ray starting inside the volume reports the exit distance, so a
    /// camera placed inside the orb can still pick it.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Self::Sphere { center, radius } => intersect_sphere(ray, center, radius),
            Self::Box {
                center,
                half_extents,
            } => intersect_aabb(ray, center, half_extents),
        }
    }
}

/// Ray-sphere intersection via the quadratic formula.
///
/// Solves `|origin + t*direction - center|^2 = radius^2` and returns the
/// closest non-negative root.
fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(&ray.direction); // 1.0 for a normalized ray
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / (2.0 * a);
    let t2 = (-b + sqrt_discriminant) / (2.0 * a);

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None // Sphere entirely behind the ray
    }
}

/// Ray-AABB intersection using the slab method.
fn intersect_aabb(ray: &Ray, center: Vec3, half_extents: Vec3) -> Option<f32> {
    let min = center - half_extents;
    let max = center + half_extents;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        if direction.abs() < f32::EPSILON {
            // Ray parallel to this slab; must already be inside it.
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        None
    } else if t_enter >= 0.0 {
        Some(t_enter)
    } else {
        Some(t_exit) // Ray started inside the box
    }
}

/// One pickable entity for the current frame
#[derive(Debug, Clone)]
pub struct PickTarget {
    /// Qualified entity key reported on a hit
    pub key: EntityKey,
    /// Bounding shape to test against
    pub volume: HitVolume,
}

/// Result of a successful pick test
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Qualified key of the picked entity
    pub key: EntityKey,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Resolve a ray against a set of pick targets.
///
/// Selects the nearest intersecting target; exact distance ties break by
/// smallest id (category as a final disambiguator). A miss returns
/// `None` — it is not an error, it simply withholds the pointer event.
pub fn pick(ray: &Ray, targets: &[PickTarget]) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for target in targets {
        let Some(distance) = target.volume.intersect_ray(ray) else {
            continue;
        };
        let closer = match &best {
            None => true,
            Some(hit) => {
                distance < hit.distance
                    || ((distance - hit.distance).abs() < f32::EPSILON && target.key < hit.key)
            }
        };
        if closer {
            best = Some(PickHit {
                key: target.key.clone(),
                distance,
            });
        }
    }
    best
}

/// Pointer state for the current frame, in normalized device coordinates.
///
/// The hosting UI shell feeds raw pointer events in; the controller
/// consumes and clears the one-frame flags during its per-frame resolve.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Pointer X in NDC (-1 = left, +1 = right)
    pub ndc_x: f32,
    /// Pointer Y in NDC (-1 = bottom, +1 = top)
    pub ndc_y: f32,
    /// Whether the pointer is over the panel at all
    pub inside: bool,
    /// Left button was clicked this frame
    pub clicked: bool,
}

impl PointerState {
    /// Update pointer position from the hosting shell
    pub fn moved_to(&mut self, ndc_x: f32, ndc_y: f32) {
        self.ndc_x = ndc_x;
        self.ndc_y = ndc_y;
        self.inside = true;
    }

    /// Mark the pointer as having left the panel
    pub fn exited(&mut self) {
        self.inside = false;
    }

    /// Record a click at the current position
    pub fn click(&mut self) {
        self.clicked = true;
    }

    /// Clear one-frame flags (call after the frame's resolve)
    pub fn clear_frame_flags(&mut self) {
        self.clicked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn sphere_at(id: &str, center: Vec3) -> PickTarget {
        PickTarget {
            key: EntityKey::node(id),
            volume: HitVolume::Sphere {
                center,
                radius: 0.5,
            },
        }
    }

    #[test]
    fn test_sphere_hit_and_miss() {
        let ray = forward_ray();
        let on_axis = HitVolume::Sphere {
            center: Vec3::zeros(),
            radius: 1.0,
        };
        assert!((on_axis.intersect_ray(&ray).unwrap() - 9.0).abs() < 1e-4);

        let off_axis = HitVolume::Sphere {
            center: Vec3::new(5.0, 0.0, 0.0),
            radius: 1.0,
        };
        assert!(off_axis.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_sphere_behind_ray_is_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        let behind = HitVolume::Sphere {
            center: Vec3::zeros(),
            radius: 1.0,
        };
        assert!(behind.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_box_hit_entry_distance() {
        let ray = forward_ray();
        let card = HitVolume::Box {
            center: Vec3::zeros(),
            half_extents: Vec3::new(0.5, 0.7, 0.1),
        };
        assert!((card.intersect_ray(&ray).unwrap() - 9.9).abs() < 1e-4);
    }

    #[test]
    fn test_box_ray_inside_reports_exit() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let around_origin = HitVolume::Box {
            center: Vec3::zeros(),
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        };
        assert!((around_origin.intersect_ray(&ray).unwrap() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_pick_selects_nearest() {
        let ray = forward_ray();
        let targets = vec![
            sphere_at("far", Vec3::new(0.0, 0.0, -5.0)),
            sphere_at("near", Vec3::new(0.0, 0.0, 5.0)),
        ];
        let hit = pick(&ray, &targets).unwrap();
        assert_eq!(hit.key, EntityKey::node("near"));
    }

    #[test]
    fn test_pick_tie_breaks_by_smallest_id() {
        let ray = forward_ray();
        // Identical volumes at the same position: both hit at the same
        // distance regardless of input order.
        let targets = vec![sphere_at("b", Vec3::zeros()), sphere_at("a", Vec3::zeros())];
        assert_eq!(pick(&ray, &targets).unwrap().key.id, "a");

        let targets = vec![sphere_at("a", Vec3::zeros()), sphere_at("b", Vec3::zeros())];
        assert_eq!(pick(&ray, &targets).unwrap().key.id, "a");
    }

    #[test]
    fn test_pick_miss_is_none() {
        let ray = forward_ray();
        let targets = vec![sphere_at("n1", Vec3::new(100.0, 0.0, 0.0))];
        assert!(pick(&ray, &targets).is_none());
        assert!(pick(&ray, &[]).is_none());
    }
}
