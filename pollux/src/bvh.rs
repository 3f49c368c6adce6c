use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    intersection::Intersection,
    math::{Bounds3, Vec3},
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Primitives_and_Intersection_Acceleration/Bounding_Volume_Hierarchies.html

/// Capacity of the traversal stack. The build caps tree depth so that the stack never overflows.
pub const STACK_SIZE: usize = 64;
const MAX_BUILD_DEPTH: usize = STACK_SIZE - 2;
const SAH_BUCKET_COUNT: usize = 12;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Display, EnumString, EnumVariantNames,
)]
pub enum SplitMethod {
    Middle,
    EqualCounts,
    SurfaceAreaHeuristic,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BvhSettings {
    pub split_method: SplitMethod,
    pub max_primitives_in_node: u16,
}

impl Default for BvhSettings {
    fn default() -> Self {
        Self {
            split_method: SplitMethod::SurfaceAreaHeuristic,
            max_primitives_in_node: 4,
        }
    }
}

/// What a leaf points to: an analytic geometry or one triangle of a mesh geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveRef {
    pub geometry: u32,
    /// `NO_PRIMITIVE` for analytic shapes
    pub triangle: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeContent {
    Interior {
        /// The first child directly follows its parent
        second_child_index: u32,
        split_axis: u8,
    },
    Leaf {
        first_primitive_index: u32,
        primitive_count: u32,
    },
}

/// Flattened node. Nodes are stored in depth-first order.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BvhNode {
    pub bounds: Bounds3,
    pub center: Vec3,
    pub content: NodeContent,
}

impl BvhNode {
    fn interior(bounds: Bounds3, second_child_index: usize, split_axis: usize) -> Self {
        Self {
            bounds,
            center: bounds.centroid(),
            content: NodeContent::Interior {
                second_child_index: second_child_index as u32,
                split_axis: split_axis as u8,
            },
        }
    }

    fn leaf(bounds: Bounds3, first_primitive_index: usize, primitive_count: usize) -> Self {
        Self {
            bounds,
            center: bounds.centroid(),
            content: NodeContent::Leaf {
                first_primitive_index: first_primitive_index as u32,
                primitive_count: primitive_count as u32,
            },
        }
    }
}

/// Pending subtree with the ray's slab interval over its bounds
#[derive(Copy, Clone, Debug, Default)]
pub struct StackEntry {
    pub node: u32,
    pub t_near: f32,
    pub t_far: f32,
}

pub struct BoundingVolumeHierarchy {
    settings: BvhSettings,
    nodes: Vec<BvhNode>,
    primitives: Vec<PrimitiveRef>,
    depth: usize,
}

impl BoundingVolumeHierarchy {
    /// Creates a new `BoundingVolumeHierarchy` over `primitives` and their world bounds
    pub fn new(primitives: Vec<(PrimitiveRef, Bounds3)>, settings: BvhSettings) -> Self {
        let mut primitive_info: Vec<BVHPrimitiveInfo> = primitives
            .iter()
            .map(|&(primitive, bounds)| BVHPrimitiveInfo {
                primitive,
                bounds,
                centroid: bounds.centroid(),
            })
            .collect();

        let mut ret = Self {
            settings: BvhSettings {
                max_primitives_in_node: settings.max_primitives_in_node.max(1),
                ..settings
            },
            nodes: Vec::new(),
            primitives: Vec::with_capacity(primitives.len()),
            depth: 0,
        };
        if primitive_info.is_empty() {
            return ret;
        }

        let mut ordered_primitives = Vec::with_capacity(primitive_info.len());
        let (root, node_count) =
            ret.recursive_build(&mut primitive_info, 0, &mut ordered_primitives);
        ret.primitives = ordered_primitives;

        ret.nodes = Vec::with_capacity(node_count);
        ret.flatten_tree(root);
        debug_assert_eq!(ret.nodes.len(), node_count);

        ret
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self) -> Bounds3 {
        self.nodes.first().map(|n| n.bounds).unwrap_or_default()
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitives in leaf order
    pub fn primitives(&self) -> &[PrimitiveRef] {
        &self.primitives
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn settings(&self) -> BvhSettings {
        self.settings
    }

    /// Finds the closest hit along `o + t * d` for `t < t_max`. `test` intersects a single
    /// primitive, accepting only hits closer than the given limit.
    ///
    /// Children are visited near to far and subtrees that start beyond the current closest hit
    /// are skipped. A hit only replaces the current one if it is strictly closer.
    pub fn intersect<F>(&self, o: Vec3, d: Vec3, t_max: f32, mut test: F) -> Option<Intersection>
    where
        F: FnMut(PrimitiveRef, f32) -> Option<Intersection>,
    {
        let mut hit: Option<Intersection> = None;
        self.traverse(o, d, t_max, |primitive, t_limit| {
            if let Some(new_hit) = test(primitive, t_limit) {
                if new_hit.t < t_limit {
                    let t = new_hit.t;
                    hit = Some(new_hit);
                    return (t, false);
                }
            }
            (t_limit, false)
        });
        hit
    }

    /// Checks if anything is hit along `o + t * d` for `t < t_max`. Traversal order is irrelevant
    /// and stops on the first hit.
    pub fn any_hit<F>(&self, o: Vec3, d: Vec3, t_max: f32, mut test: F) -> bool
    where
        F: FnMut(PrimitiveRef, f32) -> bool,
    {
        let mut found = false;
        self.traverse(o, d, t_max, |primitive, t_limit| {
            found = test(primitive, t_limit);
            (t_limit, found)
        });
        found
    }

    /// Stack based traversal. `visit` gets each leaf primitive with the current distance limit
    /// and returns the new limit and whether to stop.
    fn traverse<F>(&self, o: Vec3, d: Vec3, t_max: f32, mut visit: F)
    where
        F: FnMut(PrimitiveRef, f32) -> (f32, bool),
    {
        if self.nodes.is_empty() {
            return;
        }

        let inv_dir = d.recip();
        let mut t_limit = t_max;
        let mut stack = [StackEntry::default(); STACK_SIZE];
        let mut stack_len = 0;

        if let Some((t_near, t_far)) = self.nodes[0].bounds.intersect(o, inv_dir, t_limit) {
            stack[0] = StackEntry {
                node: 0,
                t_near,
                t_far,
            };
            stack_len = 1;
        }

        while stack_len > 0 {
            stack_len -= 1;
            let entry = stack[stack_len];
            if entry.t_near > t_limit {
                continue;
            }

            let node_index = entry.node as usize;
            match self.nodes[node_index].content {
                NodeContent::Leaf {
                    first_primitive_index,
                    primitive_count,
                } => {
                    let first = first_primitive_index as usize;
                    for &primitive in &self.primitives[first..first + primitive_count as usize] {
                        let (new_limit, stop) = visit(primitive, t_limit);
                        if stop {
                            return;
                        }
                        t_limit = new_limit;
                    }
                }
                NodeContent::Interior {
                    second_child_index, ..
                } => {
                    let first_child = node_index + 1;
                    let second_child = second_child_index as usize;
                    let child_entry = |index: usize| {
                        self.nodes[index]
                            .bounds
                            .intersect(o, inv_dir, t_limit)
                            .map(|(t_near, t_far)| StackEntry {
                                node: index as u32,
                                t_near,
                                t_far,
                            })
                    };
                    match (child_entry(first_child), child_entry(second_child)) {
                        (Some(a), Some(b)) => {
                            // Push the far child first so the near one is popped next
                            let (near, far) = if b.t_near < a.t_near { (b, a) } else { (a, b) };
                            stack[stack_len] = far;
                            stack[stack_len + 1] = near;
                            stack_len += 2;
                        }
                        (Some(e), None) | (None, Some(e)) => {
                            stack[stack_len] = e;
                            stack_len += 1;
                        }
                        (None, None) => {}
                    }
                }
            }
        }
    }

    /// Builds the subtree for `primitive_info`, returns it with its node count
    fn recursive_build(
        &mut self,
        primitive_info: &mut [BVHPrimitiveInfo],
        depth: usize,
        ordered_primitives: &mut Vec<PrimitiveRef>,
    ) -> (Box<BVHBuildNode>, usize) {
        self.depth = self.depth.max(depth + 1);

        let bounds = primitive_info
            .iter()
            .fold(Bounds3::default(), |b, p| b.union_b(p.bounds));
        let first_primitive_index = ordered_primitives.len();
        let primitive_count = primitive_info.len();

        macro_rules! init_leaf {
            () => {{
                ordered_primitives.extend(primitive_info.iter().map(|p| p.primitive));
                (
                    BVHBuildNode::leaf(first_primitive_index, primitive_count, bounds),
                    1,
                )
            }};
        }

        if primitive_count <= 1 || depth >= MAX_BUILD_DEPTH {
            return init_leaf!();
        }

        let centroid_bounds = primitive_info
            .iter()
            .fold(Bounds3::default(), |b, p| b.union_p(p.centroid));
        let axis = centroid_bounds.maximum_extent();

        if centroid_bounds.p_max[axis] == centroid_bounds.p_min[axis] {
            return init_leaf!();
        }

        let max_in_node = self.settings.max_primitives_in_node as usize;
        let mid = match self.settings.split_method {
            SplitMethod::Middle => {
                if primitive_count <= max_in_node {
                    return init_leaf!();
                }
                let mid_value = (centroid_bounds.p_min[axis] + centroid_bounds.p_max[axis]) / 2.0;
                itertools::partition(primitive_info.iter_mut(), |p| {
                    p.centroid[axis] < mid_value
                })
            }
            SplitMethod::EqualCounts => {
                if primitive_count <= max_in_node {
                    return init_leaf!();
                }
                0
            }
            SplitMethod::SurfaceAreaHeuristic => {
                match sah_split(primitive_info, &bounds, &centroid_bounds, axis, max_in_node) {
                    Some(mid) => mid,
                    None => return init_leaf!(),
                }
            }
        };

        // We need to fall back to 'equal counts' if the split didn't separate anything
        let mid = if mid == 0 || mid == primitive_count {
            let mid = primitive_count / 2;
            primitive_info.select_nth_unstable_by(mid, |a, b| {
                a.centroid[axis]
                    .partial_cmp(&b.centroid[axis])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            mid
        } else {
            mid
        };

        let (left, right) = primitive_info.split_at_mut(mid);
        let (child0, child0_node_count) = self.recursive_build(left, depth + 1, ordered_primitives);
        let (child1, child1_node_count) =
            self.recursive_build(right, depth + 1, ordered_primitives);
        (
            BVHBuildNode::interior(axis, child0, child1),
            1 + child0_node_count + child1_node_count,
        )
    }

    /// Writes the subtree at `node` in depth-first order, returns the index of `node`
    fn flatten_tree(&mut self, node: Box<BVHBuildNode>) -> usize {
        let index = self.nodes.len();
        match node.content {
            BuildNodeContent::Interior {
                children: [child0, child1],
                split_axis,
            } => {
                // Placeholder until the second child's index is known
                self.nodes.push(BvhNode::leaf(node.bounds, 0, 0));
                self.flatten_tree(child0);
                let second_child_index = self.flatten_tree(child1);
                self.nodes[index] = BvhNode::interior(node.bounds, second_child_index, split_axis);
            }
            BuildNodeContent::Leaf {
                first_primitive_index,
                primitive_count,
            } => {
                self.nodes.push(BvhNode::leaf(
                    node.bounds,
                    first_primitive_index,
                    primitive_count,
                ));
            }
        }
        index
    }
}

/// Bucketed SAH split. Returns the partition point or `None` if a leaf is cheaper.
fn sah_split(
    primitive_info: &mut [BVHPrimitiveInfo],
    bounds: &Bounds3,
    centroid_bounds: &Bounds3,
    axis: usize,
    max_in_node: usize,
) -> Option<usize> {
    let primitive_count = primitive_info.len();
    // Not worth the effort for tiny nodes
    if primitive_count <= 4 {
        return if primitive_count <= max_in_node {
            None
        } else {
            Some(0)
        };
    }

    let extent = centroid_bounds.p_max[axis] - centroid_bounds.p_min[axis];
    let bucket_index = |centroid: Vec3| {
        let b = (SAH_BUCKET_COUNT as f32 * (centroid[axis] - centroid_bounds.p_min[axis]) / extent)
            as usize;
        b.min(SAH_BUCKET_COUNT - 1)
    };

    let mut buckets = [SahBucket::default(); SAH_BUCKET_COUNT];
    for p in primitive_info.iter() {
        let b = &mut buckets[bucket_index(p.centroid)];
        b.count += 1;
        b.bounds = b.bounds.union_b(p.bounds);
    }

    let total_area = {
        let area = bounds.surface_area();
        if area > 0.0 {
            area
        } else {
            1.0
        }
    };
    let side_cost = |range: &[SahBucket]| {
        let (count, b) = range.iter().fold((0, Bounds3::default()), |(c, b), bucket| {
            (c + bucket.count, b.union_b(bucket.bounds))
        });
        if count == 0 {
            0.0
        } else {
            count as f32 * b.surface_area()
        }
    };
    let (min_bucket, min_cost) = (0..SAH_BUCKET_COUNT - 1)
        .map(|i| {
            let cost = 0.125
                + (side_cost(&buckets[..=i]) + side_cost(&buckets[i + 1..])) / total_area;
            (i, cost)
        })
        .fold((0, f32::INFINITY), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        });

    let leaf_cost = primitive_count as f32;
    if primitive_count > max_in_node || min_cost < leaf_cost {
        Some(itertools::partition(primitive_info.iter_mut(), |p| {
            bucket_index(p.centroid) <= min_bucket
        }))
    } else {
        None
    }
}

#[derive(Copy, Clone, Default)]
struct SahBucket {
    count: usize,
    bounds: Bounds3,
}

struct BVHPrimitiveInfo {
    primitive: PrimitiveRef,
    bounds: Bounds3,
    centroid: Vec3,
}

enum BuildNodeContent {
    Interior {
        children: [Box<BVHBuildNode>; 2],
        split_axis: usize,
    },
    Leaf {
        // Index into the ordered primitive array
        first_primitive_index: usize,
        primitive_count: usize,
    },
}

struct BVHBuildNode {
    bounds: Bounds3,
    content: BuildNodeContent,
}

impl BVHBuildNode {
    fn interior(
        split_axis: usize,
        child0: Box<BVHBuildNode>,
        child1: Box<BVHBuildNode>,
    ) -> Box<Self> {
        Box::new(Self {
            bounds: child0.bounds.union_b(child1.bounds),
            content: BuildNodeContent::Interior {
                children: [child0, child1],
                split_axis,
            },
        })
    }

    fn leaf(first_primitive_index: usize, primitive_count: usize, bounds: Bounds3) -> Box<Self> {
        Box::new(Self {
            bounds,
            content: BuildNodeContent::Leaf {
                first_primitive_index,
                primitive_count,
            },
        })
    }
}
