//! Axis-aligned collision checks in screen space (origin top-left, y down).

use bevy::prelude::*;
use crate::shared::*;

/// Hitbox for a player whose sprite's top-left corner sits at `position`.
pub fn hitbox_at(position: Vec2) -> Rect {
    let min = position + HITBOX_OFFSET;
    Rect::from_corners(min, min + HITBOX_SIZE)
}

/// Directions in which the hitbox already touches or has crossed the
/// matching screen edge. Objects are not considered here.
pub fn obstructed_directions(hitbox: Rect, screen_width: f32, screen_height: f32) -> Vec<Facing> {
    let mut obstructed = Vec::new();

    if hitbox.min.y <= 0.0 {
        obstructed.push(Facing::North);
    }
    if hitbox.max.y >= screen_height {
        obstructed.push(Facing::South);
    }
    if hitbox.min.x <= 0.0 {
        obstructed.push(Facing::West);
    }
    if hitbox.max.x >= screen_width {
        obstructed.push(Facing::East);
    }

    obstructed
}

/// True if a step `toward` pushes the leading edge of `candidate` past the
/// screen. Only that edge is judged, so a hitbox already outside on another
/// side can still move along it or back inward.
pub fn leaves_screen(candidate: Rect, toward: Facing, screen_width: f32, screen_height: f32) -> bool {
    match toward {
        Facing::North => candidate.min.y < 0.0,
        Facing::South => candidate.max.y > screen_height,
        Facing::West => candidate.min.x < 0.0,
        Facing::East => candidate.max.x > screen_width,
    }
}

/// Inclusive overlap: rectangles that only share an edge still collide.
pub fn rects_touch(a: Rect, b: Rect) -> bool {
    a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
}

pub fn would_collide_with_objects(candidate: Rect, objects: &[&WorldObject]) -> bool {
    objects.iter().any(|obj| rects_touch(candidate, obj.footprint()))
}

/// Largest per-axis separation between two rectangles; 0 when they overlap.
pub fn gap_between(a: Rect, b: Rect) -> f32 {
    let dx = (b.min.x - a.max.x).max(a.min.x - b.max.x).max(0.0);
    let dy = (b.min.y - a.max.y).max(a.min.y - b.max.y).max(0.0);
    dx.max(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(x: f32, y: f32) -> WorldObject {
        WorldObject::new("crate", Vec2::new(x, y), InteractionEffect::default())
    }

    #[test]
    fn test_hitbox_offset_and_size() {
        let hitbox = hitbox_at(Vec2::new(100.0, 100.0));
        assert_eq!(hitbox.min, Vec2::new(155.0, 140.0));
        assert_eq!(hitbox.max, Vec2::new(245.0, 270.0));
    }

    #[test]
    fn test_no_obstruction_in_the_middle() {
        let hitbox = hitbox_at(Vec2::new(300.0, 200.0));
        assert!(obstructed_directions(hitbox, 960.0, 540.0).is_empty());
    }

    #[test]
    fn test_obstructed_at_top_left_corner() {
        let hitbox = hitbox_at(Vec2::new(-55.0, -40.0));
        let obstructed = obstructed_directions(hitbox, 960.0, 540.0);
        assert_eq!(obstructed, vec![Facing::North, Facing::West]);
    }

    #[test]
    fn test_obstructed_at_bottom_right_corner() {
        // Hitbox max = (960, 540) exactly.
        let hitbox = hitbox_at(Vec2::new(960.0 - 145.0, 540.0 - 170.0));
        let obstructed = obstructed_directions(hitbox, 960.0, 540.0);
        assert_eq!(obstructed, vec![Facing::South, Facing::East]);
    }

    #[test]
    fn test_leaves_screen() {
        assert!(!leaves_screen(hitbox_at(Vec2::new(0.0, 0.0)), Facing::North, 960.0, 540.0));
        assert!(leaves_screen(hitbox_at(Vec2::new(0.0, -41.0)), Facing::North, 960.0, 540.0));
        assert!(leaves_screen(hitbox_at(Vec2::new(816.0, 0.0)), Facing::East, 960.0, 540.0));
        assert!(leaves_screen(hitbox_at(Vec2::new(0.0, 371.0)), Facing::South, 960.0, 540.0));
        assert!(leaves_screen(hitbox_at(Vec2::new(-56.0, 0.0)), Facing::West, 960.0, 540.0));
    }

    #[test]
    fn test_leaves_screen_judges_only_the_leading_edge() {
        // Top edge at -1: stepping sideways or back down is fine.
        let above = hitbox_at(Vec2::new(300.0, -41.0));
        assert!(!leaves_screen(above, Facing::West, 960.0, 600.0));
        assert!(!leaves_screen(above, Facing::East, 960.0, 600.0));
        assert!(!leaves_screen(above, Facing::South, 960.0, 600.0));
        assert!(leaves_screen(above, Facing::North, 960.0, 600.0));
    }

    #[test]
    fn test_object_overlap_detected() {
        let hitbox = hitbox_at(Vec2::new(100.0, 100.0));
        assert!(would_collide_with_objects(hitbox, &[&object_at(200.0, 200.0)]));
        assert!(!would_collide_with_objects(hitbox, &[&object_at(500.0, 100.0)]));
        assert!(!would_collide_with_objects(hitbox, &[]));
    }

    #[test]
    fn test_touching_edges_count_as_collision() {
        let hitbox = hitbox_at(Vec2::new(100.0, 100.0));
        // Object's left edge sits exactly on the hitbox's right edge (245).
        assert!(would_collide_with_objects(hitbox, &[&object_at(245.0, 140.0)]));
        assert!(!would_collide_with_objects(hitbox, &[&object_at(245.5, 140.0)]));
    }

    #[test]
    fn test_any_object_blocks() {
        let hitbox = hitbox_at(Vec2::new(100.0, 100.0));
        let (far, overlapping) = (object_at(600.0, 0.0), object_at(150.0, 250.0));
        assert!(would_collide_with_objects(hitbox, &[&far, &overlapping]));
    }

    #[test]
    fn test_gap_between() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(gap_between(a, Rect::new(5.0, 5.0, 20.0, 20.0)), 0.0);
        assert_eq!(gap_between(a, Rect::new(30.0, 0.0, 40.0, 10.0)), 20.0);
        assert_eq!(gap_between(a, Rect::new(13.0, 17.0, 20.0, 20.0)), 7.0);
    }
}
