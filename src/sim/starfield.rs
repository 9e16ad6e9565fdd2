//! Procedural star field streaming
//!
//! A sparse grid of stars covering the visible area plus a buffer ring.
//! As the viewport moves, stars that leave the ring are pruned and only the
//! newly exposed rows/columns are scanned for new stars. Each layer scrolls
//! at `1 / parallax_scale` of the camera speed.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{DisplayElement, GridRect};
use super::state::ViewportState;
use crate::error::SimError;
use crate::renderer::{Layer, Primitive, Renderer};

const STAR_COLOR: u32 = 0xffffff;

/// Population parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarParams {
    /// Base chance per cell, divided by the parallax scale
    pub chance: f64,
    /// Cells kept beyond each edge of the visible area
    pub buffer: i32,
}

/// One parallax layer. Rows then columns, at most one star per cell.
///
/// Unlike entity display elements, a star's `coordinate` is its
/// viewport-relative screen position: the cell offset from this layer's
/// parallax origin. It is refreshed on every reposition.
#[derive(Debug, Clone)]
pub struct StarField {
    parallax_scale: f32,
    rows: BTreeMap<i32, BTreeMap<i32, DisplayElement>>,
    len: usize,
}

impl StarField {
    pub fn new(parallax_scale: f32) -> Self {
        Self {
            parallax_scale,
            rows: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn parallax_scale(&self) -> f32 {
        self.parallax_scale
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Star in a grid cell; its coordinate is in screen space
    pub fn star(&self, row: i32, col: i32) -> Option<&DisplayElement> {
        self.rows.get(&row)?.get(&col)
    }

    /// Occupied cells as (row, col)
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.keys().map(move |&col| (row, col)))
    }

    /// Viewport top-left in this layer's grid
    pub fn parallax_coordinate(&self, viewport: &ViewportState) -> IVec2 {
        (viewport.coordinate / self.parallax_scale).floor().as_ivec2()
    }

    /// Cells that should be populated for this viewport
    pub fn expected_boundary(&self, viewport: &ViewportState, buffer: i32) -> GridRect {
        let origin = self.parallax_coordinate(viewport);
        let size = viewport.dimension.as_vec2().ceil().as_ivec2();
        GridRect {
            top_left: origin - IVec2::splat(buffer),
            bottom_right: origin + size + IVec2::splat(buffer),
        }
    }

    /// Stream the field to the current viewport. Returns how many cells
    /// were scanned for new stars.
    pub fn update(
        &mut self,
        viewport: &ViewportState,
        renderer: &mut dyn Renderer,
        rng: &mut Pcg32,
        params: StarParams,
    ) -> Result<usize, SimError> {
        let origin = self.parallax_coordinate(viewport);
        let expected = self.expected_boundary(viewport, params.buffer);

        if self.is_empty() {
            return Ok(self.populate(&expected, origin, renderer, rng, params.chance));
        }

        self.prune(&expected, renderer);
        if self.is_empty() {
            // Jumped further than the buffer
            return Ok(self.populate(&expected, origin, renderer, rng, params.chance));
        }

        let current = self.reposition(origin, renderer)?;
        Ok(self.populate_gap(&current, &expected, origin, renderer, rng, params.chance))
    }

    /// Destroy stars outside `boundary`
    pub fn prune(&mut self, boundary: &GridRect, renderer: &mut dyn Renderer) {
        let mut removed = 0;
        self.rows.retain(|&row, cols| {
            if !(boundary.top_left.y..=boundary.bottom_right.y).contains(&row) {
                for star in cols.values() {
                    renderer.destroy(star.render);
                }
                removed += cols.len();
                return false;
            }
            cols.retain(|&col, star| {
                let keep = (boundary.top_left.x..=boundary.bottom_right.x).contains(&col);
                if !keep {
                    renderer.destroy(star.render);
                    removed += 1;
                }
                keep
            });
            !cols.is_empty()
        });
        self.len -= removed;
    }

    /// Move every star to its screen position for `origin` and return the
    /// tight bounds of occupied cells
    pub fn reposition(&mut self, origin: IVec2, renderer: &mut dyn Renderer) -> Result<GridRect, SimError> {
        let (Some(&top), Some(&bottom)) = (self.rows.keys().next(), self.rows.keys().next_back()) else {
            return Err(SimError::EmptyStarField {
                parallax_scale: self.parallax_scale,
            });
        };

        let mut left = i32::MAX;
        let mut right = i32::MIN;
        for (&row, cols) in self.rows.iter_mut() {
            if let (Some(&first), Some(&last)) = (cols.keys().next(), cols.keys().next_back()) {
                left = left.min(first);
                right = right.max(last);
            }
            for (&col, star) in cols.iter_mut() {
                star.coordinate = screen_position(row, col, origin);
                renderer.set_transform(star.render, star.coordinate, star.rotation);
            }
        }

        Ok(GridRect {
            top_left: IVec2::new(left, top),
            bottom_right: IVec2::new(right, bottom),
        })
    }

    /// Scan every cell of `boundary`, returning the number scanned
    pub fn populate(
        &mut self,
        boundary: &GridRect,
        origin: IVec2,
        renderer: &mut dyn Renderer,
        rng: &mut Pcg32,
        chance: f64,
    ) -> usize {
        let mut scanned = 0;
        for row in boundary.top_left.y..=boundary.bottom_right.y {
            for col in boundary.top_left.x..=boundary.bottom_right.x {
                self.try_place(row, col, origin, renderer, rng, chance);
                scanned += 1;
            }
        }
        scanned
    }

    /// Scan only the strips of `expected` outside `current`
    fn populate_gap(
        &mut self,
        current: &GridRect,
        expected: &GridRect,
        origin: IVec2,
        renderer: &mut dyn Renderer,
        rng: &mut Pcg32,
        chance: f64,
    ) -> usize {
        let (left, right) = (expected.top_left.x, expected.bottom_right.x);
        let mut cells = Vec::new();

        // Rows above and below the occupied band, full width
        let above = expected.top_left.y..current.top_left.y;
        let below = (current.bottom_right.y + 1)..=expected.bottom_right.y;
        for row in above.chain(below) {
            cells.extend((left..=right).map(|col| (row, col)));
        }

        // Columns left and right of the occupied band, within it
        let top = current.top_left.y.max(expected.top_left.y);
        let bottom = current.bottom_right.y.min(expected.bottom_right.y);
        for row in top..=bottom {
            cells.extend((left..current.top_left.x).map(|col| (row, col)));
            cells.extend(((current.bottom_right.x + 1)..=right).map(|col| (row, col)));
        }

        for &(row, col) in &cells {
            self.try_place(row, col, origin, renderer, rng, chance);
        }
        cells.len()
    }

    fn try_place(
        &mut self,
        row: i32,
        col: i32,
        origin: IVec2,
        renderer: &mut dyn Renderer,
        rng: &mut Pcg32,
        chance: f64,
    ) {
        let scale = self.parallax_scale;
        if rng.random::<f64>() >= chance / scale as f64 {
            return;
        }
        let cols = self.rows.entry(row).or_default();
        if cols.contains_key(&col) {
            return;
        }

        // Nearer layers (smaller scale) get bigger, brighter stars. Radius 0 draws nothing.
        let radius = (rng.random::<f32>() * 80.0 / scale).floor();
        let alpha = rng.random::<f32>() * 20.0 / scale;
        let render = renderer.create(
            Primitive::Circle {
                radius,
                color: STAR_COLOR,
                alpha,
            },
            Layer::Background,
        );
        let coordinate = screen_position(row, col, origin);
        renderer.set_transform(render, coordinate, 0.0);
        cols.insert(
            col,
            DisplayElement {
                coordinate,
                rotation: 0.0,
                render,
            },
        );
        self.len += 1;
    }

    /// Destroy every star
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        for cols in self.rows.values() {
            for star in cols.values() {
                renderer.destroy(star.render);
            }
        }
        self.rows.clear();
        self.len = 0;
    }
}

fn screen_position(row: i32, col: i32, origin: IVec2) -> Vec2 {
    (IVec2::new(col, row) - origin).as_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DisplayList;
    use crate::sim::Dimension;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const SCALE: f32 = 30.0;

    fn viewport(x: f32, y: f32) -> ViewportState {
        ViewportState {
            coordinate: Vec2::new(x, y),
            dimension: Dimension::new(100.0, 80.0),
        }
    }

    /// Dense enough that every test sees stars
    fn params() -> StarParams {
        StarParams {
            chance: 3.0,
            buffer: 8,
        }
    }

    fn assert_consistent(field: &StarField, list: &DisplayList, boundary: &GridRect) {
        assert_eq!(field.cells().count(), field.len());
        assert_eq!(list.layer(Layer::Background).count(), field.len());
        for (row, col) in field.cells() {
            assert!(boundary.contains(row, col), "star at ({row}, {col}) outside {boundary:?}");
        }
    }

    #[test]
    fn test_first_update_fills_boundary() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let vp = viewport(0.0, 0.0);

        field.update(&vp, &mut list, &mut rng, params()).unwrap();
        assert!(!field.is_empty());
        assert_consistent(&field, &list, &field.expected_boundary(&vp, 8));
    }

    #[test]
    fn test_parallax_coordinate_floors() {
        let field = StarField::new(SCALE);
        assert_eq!(field.parallax_coordinate(&viewport(59.0, -1.0)), IVec2::new(1, -1));
        assert_eq!(field.parallax_coordinate(&viewport(-60.0, 90.0)), IVec2::new(-2, 3));
    }

    #[test]
    fn test_star_screen_position_tracks_origin() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(2);

        field.update(&viewport(0.0, 0.0), &mut list, &mut rng, params()).unwrap();
        // One cell right in this layer's grid
        let vp = viewport(SCALE * 1.5, 0.0);
        field.update(&vp, &mut list, &mut rng, params()).unwrap();

        let origin = field.parallax_coordinate(&vp);
        assert_eq!(origin, IVec2::new(1, 0));
        for (row, col) in field.cells() {
            let star = field.star(row, col).unwrap();
            assert_eq!(star.coordinate, Vec2::new((col - 1) as f32, row as f32));
            assert_eq!(list.node(star.render).unwrap().position, star.coordinate);
        }
    }

    #[test]
    fn test_prune_after_long_jump() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(3);

        field.update(&viewport(0.0, 0.0), &mut list, &mut rng, params()).unwrap();
        let vp = viewport(1.0e6, -1.0e6);
        field.update(&vp, &mut list, &mut rng, params()).unwrap();
        assert!(!field.is_empty());
        assert_consistent(&field, &list, &field.expected_boundary(&vp, 8));
    }

    #[test]
    fn test_reposition_empty_field_is_error() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let err = field.reposition(IVec2::ZERO, &mut list).unwrap_err();
        assert!(matches!(err, SimError::EmptyStarField { parallax_scale } if parallax_scale == SCALE));
    }

    #[test]
    fn test_density_within_expectation() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(42);
        let vp = viewport(0.0, 0.0);
        let p = params();

        for _ in 0..10 {
            field.update(&vp, &mut list, &mut rng, p).unwrap();
        }
        let area = field.expected_boundary(&vp, p.buffer).area() as f64;
        let expected = area * p.chance / SCALE as f64;
        let actual = field.len() as f64;
        assert!(
            (actual - expected).abs() < expected * 0.15,
            "{actual} stars, expected about {expected}"
        );
    }

    #[test]
    fn test_small_move_scans_only_exposed_strips() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let p = params();

        let full = field.update(&viewport(0.0, 0.0), &mut list, &mut rng, p).unwrap();
        let vp = viewport(SCALE, 0.0);
        let area = field.expected_boundary(&vp, p.buffer).area() as usize;
        assert_eq!(full, area);

        // One grid column to the right exposes one new column
        let scanned = field.update(&vp, &mut list, &mut rng, p).unwrap();
        let column = (80 + 2 * p.buffer + 1) as usize;
        assert!(scanned >= column, "scanned {scanned}");
        assert!(scanned < area / 10, "scanned {scanned} of {area}");
        assert_consistent(&field, &list, &field.expected_boundary(&vp, p.buffer));
    }

    #[test]
    fn test_star_radius_is_whole_and_shrinks_with_distance() {
        let scale = 50.0;
        let mut field = StarField::new(scale);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(6);
        field.update(&viewport(0.0, 0.0), &mut list, &mut rng, params()).unwrap();

        let radii: Vec<f32> = list
            .layer(Layer::Background)
            .map(|node| match node.primitive {
                Primitive::Circle { radius, .. } => radius,
                ref other => panic!("star drawn as {other:?}"),
            })
            .collect();
        assert!(!radii.is_empty());
        assert!(radii.iter().all(|r| *r == r.floor() && *r >= 0.0 && *r < 80.0 / scale));
        // Far layer: most draws floor to an invisible star
        assert!(radii.iter().any(|r| *r == 0.0));
        assert!(radii.iter().any(|r| *r == 1.0));
    }

    #[test]
    fn test_clear() {
        let mut field = StarField::new(SCALE);
        let mut list = DisplayList::new();
        let mut rng = Pcg32::seed_from_u64(4);
        field.update(&viewport(0.0, 0.0), &mut list, &mut rng, params()).unwrap();
        field.clear(&mut list);
        assert!(field.is_empty());
        assert!(list.is_empty());
    }

    proptest! {
        #[test]
        fn streaming_never_duplicates_or_leaks(
            seed in any::<u64>(),
            moves in prop::collection::vec((-400.0f32..400.0, -400.0f32..400.0), 1..12),
        ) {
            let mut field = StarField::new(SCALE);
            let mut list = DisplayList::new();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut vp = viewport(0.0, 0.0);

            field.update(&vp, &mut list, &mut rng, params()).unwrap();
            for (dx, dy) in moves {
                vp.coordinate += Vec2::new(dx, dy);
                field.update(&vp, &mut list, &mut rng, params()).unwrap();

                let boundary = field.expected_boundary(&vp, 8);
                prop_assert_eq!(field.cells().count(), field.len());
                prop_assert_eq!(list.layer(Layer::Background).count(), field.len());
                for (row, col) in field.cells() {
                    prop_assert!(boundary.contains(row, col));
                }
            }
        }
    }
}
