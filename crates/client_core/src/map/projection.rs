//! Web Mercator math shared by the canvas widget and the static-map request
//! builder. World pixel coordinates use 256 px tiles, so the world is
//! `256 * 2^zoom` pixels wide.

use std::f64::consts::PI;

use shared::domain::Coordinate;

use super::view::{clamp_zoom, MapView, MAX_ZOOM, MIN_ZOOM};

pub const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_78;

pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Projects a coordinate to world pixels at `zoom`.
pub fn to_world(coordinate: Coordinate, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = coordinate.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (coordinate.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`to_world`]. Longitude wraps into `[-180, 180)` so panning
/// across the antimeridian stays a valid coordinate.
pub fn from_world(x: f64, y: f64, zoom: f64) -> Coordinate {
    let size = world_size(zoom);
    let lng = wrap_longitude(x / size * 360.0 - 180.0);
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    Coordinate::new(lng, lat)
}

pub fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Screen offset of `coordinate` from the viewport center, in pixels.
pub fn offset_from_center(view: &MapView, coordinate: Coordinate) -> (f64, f64) {
    let (cx, cy) = to_world(view.center, view.zoom);
    let (x, y) = to_world(coordinate, view.zoom);
    (x - cx, y - cy)
}

/// Coordinate under a screen offset from the viewport center.
pub fn coordinate_at_offset(view: &MapView, dx: f64, dy: f64) -> Coordinate {
    let (cx, cy) = to_world(view.center, view.zoom);
    from_world(cx + dx, cy + dy, view.zoom)
}

/// Moves the center so the point under the pointer stays put while dragging.
pub fn pan(view: &MapView, dx: f64, dy: f64) -> MapView {
    view.recenter(coordinate_at_offset(view, -dx, -dy))
}

/// Largest zoom at which every coordinate fits inside `width` x `height`
/// minus `padding` on each side. `None` for an empty set.
pub fn fit_bounds(coordinates: &[Coordinate], width: f64, height: f64, padding: f64) -> Option<MapView> {
    let first = coordinates.first()?;
    let (mut min_lng, mut max_lng) = (first.lng, first.lng);
    let (mut min_lat, mut max_lat) = (first.lat, first.lat);
    for coordinate in &coordinates[1..] {
        min_lng = min_lng.min(coordinate.lng);
        max_lng = max_lng.max(coordinate.lng);
        min_lat = min_lat.min(coordinate.lat);
        max_lat = max_lat.max(coordinate.lat);
    }

    let south_west = Coordinate::new(min_lng, min_lat);
    let north_east = Coordinate::new(max_lng, max_lat);
    let (x0, y0) = to_world(south_west, 0.0);
    let (x1, y1) = to_world(north_east, 0.0);
    let center = from_world((x0 + x1) / 2.0, (y0 + y1) / 2.0, 0.0);

    let span_x = (x1 - x0).abs();
    let span_y = (y1 - y0).abs();
    let usable_w = (width - 2.0 * padding).max(1.0);
    let usable_h = (height - 2.0 * padding).max(1.0);

    let zoom = if span_x == 0.0 && span_y == 0.0 {
        MAX_ZOOM
    } else {
        let zoom_x = if span_x > 0.0 { (usable_w / span_x).log2() } else { MAX_ZOOM };
        let zoom_y = if span_y > 0.0 { (usable_h / span_y).log2() } else { MAX_ZOOM };
        zoom_x.min(zoom_y).floor().max(MIN_ZOOM)
    };

    Some(MapView::new(center, clamp_zoom(zoom)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_round_trip_is_stable() {
        let kyoto = Coordinate::new(135.7681, 35.0116);
        let (x, y) = to_world(kyoto, 12.0);
        let back = from_world(x, y, 12.0);
        assert!((back.lng - kyoto.lng).abs() < 1e-9);
        assert!((back.lat - kyoto.lat).abs() < 1e-9);
    }

    #[test]
    fn center_projects_to_origin_and_pan_moves_opposite() {
        let view = MapView::default();
        let (dx, dy) = offset_from_center(&view, view.center);
        assert!(dx.abs() < 1e-9 && dy.abs() < 1e-9);

        let panned = pan(&view, 100.0, 0.0);
        assert!(panned.center.lng < view.center.lng);
    }

    #[test]
    fn panning_across_the_antimeridian_wraps_longitude() {
        let view = MapView::new(Coordinate::new(179.9, 10.0), 5.0);
        let panned = pan(&view, -400.0, 0.0);
        assert!(panned.center.lng < 0.0, "lng {}", panned.center.lng);
        assert!((-180.0..180.0).contains(&panned.center.lng));

        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(135.5), 135.5);
    }

    #[test]
    fn fit_bounds_contains_every_point() {
        let pins = [
            Coordinate::new(135.729243, 35.03937),
            Coordinate::new(135.7727, 34.9671),
            Coordinate::new(135.7846, 34.9949),
        ];
        let view = fit_bounds(&pins, 800.0, 600.0, 40.0).expect("view");
        for pin in pins {
            let (dx, dy) = offset_from_center(&view, pin);
            assert!(dx.abs() <= 360.0, "dx {dx}");
            assert!(dy.abs() <= 260.0, "dy {dy}");
        }
        assert!(view.zoom >= 11.0);
    }

    #[test]
    fn fit_bounds_of_single_point_zooms_to_max() {
        let view = fit_bounds(&[Coordinate::new(135.0, 35.0)], 400.0, 300.0, 20.0).expect("view");
        assert_eq!(view.zoom, MAX_ZOOM);
        assert!(fit_bounds(&[], 400.0, 300.0, 20.0).is_none());
    }
}
