// src/services/grid.rs
// DOCUMENTATION: Geographic grid generation for area coverage
// PURPOSE: Split one search circle into a 13x13 lattice of sub-searches

use crate::errors::LeadError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lattice half-width: cells span -6..=+6 steps on each axis (13x13 = 169)
const GRID_SPAN: i32 = 6;

/// Divisor turning the overall radius into the lattice step and the
/// per-cell search radius
const STEP_DIVISOR: f64 = 12.0;

/// Meters per degree of latitude
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Earth circumference in meters, used for the longitude step
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_000.0;

/// Uniform jitter applied to each cell center, in degrees, to break up
/// exact grid-alignment artifacts between overlapping sub-searches
const JITTER_DEG: f64 = 0.0001;

/// Latitudes closer to the equator than this cannot produce a finite
/// longitude step with the formula below
const MIN_ABS_LATITUDE: f64 = 1e-6;

/// Represents a single grid cell for searching
/// DOCUMENTATION: Each cell is one sub-region queried in both search modes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    /// Center point latitude
    pub latitude: f64,
    /// Center point longitude
    pub longitude: f64,
    /// Search radius in meters
    pub radius: f64,
    /// Cell identifier (for debugging/logging)
    pub cell_id: String,
}

/// Grid generator service
/// DOCUMENTATION: Tiles a search circle into overlapping sub-searches to
/// work around the per-request result cap of the Places API
pub struct GridGenerator;

impl GridGenerator {
    /// Generate the 13x13 lattice around a center point
    ///
    /// step = radius / 12; every cell searches with radius = step, so
    /// neighboring cells overlap at their boundaries. Redundant calls are
    /// the cost of full coverage under the per-request result cap.
    ///
    /// # Arguments
    /// * `latitude` - Center point latitude
    /// * `longitude` - Center point longitude
    /// * `radius_m` - Overall search radius in meters
    ///
    /// # Returns
    /// Exactly 169 jittered GridCell values, or a validation error for
    /// latitudes where the longitude step is undefined
    pub fn generate_grid(
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<GridCell>, LeadError> {
        // The longitude step divides by |latitude|; at the equator that
        // is a division by zero, so reject instead of producing infinities
        if latitude.abs() < MIN_ABS_LATITUDE {
            return Err(LeadError::InvalidInput(
                "latitude too close to the equator for grid generation".to_string(),
            ));
        }

        let step = radius_m / STEP_DIVISOR;
        let offset_lat = step / METERS_PER_DEG_LAT;
        let offset_lon = step / (EARTH_CIRCUMFERENCE_M * latitude.abs() / 360.0);

        log::debug!(
            "Generating grid: step={:.1}m, offset_lat={:.6}°, offset_lon={:.6}°",
            step,
            offset_lat,
            offset_lon
        );

        let mut rng = rand::thread_rng();
        let mut cells = Vec::with_capacity(((2 * GRID_SPAN + 1) * (2 * GRID_SPAN + 1)) as usize);

        for i in -GRID_SPAN..=GRID_SPAN {
            for j in -GRID_SPAN..=GRID_SPAN {
                let jitter_lat: f64 = rng.gen_range(-JITTER_DEG..=JITTER_DEG);
                let jitter_lon: f64 = rng.gen_range(-JITTER_DEG..=JITTER_DEG);

                cells.push(GridCell {
                    latitude: latitude + i as f64 * offset_lat + jitter_lat,
                    longitude: longitude + j as f64 * offset_lon + jitter_lon,
                    radius: step,
                    cell_id: format!("{}:{}", i, j),
                });
            }
        }

        log::info!(
            "Generated {} grid cells around ({:.4}, {:.4}), cell radius {:.1}m",
            cells.len(),
            latitude,
            longitude,
            step
        );

        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cell_count() {
        let cells = GridGenerator::generate_grid(48.8566, 2.3522, 1000.0).unwrap();
        assert_eq!(cells.len(), 169);
    }

    #[test]
    fn test_cell_radius_is_step() {
        let cells = GridGenerator::generate_grid(48.8566, 2.3522, 1200.0).unwrap();
        assert!(cells.iter().all(|c| (c.radius - 100.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_cells_near_lattice_positions() {
        let lat = 48.8566;
        let lon = 2.3522;
        let radius = 1000.0;
        let cells = GridGenerator::generate_grid(lat, lon, radius).unwrap();

        let step = radius / 12.0;
        let offset_lat = step / 111_320.0;
        let offset_lon = step / (40_075_000.0 * lat.abs() / 360.0);

        for cell in &cells {
            let parts: Vec<i32> = cell
                .cell_id
                .split(':')
                .map(|p| p.parse().unwrap())
                .collect();
            let (i, j) = (parts[0], parts[1]);

            let expected_lat = lat + i as f64 * offset_lat;
            let expected_lon = lon + j as f64 * offset_lon;

            // Centers lie within the jitter bound of the exact lattice point
            assert!((cell.latitude - expected_lat).abs() <= 0.0001 + 1e-12);
            assert!((cell.longitude - expected_lon).abs() <= 0.0001 + 1e-12);
        }
    }

    #[test]
    fn test_lattice_spans_both_axes() {
        let cells = GridGenerator::generate_grid(41.65, -0.88, 2400.0).unwrap();

        let min_lat = cells.iter().map(|c| c.latitude).fold(f64::MAX, f64::min);
        let max_lat = cells.iter().map(|c| c.latitude).fold(f64::MIN, f64::max);
        assert!(max_lat > 41.65 && min_lat < 41.65);

        let min_lon = cells.iter().map(|c| c.longitude).fold(f64::MAX, f64::min);
        let max_lon = cells.iter().map(|c| c.longitude).fold(f64::MIN, f64::max);
        assert!(max_lon > -0.88 && min_lon < -0.88);
    }

    #[test]
    fn test_tiny_radius_still_generates() {
        // radius below 24m yields a step under 2m and near-zero cell radius
        let cells = GridGenerator::generate_grid(48.8566, 2.3522, 20.0).unwrap();
        assert_eq!(cells.len(), 169);
        assert!(cells.iter().all(|c| c.radius > 0.0));
    }

    #[test]
    fn test_equator_rejected() {
        let result = GridGenerator::generate_grid(0.0, 2.3522, 1000.0);
        assert!(matches!(result, Err(LeadError::InvalidInput(_))));
    }

    #[test]
    fn test_southern_hemisphere() {
        // |latitude| keeps the longitude step positive south of the equator
        let cells = GridGenerator::generate_grid(-33.8688, 151.2093, 1000.0).unwrap();
        assert_eq!(cells.len(), 169);
    }
}
