//! Grid coordinate mapping between WGS84 latitude/longitude and fixed-size
//! square cells of the British National Grid.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Side length of a board cell in projected units (metres).
pub const CELL_SIZE: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Identity of a board cell: the south-west corner of the cell in projected
/// coordinates, always a multiple of [`CELL_SIZE`] on both axes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct GridKey {
    easting: i32,
    northing: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridKeyError {
    #[error("malformed grid key {0:?}")]
    Malformed(String),
    #[error("grid key {0:?} is not aligned to the {CELL_SIZE}m grid")]
    Unaligned(String),
}

impl GridKey {
    /// Floors arbitrary projected coordinates onto the grid.
    pub fn from_projected(easting: f64, northing: f64) -> Self {
        let size = f64::from(CELL_SIZE);
        Self {
            easting: ((easting / size).floor() * size) as i32,
            northing: ((northing / size).floor() * size) as i32,
        }
    }

    /// Builds a key from already-aligned integer coordinates; unaligned input
    /// is floored.
    pub const fn new(easting: i32, northing: i32) -> Self {
        Self {
            easting: easting.div_euclid(CELL_SIZE) * CELL_SIZE,
            northing: northing.div_euclid(CELL_SIZE) * CELL_SIZE,
        }
    }

    pub const fn easting(self) -> i32 {
        self.easting
    }

    pub const fn northing(self) -> i32 {
        self.northing
    }

    /// Column and row in cell units.
    pub const fn cell(self) -> (i32, i32) {
        (self.easting / CELL_SIZE, self.northing / CELL_SIZE)
    }

    pub const fn offset(self, d_east: i32, d_north: i32) -> Self {
        Self {
            easting: self.easting + d_east * CELL_SIZE,
            northing: self.northing + d_north * CELL_SIZE,
        }
    }

    /// The four axis-aligned neighbours: north, east, south, west.
    pub const fn neighbors(self) -> [GridKey; 4] {
        [
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(-1, 0),
        ]
    }

    /// Projected coordinates of the cell centroid.
    pub fn center(self) -> (f64, f64) {
        let half = f64::from(CELL_SIZE) / 2.0;
        (
            f64::from(self.easting) + half,
            f64::from(self.northing) + half,
        )
    }

    /// Manhattan distance in projected units.
    pub fn manhattan(self, other: GridKey) -> i32 {
        (self.easting - other.easting).abs() + (self.northing - other.northing).abs()
    }

    /// Manhattan distance in cells.
    pub fn cell_distance(self, other: GridKey) -> u32 {
        (self.manhattan(other) / CELL_SIZE) as u32
    }

    /// Chebyshev distance in cells.
    pub fn chebyshev(self, other: GridKey) -> u32 {
        let de = (self.easting - other.easting).abs();
        let dn = (self.northing - other.northing).abs();
        (de.max(dn) / CELL_SIZE) as u32
    }

    /// Straight-line distance in projected units.
    pub fn distance(self, other: GridKey) -> f64 {
        let de = f64::from(other.easting - self.easting);
        let dn = f64::from(other.northing - self.northing);
        de.hypot(dn)
    }

    /// Bearing to `other` in degrees `[0, 360)`, clockwise from grid north.
    pub fn bearing_to(self, other: GridKey) -> f64 {
        let de = f64::from(other.easting - self.easting);
        let dn = f64::from(other.northing - self.northing);
        de.atan2(dn).to_degrees().rem_euclid(360.0)
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.easting, self.northing)
    }
}

impl FromStr for GridKey {
    type Err = GridKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (e, n) = s
            .split_once(',')
            .ok_or_else(|| GridKeyError::Malformed(s.to_string()))?;
        let easting: i32 = e
            .trim()
            .parse()
            .map_err(|_| GridKeyError::Malformed(s.to_string()))?;
        let northing: i32 = n
            .trim()
            .parse()
            .map_err(|_| GridKeyError::Malformed(s.to_string()))?;
        if easting.rem_euclid(CELL_SIZE) != 0 || northing.rem_euclid(CELL_SIZE) != 0 {
            return Err(GridKeyError::Unaligned(s.to_string()));
        }
        Ok(Self { easting, northing })
    }
}

impl From<GridKey> for String {
    fn from(key: GridKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for GridKey {
    type Error = GridKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

pub fn to_grid_key(position: LatLng) -> GridKey {
    let (easting, northing) = wgs84_to_national_grid(position);
    GridKey::from_projected(easting, northing)
}

pub fn center_of(key: GridKey) -> LatLng {
    let (easting, northing) = key.center();
    national_grid_to_wgs84(easting, northing)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Ellipsoid {
    a: f64,
    b: f64,
}

impl Ellipsoid {
    fn e2(self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }
}

const AIRY_1830: Ellipsoid = Ellipsoid {
    a: 6_377_563.396,
    b: 6_356_256.909,
};

const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.000,
    b: 6_356_752.314_245,
};

const F0: f64 = 0.999_601_271_7;
const LAT0_DEG: f64 = 49.0;
const LNG0_DEG: f64 = -2.0;
const E0: f64 = 400_000.0;
const N0: f64 = -100_000.0;

/// WGS84 to OSGB36 seven-parameter shift: translations in metres, scale in
/// ppm, rotations in arc-seconds.
#[derive(Debug, Clone, Copy)]
struct Helmert {
    tx: f64,
    ty: f64,
    tz: f64,
    s: f64,
    rx: f64,
    ry: f64,
    rz: f64,
}

const WGS84_TO_OSGB36: Helmert = Helmert {
    tx: -446.448,
    ty: 125.157,
    tz: -542.060,
    s: 20.4894,
    rx: -0.1502,
    ry: -0.2470,
    rz: -0.8421,
};

impl Helmert {
    fn inverse(self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            s: -self.s,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
        }
    }

    fn apply(self, (x, y, z): (f64, f64, f64)) -> (f64, f64, f64) {
        let arcsec = PI / (180.0 * 3600.0);
        let s1 = self.s / 1e6 + 1.0;
        let (rx, ry, rz) = (self.rx * arcsec, self.ry * arcsec, self.rz * arcsec);
        (
            self.tx + x * s1 - y * rz + z * ry,
            self.ty + x * rz + y * s1 - z * rx,
            self.tz - x * ry + y * rx + z * s1,
        )
    }
}

fn to_cartesian(ellipsoid: Ellipsoid, lat: f64, lng: f64) -> (f64, f64, f64) {
    let e2 = ellipsoid.e2();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    (
        nu * cos_lat * lng.cos(),
        nu * cos_lat * lng.sin(),
        (1.0 - e2) * nu * sin_lat,
    )
}

fn from_cartesian(ellipsoid: Ellipsoid, (x, y, z): (f64, f64, f64)) -> (f64, f64) {
    let e2 = ellipsoid.e2();
    let p = x.hypot(y);
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..10 {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * nu * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-12 {
            lat = next;
            break;
        }
        lat = next;
    }
    (lat, y.atan2(x))
}

fn meridional_arc(lat: f64) -> f64 {
    let Ellipsoid { a, b } = AIRY_1830;
    let n = (a - b) / (a + b);
    let (n2, n3) = (n * n, n * n * n);
    let lat0 = LAT0_DEG.to_radians();
    let d = lat - lat0;
    let s = lat + lat0;
    let ma = (1.0 + n + 1.25 * n2 + 1.25 * n3) * d;
    let mb = (3.0 * n + 3.0 * n2 + 2.625 * n3) * d.sin() * s.cos();
    let mc = (1.875 * n2 + 1.875 * n3) * (2.0 * d).sin() * (2.0 * s).cos();
    let md = (35.0 / 24.0) * n3 * (3.0 * d).sin() * (3.0 * s).cos();
    b * F0 * (ma - mb + mc - md)
}

/// Transverse Mercator on the Airy ellipsoid. Inputs are OSGB36 radians.
fn osgb36_to_national_grid(lat: f64, lng: f64) -> (f64, f64) {
    let a = AIRY_1830.a;
    let e2 = AIRY_1830.e2();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let tan_lat = lat.tan();
    let tan2 = tan_lat * tan_lat;
    let tan4 = tan2 * tan2;
    let cos3 = cos_lat.powi(3);
    let cos5 = cos_lat.powi(5);

    let nu = a * F0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let rho = a * F0 * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let i = meridional_arc(lat) + N0;
    let ii = nu / 2.0 * sin_lat * cos_lat;
    let iii = nu / 24.0 * sin_lat * cos3 * (5.0 - tan2 + 9.0 * eta2);
    let iiia = nu / 720.0 * sin_lat * cos5 * (61.0 - 58.0 * tan2 + tan4);
    let iv = nu * cos_lat;
    let v = nu / 6.0 * cos3 * (nu / rho - tan2);
    let vi = nu / 120.0 * cos5 * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

    let dl = lng - LNG0_DEG.to_radians();
    let northing = i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6);
    let easting = E0 + iv * dl + v * dl.powi(3) + vi * dl.powi(5);
    (easting, northing)
}

/// Inverse transverse Mercator; returns OSGB36 radians.
fn national_grid_to_osgb36(easting: f64, northing: f64) -> (f64, f64) {
    let a = AIRY_1830.a;
    let e2 = AIRY_1830.e2();

    let mut lat = LAT0_DEG.to_radians();
    let mut m = 0.0;
    loop {
        lat += (northing - N0 - m) / (a * F0);
        m = meridional_arc(lat);
        if (northing - N0 - m).abs() < 0.00001 {
            break;
        }
    }

    let sin_lat = lat.sin();
    let sec_lat = 1.0 / lat.cos();
    let tan_lat = lat.tan();
    let (tan2, tan4, tan6) = (tan_lat.powi(2), tan_lat.powi(4), tan_lat.powi(6));
    let nu = a * F0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let rho = a * F0 * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let vii = tan_lat / (2.0 * rho * nu);
    let viii = tan_lat / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = tan_lat / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x = sec_lat / nu;
    let xi = sec_lat / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
    let xii = sec_lat / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xiia = sec_lat / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

    let de = easting - E0;
    let lat_out = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
    let lng_out =
        LNG0_DEG.to_radians() + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);
    (lat_out, lng_out)
}

pub fn wgs84_to_national_grid(position: LatLng) -> (f64, f64) {
    let cartesian = to_cartesian(WGS84, position.lat.to_radians(), position.lng.to_radians());
    let shifted = WGS84_TO_OSGB36.apply(cartesian);
    let (lat, lng) = from_cartesian(AIRY_1830, shifted);
    osgb36_to_national_grid(lat, lng)
}

pub fn national_grid_to_wgs84(easting: f64, northing: f64) -> LatLng {
    let (lat, lng) = national_grid_to_osgb36(easting, northing);
    let cartesian = to_cartesian(AIRY_1830, lat, lng);
    let shifted = WGS84_TO_OSGB36.inverse().apply(cartesian);
    let (lat, lng) = from_cartesian(WGS84, shifted);
    LatLng::new(lat.to_degrees(), lng.to_degrees())
}
