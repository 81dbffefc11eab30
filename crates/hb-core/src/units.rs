// hb-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, MassRate as UomMassRate, Pressure as UomPressure,
    Velocity as UomVelocity, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

/// Hydronic flows are specified in kg/h throughout the design tables.
#[inline]
pub fn kg_per_h(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v / SECONDS_PER_HOUR)
}

#[inline]
pub fn to_kg_per_h(q: MassRate) -> f64 {
    use uom::si::mass_rate::kilogram_per_second;
    q.get::<kilogram_per_second>() * SECONDS_PER_HOUR
}

#[inline]
pub fn to_pa(p: Pressure) -> f64 {
    use uom::si::pressure::pascal;
    p.get::<pascal>()
}

#[inline]
pub fn to_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

#[inline]
pub fn to_m(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

#[inline]
pub fn to_mm(l: Length) -> f64 {
    use uom::si::length::millimeter;
    l.get::<millimeter>()
}

#[inline]
pub fn to_m_per_s(v: Velocity) -> f64 {
    use uom::si::velocity::meter_per_second;
    v.get::<meter_per_second>()
}

#[inline]
pub fn m_per_s(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn to_liters(v: Volume) -> f64 {
    use uom::si::volume::liter;
    v.get::<liter>()
}

pub const SECONDS_PER_HOUR: f64 = 3600.0;

pub mod constants {
    /// Water density used for velocity and volume (kg/m³).
    pub const WATER_DENSITY_KG_M3: f64 = 1000.0;
    /// Specific heat of water (J/(kg·K)).
    pub const WATER_CP_J_KGK: f64 = 4180.0;
    /// Pascal per bar.
    pub const PA_PER_BAR: f64 = 100_000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _p2 = kpa(12.0);
        let _l = m(2.0);
        let _d = mm(16.0);
        let _v = m_per_s(0.5);
    }

    #[test]
    fn kg_per_h_round_trip() {
        let q = kg_per_h(68.9);
        assert!((to_kg_per_h(q) - 68.9).abs() < 1e-9);
    }

    #[test]
    fn pressure_and_length_conversions() {
        assert!((to_kpa(pa(1500.0)) - 1.5).abs() < 1e-12);
        assert!((to_mm(m(0.016)) - 16.0).abs() < 1e-9);
        assert!((to_m(mm(22.0)) - 0.022).abs() < 1e-12);
    }
}
