use crate::math::surface::{Profile, SurfaceParams, Sweep};

pub struct SurfacePreset {
    pub name: &'static str,
    pub description: &'static str,
    pub params: SurfaceParams,
}

pub const SURFACE_PRESETS: &[SurfacePreset] = &[
    SurfacePreset {
        name: "Angular Sine",
        description: "Single forward sweep, r1 = -1, r2 = 2. Radius is constant except at a = 0",
        params: SurfaceParams {
            profile: Profile::AngularSine,
            sweep: Sweep::Forward,
            r1: -1.0,
            r2: 2.0,
            l: 1.0,
            da: 0.1,
            db: 1.0,
            da_offset: 0.2,
            db_offset: 5.0,
        },
    },
    SurfacePreset {
        name: "Sine Squared",
        description: "Forward and back sweep closing the cap, sin² profile scaled by 100",
        params: SurfaceParams {
            profile: Profile::SineSquared,
            sweep: Sweep::ForwardAndBack,
            r1: 0.5,
            r2: 4.0,
            l: 1.0,
            da: 0.1,
            db: 1.0,
            da_offset: 0.2,
            db_offset: 5.0,
        },
    },
    SurfacePreset {
        name: "One Minus Cosine",
        description: "Forward and back sweep closing the cap, (1 - cos) profile scaled by 100",
        params: SurfaceParams {
            profile: Profile::OneMinusCosine,
            sweep: Sweep::ForwardAndBack,
            r1: 0.5,
            r2: 4.0,
            l: 1.0,
            da: 0.1,
            db: 1.0,
            da_offset: 0.2,
            db_offset: 5.0,
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::surface::tessellate;

    #[test]
    fn test_presets_are_valid() {
        for preset in SURFACE_PRESETS {
            assert!(preset.params.validate().is_ok(), "{}", preset.name);
        }
    }

    #[test]
    fn test_preset_vertex_counts() {
        let counts: Vec<usize> = SURFACE_PRESETS
            .iter()
            .map(|p| tessellate(&p.params).unwrap().vertex_count())
            .collect();
        assert_eq!(counts, vec![15_162, 30_324, 30_324]);
    }
}
