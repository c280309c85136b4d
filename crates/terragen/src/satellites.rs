/// Mission lifecycle state shown in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionStatus {
    Active,
    Planned,
    Completed,
    Failed,
}

/// Decorative overlay record: missions are drawn on cosmetic orbit paths
/// and have no physical effect on the mesh or the weather layers.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteMission {
    pub name: &'static str,
    pub altitude_km: f32,
    pub beam_width_deg: f32,
    pub pulse_rate_hz: f32,
    /// Closed lat/lon polygon of the nominal coverage footprint.
    pub coverage: &'static [[f32; 2]],
    pub status: MissionStatus,
    pub data_quality: f32,
}

const CENTRAL_EU_FOOTPRINT: [[f32; 2]; 4] = [[47.0, 6.0], [47.0, 15.0], [55.0, 15.0], [55.0, 6.0]];
const ALPINE_FOOTPRINT: [[f32; 2]; 4] = [[45.5, 6.0], [45.5, 14.0], [48.0, 14.0], [48.0, 6.0]];
const BALTIC_FOOTPRINT: [[f32; 2]; 4] = [[53.0, 9.0], [53.0, 21.0], [60.0, 21.0], [60.0, 9.0]];

/// The fixed mission set fed to the overlay renderer.
pub fn default_missions() -> Vec<SatelliteMission> {
    vec![
        SatelliteMission {
            name: "LIDAR-1",
            altitude_km: 520.0,
            beam_width_deg: 2.4,
            pulse_rate_hz: 240.0,
            coverage: &CENTRAL_EU_FOOTPRINT,
            status: MissionStatus::Active,
            data_quality: 0.94,
        },
        SatelliteMission {
            name: "LIDAR-2",
            altitude_km: 540.0,
            beam_width_deg: 1.8,
            pulse_rate_hz: 180.0,
            coverage: &ALPINE_FOOTPRINT,
            status: MissionStatus::Active,
            data_quality: 0.88,
        },
        SatelliteMission {
            name: "TOPO-A",
            altitude_km: 705.0,
            beam_width_deg: 3.1,
            pulse_rate_hz: 120.0,
            coverage: &BALTIC_FOOTPRINT,
            status: MissionStatus::Completed,
            data_quality: 0.97,
        },
        SatelliteMission {
            name: "TOPO-B",
            altitude_km: 712.0,
            beam_width_deg: 3.1,
            pulse_rate_hz: 120.0,
            coverage: &CENTRAL_EU_FOOTPRINT,
            status: MissionStatus::Planned,
            data_quality: 0.0,
        },
        SatelliteMission {
            name: "SCAN-X",
            altitude_km: 460.0,
            beam_width_deg: 1.2,
            pulse_rate_hz: 300.0,
            coverage: &ALPINE_FOOTPRINT,
            status: MissionStatus::Failed,
            data_quality: 0.31,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_well_formed() {
        let missions = default_missions();
        assert!(missions.len() >= 3);
        for m in &missions {
            assert!(m.altitude_km > 0.0);
            assert!(m.coverage.len() >= 3);
            assert!((0.0..=1.0).contains(&m.data_quality));
        }
    }
}
