//! Turkana County 2025 health and logistics figures.
//!
//! Triangulated from KHIS, MoH, Duke and media reporting for the September
//! 2025 emergency. The table is built once on first access and is read-only
//! for the life of the process; every prompt embeds its JSON snapshot.

use std::sync::LazyLock;

use serde::Serialize;

use crate::risk::{EPIDEMIC_THRESHOLD_PERCENT, RAINFALL_CODE_MAX, TEMPERATURE_CODE_MAX};

pub static KNOWLEDGE: LazyLock<KnowledgeTable> = LazyLock::new(KnowledgeTable::turkana_2025);

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeTable {
    pub emergency_declared: &'static str,
    pub kala_azar: KalaAzar,
    pub malaria: Malaria,
    pub gaps: Gaps,
    pub interventions: Interventions,
    pub logistics: Logistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct KalaAzar {
    pub cases_2025: u32,
    pub peak_june: u32,
    pub deaths: u32,
    pub cfr: f64,
    pub demographics: Demographics,
    pub hotspots: Vec<&'static str>,
    pub vectors: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Demographics {
    pub male: f64,
    pub under_24: f64,
    pub malnourished: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Malaria {
    pub prevalence: f64,
    pub smc_reduction_2024: f64,
    pub kakuma_attack_rate_2005: f64,
    pub habitats: Vec<&'static str>,
    pub early_warning_model: EarlyWarningModel,
}

/// MoH/KEMRI early warning model parameters, mirrored from [`crate::risk`].
#[derive(Debug, Clone, Serialize)]
pub struct EarlyWarningModel {
    pub threshold: i64,
    pub tmax_code: Vec<i32>,
    pub rainfall_code: Vec<i32>,
    pub risk_formula: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Gaps {
    pub blood: BloodSupply,
    pub stockouts: Vec<&'static str>,
    pub lost_followup: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BloodSupply {
    pub needed_quarter: u32,
    pub donated: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Interventions {
    pub smc: bool,
    pub lsm: bool,
    pub four_pillar: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Logistics {
    pub vehicles: u32,
    pub facilities: u32,
    pub area_km2: u32,
}

impl KnowledgeTable {
    pub fn turkana_2025() -> Self {
        Self {
            emergency_declared: "2025-09-26",
            kala_azar: KalaAzar {
                cases_2025: 2043,
                peak_june: 125,
                deaths: 18,
                cfr: 0.062,
                demographics: Demographics {
                    male: 0.72,
                    under_24: 0.87,
                    malnourished: 0.20,
                },
                hotspots: vec!["Kerio", "Nakurio", "Nadoto", "Loima", "Kibish", "Kakuma"],
                vectors: vec!["sandfly_anthills", "cracked_soil"],
            },
            malaria: Malaria {
                prevalence: 0.39,
                smc_reduction_2024: 0.70,
                kakuma_attack_rate_2005: 0.122,
                habitats: vec!["tap_stand_pits", "drainage_channels"],
                early_warning_model: EarlyWarningModel {
                    threshold: EPIDEMIC_THRESHOLD_PERCENT,
                    tmax_code: (0..=TEMPERATURE_CODE_MAX).collect(),
                    rainfall_code: (0..=RAINFALL_CODE_MAX).collect(),
                    risk_formula: "Tmax_Code + Rainfall_Code",
                },
            },
            gaps: Gaps {
                blood: BloodSupply {
                    needed_quarter: 1000,
                    donated: 120,
                },
                stockouts: vec!["RK39", "DAT", "SSG_PM", "Amphotericin B"],
                lost_followup: 25,
            },
            interventions: Interventions {
                smc: true,
                lsm: true,
                four_pillar: true,
            },
            logistics: Logistics {
                vehicles: 1,
                facilities: 132,
                area_km2: 71597,
            },
        }
    }

    /// Pretty-printed JSON embedded into prompts.
    pub fn snapshot(&self) -> String {
        serde_json::to_string_pretty(self)
            .expect("knowledge table holds only strings, numbers and string arrays")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_complete_json() {
        let snapshot = KNOWLEDGE.snapshot();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 6);
        assert_eq!(value["kala_azar"]["cases_2025"], 2043);
    }

    #[test]
    fn test_snapshot_keeps_declared_key_order() {
        let snapshot = KNOWLEDGE.snapshot();
        let keys = [
            "\"emergency_declared\"",
            "\"kala_azar\"",
            "\"malaria\"",
            "\"gaps\"",
            "\"interventions\"",
            "\"logistics\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| snapshot.find(k).expect("key present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_snapshot_uses_two_space_indent() {
        let snapshot = KNOWLEDGE.snapshot();
        assert!(snapshot.starts_with("{\n  \"emergency_declared\": \"2025-09-26\""));
    }

    #[test]
    fn test_early_warning_model_matches_classifier() {
        let value = serde_json::to_value(&*KNOWLEDGE).unwrap();
        let model = &value["malaria"]["early_warning_model"];
        assert_eq!(model["threshold"], 30);
        assert_eq!(model["tmax_code"], serde_json::json!([0, 1, 2, 3, 4, 5]));
        assert_eq!(
            model["rainfall_code"],
            serde_json::json!([0, 1, 2, 3, 4, 5, 6])
        );
    }

    #[test]
    fn test_headline_figures() {
        assert_eq!(KNOWLEDGE.kala_azar.cases_2025, 2043);
        assert_eq!(KNOWLEDGE.kala_azar.hotspots.len(), 6);
        assert!(KNOWLEDGE.gaps.stockouts.contains(&"Amphotericin B"));
        assert_eq!(KNOWLEDGE.logistics.facilities, 132);
    }
}
