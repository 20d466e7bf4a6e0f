//! Tobacco and biomass exposure indices.
//!
//! Two threshold families live here and are deliberately kept apart: the bonus
//! tables feed the point total, while the criteria gates feed
//! [`ClinicalFlags`](super::flags::ClinicalFlags) only.

use serde::{Deserialize, Serialize};

use super::answers::{exposure_keys, CanonicalAnswerMap, RawAnswers};
use super::catalog::QuestionId;

const CIGARETTES_PER_PACK: f64 = 20.0;
const PACK_YEARS_CRITERIA: f64 = 20.0;
const SMOKING_YEARS_CRITERIA: f64 = 20.0;
const BIOMASS_INDEX_CRITERIA: f64 = 100.0;

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// `(cigarettes per day / 20) * years smoked`, zero unless the respondent smokes.
pub fn pack_years(smoker: bool, cigs_per_day: f64, smoking_years: f64) -> f64 {
    if !smoker {
        return 0.0;
    }
    (non_negative(cigs_per_day) / CIGARETTES_PER_PACK) * non_negative(smoking_years)
}

/// `years exposed * hours per day`, zero unless the respondent reports exposure.
pub fn biomass_index(exposed: bool, years: f64, hours_per_day: f64) -> f64 {
    if !exposed {
        return 0.0;
    }
    non_negative(years) * non_negative(hours_per_day)
}

pub fn pack_years_bonus(pack_years: f64) -> u32 {
    if pack_years > 20.0 {
        5
    } else if pack_years >= 10.0 {
        2
    } else if pack_years > 0.0 {
        1
    } else {
        0
    }
}

pub fn biomass_index_bonus(index: f64) -> u32 {
    if index > 60.0 {
        5
    } else if index >= 20.0 {
        2
    } else if index > 0.0 {
        1
    } else {
        0
    }
}

/// Raw sub-field values before gating and clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureInputs {
    pub cigs_per_day: f64,
    pub smoking_years: f64,
    pub biomass_years: f64,
    pub biomass_hours_per_day: f64,
}

impl ExposureInputs {
    /// Reads the `aniosFumando`/`cigsPorDia`/`aniosBiomasa`/`horasPorDiaBiomasa` fields.
    pub fn from_raw(raw: &RawAnswers) -> Self {
        Self {
            cigs_per_day: raw.number(exposure_keys::CIGS_PER_DAY),
            smoking_years: raw.number(exposure_keys::SMOKING_YEARS),
            biomass_years: raw.number(exposure_keys::BIOMASS_YEARS),
            biomass_hours_per_day: raw.number(exposure_keys::BIOMASS_HOURS_PER_DAY),
        }
    }
}

/// Derived exposure indices plus the clinical "meets criteria" gates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureProfile {
    pub pack_years: f64,
    pub biomass_index: f64,
    pub tabaquismo_by_pack_years: bool,
    pub tabaquismo_by_years: bool,
    pub tabaquismo_meets_criteria: bool,
    pub biomasa_meets_criteria: bool,
}

impl ExposureProfile {
    pub fn compute(answers: &CanonicalAnswerMap, inputs: ExposureInputs) -> Self {
        let smoker = answers.is_true(QuestionId::Tabaquismo);
        let biomass_exposed = answers.is_true(QuestionId::Biomasa);

        let pack_years = pack_years(smoker, inputs.cigs_per_day, inputs.smoking_years);
        let biomass_index = biomass_index(
            biomass_exposed,
            inputs.biomass_years,
            inputs.biomass_hours_per_day,
        );

        let tabaquismo_by_pack_years = smoker && pack_years >= PACK_YEARS_CRITERIA;
        let tabaquismo_by_years =
            smoker && non_negative(inputs.smoking_years) >= SMOKING_YEARS_CRITERIA;

        Self {
            pack_years,
            biomass_index,
            tabaquismo_by_pack_years,
            tabaquismo_by_years,
            tabaquismo_meets_criteria: tabaquismo_by_pack_years || tabaquismo_by_years,
            biomasa_meets_criteria: biomass_exposed && biomass_index > BIOMASS_INDEX_CRITERIA,
        }
    }

    pub fn bonus_points(&self) -> u32 {
        pack_years_bonus(self.pack_years) + biomass_index_bonus(self.biomass_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::answers::TriState;

    fn answers(smoker: bool, biomass: bool) -> CanonicalAnswerMap {
        [
            (QuestionId::Tabaquismo, TriState::from(smoker)),
            (QuestionId::Biomasa, TriState::from(biomass)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn pack_years_follow_the_glossary_formula() {
        assert_eq!(pack_years(true, 20.0, 10.0), 10.0);
        assert_eq!(pack_years_bonus(10.0), 2);
        assert_eq!(pack_years(true, 10.0, 5.0), 2.5);
    }

    #[test]
    fn non_smokers_have_zero_pack_years() {
        assert_eq!(pack_years(false, 40.0, 30.0), 0.0);
        assert_eq!(pack_years_bonus(0.0), 0);
    }

    #[test]
    fn inputs_are_clamped() {
        assert_eq!(pack_years(true, -20.0, 10.0), 0.0);
        assert_eq!(pack_years(true, f64::NAN, 10.0), 0.0);
        assert_eq!(biomass_index(true, f64::INFINITY, 3.0), 0.0);
        assert_eq!(biomass_index(true, 10.0, -1.0), 0.0);
    }

    #[test]
    fn bonus_tables_use_their_own_boundaries() {
        assert_eq!(pack_years_bonus(0.5), 1);
        assert_eq!(pack_years_bonus(9.99), 1);
        assert_eq!(pack_years_bonus(20.0), 2);
        assert_eq!(pack_years_bonus(20.01), 5);

        assert_eq!(biomass_index_bonus(19.0), 1);
        assert_eq!(biomass_index_bonus(20.0), 2);
        assert_eq!(biomass_index_bonus(60.0), 2);
        assert_eq!(biomass_index_bonus(61.0), 5);
        assert_eq!(biomass_index_bonus(0.0), 0);
    }

    #[test]
    fn biomass_gate_is_stricter_than_the_bonus_table() {
        let inputs = ExposureInputs {
            biomass_years: 30.0,
            biomass_hours_per_day: 3.0,
            ..ExposureInputs::default()
        };
        let profile = ExposureProfile::compute(&answers(false, true), inputs);
        assert_eq!(profile.biomass_index, 90.0);
        assert_eq!(biomass_index_bonus(profile.biomass_index), 2);
        assert!(!profile.biomasa_meets_criteria);

        let inputs = ExposureInputs {
            biomass_years: 50.0,
            biomass_hours_per_day: 3.0,
            ..ExposureInputs::default()
        };
        let profile = ExposureProfile::compute(&answers(false, true), inputs);
        assert_eq!(profile.biomass_index, 150.0);
        assert!(profile.biomasa_meets_criteria);
    }

    #[test]
    fn tobacco_gate_accepts_either_pack_years_or_duration() {
        let long_light = ExposureInputs {
            cigs_per_day: 2.0,
            smoking_years: 25.0,
            ..ExposureInputs::default()
        };
        let profile = ExposureProfile::compute(&answers(true, false), long_light);
        assert!(!profile.tabaquismo_by_pack_years);
        assert!(profile.tabaquismo_by_years);
        assert!(profile.tabaquismo_meets_criteria);

        let short_heavy = ExposureInputs {
            cigs_per_day: 40.0,
            smoking_years: 10.0,
            ..ExposureInputs::default()
        };
        let profile = ExposureProfile::compute(&answers(true, false), short_heavy);
        assert_eq!(profile.pack_years, 20.0);
        assert!(profile.tabaquismo_by_pack_years);
        assert!(!profile.tabaquismo_by_years);
        assert!(profile.tabaquismo_meets_criteria);
    }

    #[test]
    fn sub_fields_are_ignored_without_an_affirmative_parent() {
        let heavy = ExposureInputs {
            cigs_per_day: 40.0,
            smoking_years: 30.0,
            biomass_years: 40.0,
            biomass_hours_per_day: 8.0,
        };
        let profile = ExposureProfile::compute(&CanonicalAnswerMap::default(), heavy);
        assert_eq!(profile.pack_years, 0.0);
        assert_eq!(profile.biomass_index, 0.0);
        assert!(!profile.tabaquismo_meets_criteria);
        assert!(!profile.biomasa_meets_criteria);
        assert_eq!(profile.bonus_points(), 0);
    }
}
