// Module for health and calorie formulas used by the calculator and log views
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Alert tier shared by category badges and toast notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// BMI bands in ascending order. Lower bounds are inclusive, upper bounds
/// exclusive; the final band is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            BmiCategory::Underweight => Severity::Info,
            BmiCategory::Normal => Severity::Success,
            BmiCategory::Overweight => Severity::Warning,
            BmiCategory::Obese => Severity::Danger,
        }
    }
}

/// Body-mass index from weight in kilograms and height in centimetres.
///
/// A zero height yields a non-finite value; callers validate positivity
/// before displaying the result.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Category for a BMI value: `< 18.5`, `[18.5, 25)`, `[25, 30)`, `>= 30`.
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Metabolic intensity factor per activity type.
pub static ACTIVITY_MET: phf::Map<&'static str, f64> = phf_map! {
    "walking_slow" => 2.5,
    "walking_moderate" => 3.5,
    "walking_fast" => 4.3,
    "jogging" => 7.0,
    "running" => 9.8,
    "cycling_leisure" => 4.0,
    "cycling_moderate" => 8.0,
    "swimming" => 6.0,
    "weight_training" => 3.5,
    "yoga" => 2.5,
    "aerobics" => 6.5,
    "basketball" => 8.0,
    "soccer" => 10.0,
    "tennis" => 7.3,
    "badminton" => 5.5,
    "dancing" => 4.8,
};

/// Factor applied when an activity type is missing from [`ACTIVITY_MET`].
pub const DEFAULT_MET: f64 = 3.5;

pub fn intensity_factor(activity_type: &str) -> f64 {
    ACTIVITY_MET
        .get(activity_type)
        .copied()
        .unwrap_or(DEFAULT_MET)
}

/// Canonical key for the intensity table: lowercase, spaces to underscores.
pub fn normalize_activity(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Estimated calories burned for an activity.
///
/// `intensity * weight * duration / 60`, rounded to the nearest integer with
/// halves away from zero (`f64::round`, so 87.5 becomes 88). Unrecognized
/// activity types fall back to [`DEFAULT_MET`].
pub fn estimate_calories(activity_type: &str, duration_min: f64, weight_kg: f64) -> f64 {
    (intensity_factor(activity_type) * weight_kg * duration_min / 60.0).round()
}

/// Closest known activity type by Jaro-Winkler similarity, for "did you
/// mean" hints next to the default-factor fallback. `None` below 0.8.
pub fn closest_activity(name: &str) -> Option<&'static str> {
    let needle = normalize_activity(name);
    let mut best: Option<(&'static str, f64)> = None;
    for key in ACTIVITY_MET.keys() {
        let score = strsim::jaro_winkler(&needle, key);
        if score >= 0.8 && best.map_or(true, |(_, b)| score > b) {
            best = Some((key, score));
        }
    }
    best.map(|(key, _)| key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Stable key used in drafts and stored records.
    pub fn key(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Basal metabolic rate in kcal/day, revised Harris-Benedict.
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age as f64,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age as f64,
    }
}

/// Daily activity multiplier applied on top of the basal rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

pub const ALL_ACTIVITY_LEVELS: [ActivityLevel; 5] = [
    ActivityLevel::Sedentary,
    ActivityLevel::LightlyActive,
    ActivityLevel::ModeratelyActive,
    ActivityLevel::VeryActive,
    ActivityLevel::ExtremelyActive,
];

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly active",
            ActivityLevel::ModeratelyActive => "Moderately active",
            ActivityLevel::VeryActive => "Very active",
            ActivityLevel::ExtremelyActive => "Extremely active",
        }
    }

    /// Stable key used in drafts and stored records.
    pub fn key(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_ACTIVITY_LEVELS.into_iter().find(|l| l.key() == key)
    }
}

/// Total daily energy expenditure.
pub fn tdee(bmr: f64, level: ActivityLevel) -> f64 {
    bmr * level.multiplier()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

pub const ALL_GOALS: [Goal; 3] = [Goal::Lose, Goal::Maintain, Goal::Gain];

impl Goal {
    pub fn label(self) -> &'static str {
        match self {
            Goal::Lose => "Lose weight",
            Goal::Maintain => "Maintain",
            Goal::Gain => "Gain weight",
        }
    }
}

/// Daily calorie target for a goal at `rate_kg_per_week`.
///
/// One kilogram of body weight is counted as 7700 kcal spread over seven
/// days; maintaining returns the expenditure unchanged.
pub fn daily_calories_for_goal(tdee: f64, goal: Goal, rate_kg_per_week: f64) -> f64 {
    const KCAL_PER_KG: f64 = 7700.0;
    let daily = rate_kg_per_week * KCAL_PER_KG / 7.0;
    match goal {
        Goal::Lose => tdee - daily,
        Goal::Gain => tdee + daily,
        Goal::Maintain => tdee,
    }
}

/// Healthy weight range in kilograms for a height, from the BMI 18.5 and
/// 24.9 bounds.
pub fn ideal_weight_range(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    (18.5 * height_m * height_m, 24.9 * height_m * height_m)
}

/// Estimated body fat percent (Deurenberg), clamped at zero.
pub fn body_fat_percentage(bmi: f64, age: u32, sex: Sex) -> f64 {
    let raw = match sex {
        Sex::Male => 1.2 * bmi + 0.23 * age as f64 - 16.2,
        Sex::Female => 1.2 * bmi + 0.23 * age as f64 - 5.4,
    };
    raw.max(0.0)
}

/// Percent progress from `initial` toward `target`, clamped to 0..=100.
///
/// Distance is measured as an absolute difference, so moving away from the
/// target still registers as progress; equal initial and target report zero.
pub fn weight_progress(initial: f64, current: f64, target: f64) -> f64 {
    if initial == target {
        return 0.0;
    }
    let progress = (current - initial).abs() / (target - initial).abs() * 100.0;
    progress.clamp(0.0, 100.0)
}

/// Where the user stands relative to the weight target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeightStatus {
    /// Initial and target weight are the same.
    Steady,
    Reached,
    Losing { done_kg: f64, goal_kg: f64 },
    Gaining { done_kg: f64, goal_kg: f64 },
    NotStarted,
}

impl std::fmt::Display for WeightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightStatus::Steady => write!(f, "Holding steady"),
            WeightStatus::Reached => write!(f, "Target reached"),
            WeightStatus::Losing { done_kg, goal_kg } => {
                write!(f, "Losing weight ({done_kg:.1}/{goal_kg:.1} kg)")
            }
            WeightStatus::Gaining { done_kg, goal_kg } => {
                write!(f, "Gaining weight ({done_kg:.1}/{goal_kg:.1} kg)")
            }
            WeightStatus::NotStarted => write!(f, "Not started yet"),
        }
    }
}

pub fn weight_status(initial: f64, current: f64, target: f64) -> WeightStatus {
    if initial == target {
        return WeightStatus::Steady;
    }
    let goal_kg = (initial - target).abs();
    let done_kg = (initial - current).abs();
    if target < initial {
        if current <= target {
            WeightStatus::Reached
        } else if done_kg > 0.0 {
            WeightStatus::Losing { done_kg, goal_kg }
        } else {
            WeightStatus::NotStarted
        }
    } else if current >= target {
        WeightStatus::Reached
    } else if done_kg > 0.0 {
        WeightStatus::Gaining { done_kg, goal_kg }
    } else {
        WeightStatus::NotStarted
    }
}

/// Suggested activity types for a BMI band and goal. Combinations without a
/// sensible suggestion return an empty slice.
pub fn recommended_activities(category: BmiCategory, goal: Goal) -> &'static [&'static str] {
    match (category, goal) {
        (BmiCategory::Underweight, Goal::Gain) => &["weight_training", "walking_fast"],
        (BmiCategory::Underweight, Goal::Maintain) => &["yoga", "walking_slow", "aerobics"],
        (BmiCategory::Normal, Goal::Maintain) => {
            &["walking_moderate", "cycling_leisure", "swimming", "dancing"]
        }
        (BmiCategory::Normal, Goal::Lose) => &["jogging", "aerobics", "soccer"],
        (BmiCategory::Normal, Goal::Gain) => &["weight_training"],
        (BmiCategory::Overweight, Goal::Lose) => {
            &["walking_fast", "swimming", "cycling_moderate", "aerobics"]
        }
        (BmiCategory::Overweight, Goal::Maintain) => &["walking_moderate", "yoga", "dancing"],
        (BmiCategory::Obese, Goal::Lose) => &["walking_slow", "swimming", "cycling_leisure"],
        (BmiCategory::Obese, Goal::Maintain) => &["walking_slow", "yoga"],
        _ => &[],
    }
}
