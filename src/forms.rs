// Module for form state, validation and the draft wiring of each form
use chrono::NaiveDate;

use crate::drafts::DraftForm;
use crate::math::{ActivityLevel, Sex};

fn required_text(raw: &str, label: &str) -> Result<(), String> {
    if raw.trim().is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(())
    }
}

fn positive_number(raw: &str, label: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }
    match raw.parse::<f64>() {
        Ok(v) if v > 0.0 => Ok(v),
        Ok(_) => Err(format!("{label} must be greater than zero")),
        Err(_) => Err(format!("{label} must be a number")),
    }
}

fn positive_int(raw: &str, label: &str) -> Result<u32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }
    match raw.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        Ok(_) => Err(format!("{label} must be greater than zero")),
        Err(_) => Err(format!("{label} must be a whole number")),
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ActivityFormErrors {
    pub activity_name: Option<String>,
    pub duration: Option<String>,
    pub calories: Option<String>,
}

impl ActivityFormErrors {
    /// First invalid field and its message, for the toast and focus.
    pub fn first(&self) -> Option<(&'static str, &str)> {
        [
            ("activity_name", &self.activity_name),
            ("duration", &self.duration),
            ("calories", &self.calories),
        ]
        .into_iter()
        .find_map(|(name, err)| err.as_deref().map(|msg| (name, msg)))
    }
}

/// New-activity form. The raw strings and their field names double as the
/// draft record, so they follow the page's input names.
#[derive(Debug, Clone)]
pub struct ActivityForm {
    pub activity_name: String,
    pub duration: String,
    pub calories: String,
    pub date: NaiveDate,
    pub details: String,
}

impl ActivityForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            activity_name: String::new(),
            duration: String::new(),
            calories: String::new(),
            date: today,
            details: String::new(),
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn validate(&self) -> Option<ActivityFormErrors> {
        let mut errors = ActivityFormErrors::default();
        errors.activity_name = required_text(&self.activity_name, "Activity name").err();
        errors.duration = positive_number(&self.duration, "Duration").err();
        if !self.calories.trim().is_empty() {
            errors.calories = positive_number(&self.calories, "Calories").err();
        }
        if errors == ActivityFormErrors::default() {
            None
        } else {
            Some(errors)
        }
    }

    /// Parsed duration, meaningful after a clean [`Self::validate`].
    pub fn duration_min(&self) -> f64 {
        self.duration.trim().parse().unwrap_or(0.0)
    }

    /// Calories as entered, `None` when left blank for estimation.
    pub fn calories_value(&self) -> Option<f64> {
        let raw = self.calories.trim();
        if raw.is_empty() {
            None
        } else {
            raw.parse().ok()
        }
    }
}

impl DraftForm for ActivityForm {
    fn form_id(&self) -> &'static str {
        "activity"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("date", self.date.to_string()),
            ("activity_name", self.activity_name.clone()),
            ("duration", self.duration.clone()),
            ("calories", self.calories.clone()),
            ("details", self.details.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "date" => {
                if let Ok(date) = value.parse::<NaiveDate>() {
                    self.date = date;
                }
            }
            "activity_name" => self.activity_name = value.to_owned(),
            "duration" => self.duration = value.to_owned(),
            "calories" => self.calories = value.to_owned(),
            "details" => self.details = value.to_owned(),
            _ => {}
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WeightFormErrors {
    pub weight: Option<String>,
}

impl WeightFormErrors {
    pub fn first(&self) -> Option<(&'static str, &str)> {
        self.weight.as_deref().map(|msg| ("weight", msg))
    }
}

/// Weigh-in form.
#[derive(Debug, Clone)]
pub struct WeightForm {
    pub weight: String,
    pub date: NaiveDate,
    pub notes: String,
}

impl WeightForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            weight: String::new(),
            date: today,
            notes: String::new(),
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn validate(&self) -> Option<WeightFormErrors> {
        let errors = WeightFormErrors {
            weight: positive_number(&self.weight, "Weight").err(),
        };
        if errors == WeightFormErrors::default() {
            None
        } else {
            Some(errors)
        }
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight.trim().parse().unwrap_or(0.0)
    }
}

impl DraftForm for WeightForm {
    fn form_id(&self) -> &'static str {
        "weight"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("date", self.date.to_string()),
            ("weight", self.weight.clone()),
            ("notes", self.notes.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "date" => {
                if let Ok(date) = value.parse::<NaiveDate>() {
                    self.date = date;
                }
            }
            "weight" => self.weight = value.to_owned(),
            "notes" => self.notes = value.to_owned(),
            _ => {}
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfileFormErrors {
    pub name: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<String>,
    pub target_weight: Option<String>,
}

impl ProfileFormErrors {
    pub fn first(&self) -> Option<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("height", &self.height),
            ("weight", &self.weight),
            ("age", &self.age),
            ("target_weight", &self.target_weight),
        ]
        .into_iter()
        .find_map(|(name, err)| err.as_deref().map(|msg| (name, msg)))
    }
}

/// New-user form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub height: String,
    pub weight: String,
    pub age: String,
    pub target_weight: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Option<ProfileFormErrors> {
        let errors = ProfileFormErrors {
            name: required_text(&self.name, "Name").err(),
            height: positive_number(&self.height, "Height").err(),
            weight: positive_number(&self.weight, "Weight").err(),
            age: positive_int(&self.age, "Age").err(),
            target_weight: positive_number(&self.target_weight, "Target weight").err(),
        };
        if errors == ProfileFormErrors::default() {
            None
        } else {
            Some(errors)
        }
    }

    pub fn height_cm(&self) -> f64 {
        self.height.trim().parse().unwrap_or(0.0)
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight.trim().parse().unwrap_or(0.0)
    }

    pub fn age_years(&self) -> u32 {
        self.age.trim().parse().unwrap_or(0)
    }

    pub fn target_weight_kg(&self) -> f64 {
        self.target_weight.trim().parse().unwrap_or(0.0)
    }
}

impl DraftForm for ProfileForm {
    fn form_id(&self) -> &'static str {
        "profile"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("height", self.height.clone()),
            ("weight", self.weight.clone()),
            ("age", self.age.clone()),
            ("target_weight", self.target_weight.clone()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "name" => self.name = value.to_owned(),
            "height" => self.height = value.to_owned(),
            "weight" => self.weight = value.to_owned(),
            "age" => self.age = value.to_owned(),
            "target_weight" => self.target_weight = value.to_owned(),
            _ => {}
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CalculatorFormErrors {
    pub weight: Option<String>,
    pub height: Option<String>,
    pub age: Option<String>,
}

impl CalculatorFormErrors {
    pub fn first(&self) -> Option<(&'static str, &str)> {
        [
            ("weight", &self.weight),
            ("height", &self.height),
            ("age", &self.age),
        ]
        .into_iter()
        .find_map(|(name, err)| err.as_deref().map(|msg| (name, msg)))
    }
}

/// Health-calculator form. The sex and activity-level choices always hold a
/// value, so drafts record them but never overwrite them on restore.
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    pub weight: String,
    pub height: String,
    pub age: String,
    pub gender: Sex,
    pub activity_level: ActivityLevel,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self {
            weight: String::new(),
            height: String::new(),
            age: String::new(),
            gender: Sex::Male,
            activity_level: ActivityLevel::Sedentary,
        }
    }
}

impl CalculatorForm {
    pub fn validate(&self) -> Option<CalculatorFormErrors> {
        let errors = CalculatorFormErrors {
            weight: positive_number(&self.weight, "Weight").err(),
            height: positive_number(&self.height, "Height").err(),
            age: positive_int(&self.age, "Age").err(),
        };
        if errors == CalculatorFormErrors::default() {
            None
        } else {
            Some(errors)
        }
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight.trim().parse().unwrap_or(0.0)
    }

    pub fn height_cm(&self) -> f64 {
        self.height.trim().parse().unwrap_or(0.0)
    }

    pub fn age_years(&self) -> u32 {
        self.age.trim().parse().unwrap_or(0)
    }
}

impl DraftForm for CalculatorForm {
    fn form_id(&self) -> &'static str {
        "calculator"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("weight", self.weight.clone()),
            ("height", self.height.clone()),
            ("age", self.age.clone()),
            ("gender", self.gender.key().to_owned()),
            ("activity_level", self.activity_level.key().to_owned()),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "weight" => self.weight = value.to_owned(),
            "height" => self.height = value.to_owned(),
            "age" => self.age = value.to_owned(),
            "gender" => {
                if let Some(sex) = Sex::from_key(value) {
                    self.gender = sex;
                }
            }
            "activity_level" => {
                if let Some(level) = ActivityLevel::from_key(value) {
                    self.activity_level = level;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::{load_draft, save_draft};
    use crate::storage::{KeyValueStore, MemoryStore};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
    }

    #[test]
    fn empty_activity_form_reports_required_fields() {
        let form = ActivityForm::new(today());
        let errors = form.validate().unwrap();
        assert_eq!(errors.activity_name.as_deref(), Some("Activity name is required"));
        assert_eq!(errors.duration.as_deref(), Some("Duration is required"));
        assert_eq!(errors.calories, None);
        assert_eq!(errors.first().unwrap().0, "activity_name");
    }

    #[test]
    fn duration_must_be_a_positive_number() {
        let mut form = ActivityForm::new(today());
        form.activity_name = "Jogging".to_owned();

        form.duration = "abc".to_owned();
        let errors = form.validate().unwrap();
        assert_eq!(errors.duration.as_deref(), Some("Duration must be a number"));

        form.duration = "0".to_owned();
        let errors = form.validate().unwrap();
        assert_eq!(
            errors.duration.as_deref(),
            Some("Duration must be greater than zero")
        );

        form.duration = "45".to_owned();
        assert_eq!(form.validate(), None);
        assert_eq!(form.duration_min(), 45.0);
    }

    #[test]
    fn blank_calories_mean_estimate_for_me() {
        let mut form = ActivityForm::new(today());
        form.activity_name = "Jogging".to_owned();
        form.duration = "60".to_owned();

        assert_eq!(form.validate(), None);
        assert_eq!(form.calories_value(), None);

        form.calories = "490".to_owned();
        assert_eq!(form.validate(), None);
        assert_eq!(form.calories_value(), Some(490.0));

        form.calories = "many".to_owned();
        assert!(form.validate().unwrap().calories.is_some());
    }

    #[test]
    fn drafts_restore_text_but_not_the_defaulted_date() {
        let mut store = MemoryStore::new();
        let mut filled = ActivityForm::new(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
        filled.activity_name = "Jogging".to_owned();
        filled.duration = "60".to_owned();
        filled.details = "easy pace".to_owned();
        save_draft(&mut store, &filled);

        let mut fresh = ActivityForm::new(today());
        assert!(load_draft(&store, &mut fresh));
        assert_eq!(fresh.activity_name, "Jogging");
        assert_eq!(fresh.duration, "60");
        assert_eq!(fresh.details, "easy pace");
        // The date field is never empty, so the drafted date stays behind.
        assert_eq!(fresh.date, today());
    }

    #[test]
    fn weight_form_requires_a_positive_weight() {
        let mut form = WeightForm::new(today());
        assert_eq!(
            form.validate().unwrap().weight.as_deref(),
            Some("Weight is required")
        );
        form.weight = "-3".to_owned();
        assert!(form.validate().is_some());
        form.weight = "72.5".to_owned();
        assert_eq!(form.validate(), None);
        assert_eq!(form.weight_kg(), 72.5);
    }

    #[test]
    fn profile_form_validates_every_field() {
        let mut form = ProfileForm::default();
        let errors = form.validate().unwrap();
        assert!(errors.name.is_some());
        assert!(errors.target_weight.is_some());
        assert_eq!(errors.first().unwrap().0, "name");

        form.name = "Arin".to_owned();
        form.height = "175".to_owned();
        form.weight = "80".to_owned();
        form.age = "30.5".to_owned();
        form.target_weight = "70".to_owned();
        let errors = form.validate().unwrap();
        assert_eq!(errors.age.as_deref(), Some("Age must be a whole number"));

        form.age = "30".to_owned();
        assert_eq!(form.validate(), None);
        assert_eq!(form.age_years(), 30);
        assert_eq!(form.height_cm(), 175.0);
    }

    #[test]
    fn calculator_choices_are_saved_but_never_restored() {
        let mut store = MemoryStore::new();
        let mut filled = CalculatorForm::default();
        filled.weight = "70".to_owned();
        filled.height = "175".to_owned();
        filled.gender = Sex::Female;
        filled.activity_level = ActivityLevel::VeryActive;
        save_draft(&mut store, &filled);

        let raw = store.get("fitlog_form_calculator").unwrap();
        assert!(raw.contains("\"female\""));
        assert!(raw.contains("\"very_active\""));

        let mut fresh = CalculatorForm::default();
        assert!(load_draft(&store, &mut fresh));
        assert_eq!(fresh.weight, "70");
        assert_eq!(fresh.height, "175");
        // Choice fields always hold a value, so the defaults win.
        assert_eq!(fresh.gender, Sex::Male);
        assert_eq!(fresh.activity_level, ActivityLevel::Sedentary);
    }

    #[test]
    fn set_field_parses_choice_keys() {
        let mut form = CalculatorForm::default();
        form.set_field("gender", "female");
        form.set_field("activity_level", "moderately_active");
        form.set_field("activity_level", "bogus");
        assert_eq!(form.gender, Sex::Female);
        assert_eq!(form.activity_level, ActivityLevel::ModeratelyActive);
    }
}
