// Module for the persisted log of users, activities and weigh-ins
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::math;
use crate::math::WeightStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: u32,
    pub target_weight_kg: f64,
    pub created_on: NaiveDate,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: u64,
    pub user_id: u64,
    pub activity: String,
    pub duration_min: f64,
    pub calories: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: u64,
    pub user_id: u64,
    pub weight_kg: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

/// Aggregates shown on the stats cards for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub total_activities: usize,
    pub total_calories: f64,
    pub avg_calories: f64,
    pub weight_progress_pct: f64,
    pub weight_status: WeightStatus,
}

/// Everything the app logs, saved as one JSON file in the user's config
/// directory. Loading starts from an empty logbook when the file is
/// missing or does not parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logbook {
    pub users: Vec<UserProfile>,
    pub activities: Vec<ActivityEntry>,
    pub weight_history: Vec<WeightRecord>,
}

impl Logbook {
    const FILE: &'static str = "fitlog_data.json";

    fn path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|p| p.join(Self::FILE))
    }

    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }

    // Ids climb from the current maximum, so deleting the newest row frees
    // its id for reuse.
    fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
        ids.max().map_or(1, |max| max + 1)
    }

    /// Adds a user and records their starting weight under `date`.
    pub fn add_user(
        &mut self,
        name: String,
        height_cm: f64,
        weight_kg: f64,
        age: u32,
        target_weight_kg: f64,
        date: NaiveDate,
    ) -> u64 {
        let id = Self::next_id(self.users.iter().map(|u| u.id));
        self.users.push(UserProfile {
            id,
            name,
            height_cm,
            weight_kg,
            age,
            target_weight_kg,
            created_on: date,
            last_updated: date,
        });
        self.record_weight(id, weight_kg, date, String::new());
        id
    }

    /// Applies the provided fields to a user's profile and stamps
    /// `last_updated`. Editing the weight here does not add a weigh-in.
    pub fn update_user(
        &mut self,
        id: u64,
        name: Option<String>,
        height_cm: Option<f64>,
        weight_kg: Option<f64>,
        age: Option<u32>,
        target_weight_kg: Option<f64>,
        date: NaiveDate,
    ) -> bool {
        let Some(user) = self.user_mut(id) else {
            return false;
        };
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(height_cm) = height_cm {
            user.height_cm = height_cm;
        }
        if let Some(weight_kg) = weight_kg {
            user.weight_kg = weight_kg;
        }
        if let Some(age) = age {
            user.age = age;
        }
        if let Some(target_weight_kg) = target_weight_kg {
            user.target_weight_kg = target_weight_kg;
        }
        user.last_updated = date;
        true
    }

    pub fn user(&self, id: u64) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: u64) -> Option<&mut UserProfile> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Removes a user together with their weight history. Activity rows are
    /// kept so past totals stay reconstructible.
    pub fn remove_user(&mut self, id: u64) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        if self.users.len() == before {
            return false;
        }
        self.weight_history.retain(|w| w.user_id != id);
        true
    }

    /// Adds an activity for an existing user. When `calories` is `None` it
    /// is estimated from the activity type and the user's current weight.
    pub fn add_activity(
        &mut self,
        user_id: u64,
        activity: &str,
        duration_min: f64,
        calories: Option<f64>,
        date: NaiveDate,
        notes: String,
    ) -> Option<u64> {
        let user = self.user(user_id)?;
        let calories = calories.unwrap_or_else(|| {
            let key = math::normalize_activity(activity);
            if !math::ACTIVITY_MET.contains_key(key.as_str()) {
                log::warn!("no intensity entry for '{activity}', estimating with the default");
            }
            math::estimate_calories(&key, duration_min, user.weight_kg)
        });
        let id = Self::next_id(self.activities.iter().map(|a| a.id));
        self.activities.push(ActivityEntry {
            id,
            user_id,
            activity: activity.to_owned(),
            duration_min,
            calories,
            date,
            notes,
        });
        Some(id)
    }

    pub fn remove_activity(&mut self, id: u64) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        self.activities.len() != before
    }

    /// Records a weigh-in and moves the user's current weight to it.
    pub fn record_weight(
        &mut self,
        user_id: u64,
        weight_kg: f64,
        date: NaiveDate,
        notes: String,
    ) -> Option<u64> {
        let user = self.user_mut(user_id)?;
        user.weight_kg = weight_kg;
        user.last_updated = date;
        let id = Self::next_id(self.weight_history.iter().map(|w| w.id));
        self.weight_history.push(WeightRecord {
            id,
            user_id,
            weight_kg,
            date,
            notes,
        });
        Some(id)
    }

    pub fn activities_for(&self, user_id: u64) -> impl Iterator<Item = &ActivityEntry> {
        self.activities.iter().filter(move |a| a.user_id == user_id)
    }

    pub fn weights_for(&self, user_id: u64) -> impl Iterator<Item = &WeightRecord> {
        self.weight_history
            .iter()
            .filter(move |w| w.user_id == user_id)
    }

    /// The user's first recorded weight, the baseline for progress.
    pub fn initial_weight(&self, user_id: u64) -> Option<f64> {
        self.weights_for(user_id).next().map(|w| w.weight_kg)
    }

    /// Calories summed per day, sorted by date. Days without activities do
    /// not appear.
    pub fn daily_calories(&self, user_id: u64) -> Vec<(NaiveDate, f64)> {
        let mut per_day = std::collections::BTreeMap::new();
        for entry in self.activities_for(user_id) {
            *per_day.entry(entry.date).or_insert(0.0) += entry.calories;
        }
        per_day.into_iter().collect()
    }

    /// Weigh-ins sorted by date, for the weight chart.
    pub fn weight_series(&self, user_id: u64) -> Vec<(NaiveDate, f64)> {
        let mut series: Vec<_> = self
            .weights_for(user_id)
            .map(|w| (w.date, w.weight_kg))
            .collect();
        series.sort_by_key(|(date, _)| *date);
        series
    }

    pub fn stats_for(&self, user_id: u64) -> Option<UserStats> {
        let user = self.user(user_id)?;
        let mut total_activities = 0;
        let mut total_calories = 0.0;
        for entry in self.activities_for(user_id) {
            total_activities += 1;
            total_calories += entry.calories;
        }
        let avg_calories = if total_activities == 0 {
            0.0
        } else {
            total_calories / total_activities as f64
        };
        let initial = self.initial_weight(user_id).unwrap_or(user.weight_kg);
        Some(UserStats {
            total_activities,
            total_calories,
            avg_calories,
            weight_progress_pct: math::weight_progress(
                initial,
                user.weight_kg,
                user.target_weight_kg,
            ),
            weight_status: math::weight_status(initial, user.weight_kg, user.target_weight_kg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_logbook() -> (Logbook, u64) {
        let mut book = Logbook::default();
        let id = book.add_user("Arin".to_owned(), 175.0, 80.0, 30, 70.0, date(2026, 8, 1));
        (book, id)
    }

    #[test]
    fn add_user_records_initial_weight() {
        let (book, id) = sample_logbook();
        let weights: Vec<_> = book.weights_for(id).collect();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].weight_kg, 80.0);
        assert_eq!(book.initial_weight(id), Some(80.0));
    }

    #[test]
    fn ids_follow_the_current_max() {
        let (mut book, first) = sample_logbook();
        let second = book.add_user("Beam".to_owned(), 160.0, 55.0, 25, 55.0, date(2026, 8, 1));
        assert_eq!(second, first + 1);

        book.remove_user(second);
        let third = book.add_user("Chai".to_owned(), 180.0, 90.0, 40, 80.0, date(2026, 8, 2));
        assert_eq!(third, second);
    }

    #[test]
    fn blank_calories_are_estimated_from_current_weight() {
        let (mut book, id) = sample_logbook();
        book.add_activity(id, "Jogging", 60.0, None, date(2026, 8, 2), String::new())
            .unwrap();
        let entry = book.activities_for(id).next().unwrap();
        // 7.0 MET * 80 kg * 1 h
        assert_eq!(entry.calories, 560.0);
    }

    #[test]
    fn explicit_calories_are_kept() {
        let (mut book, id) = sample_logbook();
        book.add_activity(
            id,
            "Jogging",
            60.0,
            Some(300.0),
            date(2026, 8, 2),
            String::new(),
        )
        .unwrap();
        assert_eq!(book.activities_for(id).next().unwrap().calories, 300.0);
    }

    #[test]
    fn activity_for_unknown_user_is_rejected() {
        let (mut book, _) = sample_logbook();
        assert_eq!(
            book.add_activity(99, "Jogging", 30.0, None, date(2026, 8, 2), String::new()),
            None
        );
        assert!(book.activities.is_empty());
    }

    #[test]
    fn record_weight_updates_the_profile() {
        let (mut book, id) = sample_logbook();
        book.record_weight(id, 78.5, date(2026, 8, 10), "after vacation".to_owned())
            .unwrap();
        let user = book.user(id).unwrap();
        assert_eq!(user.weight_kg, 78.5);
        assert_eq!(user.last_updated, date(2026, 8, 10));
        assert_eq!(book.weights_for(id).count(), 2);
        // The baseline stays at the first entry.
        assert_eq!(book.initial_weight(id), Some(80.0));
    }

    #[test]
    fn update_user_touches_only_the_provided_fields() {
        let (mut book, id) = sample_logbook();
        assert!(book.update_user(
            id,
            None,
            None,
            Some(78.0),
            None,
            Some(68.0),
            date(2026, 8, 15),
        ));
        let user = book.user(id).unwrap();
        assert_eq!(user.name, "Arin");
        assert_eq!(user.height_cm, 175.0);
        assert_eq!(user.age, 30);
        assert_eq!(user.weight_kg, 78.0);
        assert_eq!(user.target_weight_kg, 68.0);
        assert_eq!(user.last_updated, date(2026, 8, 15));
        // A profile edit is not a weigh-in.
        assert_eq!(book.weights_for(id).count(), 1);
    }

    #[test]
    fn update_user_rejects_unknown_ids() {
        let (mut book, _) = sample_logbook();
        let name = Some("Dao".to_owned());
        assert!(!book.update_user(99, name, None, None, None, None, date(2026, 8, 15)));
    }

    #[test]
    fn remove_user_drops_weights_and_keeps_activities() {
        let (mut book, id) = sample_logbook();
        book.add_activity(id, "Yoga", 45.0, None, date(2026, 8, 3), String::new())
            .unwrap();
        assert!(book.remove_user(id));
        assert_eq!(book.weights_for(id).count(), 0);
        assert_eq!(book.activities.len(), 1);
        assert!(!book.remove_user(id));
    }

    #[test]
    fn stats_average_is_zero_without_activities() {
        let (book, id) = sample_logbook();
        let stats = book.stats_for(id).unwrap();
        assert_eq!(stats.total_activities, 0);
        assert_eq!(stats.total_calories, 0.0);
        assert_eq!(stats.avg_calories, 0.0);
    }

    #[test]
    fn stats_totals_and_progress() {
        let (mut book, id) = sample_logbook();
        book.add_activity(
            id,
            "Jogging",
            60.0,
            Some(500.0),
            date(2026, 8, 2),
            String::new(),
        )
        .unwrap();
        book.add_activity(
            id,
            "Swimming",
            30.0,
            Some(300.0),
            date(2026, 8, 3),
            String::new(),
        )
        .unwrap();
        book.record_weight(id, 75.0, date(2026, 8, 10), String::new())
            .unwrap();

        let stats = book.stats_for(id).unwrap();
        assert_eq!(stats.total_activities, 2);
        assert_eq!(stats.total_calories, 800.0);
        assert_eq!(stats.avg_calories, 400.0);
        // 5 of 10 kg done.
        assert!((stats.weight_progress_pct - 50.0).abs() < 1e-9);
        assert_eq!(
            stats.weight_status,
            WeightStatus::Losing {
                done_kg: 5.0,
                goal_kg: 10.0
            }
        );
    }

    #[test]
    fn daily_calories_sum_per_day_in_order() {
        let (mut book, id) = sample_logbook();
        book.add_activity(
            id,
            "Jogging",
            30.0,
            Some(250.0),
            date(2026, 8, 5),
            String::new(),
        )
        .unwrap();
        book.add_activity(
            id,
            "Yoga",
            60.0,
            Some(150.0),
            date(2026, 8, 5),
            String::new(),
        )
        .unwrap();
        book.add_activity(
            id,
            "Swimming",
            30.0,
            Some(300.0),
            date(2026, 8, 2),
            String::new(),
        )
        .unwrap();

        let daily = book.daily_calories(id);
        assert_eq!(
            daily,
            vec![(date(2026, 8, 2), 300.0), (date(2026, 8, 5), 400.0)]
        );
    }

    #[test]
    fn entries_without_notes_still_load() {
        let json = r#"{"id":1,"user_id":1,"activity":"Jogging","duration_min":30.0,"calories":250.0,"date":"2026-08-05"}"#;
        let entry: ActivityEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.notes, "");
    }

    #[test]
    fn weight_series_sorts_backfilled_dates() {
        let (mut book, id) = sample_logbook();
        book.record_weight(id, 79.0, date(2026, 8, 20), String::new())
            .unwrap();
        book.record_weight(id, 79.5, date(2026, 8, 10), String::new())
            .unwrap();

        let series = book.weight_series(id);
        assert_eq!(
            series,
            vec![
                (date(2026, 8, 1), 80.0),
                (date(2026, 8, 10), 79.5),
                (date(2026, 8, 20), 79.0),
            ]
        );
    }
}
