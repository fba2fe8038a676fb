use std::time::{Duration, Instant};

use crate::storage::KeyValueStore;

/// Prefix for draft entries in the key-value store.
const DRAFT_KEY_PREFIX: &str = "fitlog_form_";

/// Milliseconds a form must stay quiet before its draft is written.
pub const AUTOSAVE_QUIET_MS: u64 = 1000;

/// A form whose text fields can be captured into and restored from a draft.
pub trait DraftForm {
    /// Stable identifier, part of the storage key.
    fn form_id(&self) -> &'static str;

    /// Field names and current values, in display order.
    fn fields(&self) -> Vec<(&'static str, String)>;

    /// Overwrites one field. Unknown names are ignored.
    fn set_field(&mut self, name: &str, value: &str);

    /// Current value of one field, `None` when the form has no such field.
    fn field(&self, name: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

pub fn draft_key(form_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{form_id}")
}

/// Captures every field of `form` into its draft slot as a JSON object.
/// Forms with an empty id have no slot and are skipped.
pub fn save_draft(store: &mut dyn KeyValueStore, form: &dyn DraftForm) {
    let form_id = form.form_id();
    if form_id.is_empty() {
        return;
    }
    let mut record = serde_json::Map::new();
    for (name, value) in form.fields() {
        record.insert(name.to_owned(), serde_json::Value::String(value));
    }
    if let Ok(json) = serde_json::to_string(&serde_json::Value::Object(record)) {
        store.set(&draft_key(form_id), &json);
    }
}

/// Fills empty fields of `form` from its saved draft, leaving anything the
/// user already typed alone. Returns whether any field was restored.
///
/// Missing, malformed or non-object drafts are ignored, as are draft
/// entries for fields the form does not have.
pub fn load_draft(store: &dyn KeyValueStore, form: &mut dyn DraftForm) -> bool {
    let Some(raw) = store.get(&draft_key(form.form_id())) else {
        return false;
    };
    let record = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Object(record)) => record,
        _ => {
            log::warn!("Ignoring unreadable draft for {}", form.form_id());
            return false;
        }
    };
    let mut restored = false;
    for (name, saved) in &record {
        // Only string values are restored.
        let Some(saved) = saved.as_str() else { continue };
        if saved.is_empty() {
            continue;
        }
        if form.field(name).is_some_and(|current| current.is_empty()) {
            form.set_field(name, saved);
            restored = true;
        }
    }
    restored
}

/// Drops the saved draft for `form`, typically after a successful submit.
/// Drafts are only ever removed here; unrecognized keys are left alone.
pub fn clear_draft(store: &mut dyn KeyValueStore, form: &dyn DraftForm) {
    store.remove(&draft_key(form.form_id()));
}

/// Poll-driven debounce timer for the per-frame UI loop.
///
/// Call [`Debouncer::trigger`] on every edit and [`Debouncer::fire`] once a
/// frame; `fire` reports `true` exactly once per burst of edits, after the
/// quiet period has elapsed since the last trigger. Time is passed in so
/// tests can run without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    quiet: Duration,
    last_trigger: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_trigger: None,
        }
    }

    /// Debouncer with the standard autosave quiet period.
    pub fn autosave() -> Self {
        Self::new(Duration::from_millis(AUTOSAVE_QUIET_MS))
    }

    /// Records an edit at `now`, restarting the quiet period.
    pub fn trigger(&mut self, now: Instant) {
        self.last_trigger = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_trigger.is_some()
    }

    /// Returns `true` once the quiet period has passed since the last
    /// trigger, then disarms until the next trigger.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.last_trigger {
            Some(last) if now.duration_since(last) >= self.quiet => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }

    /// Forgets any pending trigger without firing, so a draft cleared on
    /// submit is not immediately written back.
    pub fn cancel(&mut self) {
        self.last_trigger = None;
    }
}
