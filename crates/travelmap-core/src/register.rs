// crates/travelmap-core/src/register.rs
//! # Registration flows
//!
//! Create, edit and delete operations on the travel log, including the
//! user-confirmation points for unmapped cities and destructive deletes.

use crate::app::App;
use crate::error::{Result, TravelMapError};
use crate::geocode::{resolve_country, Geocoder};
use crate::model::{LogChanges, RegistrationForm, TravelLog};
use crate::storage::KeyValueStore;
use crate::text::primary_city;
use tracing::info;

/// User-facing confirmation/alert seam (browser `confirm`/`alert` upstream,
/// terminal prompts in the CLI, scripted answers in tests).
pub trait UserPrompt {
    /// Asks a yes/no question; `false` aborts the operation.
    fn confirm(&mut self, message: &str) -> bool;
    /// Shows a blocking notice.
    fn alert(&mut self, message: &str);
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Record appended and persisted, with its assigned id.
    Saved(i64),
    /// The user declined to continue without city enrichment; nothing was
    /// written.
    Declined,
}

/// Result of an edit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Saved,
    /// The new location's city is unmapped; the edit was rejected with an
    /// alert and nothing was written.
    Rejected,
}

impl<S: KeyValueStore> App<S> {
    /// Registers a new record from form input.
    ///
    /// The primary city is looked up in the mapping for province/coordinate
    /// enrichment; an unmapped city asks the user whether to proceed
    /// without it. Country resolution never blocks the save — it falls back
    /// to `"UNK"`.
    pub fn submit(
        &mut self,
        form: RegistrationForm,
        geocoder: &dyn Geocoder,
        prompt: &mut dyn UserPrompt,
    ) -> Result<SubmitOutcome> {
        let city = primary_city(&form.location);
        let enrichment = self.mapping.lookup(city).cloned();

        if enrichment.is_none() {
            let message = format!(
                "{city} is not in the city mapping. Save without province and coordinates?"
            );
            if !prompt.confirm(&message) {
                info!(city, "registration declined by user");
                return Ok(SubmitOutcome::Declined);
            }
        }

        let country = resolve_country(geocoder, &self.codes, &form.location);

        let id = self.logs.next_id();
        let log = TravelLog {
            id,
            date: form.date,
            title: form.title,
            location: form.location,
            memo: form.memo,
            country,
            province_zh: enrichment.as_ref().map(|i| i.province_zh.clone()),
            province_en: enrichment.as_ref().map(|i| i.province_en.clone()),
            lat: enrichment.as_ref().map(|i| i.lat),
            lon: enrichment.as_ref().map(|i| i.lon),
        };

        self.logs.append(log);
        self.logs.persist(&mut self.storage)?;
        info!(id, "registered travel log");
        Ok(SubmitOutcome::Saved(id))
    }

    /// Applies edit-modal changes to an existing record.
    ///
    /// A changed location string re-derives the province/coordinate
    /// enrichment from the mapping; an unmapped new city rejects the whole
    /// edit (blocking alert, nothing saved). Untouched fields keep their
    /// stored values.
    pub fn edit(
        &mut self,
        id: i64,
        changes: LogChanges,
        prompt: &mut dyn UserPrompt,
    ) -> Result<EditOutcome> {
        let current = self
            .logs
            .get(id)
            .ok_or_else(|| TravelMapError::NotFound(format!("log id {id}")))?
            .clone();

        let mut updated = current.clone();
        if let Some(date) = changes.date {
            updated.date = date;
        }
        if let Some(title) = changes.title {
            updated.title = title;
        }
        if let Some(location) = changes.location {
            updated.location = location;
        }
        if let Some(memo) = changes.memo {
            updated.memo = memo;
        }

        if updated.location != current.location {
            let city = primary_city(&updated.location);
            match self.mapping.lookup(city) {
                Some(entry) => {
                    updated.province_zh = Some(entry.province_zh.clone());
                    updated.province_en = Some(entry.province_en.clone());
                    updated.lat = Some(entry.lat);
                    updated.lon = Some(entry.lon);
                }
                None => {
                    prompt.alert(&format!(
                        "{city} is not in the city mapping; the record was not changed."
                    ));
                    return Ok(EditOutcome::Rejected);
                }
            }
        }

        self.logs.update(updated)?;
        self.logs.persist(&mut self.storage)?;
        info!(id, "edited travel log");
        Ok(EditOutcome::Saved)
    }

    /// Deletes a record after confirmation.
    ///
    /// `pre_confirmed` skips the prompt (the edit-modal delete path, which
    /// ran its own confirm). Removes the record's exact-match geocode cache
    /// entry alongside the record. Returns whether anything was deleted.
    pub fn delete(
        &mut self,
        id: i64,
        prompt: &mut dyn UserPrompt,
        pre_confirmed: bool,
    ) -> Result<bool> {
        if self.logs.get(id).is_none() {
            return Err(TravelMapError::NotFound(format!("log id {id}")));
        }

        if !pre_confirmed && !prompt.confirm("Delete this record?") {
            return Ok(false);
        }

        if let Some(removed) = self.logs.remove(id) {
            self.cache.remove(&removed.location);
            self.cache.persist(&mut self.storage);
            self.logs.persist(&mut self.storage)?;
            info!(id, "deleted travel log");
        }
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::UserPrompt;

    /// Prompt with scripted confirm answers; records every message.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        pub confirm_answer: bool,
        pub confirms: Vec<String>,
        pub alerts: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn answering(confirm_answer: bool) -> Self {
            Self {
                confirm_answer,
                ..Self::default()
            }
        }
    }

    impl UserPrompt for ScriptedPrompt {
        fn confirm(&mut self, message: &str) -> bool {
            self.confirms.push(message.to_string());
            self.confirm_answer
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }
}
