//! The list + editor controller shared by every table-backed view.

use chrono::Utc;
use lodge_core::forms::{with_updated_at, CountryForm, EntityForm};
use lodge_core::repository::fetch_all;
use lodge_core::search::{self, Searchable};
use lodge_core::{DataApi, Entity, ValidationError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::confirm::Confirm;

pub type CountriesView = EntityList<CountryForm>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Logged; the previous list is kept.
    Failed,
    /// The view was unmounted first; nothing was touched.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Nothing was sent.
    Invalid(ValidationError),
    /// Logged; the editor stays open.
    Failed,
    NoEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Failed,
}

/// An open editor: the form and, when editing, the id of the row it came from.
#[derive(Debug, Clone)]
pub struct Editor<F> {
    pub form: F,
    pub editing: Option<Uuid>,
}

/// Holds one table's rows, the search term and at most one open editor.
///
/// Every mutation goes straight to the backend and then re-fetches the full
/// list, except delete, which drops the row locally.
pub struct EntityList<F: EntityForm> {
    api: Arc<dyn DataApi>,
    lifetime: CancellationToken,
    noun: &'static str,
    items: Vec<F::Entity>,
    search: String,
    editor: Option<Editor<F>>,
}

impl<F: EntityForm> EntityList<F> {
    pub fn new(api: Arc<dyn DataApi>, noun: &'static str) -> Self {
        Self::with_lifetime(api, noun, CancellationToken::new())
    }

    /// Ties loads to `lifetime`; cancelling it unmounts the view.
    pub fn with_lifetime(api: Arc<dyn DataApi>, noun: &'static str, lifetime: CancellationToken) -> Self {
        Self {
            api,
            lifetime,
            noun,
            items: Vec::new(),
            search: String::new(),
            editor: None,
        }
    }

    pub fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    pub fn unmount(&self) {
        self.lifetime.cancel();
    }

    pub fn items(&self) -> &[F::Entity] {
        &self.items
    }

    pub fn get(&self, id: Uuid) -> Option<&F::Entity> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub async fn load(&mut self) -> LoadOutcome {
        let token = self.lifetime.clone();
        let query = F::Entity::list_query();
        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            rows = fetch_all::<F::Entity>(self.api.as_ref(), &query) => Some(rows),
        };

        match fetched {
            None => LoadOutcome::Cancelled,
            Some(Ok(items)) => {
                self.items = items;
                LoadOutcome::Loaded(self.items.len())
            }
            Some(Err(e)) => {
                error!("Error fetching {}: {}", F::Entity::TABLE, e);
                LoadOutcome::Failed
            }
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn editor(&self) -> Option<&Editor<F>> {
        self.editor.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        self.editor.as_mut().map(|editor| &mut editor.form)
    }

    /// Opens a blank editor, or one prefilled from `existing`.
    pub fn open_editor(&mut self, existing: Option<&F::Entity>) {
        self.editor = Some(match existing {
            Some(entity) => Editor { form: F::from_entity(entity), editing: Some(entity.id()) },
            None => Editor { form: F::default(), editing: None },
        });
    }

    /// Opens a create editor with some fields already filled.
    pub fn open_editor_with(&mut self, form: F) {
        self.editor = Some(Editor { form, editing: None });
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(editor) = &self.editor else {
            return SubmitOutcome::NoEditor;
        };
        if let Err(e) = editor.form.validate() {
            warn!("Not saving {}: {}", self.noun, e);
            return SubmitOutcome::Invalid(e);
        }

        let payload = editor.form.payload();
        let result = match editor.editing {
            Some(id) => {
                self.api
                    .update(F::Entity::TABLE, id, with_updated_at(payload, Utc::now()))
                    .await
            }
            None => self.api.insert(F::Entity::TABLE, payload).await,
        };

        if let Err(e) = result {
            error!("Error saving {}: {}", self.noun, e);
            return SubmitOutcome::Failed;
        }

        info!("Saved {}", self.noun);
        self.load().await;
        self.editor = None;
        SubmitOutcome::Saved
    }

    /// Asks `confirm` first. A confirmed delete removes the row locally
    /// without re-fetching.
    pub async fn delete(&mut self, id: Uuid, confirm: &dyn Confirm) -> DeleteOutcome {
        let prompt = format!("Are you sure you want to delete this {}?", self.noun);
        if !confirm.confirm(&prompt) {
            return DeleteOutcome::Declined;
        }

        if let Err(e) = self.api.delete(F::Entity::TABLE, id).await {
            error!("Error deleting {}: {}", self.noun, e);
            return DeleteOutcome::Failed;
        }

        self.items.retain(|item| item.id() != id);
        info!("Deleted {} {}", self.noun, id);
        DeleteOutcome::Deleted
    }
}

impl<F> EntityList<F>
where
    F: EntityForm,
    F::Entity: Searchable,
{
    /// Rows matching the current search term, in list order.
    pub fn filtered(&self) -> Vec<&F::Entity> {
        search::filter(&self.items, &self.search)
    }
}
