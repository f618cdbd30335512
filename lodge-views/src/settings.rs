//! Settings page: guest-house profile and logo, room types, rooms and
//! operators. The general tab's toggles live on [`ThemeContext`].
//!
//! [`ThemeContext`]: lodge_core::shell::ThemeContext

use chrono::Utc;
use lodge_core::forms::{guest_house_payload, with_updated_at, CustomerForm, RoomForm, RoomTypeForm};
use lodge_core::repository::{fetch_all, fetch_first};
use lodge_core::tables::GUEST_HOUSES;
use lodge_core::{DataApi, Entity, ObjectStore, SelectQuery};
use lodge_shared::{Country, GuestHouse, RoomType};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::entity_list::{EntityList, LoadOutcome, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTab {
    Profile,
    RoomTypes,
    Rooms,
    Operators,
    General,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 5] = [
        SettingsTab::Profile,
        SettingsTab::RoomTypes,
        SettingsTab::Rooms,
        SettingsTab::Operators,
        SettingsTab::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsTab::Profile => "Guest House Profile",
            SettingsTab::RoomTypes => "Room Types",
            SettingsTab::Rooms => "Rooms",
            SettingsTab::Operators => "Operators",
            SettingsTab::General => "General",
        }
    }
}

/// The guest-house profile form. Read-only until [`edit`](Self::edit).
pub struct ProfileEditor {
    api: Arc<dyn DataApi>,
    objects: Arc<dyn ObjectStore>,
    logo_bucket: String,
    lifetime: CancellationToken,
    loaded: GuestHouse,
    draft: GuestHouse,
    editing: bool,
}

impl ProfileEditor {
    pub fn new(
        api: Arc<dyn DataApi>,
        objects: Arc<dyn ObjectStore>,
        logo_bucket: impl Into<String>,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            api,
            objects,
            logo_bucket: logo_bucket.into(),
            lifetime,
            loaded: GuestHouse::default(),
            draft: GuestHouse::default(),
            editing: false,
        }
    }

    /// Loads the first guest-house row. No row leaves a blank profile.
    pub async fn load(&mut self) -> LoadOutcome {
        let token = self.lifetime.clone();
        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            row = fetch_first::<GuestHouse>(self.api.as_ref(), SelectQuery::from(GUEST_HOUSES)) => Some(row),
        };

        match fetched {
            None => LoadOutcome::Cancelled,
            Some(Ok(row)) => {
                let found = usize::from(row.is_some());
                self.loaded = row.unwrap_or_default();
                self.draft = self.loaded.clone();
                LoadOutcome::Loaded(found)
            }
            Some(Err(e)) => {
                error!("Error fetching guest house: {}", e);
                LoadOutcome::Failed
            }
        }
    }

    pub fn profile(&self) -> &GuestHouse {
        &self.loaded
    }

    pub fn draft(&self) -> &GuestHouse {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edit(&mut self) {
        self.editing = true;
    }

    /// The draft, while in edit mode.
    pub fn draft_mut(&mut self) -> Option<&mut GuestHouse> {
        self.editing.then_some(&mut self.draft)
    }

    /// Leaves edit mode and throws the draft away.
    pub fn cancel(&mut self) {
        self.draft = self.loaded.clone();
        self.editing = false;
    }

    /// Writes the draft to the existing row, or creates the row when there is
    /// none yet, then reloads.
    pub async fn save(&mut self) -> SubmitOutcome {
        if !self.editing {
            return SubmitOutcome::NoEditor;
        }

        let payload = with_updated_at(guest_house_payload(&self.draft), Utc::now());
        let result = match self.loaded.id {
            Some(id) => self.api.update(GUEST_HOUSES, id, payload).await,
            None => self.api.insert(GUEST_HOUSES, payload).await,
        };

        if let Err(e) = result {
            error!("Error saving guest house: {}", e);
            return SubmitOutcome::Failed;
        }

        info!("Guest house profile saved");
        self.editing = false;
        self.load().await;
        SubmitOutcome::Saved
    }

    /// Uploads a logo, points `logo_url` at its public address and returns it.
    /// Needs a saved profile.
    pub async fn upload_logo(&mut self, file_name: &str, bytes: Vec<u8>, content_type: &str) -> Option<String> {
        let Some(gh_id) = self.loaded.id else {
            warn!("Save the guest house profile before uploading a logo");
            return None;
        };

        let path = format!("{}/{}-{}", gh_id, Utc::now().timestamp_millis(), file_name);
        if let Err(e) = self.objects.upload(&self.logo_bucket, &path, bytes, content_type).await {
            error!("Error uploading logo: {}", e);
            return None;
        }

        let url = self.objects.public_url(&self.logo_bucket, &path);
        let patch = with_updated_at(json!({ "logo_url": url }), Utc::now());
        if let Err(e) = self.api.update(GUEST_HOUSES, gh_id, patch).await {
            error!("Error saving logo url: {}", e);
            return None;
        }

        info!(path = %path, "Logo uploaded");
        self.loaded.logo_url = Some(url.clone());
        self.draft.logo_url = Some(url.clone());
        Some(url)
    }
}

pub struct SettingsView {
    api: Arc<dyn DataApi>,
    lifetime: CancellationToken,
    pub tab: SettingsTab,
    pub profile: ProfileEditor,
    pub room_types: EntityList<RoomTypeForm>,
    pub rooms: EntityList<RoomForm>,
    pub operators: EntityList<CustomerForm>,
    countries: Vec<Country>,
}

impl SettingsView {
    pub fn new(
        api: Arc<dyn DataApi>,
        objects: Arc<dyn ObjectStore>,
        logo_bucket: impl Into<String>,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            profile: ProfileEditor::new(api.clone(), objects, logo_bucket, lifetime.clone()),
            room_types: EntityList::with_lifetime(api.clone(), "room type", lifetime.clone()),
            rooms: EntityList::with_lifetime(api.clone(), "room", lifetime.clone()),
            operators: EntityList::with_lifetime(api.clone(), "operator", lifetime.clone()),
            api,
            lifetime,
            tab: SettingsTab::Profile,
            countries: Vec::new(),
        }
    }

    /// Loads every tab at once.
    pub async fn load(&mut self) {
        let api = self.api.clone();
        let countries_query = Country::list_query();
        let (_, _, _, _, countries) = tokio::join!(
            self.profile.load(),
            self.room_types.load(),
            self.rooms.load(),
            self.operators.load(),
            fetch_all::<Country>(api.as_ref(), &countries_query),
        );

        if self.lifetime.is_cancelled() {
            return;
        }
        match countries {
            Ok(countries) => self.countries = countries,
            Err(e) => error!("Error fetching countries: {}", e),
        }
    }

    /// Countries offered by the operator editor.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Room types offered by the room editor.
    pub fn room_type_choices(&self) -> &[RoomType] {
        self.room_types.items()
    }

    /// Opens a blank room-type editor owned by the loaded guest house.
    pub fn new_room_type(&mut self) {
        let form = RoomTypeForm { gh_id: self.profile.profile().id, ..Default::default() };
        self.room_types.open_editor_with(form);
    }

    pub fn unmount(&self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodge_store::{Call, MemoryBackend};
    use serde_json::Value;

    fn view(backend: &Arc<MemoryBackend>) -> SettingsView {
        SettingsView::new(backend.clone(), backend.clone(), "logos", CancellationToken::new())
    }

    #[tokio::test]
    async fn test_profile_cancel_restores_loaded_values() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed("guest_houses", json!({ "gh_name": "Palm Lodge", "email": "desk@palm.test" }));
        let mut settings = view(&backend);
        settings.load().await;

        assert!(settings.profile.draft_mut().is_none());
        settings.profile.edit();
        settings.profile.draft_mut().unwrap().gh_name = "Changed".into();
        settings.profile.cancel();

        assert_eq!(settings.profile.draft().gh_name, "Palm Lodge");
        assert!(!settings.profile.is_editing());
    }

    #[tokio::test]
    async fn test_profile_save_updates_existing_row() {
        let backend = Arc::new(MemoryBackend::new());
        let id = backend.seed("guest_houses", json!({ "gh_name": "Palm Lodge" }));
        let mut settings = view(&backend);
        settings.profile.load().await;
        backend.clear_calls();

        settings.profile.edit();
        settings.profile.draft_mut().unwrap().tin_no = "TIN-42".into();
        assert_eq!(settings.profile.save().await, SubmitOutcome::Saved);

        assert_eq!(backend.calls()[0], Call::Update("guest_houses".into(), id));
        assert_eq!(settings.profile.profile().tin_no, "TIN-42");
        let row = &backend.rows("guest_houses")[0];
        assert!(row["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_profile_save_inserts_when_missing() {
        let backend = Arc::new(MemoryBackend::new());
        let mut settings = view(&backend);
        assert_eq!(settings.profile.load().await, LoadOutcome::Loaded(0));

        settings.profile.edit();
        settings.profile.draft_mut().unwrap().gh_name = "New Lodge".into();
        assert_eq!(settings.profile.save().await, SubmitOutcome::Saved);

        assert_eq!(backend.rows("guest_houses").len(), 1);
        assert!(settings.profile.profile().id.is_some());
    }

    #[tokio::test]
    async fn test_logo_upload_sets_public_url() {
        let backend = Arc::new(MemoryBackend::new());
        let id = backend.seed("guest_houses", json!({ "gh_name": "Palm Lodge" }));
        let mut settings = view(&backend);
        settings.profile.load().await;

        let url = settings
            .profile
            .upload_logo("logo.png", vec![0x89, 0x50], "image/png")
            .await
            .unwrap();

        let uploaded = backend.calls().into_iter().find_map(|call| match call {
            Call::Upload(bucket, path) => Some((bucket, path)),
            _ => None,
        });
        let (bucket, path) = uploaded.unwrap();
        assert_eq!(bucket, "logos");
        assert!(path.starts_with(&format!("{}/", id)));
        assert!(path.ends_with("-logo.png"));
        assert_eq!(backend.object("logos", &path), Some(vec![0x89, 0x50]));

        assert!(url.ends_with(&path));
        assert_eq!(backend.rows("guest_houses")[0]["logo_url"], Value::String(url.clone()));
        assert_eq!(settings.profile.profile().logo_url.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn test_logo_upload_failure_is_swallowed() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed("guest_houses", json!({ "gh_name": "Palm Lodge" }));
        backend.fail_table("logos");
        let mut settings = view(&backend);
        settings.profile.load().await;

        assert_eq!(settings.profile.upload_logo("logo.png", vec![1], "image/png").await, None);
        assert_eq!(settings.profile.profile().logo_url, None);
    }

    #[tokio::test]
    async fn test_new_room_type_carries_guest_house() {
        let backend = Arc::new(MemoryBackend::new());
        let gh = backend.seed("guest_houses", json!({ "gh_name": "Palm Lodge" }));
        let mut settings = view(&backend);
        settings.load().await;

        settings.new_room_type();
        let form = settings.room_types.form_mut().unwrap();
        assert_eq!(form.gh_id, Some(gh));
        form.name = "Family".into();
        form.total_rooms = 3;
        assert_eq!(settings.room_types.submit().await, SubmitOutcome::Saved);

        let types = settings.room_type_choices();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].gh_id, Some(gh));
    }

    #[tokio::test]
    async fn test_operators_tab_lists_with_country() {
        let backend = Arc::new(MemoryBackend::new());
        let lk = backend.seed("countries", json!({ "country_name": "Sri Lanka" }));
        backend.seed("customers", json!({
            "name": "Blue Sky Tours", "customer_type": "Foreign", "country_id": lk.to_string()
        }));
        let mut settings = view(&backend);
        settings.load().await;

        assert_eq!(settings.countries().len(), 1);
        settings.operators.set_search("lanka");
        let hits = settings.operators.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].country_name(), Some("Sri Lanka"));
    }
}
