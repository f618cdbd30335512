use clap::{Args, Subcommand};
use lodge_core::forms::{CustomerForm, RoomForm, RoomTypeForm};
use lodge_core::routing::Route;
use lodge_shared::GuestHouse;
use lodge_views::{Confirm, LoadOutcome, SettingsView, SubmitOutcome};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// Show the guest-house profile, or change it when fields are given
    Profile(ProfileArgs),
    /// Upload a logo image and link it to the profile
    Logo {
        file: PathBuf,
        /// Defaults to a guess from the file extension
        #[arg(long)]
        content_type: Option<String>,
    },
    #[command(subcommand)]
    RoomTypes(RoomTypesSubcommand),
    #[command(subcommand)]
    Rooms(RoomsSubcommand),
    #[command(subcommand)]
    Operators(OperatorsSubcommand),
    /// Theme and notification preferences
    General {
        #[arg(long)]
        toggle_theme: bool,
        #[arg(long)]
        toggle_notifications: bool,
    },
}

#[derive(Debug, Args)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    contact_number: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    tin_no: Option<String>,
    #[arg(long)]
    permit_no: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    company_reg_no: Option<String>,
}

impl ProfileArgs {
    fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.contact_number,
            &self.email,
            &self.website,
            &self.address,
            &self.tin_no,
            &self.permit_no,
            &self.company_name,
            &self.company_reg_no,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    fn apply(self, gh: &mut GuestHouse) {
        let fields = [
            (self.name, &mut gh.gh_name),
            (self.contact_number, &mut gh.contact_number),
            (self.email, &mut gh.email),
            (self.website, &mut gh.website),
            (self.address, &mut gh.address),
            (self.tin_no, &mut gh.tin_no),
            (self.permit_no, &mut gh.permit_no),
            (self.company_name, &mut gh.company_name),
            (self.company_reg_no, &mut gh.company_reg_no),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Subcommand)]
enum RoomTypesSubcommand {
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        total_rooms: u32,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        total_rooms: Option<u32>,
    },
    Delete { id: Uuid },
}

#[derive(Debug, Subcommand)]
enum RoomsSubcommand {
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        room_no: String,
        #[arg(long)]
        room_type: Uuid,
        #[arg(long)]
        size: Option<String>,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        room_no: Option<String>,
        #[arg(long)]
        room_type: Option<Uuid>,
        #[arg(long)]
        size: Option<String>,
    },
    Delete { id: Uuid },
}

#[derive(Debug, Subcommand)]
enum OperatorsSubcommand {
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    Create(OperatorArgs),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: OperatorArgs,
    },
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
struct OperatorArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type")]
    customer_type: Option<String>,
    #[arg(long)]
    contact_person: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    country: Option<Uuid>,
    #[arg(long)]
    active: Option<bool>,
}

impl OperatorArgs {
    fn apply(self, form: &mut CustomerForm) {
        let text = [
            (self.name, &mut form.name),
            (self.customer_type, &mut form.customer_type),
            (self.contact_person, &mut form.contact_person),
            (self.email, &mut form.email),
            (self.phone, &mut form.phone),
        ];
        for (value, slot) in text {
            if let Some(value) = value {
                *slot = value;
            }
        }
        form.country_id = self.country.or(form.country_id);
        form.is_active = self.active.unwrap_or(form.is_active);
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub async fn run(
    command: SettingsCommand,
    state: &mut AppState,
    confirm: &dyn Confirm,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    state.require(Route::Settings)?;

    if let SettingsSubcommand::General { toggle_theme, toggle_notifications } = command.command {
        let mut theme = state.theme();
        if toggle_theme {
            theme.toggle_theme();
        }
        if toggle_notifications {
            theme.toggle_notifications();
        }
        let prefs = theme.preferences();
        writeln!(out, "Theme: {}", prefs.theme)?;
        writeln!(out, "Notifications: {}", if prefs.notifications { "on" } else { "off" })?;
        return Ok(());
    }

    let mut view = SettingsView::new(
        state.api.clone(),
        state.objects.clone(),
        state.config.storage.logo_bucket.clone(),
        state.view_lifetime(),
    );

    match command.command {
        SettingsSubcommand::Profile(args) => {
            if view.profile.load().await == LoadOutcome::Failed {
                return Err(AppError::Backend("Could not load guest house profile".into()));
            }
            if !args.is_empty() {
                view.profile.edit();
                if let Some(draft) = view.profile.draft_mut() {
                    args.apply(draft);
                }
                match view.profile.save().await {
                    SubmitOutcome::Saved => {}
                    _ => return Err(AppError::Backend("Could not save guest house profile".into())),
                }
            }
            writeln!(out, "{}", render::profile(view.profile.profile()))?;
        }
        SettingsSubcommand::Logo { file, content_type } => {
            view.profile.load().await;
            let bytes = std::fs::read(&file)?;
            let content_type = content_type.unwrap_or_else(|| guess_content_type(&file).to_string());
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("logo")
                .to_string();
            match view.profile.upload_logo(&file_name, bytes, &content_type).await {
                Some(url) => writeln!(out, "Logo uploaded: {}", url)?,
                None => return Err(AppError::Backend("Could not upload logo".into())),
            }
        }
        SettingsSubcommand::RoomTypes(command) => match command {
            RoomTypesSubcommand::List { search } => {
                super::load(&mut view.room_types, "room types").await?;
                view.room_types.set_search(search.unwrap_or_default());
                writeln!(out, "{}", render::room_types(&view.room_types.filtered()))?;
            }
            RoomTypesSubcommand::Create { name, total_rooms } => {
                view.profile.load().await;
                view.new_room_type();
                let fill = |form: &mut RoomTypeForm| {
                    form.name = name;
                    form.total_rooms = total_rooms;
                };
                super::create(&mut view.room_types, "room type", fill, out).await?;
            }
            RoomTypesSubcommand::Update { id, name, total_rooms } => {
                let fill = |form: &mut RoomTypeForm| {
                    if let Some(name) = name {
                        form.name = name;
                    }
                    form.total_rooms = total_rooms.unwrap_or(form.total_rooms);
                };
                super::update(&mut view.room_types, "room type", id, fill, out).await?;
            }
            RoomTypesSubcommand::Delete { id } => {
                super::delete(&mut view.room_types, "room type", id, confirm, out).await?;
            }
        },
        SettingsSubcommand::Rooms(command) => match command {
            RoomsSubcommand::List { search } => {
                super::load(&mut view.rooms, "rooms").await?;
                view.rooms.set_search(search.unwrap_or_default());
                writeln!(out, "{}", render::rooms(&view.rooms.filtered()))?;
            }
            RoomsSubcommand::Create { room_no, room_type, size } => {
                let fill = |form: &mut RoomForm| {
                    form.room_no = room_no;
                    form.room_type_id = Some(room_type);
                    form.size = size.unwrap_or_default();
                };
                super::create(&mut view.rooms, "room", fill, out).await?;
            }
            RoomsSubcommand::Update { id, room_no, room_type, size } => {
                let fill = |form: &mut RoomForm| {
                    if let Some(room_no) = room_no {
                        form.room_no = room_no;
                    }
                    form.room_type_id = room_type.or(form.room_type_id);
                    if let Some(size) = size {
                        form.size = size;
                    }
                };
                super::update(&mut view.rooms, "room", id, fill, out).await?;
            }
            RoomsSubcommand::Delete { id } => {
                super::delete(&mut view.rooms, "room", id, confirm, out).await?;
            }
        },
        SettingsSubcommand::Operators(command) => match command {
            OperatorsSubcommand::List { search } => {
                super::load(&mut view.operators, "operators").await?;
                view.operators.set_search(search.unwrap_or_default());
                writeln!(out, "{}", render::operators(&view.operators.filtered()))?;
            }
            OperatorsSubcommand::Create(fields) => {
                super::create(&mut view.operators, "operator", |form| fields.apply(form), out).await?;
            }
            OperatorsSubcommand::Update { id, fields } => {
                super::update(&mut view.operators, "operator", id, |form| fields.apply(form), out)
                    .await?;
            }
            OperatorsSubcommand::Delete { id } => {
                super::delete(&mut view.operators, "operator", id, confirm, out).await?;
            }
        },
        SettingsSubcommand::General { .. } => {}
    }
    Ok(())
}
