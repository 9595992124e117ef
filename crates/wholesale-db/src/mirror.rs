//! All mirror repositories over one SurrealDB handle.

use surrealdb::{Connection, Surreal};
use wholesale_core::repository::MirrorStore;

use crate::repository::{
    SurrealCompanyRepository, SurrealContactRepository, SurrealLocationRepository,
    SurrealMemberRepository, SurrealPresetRepository, SurrealSettingsRepository,
    SurrealTenantSessionRepository,
};

/// [`MirrorStore`] backed by SurrealDB.
#[derive(Clone)]
pub struct SurrealMirror<C: Connection> {
    sessions: SurrealTenantSessionRepository<C>,
    settings: SurrealSettingsRepository<C>,
    presets: SurrealPresetRepository<C>,
    companies: SurrealCompanyRepository<C>,
    contacts: SurrealContactRepository<C>,
    locations: SurrealLocationRepository<C>,
    members: SurrealMemberRepository<C>,
}

impl<C: Connection> SurrealMirror<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            sessions: SurrealTenantSessionRepository::new(db.clone()),
            settings: SurrealSettingsRepository::new(db.clone()),
            presets: SurrealPresetRepository::new(db.clone()),
            companies: SurrealCompanyRepository::new(db.clone()),
            contacts: SurrealContactRepository::new(db.clone()),
            locations: SurrealLocationRepository::new(db.clone()),
            members: SurrealMemberRepository::new(db),
        }
    }
}

impl<C: Connection> MirrorStore for SurrealMirror<C> {
    type Sessions = SurrealTenantSessionRepository<C>;
    type Settings = SurrealSettingsRepository<C>;
    type Presets = SurrealPresetRepository<C>;
    type Companies = SurrealCompanyRepository<C>;
    type Contacts = SurrealContactRepository<C>;
    type Locations = SurrealLocationRepository<C>;
    type Members = SurrealMemberRepository<C>;

    fn sessions(&self) -> &Self::Sessions {
        &self.sessions
    }

    fn settings(&self) -> &Self::Settings {
        &self.settings
    }

    fn presets(&self) -> &Self::Presets {
        &self.presets
    }

    fn companies(&self) -> &Self::Companies {
        &self.companies
    }

    fn contacts(&self) -> &Self::Contacts {
        &self.contacts
    }

    fn locations(&self) -> &Self::Locations {
        &self.locations
    }

    fn members(&self) -> &Self::Members {
        &self.members
    }
}
