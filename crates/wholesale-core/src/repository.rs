//! Repository trait definitions for the local mirror.
//!
//! All repository operations are async. Every query is scoped to a shop
//! so one tenant can never read another tenant's rows.

use uuid::Uuid;

use crate::error::WholesaleResult;
use crate::models::{
    company::{Company, CreateCompany},
    contact::{CompanyContact, CreateCompanyContact},
    location::{CreateLocation, Location, UpdateLocation},
    member::{CompanyMember, CreateCompanyMember},
    preset::{CreatePreset, Preset},
    settings::TenantSettings,
    tenant_session::{CreateTenantSession, TenantSession},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Installation (global scope, keyed by shop domain)
// ---------------------------------------------------------------------------

pub trait TenantSessionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateTenantSession,
    ) -> impl Future<Output = WholesaleResult<TenantSession>> + Send;
    fn find_by_shop(
        &self,
        shop: &str,
    ) -> impl Future<Output = WholesaleResult<Option<TenantSession>>> + Send;
    /// Replace the stored platform credential after a token rotation.
    fn rotate_access_token(
        &self,
        shop: &str,
        access_token: String,
    ) -> impl Future<Output = WholesaleResult<TenantSession>> + Send;
}

pub trait SettingsRepository: Send + Sync {
    fn get(&self, shop: &str)
    -> impl Future<Output = WholesaleResult<Option<TenantSettings>>> + Send;
    fn upsert(
        &self,
        settings: TenantSettings,
    ) -> impl Future<Output = WholesaleResult<TenantSettings>> + Send;
}

pub trait PresetRepository: Send + Sync {
    fn create(&self, input: CreatePreset) -> impl Future<Output = WholesaleResult<Preset>> + Send;
    /// The shop's default preset; the oldest one wins if several are
    /// flagged as default.
    fn find_default(
        &self,
        shop: &str,
    ) -> impl Future<Output = WholesaleResult<Option<Preset>>> + Send;
}

// ---------------------------------------------------------------------------
// Mirror entities (shop scope)
// ---------------------------------------------------------------------------

pub trait CompanyRepository: Send + Sync {
    /// Insert a company row. A second row with the same (shop, email)
    /// fails with `AlreadyExists`.
    fn create(&self, input: CreateCompany)
    -> impl Future<Output = WholesaleResult<Company>> + Send;
    fn get_by_id(
        &self,
        shop: &str,
        id: Uuid,
    ) -> impl Future<Output = WholesaleResult<Company>> + Send;
    fn find_by_contact(
        &self,
        shop: &str,
        contact_id: Uuid,
    ) -> impl Future<Output = WholesaleResult<Option<Company>>> + Send;
    fn find_by_email(
        &self,
        shop: &str,
        email: &str,
    ) -> impl Future<Output = WholesaleResult<Option<Company>>> + Send;
    fn find_by_remote_id(
        &self,
        shop: &str,
        remote_company_id: &str,
    ) -> impl Future<Output = WholesaleResult<Option<Company>>> + Send;
    /// Move a pending company to `approved`, stamping the platform
    /// company id. Fails with `InvalidTransition` unless the row is
    /// still pending and has no platform id yet.
    fn mark_approved(
        &self,
        shop: &str,
        id: Uuid,
        remote_company_id: &str,
    ) -> impl Future<Output = WholesaleResult<Company>> + Send;
    fn delete(&self, shop: &str, id: Uuid) -> impl Future<Output = WholesaleResult<()>> + Send;
    /// Newest first.
    fn list(
        &self,
        shop: &str,
        pagination: Pagination,
    ) -> impl Future<Output = WholesaleResult<PaginatedResult<Company>>> + Send;
}

pub trait ContactRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCompanyContact,
    ) -> impl Future<Output = WholesaleResult<CompanyContact>> + Send;
    fn get_by_id(
        &self,
        shop: &str,
        id: Uuid,
    ) -> impl Future<Output = WholesaleResult<CompanyContact>> + Send;
    fn find_by_customer(
        &self,
        shop: &str,
        remote_customer_id: &str,
    ) -> impl Future<Output = WholesaleResult<Option<CompanyContact>>> + Send;
    /// Record the platform company contact id (if one was obtained) and
    /// mark the contact approved.
    fn link_remote(
        &self,
        shop: &str,
        id: Uuid,
        remote_contact_id: Option<String>,
    ) -> impl Future<Output = WholesaleResult<CompanyContact>> + Send;
}

pub trait LocationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateLocation,
    ) -> impl Future<Output = WholesaleResult<Location>> + Send;
    fn find_by_remote_id(
        &self,
        shop: &str,
        remote_location_id: &str,
    ) -> impl Future<Output = WholesaleResult<Option<Location>>> + Send;
    fn list_by_company(
        &self,
        shop: &str,
        company_id: Uuid,
    ) -> impl Future<Output = WholesaleResult<Vec<Location>>> + Send;
    /// Fails with `NotFound` when no row mirrors `remote_location_id`.
    fn update(
        &self,
        shop: &str,
        remote_location_id: &str,
        input: UpdateLocation,
    ) -> impl Future<Output = WholesaleResult<Location>> + Send;
}

pub trait MemberRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCompanyMember,
    ) -> impl Future<Output = WholesaleResult<CompanyMember>> + Send;
    fn find_by_contact(
        &self,
        shop: &str,
        contact_id: &str,
    ) -> impl Future<Output = WholesaleResult<Option<CompanyMember>>> + Send;
    /// Destroy the row `id` and create its replacement in one
    /// transaction. Used whenever the member's role changes.
    fn replace(
        &self,
        shop: &str,
        id: Uuid,
        input: CreateCompanyMember,
    ) -> impl Future<Output = WholesaleResult<CompanyMember>> + Send;
    fn list_by_location(
        &self,
        shop: &str,
        location_id: Uuid,
    ) -> impl Future<Output = WholesaleResult<Vec<CompanyMember>>> + Send;
}

/// The whole local mirror behind one handle, so services take a single
/// injected store instead of one generic parameter per table.
pub trait MirrorStore: Send + Sync {
    type Sessions: TenantSessionRepository;
    type Settings: SettingsRepository;
    type Presets: PresetRepository;
    type Companies: CompanyRepository;
    type Contacts: ContactRepository;
    type Locations: LocationRepository;
    type Members: MemberRepository;

    fn sessions(&self) -> &Self::Sessions;
    fn settings(&self) -> &Self::Settings;
    fn presets(&self) -> &Self::Presets;
    fn companies(&self) -> &Self::Companies;
    fn contacts(&self) -> &Self::Contacts;
    fn locations(&self) -> &Self::Locations;
    fn members(&self) -> &Self::Members;
}
