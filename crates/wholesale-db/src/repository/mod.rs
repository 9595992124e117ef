//! SurrealDB repository implementations.

mod company;
mod contact;
mod location;
mod member;
mod preset;
mod settings;
mod tenant_session;

pub use company::SurrealCompanyRepository;
pub use contact::SurrealContactRepository;
pub use location::SurrealLocationRepository;
pub use member::SurrealMemberRepository;
pub use preset::SurrealPresetRepository;
pub use settings::SurrealSettingsRepository;
pub use tenant_session::SurrealTenantSessionRepository;
