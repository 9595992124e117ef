//! Storefront reads: the caller's locations and a location's team.
//!
//! Both read the platform, which holds the truth. The team read also
//! repairs member rows whose role assignment drifted from it.

use serde::Serialize;
use tracing::{debug, info};
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::member::CreateCompanyMember;
use wholesale_core::repository::{LocationRepository, MemberRepository, MirrorStore};
use wholesale_platform::PlatformGateway;
use wholesale_platform::payload::{CustomerLocations, LocationMembers, PageInfo, PlatformAddress};

use super::caller_company;
use crate::remote::Remote;
use crate::saga::{Saga, SagaWarning, Step, StepError};
use crate::service::ProvisioningService;

const BROWSE_PAGE: u32 = 10;
const SEARCH_PAGE: u32 = 50;
const SEARCH_FALLBACK_PAGE: u32 = 250;
const DEFAULT_TEAM_PAGE: u32 = 5;
const MAX_TEAM_PAGE: u32 = 250;

#[derive(Debug, Clone, Serialize)]
pub struct CompanyRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub id: String,
    pub name: Option<String>,
    pub billing_address: Option<PlatformAddress>,
    pub shipping_address: Option<PlatformAddress>,
}

#[derive(Debug, Serialize)]
pub struct CompanyLocations {
    pub company: Option<CompanyRef>,
    pub locations: Vec<LocationSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub role_assignment_id: String,
    pub role_id: Option<String>,
    pub role_name: Option<String>,
    pub contact_id: Option<String>,
    pub is_main_contact: bool,
    pub title: Option<String>,
    pub customer_id: Option<String>,
    pub display_name: Option<String>,
    /// The member is the signed-in caller.
    pub is_you: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPage {
    pub location: Option<CompanyRef>,
    pub members: Vec<TeamMember>,
    pub page_info: Option<PageInfo>,
    pub billing_address: Option<PlatformAddress>,
    pub shipping_address: Option<PlatformAddress>,
    pub billing_same_as_shipping: bool,
    pub warnings: Vec<SagaWarning>,
}

/// Split a search box value into name tokens. Whitespace collapses and
/// anything outside `[A-Za-z0-9 _-]` is dropped.
pub(crate) fn search_tokens(q: Option<&str>) -> Vec<String> {
    let Some(q) = q else {
        return Vec::new();
    };
    let cleaned: String = q
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-') || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Platform search expression: `name:*tok1*tok2*`.
fn name_query(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(format!("name:*{}*", tokens.join("*")))
    }
}

/// True when every token occurs in `name`, case-insensitively, each after
/// the end of the previous one.
pub(crate) fn tokens_in_order(name: &str, tokens: &[String]) -> bool {
    let name = name.to_lowercase();
    let mut from = 0;
    for token in tokens {
        let token = token.to_lowercase();
        match name[from..].find(&token) {
            Some(at) => from += at + token.len(),
            None => return false,
        }
    }
    true
}

impl<G: PlatformGateway, M: MirrorStore> ProvisioningService<G, M> {
    /// Locations the caller holds a role on, optionally narrowed by a
    /// name search.
    ///
    /// The platform's name search is only a prefilter. When it finds
    /// nothing, a wider unfiltered page is fetched and matched locally.
    pub async fn list_company_locations(
        &self,
        shop: &str,
        caller_id: &str,
        q: Option<&str>,
    ) -> WholesaleResult<CompanyLocations> {
        let mut saga = Saga::new("list_company_locations", shop);
        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);

        let tokens = search_tokens(q);
        let first = if tokens.is_empty() { BROWSE_PAGE } else { SEARCH_PAGE };
        let query = name_query(&tokens);
        let found = saga.require(
            Step::FetchLocations,
            remote.customer_locations(caller_id, first, query.as_deref()).await,
        )?;
        if found.company_contact_profiles.is_empty() {
            return Err(WholesaleError::NotFound {
                entity: "company".into(),
                id: caller_id.to_string(),
            });
        }
        let company = found.first_company().map(|c| CompanyRef {
            id: c.id.clone(),
            name: c.name.clone(),
        });

        let matching = |locations: &CustomerLocations| {
            locations
                .locations()
                .into_iter()
                .filter(|l| tokens_in_order(l.name.as_deref().unwrap_or(""), &tokens))
                .map(|l| LocationSummary {
                    id: l.id.clone(),
                    name: l.name.clone(),
                    billing_address: l.billing_address.clone(),
                    shipping_address: l.shipping_address.clone(),
                })
                .collect::<Vec<_>>()
        };
        let mut locations = matching(&found);
        if !tokens.is_empty() && locations.is_empty() {
            debug!(shop, "Name search found nothing, widening");
            let wider = saga.require(
                Step::FetchLocations,
                remote
                    .customer_locations(caller_id, SEARCH_FALLBACK_PAGE, None)
                    .await,
            )?;
            locations = matching(&wider);
        }

        saga.finish();
        Ok(CompanyLocations { company, locations })
    }

    /// One page of a location's team, read from the platform.
    ///
    /// The location must belong to the caller's company. An unknown
    /// location yields an empty page. Mirrored member rows whose role
    /// assignment no longer matches the platform are rewritten.
    pub async fn location_members(
        &self,
        shop: &str,
        caller_id: &str,
        location_id: &str,
        first: Option<u32>,
        after: Option<&str>,
    ) -> WholesaleResult<TeamPage> {
        let mut saga = Saga::new("location_members", shop);
        if location_id.trim().is_empty() {
            return Err(WholesaleError::Validation {
                message: "Missing required query param: locationId".into(),
            });
        }
        let first = first.unwrap_or(DEFAULT_TEAM_PAGE).clamp(1, MAX_TEAM_PAGE);

        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);
        let (_, company_id) = caller_company(&mut saga, &remote, caller_id).await?;

        let found = saga.require(
            Step::FetchMembers,
            remote.location_members(location_id, first, after).await,
        )?;
        let Some(found) = found else {
            return Ok(TeamPage {
                location: None,
                members: Vec::new(),
                page_info: None,
                billing_address: None,
                shipping_address: None,
                billing_same_as_shipping: false,
                warnings: saga.finish(),
            });
        };
        if found.company.as_ref().map(|c| c.id.as_str()) != Some(company_id.as_str()) {
            return Err(WholesaleError::NotFound {
                entity: "company_location".into(),
                id: location_id.to_string(),
            });
        }

        let members: Vec<TeamMember> = found
            .role_assignments
            .edges
            .iter()
            .map(|edge| {
                let a = &edge.node;
                let contact = a.company_contact.as_ref();
                let customer = contact.and_then(|c| c.customer.as_ref());
                TeamMember {
                    role_assignment_id: a.id.clone(),
                    role_id: a.role.as_ref().map(|r| r.id.clone()),
                    role_name: a.role.as_ref().map(|r| r.name.clone()),
                    contact_id: contact.map(|c| c.id.clone()),
                    is_main_contact: contact.is_some_and(|c| c.is_main_contact),
                    title: contact.and_then(|c| c.title.clone()),
                    customer_id: customer.map(|c| c.id.clone()),
                    display_name: customer.and_then(|c| c.display_name.clone()),
                    is_you: customer.is_some_and(|c| c.id == caller_id),
                }
            })
            .collect();

        let mirrored_same = self.heal_members(&mut saga, shop, &found).await;
        let billing_same_as_shipping =
            mirrored_same.unwrap_or(found.billing_address == found.shipping_address);

        Ok(TeamPage {
            location: Some(CompanyRef {
                id: found.id,
                name: found.name,
            }),
            members,
            page_info: found.role_assignments.page_info,
            billing_address: found.billing_address,
            shipping_address: found.shipping_address,
            billing_same_as_shipping,
            warnings: saga.finish(),
        })
    }

    /// Rewrite mirrored members of `found` whose role drifted from the
    /// platform. Returns whether the mirrored location bills to its
    /// shipping address, when it is mirrored at all.
    async fn heal_members(
        &self,
        saga: &mut Saga,
        shop: &str,
        found: &LocationMembers,
    ) -> Option<bool> {
        let local = self.store.locations().find_by_remote_id(shop, &found.id).await;
        let location = saga.tolerate(Step::MirrorWrite, local.map_err(StepError::from))??;

        let mut healed = 0usize;
        for edge in &found.role_assignments.edges {
            let assignment = &edge.node;
            let (Some(contact), Some(role)) = (&assignment.company_contact, &assignment.role) else {
                continue;
            };
            let row = self.store.members().find_by_contact(shop, &contact.id).await;
            let Some(Some(member)) = saga.tolerate(Step::MirrorWrite, row.map_err(StepError::from))
            else {
                continue;
            };
            let current = member.location_id == location.id
                && member.role_assignment_id.as_deref() == Some(assignment.id.as_str())
                && member.role_id.as_deref() == Some(role.id.as_str());
            if current {
                continue;
            }
            let replacement = CreateCompanyMember {
                shop: shop.to_string(),
                location_id: location.id,
                contact_id: member.contact_id.clone(),
                role_id: Some(role.id.clone()),
                role_assignment_id: Some(assignment.id.clone()),
                first_name: member.first_name,
                last_name: member.last_name,
                title: contact.title.clone().or(member.title),
                email: member.email,
            };
            let replaced = self.store.members().replace(shop, member.id, replacement).await;
            if saga
                .tolerate(Step::MirrorWrite, replaced.map_err(StepError::from))
                .is_some()
            {
                healed += 1;
            }
        }
        if healed > 0 {
            info!(shop, location_id = %found.id, healed, "Member rows resynced from the platform");
        }
        Some(location.shipping == location.billing)
    }
}
