//! Caller input for the pipelines and the platform variables built from it.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::address::Address;
use wholesale_core::models::company::ApplicantContact;
use wholesale_core::models::preset::Preset;

pub const DEFAULT_LOCATION_NAME: &str = "Main Location";
const DEFAULT_CITY: &str = "City";

fn invalid(message: &str) -> WholesaleError {
    WholesaleError::Validation {
        message: message.to_string(),
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn require_email(email: &str) -> WholesaleResult<()> {
    if blank(email) || !email.contains('@') {
        return Err(invalid("A valid email is required"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Application (pipelines A and B)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInput {
    pub name: String,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInput {
    pub name: Option<String>,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub billing_same_as_shipping: bool,
}

impl LocationInput {
    /// Billing falls back to the shipping address when the caller said
    /// so or sent none.
    pub fn billing_is_shipping(&self) -> bool {
        self.billing_same_as_shipping || self.billing_address.is_none()
    }

    pub fn billing(&self) -> &Address {
        match &self.billing_address {
            Some(billing) if !self.billing_same_as_shipping => billing,
            _ => &self.shipping_address,
        }
    }
}

/// A storefront application for a wholesale account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationInput {
    pub company: CompanyInput,
    pub contact: ContactInput,
    pub location: LocationInput,
}

impl ApplicationInput {
    pub fn validate(&self, caller_id: &str) -> WholesaleResult<()> {
        if blank(caller_id) {
            return Err(invalid("Missing customer id"));
        }
        if blank(&self.company.name) {
            return Err(invalid("Company name is required"));
        }
        require_email(&self.contact.email)
    }

    pub fn applicant(&self) -> ApplicantContact {
        ApplicantContact {
            first_name: non_blank(self.contact.first_name.as_deref()).map(str::to_string),
            last_name: non_blank(self.contact.last_name.as_deref()).map(str::to_string),
            job_title: non_blank(self.contact.job_title.as_deref()).map(str::to_string),
        }
    }

    pub fn contact_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.contact.first_name, &self.contact.last_name]
            .into_iter()
            .filter_map(|p| non_blank(p.as_deref()))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Platform address input. Blank fields are sent as empty strings; the
/// platform requires a city, so a placeholder stands in for a blank one.
pub fn address_input(addr: &Address) -> Value {
    let field = |v: &Option<String>| non_blank(v.as_deref()).unwrap_or("").to_string();
    let city = non_blank(addr.city.as_deref()).unwrap_or(DEFAULT_CITY);
    json!({
        "firstName": field(&addr.first_name),
        "lastName": field(&addr.last_name),
        "address1": field(&addr.address1),
        "address2": field(&addr.address2),
        "city": city,
        "zoneCode": field(&addr.province),
        "zip": field(&addr.zip),
        "countryCode": field(&addr.country_code),
        "phone": field(&addr.phone),
    })
}

/// `companyCreate` input: the caller's company and address overlaid on
/// the preset's business rules.
pub fn company_create_input(
    company: &CompanyInput,
    location: &LocationInput,
    preset: &Preset,
) -> Value {
    let deposit = preset
        .deposit_percentage
        .map(|percentage| json!({ "percentage": percentage }))
        .unwrap_or(Value::Null);

    let mut company_location = json!({
        "name": non_blank(location.name.as_deref()).unwrap_or(DEFAULT_LOCATION_NAME),
        "buyerExperienceConfiguration": {
            "editableShippingAddress": preset.editable_shipping_address,
            "paymentTermsTemplateId": preset.payment_terms_template_id,
            "checkoutToDraft": !preset.submit_orders_as_draft,
            "deposit": deposit,
        },
        "taxExempt": preset.tax_exempt,
        "shippingAddress": address_input(&location.shipping_address),
    });
    if location.billing_is_shipping() {
        company_location["billingSameAsShipping"] = json!(true);
    } else {
        company_location["billingSameAsShipping"] = json!(false);
        company_location["billingAddress"] = address_input(location.billing());
    }

    let mut company_fields = json!({
        "name": company.name.trim(),
        "note": preset.note,
    });
    if let Some(external_id) = non_blank(company.external_id.as_deref()) {
        company_fields["externalId"] = json!(external_id);
    }

    json!({
        "company": company_fields,
        "companyLocation": company_location,
    })
}

// ---------------------------------------------------------------------------
// Add location (pipeline C)
// ---------------------------------------------------------------------------

/// A location added to an existing company from the storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLocationInput {
    pub name: String,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub billing_same_as_shipping: bool,
    pub is_shipping: Option<bool>,
    pub is_billing: Option<bool>,
}

impl NewLocationInput {
    pub fn validate(&self) -> WholesaleResult<()> {
        if blank(&self.name) {
            return Err(invalid("Location name is required"));
        }
        Ok(())
    }

    pub fn billing(&self) -> &Address {
        match &self.billing_address {
            Some(billing) if !self.billing_same_as_shipping => billing,
            _ => &self.shipping_address,
        }
    }

    /// `companyLocationCreate` input. Empty fields are dropped rather
    /// than sent blank.
    pub fn to_variables(&self) -> Value {
        let mut input = Map::new();
        input.insert("name".into(), json!(self.name.trim()));
        input.insert(
            "shippingAddress".into(),
            sparse_address(&self.shipping_address),
        );
        if self.billing_same_as_shipping || self.billing_address.is_none() {
            input.insert("billingSameAsShipping".into(), json!(true));
        } else {
            input.insert("billingSameAsShipping".into(), json!(false));
            input.insert("billingAddress".into(), sparse_address(self.billing()));
        }
        Value::Object(input)
    }
}

/// Rename and re-address an existing location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationUpdateInput {
    /// Platform location id.
    pub location_id: String,
    pub name: String,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub billing_same_as_shipping: bool,
}

impl LocationUpdateInput {
    pub fn validate(&self) -> WholesaleResult<()> {
        if blank(&self.location_id) {
            return Err(invalid("Missing locationId"));
        }
        if blank(&self.name) {
            return Err(invalid("Location name is required"));
        }
        Ok(())
    }

    pub fn billing_is_shipping(&self) -> bool {
        self.billing_same_as_shipping || self.billing_address.is_none()
    }

    pub fn billing(&self) -> &Address {
        match &self.billing_address {
            Some(billing) if !self.billing_same_as_shipping => billing,
            _ => &self.shipping_address,
        }
    }

    pub fn to_variables(&self) -> Value {
        json!({ "name": self.name.trim() })
    }

    pub fn shipping_variables(&self) -> Value {
        sparse_address(&self.shipping_address)
    }

    pub fn billing_variables(&self) -> Value {
        sparse_address(self.billing())
    }
}

fn sparse_address(addr: &Address) -> Value {
    let fields = [
        ("firstName", &addr.first_name),
        ("lastName", &addr.last_name),
        ("address1", &addr.address1),
        ("address2", &addr.address2),
        ("city", &addr.city),
        ("zoneCode", &addr.province),
        ("zip", &addr.zip),
        ("countryCode", &addr.country_code),
        ("phone", &addr.phone),
    ];
    let map: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(key, v)| non_blank(v.as_deref()).map(|s| (key.to_string(), json!(s))))
        .collect();
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// Team members (pipeline D)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InviteMemberInput {
    /// Platform company id.
    pub company_id: String,
    /// Platform location id the role is assigned on.
    pub location_id: Option<String>,
    pub contact: MemberContact,
    /// Permission label, such as `location-admin`.
    pub permission: Option<String>,
}

impl InviteMemberInput {
    pub fn validate(&self) -> WholesaleResult<()> {
        if blank(&self.company_id) {
            return Err(invalid("Missing companyId"));
        }
        if blank(&self.contact.first_name) || blank(&self.contact.last_name) {
            return Err(invalid("First and last name are required"));
        }
        require_email(&self.contact.email)
    }

    pub fn contact_variables(&self) -> Value {
        let c = &self.contact;
        let mut input = Map::new();
        input.insert("firstName".into(), json!(c.first_name.trim()));
        input.insert("lastName".into(), json!(c.last_name.trim()));
        input.insert("email".into(), json!(c.email.trim()));
        if let Some(phone) = non_blank(c.phone.as_deref()) {
            input.insert("phone".into(), json!(phone));
        }
        if let Some(title) = non_blank(c.title.as_deref()) {
            input.insert("title".into(), json!(title));
        }
        Value::Object(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditMemberInput {
    /// Platform company contact id.
    pub contact_id: String,
    /// Assignment currently held; revoked before the new role is given.
    pub role_assignment_id: Option<String>,
    pub permission: Option<String>,
    pub location_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
}

impl EditMemberInput {
    pub fn validate(&self) -> WholesaleResult<()> {
        if blank(&self.contact_id) {
            return Err(invalid("Missing contactId"));
        }
        Ok(())
    }

    pub fn contact_variables(&self) -> Value {
        let fields = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("title", &self.title),
        ];
        let map: Map<String, Value> = fields
            .into_iter()
            .filter_map(|(key, v)| non_blank(v.as_deref()).map(|s| (key.to_string(), json!(s))))
            .collect();
        Value::Object(map)
    }
}

/// A label that is absent or blank means "no role change requested".
pub fn permission_label(permission: Option<&str>) -> Option<&str> {
    non_blank(permission)
}
