//! Admin GraphQL documents used by the provisioning flows.

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Root field of the response, e.g. `companyCreate`.
    pub name: &'static str,
    pub document: &'static str,
}

pub const COMPANY_CREATE: Operation = Operation {
    name: "companyCreate",
    document: r#"
mutation CompanyCreate($input: CompanyCreateInput!) {
  companyCreate(input: $input) {
    company {
      id
      name
      externalId
      mainContact { id }
      locations(first: 5) {
        edges { node { id name } }
      }
    }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_ASSIGN_CUSTOMER_AS_CONTACT: Operation = Operation {
    name: "companyAssignCustomerAsContact",
    document: r#"
mutation AssignCustomerAsContact($companyId: ID!, $customerId: ID!) {
  companyAssignCustomerAsContact(companyId: $companyId, customerId: $customerId) {
    companyContact {
      id
      customer { id email }
    }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_ASSIGN_MAIN_CONTACT: Operation = Operation {
    name: "companyAssignMainContact",
    document: r#"
mutation AssignMainContact($companyId: ID!, $companyContactId: ID!) {
  companyAssignMainContact(companyId: $companyId, companyContactId: $companyContactId) {
    company {
      id
      mainContact { id }
    }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_LOCATION_CREATE: Operation = Operation {
    name: "companyLocationCreate",
    document: r#"
mutation CompanyLocationCreate($companyId: ID!, $input: CompanyLocationInput!) {
  companyLocationCreate(companyId: $companyId, input: $input) {
    companyLocation { id name }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_CONTACT_CREATE: Operation = Operation {
    name: "companyContactCreate",
    document: r#"
mutation CompanyContactCreate($companyId: ID!, $input: CompanyContactInput!) {
  companyContactCreate(companyId: $companyId, input: $input) {
    companyContact {
      id
      company { id }
      customer { id }
    }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_CONTACT_UPDATE: Operation = Operation {
    name: "companyContactUpdate",
    document: r#"
mutation CompanyContactUpdate($companyContactId: ID!, $input: CompanyContactInput!) {
  companyContactUpdate(companyContactId: $companyContactId, input: $input) {
    companyContact {
      id
      company { id }
      customer { id }
    }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_CONTACT_ASSIGN_ROLE: Operation = Operation {
    name: "companyContactAssignRole",
    document: r#"
mutation CompanyContactAssignRole($companyContactId: ID!, $companyContactRoleId: ID!, $companyLocationId: ID!) {
  companyContactAssignRole(
    companyContactId: $companyContactId
    companyContactRoleId: $companyContactRoleId
    companyLocationId: $companyLocationId
  ) {
    companyContactRoleAssignment {
      id
      role { id name }
    }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_CONTACT_REVOKE_ROLE: Operation = Operation {
    name: "companyContactRevokeRole",
    document: r#"
mutation CompanyContactRevokeRole($companyContactId: ID!, $companyContactRoleAssignmentId: ID!) {
  companyContactRevokeRole(
    companyContactId: $companyContactId
    companyContactRoleAssignmentId: $companyContactRoleAssignmentId
  ) {
    revokedCompanyContactRoleAssignmentId
    userErrors { field message code }
  }
}"#,
};

/// Roles defined for a company, in platform order.
pub const COMPANY_CONTACT_ROLES: Operation = Operation {
    name: "node",
    document: r#"
query CompanyContactRoles($companyId: ID!) {
  node(id: $companyId) {
    ... on Company {
      contactRoles(first: 50) {
        edges { node { id name } }
      }
    }
  }
}"#,
};

/// Companies a customer already acts for.
pub const CUSTOMER_COMPANY_PROFILES: Operation = Operation {
    name: "customer",
    document: r#"
query CustomerCompanyProfiles($customerId: ID!) {
  customer(id: $customerId) {
    id
    companyContactProfiles {
      id
      company { id name externalId createdAt }
    }
  }
}"#,
};

/// A company contact and the company it belongs to.
pub const COMPANY_CONTACT: Operation = Operation {
    name: "companyContact",
    document: r#"
query CompanyContactOwner($companyContactId: ID!) {
  companyContact(id: $companyContactId) {
    id
    company { id }
    customer { id }
  }
}"#,
};

/// Locations a customer holds a role on, across all its company
/// profiles. Aliased so it does not share a root with
/// [`CUSTOMER_COMPANY_PROFILES`].
pub const CUSTOMER_LOCATIONS: Operation = Operation {
    name: "customerLocations",
    document: r#"
query CustomerContactLocations($customerId: ID!, $first: Int!, $query: String) {
  customerLocations: customer(id: $customerId) {
    companyContactProfiles {
      id
      company { id name }
      roleAssignments(first: $first, query: $query) {
        nodes {
          id
          companyLocation {
            id
            name
            billingAddress { firstName lastName address1 address2 city zoneCode zip countryCode phone }
            shippingAddress { firstName lastName address1 address2 city zoneCode zip countryCode phone }
          }
        }
      }
    }
  }
}"#,
};

/// A location with one page of its role assignments.
pub const COMPANY_LOCATION_MEMBERS: Operation = Operation {
    name: "companyLocation",
    document: r#"
query LocationMembers($locationId: ID!, $first: Int!, $after: String) {
  companyLocation(id: $locationId) {
    id
    name
    company { id }
    roleAssignments(first: $first, after: $after) {
      edges {
        node {
          id
          role { id name }
          companyContact {
            id
            isMainContact
            title
            customer { id displayName }
          }
        }
      }
      pageInfo { endCursor hasNextPage hasPreviousPage startCursor }
    }
    billingAddress { firstName lastName address1 address2 city zoneCode zip countryCode phone }
    shippingAddress { firstName lastName address1 address2 city zoneCode zip countryCode phone }
  }
}"#,
};

/// Which company a location belongs to.
pub const COMPANY_LOCATION_OWNER: Operation = Operation {
    name: "locationOwner",
    document: r#"
query LocationOwner($locationId: ID!) {
  locationOwner: companyLocation(id: $locationId) {
    id
    company { id }
  }
}"#,
};

pub const COMPANY_LOCATION_UPDATE: Operation = Operation {
    name: "companyLocationUpdate",
    document: r#"
mutation CompanyLocationUpdate($companyLocationId: ID!, $input: CompanyLocationUpdateInput!) {
  companyLocationUpdate(companyLocationId: $companyLocationId, input: $input) {
    companyLocation { id name }
    userErrors { field message code }
  }
}"#,
};

pub const COMPANY_LOCATION_ASSIGN_ADDRESS: Operation = Operation {
    name: "companyLocationAssignAddress",
    document: r#"
mutation CompanyLocationAssignAddress($locationId: ID!, $addressTypes: [CompanyAddressType!]!, $address: CompanyAddressInput!) {
  companyLocationAssignAddress(locationId: $locationId, addressTypes: $addressTypes, address: $address) {
    addresses { id }
    userErrors { field message code }
  }
}"#,
};
