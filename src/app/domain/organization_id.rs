/// Organization ID domain type. Wraps ULID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrganizationId(ulid::Ulid);

impl OrganizationId {
    /// Generate a new random ULID.
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get as string for storage/display.
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    /// Parse from string.
    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An organization identifier as it arrives in a route parameter.
///
/// Clients may address an organization by its primary key (a ULID) or by
/// its human-readable workspace slug (e.g. `acme-org-7fk2p`). Every slug
/// carries the `-org` marker [`workspace_slug`] stamps in, so that marker
/// is the structural test for the slug form; a hyphenated value without it
/// is malformed, not a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationRef {
    Id(OrganizationId),
    Slug(String),
}

/// Substring every generated workspace slug contains.
const SLUG_MARKER: &str = "-org";

impl OrganizationRef {
    /// Classify a raw route parameter. Returns `None` when the value is
    /// neither a parseable ULID nor a plausible slug.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw.contains(SLUG_MARKER) {
            return Some(OrganizationRef::Slug(raw.to_string()));
        }
        OrganizationId::from_string(raw).ok().map(OrganizationRef::Id)
    }
}

/// Build a workspace slug from an organization name: lowercased, spaces
/// collapsed to hyphens, truncated, suffixed with `-org-` and a short random
/// discriminator so two workspaces with the same name do not collide.
pub fn workspace_slug(name: &str) -> String {
    let mut base: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    base.truncate(10);
    let base = base.trim_matches('-');
    let discriminator = ulid::Ulid::new().to_string().to_lowercase();
    format!("{}-org-{}", base, &discriminator[discriminator.len() - 5..])
}
