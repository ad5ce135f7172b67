//! The claim set carried inside a security token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{invalid_token, Error, InvalidTokenReason};

/// Decoded, trusted representation of a gadget security token.
///
/// `issued_at` is stamped once when the claims are first encoded and cannot be changed
/// afterwards. A `ClaimSet` obtained from decoding keeps its original issue time when
/// re-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSet {
    /// Identifier of the resource/data owner.
    pub owner_id: String,
    /// Identifier of the currently acting user.
    pub viewer_id: String,
    /// Identifier of the calling application.
    pub app_id: String,
    /// Canonical URL of the application.
    pub app_url: String,
    /// Application instance identifier.
    pub module_id: i64,
    /// Hosting deployment (tenant). Selects key material and TTL.
    pub container: String,
    /// Domain the token is scoped to.
    pub domain: String,
    /// URL of the request the token is bound to.
    pub active_url: Option<String>,
    /// Opaque extra claims, passed through unvalidated.
    pub trusted_json: Option<String>,
    pub is_anonymous: bool,
    issued_at: Option<DateTime<Utc>>,
}

impl ClaimSet {
    pub fn builder() -> ClaimSetBuilder {
        ClaimSetBuilder::default()
    }

    /// When the token was first encoded. `None` until then.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    /// Names of required fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("ownerId", &self.owner_id),
            ("viewerId", &self.viewer_id),
            ("appId", &self.app_id),
            ("container", &self.container),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub(crate) fn validate_for_encode(&self) -> Result<(), Error> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(invalid_token(
                InvalidTokenReason::MissingClaim,
                &format!("Missing required claims: {}", missing.join(", ")),
            ));
        }
        if let Some(active_url) = &self.active_url {
            validate_active_url(active_url)?;
        }
        Ok(())
    }

    pub(crate) fn to_payload(&self, issued_at: DateTime<Utc>) -> Payload {
        Payload {
            owner_id: self.owner_id.clone(),
            viewer_id: self.viewer_id.clone(),
            app_id: self.app_id.clone(),
            app_url: self.app_url.clone(),
            module_id: self.module_id,
            container: self.container.clone(),
            domain: self.domain.clone(),
            active_url: self.active_url.clone(),
            trusted_json: self.trusted_json.clone(),
            issued_at: issued_at.timestamp(),
            is_anonymous: self.is_anonymous,
        }
    }
}

/// Builder for [`ClaimSet`]. Required fields are checked at encode time.
#[derive(Debug, Default)]
pub struct ClaimSetBuilder {
    owner_id: String,
    viewer_id: String,
    app_id: String,
    app_url: String,
    module_id: i64,
    container: String,
    domain: String,
    active_url: Option<String>,
    trusted_json: Option<String>,
    is_anonymous: bool,
}

impl ClaimSetBuilder {
    pub fn owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }

    pub fn viewer_id(mut self, viewer_id: impl Into<String>) -> Self {
        self.viewer_id = viewer_id.into();
        self
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = app_url.into();
        self
    }

    pub fn module_id(mut self, module_id: i64) -> Self {
        self.module_id = module_id;
        self
    }

    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn active_url(mut self, active_url: impl Into<String>) -> Self {
        self.active_url = Some(active_url.into());
        self
    }

    pub fn trusted_json(mut self, trusted_json: impl Into<String>) -> Self {
        self.trusted_json = Some(trusted_json.into());
        self
    }

    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    pub fn build(self) -> ClaimSet {
        ClaimSet {
            owner_id: self.owner_id,
            viewer_id: self.viewer_id,
            app_id: self.app_id,
            app_url: self.app_url,
            module_id: self.module_id,
            container: self.container,
            domain: self.domain,
            active_url: self.active_url,
            trusted_json: self.trusted_json,
            is_anonymous: self.is_anonymous,
            issued_at: None,
        }
    }
}

/// Authenticated token payload. Short keys keep the wire token compact; field order is fixed
/// by the struct definition.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Payload {
    #[serde(rename = "o")]
    pub(crate) owner_id: String,
    #[serde(rename = "v")]
    pub(crate) viewer_id: String,
    #[serde(rename = "a")]
    pub(crate) app_id: String,
    #[serde(rename = "u")]
    pub(crate) app_url: String,
    #[serde(rename = "m")]
    pub(crate) module_id: i64,
    #[serde(rename = "c")]
    pub(crate) container: String,
    #[serde(rename = "d")]
    pub(crate) domain: String,
    #[serde(rename = "au", default, skip_serializing_if = "Option::is_none")]
    pub(crate) active_url: Option<String>,
    #[serde(rename = "tj", default, skip_serializing_if = "Option::is_none")]
    pub(crate) trusted_json: Option<String>,
    #[serde(rename = "t")]
    pub(crate) issued_at: i64,
    #[serde(rename = "an", default)]
    pub(crate) is_anonymous: bool,
}

impl Payload {
    pub(crate) fn issued_at(&self) -> Result<DateTime<Utc>, Error> {
        DateTime::from_timestamp(self.issued_at, 0).ok_or_else(|| {
            invalid_token(
                InvalidTokenReason::Malformed,
                "Issue time out of range",
            )
        })
    }

    pub(crate) fn into_claims(self) -> Result<ClaimSet, Error> {
        let issued_at = self.issued_at()?;
        Ok(ClaimSet {
            owner_id: self.owner_id,
            viewer_id: self.viewer_id,
            app_id: self.app_id,
            app_url: self.app_url,
            module_id: self.module_id,
            container: self.container,
            domain: self.domain,
            active_url: self.active_url,
            trusted_json: self.trusted_json,
            is_anonymous: self.is_anonymous,
            issued_at: Some(issued_at),
        })
    }
}

/// Checks that an active URL carries a protocol, a host and a port. Default ports for
/// well-known schemes count; path and query are optional.
pub fn validate_active_url(active_url: &str) -> Result<(), Error> {
    let url = Url::parse(active_url).map_err(|e| {
        invalid_token(
            InvalidTokenReason::InvalidActiveUrl,
            &format!("Active URL does not parse: {e}"),
        )
    })?;

    if !url.has_host() || url.host_str().is_some_and(str::is_empty) {
        return Err(invalid_token(
            InvalidTokenReason::InvalidActiveUrl,
            "Active URL has no host",
        ));
    }
    if url.port_or_known_default().is_none() {
        return Err(invalid_token(
            InvalidTokenReason::InvalidActiveUrl,
            "Active URL has no port",
        ));
    }
    Ok(())
}
