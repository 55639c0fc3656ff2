//! Resource URNs and the set of resource kinds this provider manages.

use std::fmt;

use crate::error::{ProviderError, Result};

const URN_PREFIX: &str = "urn:pulumi:";

/// A resource URN as sent by the engine:
/// `urn:pulumi:{stack}::{project}::{qualified type}::{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urn {
    raw: String,
    stack: String,
    project: String,
    qualified_type: String,
    name: String,
}

impl Urn {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let Some(rest) = raw.strip_prefix(URN_PREFIX) else {
            return Err(ProviderError::invalid_urn(raw));
        };

        let mut parts = rest.splitn(4, "::");
        let (Some(stack), Some(project), Some(qualified_type), Some(name)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ProviderError::invalid_urn(raw));
        };
        if qualified_type.is_empty() {
            return Err(ProviderError::invalid_urn(raw));
        }

        Ok(Self {
            stack: stack.to_string(),
            project: project.to_string(),
            qualified_type: qualified_type.to_string(),
            name: name.to_string(),
            raw,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource's own type token, without any parent type prefix.
    pub fn resource_type(&self) -> &str {
        self.qualified_type
            .rsplit('$')
            .next()
            .unwrap_or(&self.qualified_type)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Resource kinds this provider knows how to reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An existing directory application configured for web sign-in
    PrepareAppForWebSignIn,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 1] = [ResourceKind::PrepareAppForWebSignIn];

    pub fn type_token(&self) -> &'static str {
        match self {
            Self::PrepareAppForWebSignIn => "knapcode:index:PrepareAppForWebSignIn",
        }
    }

    pub fn from_type_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_token() == token)
    }

    /// Resolve the kind addressed by `urn`, naming `verb` in the error when
    /// the type is not one of ours.
    pub fn resolve(verb: &str, urn: &Urn) -> Result<Self> {
        let token = urn.resource_type();
        Self::from_type_token(token)
            .ok_or_else(|| ProviderError::unknown_resource_type(verb, token))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_token())
    }
}
