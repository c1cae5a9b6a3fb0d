//! The naming convention: one process-wide, immutable source of truth for
//! region codes, per-resource prefixes and constraints, component role
//! tokens, and the tokens the validator expects in existing group names.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::NameViolation;
use crate::region::RegionCodeTable;

static GLOBAL: LazyLock<NamingConvention> = LazyLock::new(NamingConvention::standard);

/// A logical component of the deployment. Each component owns one
/// resource group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Frontend,
    Backend,
    /// The shared AI platform (AI services account + project).
    Platform,
    /// The shared log analytics workspace.
    Logging,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Frontend,
        ComponentKind::Backend,
        ComponentKind::Platform,
        ComponentKind::Logging,
    ];

    /// Token placed between the application name and environment.
    pub fn role_token(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Platform => "aifoundry",
            Self::Logging => "logging",
        }
    }

    /// Resources owned by the component, excluding its resource group.
    /// The first entry is the component's primary resource.
    pub fn resources(self) -> &'static [ResourceKind] {
        match self {
            Self::Frontend => &[ResourceKind::StaticWebApp],
            Self::Backend => &[
                ResourceKind::FunctionApp,
                ResourceKind::AppServicePlan,
                ResourceKind::StorageAccount,
                ResourceKind::ManagedIdentity,
                ResourceKind::ApplicationInsights,
            ],
            Self::Platform => &[ResourceKind::AiServices, ResourceKind::AiProject],
            Self::Logging => &[ResourceKind::LogAnalyticsWorkspace],
        }
    }

    pub fn primary_resource(self) -> ResourceKind {
        self.resources()[0]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Platform => "platform",
            Self::Logging => "logging",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete resource types that receive a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ResourceGroup,
    StaticWebApp,
    FunctionApp,
    AppServicePlan,
    StorageAccount,
    ManagedIdentity,
    ApplicationInsights,
    AiServices,
    AiProject,
    LogAnalyticsWorkspace,
}

impl ResourceKind {
    pub fn rule(self) -> NameRule {
        use NameStyle::{Compact, Hyphenated};
        let (prefix, style, max_len) = match self {
            Self::ResourceGroup => ("rg", Hyphenated, 90),
            Self::StaticWebApp => ("stapp", Hyphenated, 40),
            Self::FunctionApp => ("func", Hyphenated, 60),
            Self::AppServicePlan => ("asp", Hyphenated, 60),
            Self::StorageAccount => ("st", Compact, 24),
            Self::ManagedIdentity => ("id", Hyphenated, 128),
            Self::ApplicationInsights => ("appi", Hyphenated, 260),
            Self::AiServices => ("aif", Hyphenated, 64),
            Self::AiProject => ("proj", Hyphenated, 64),
            Self::LogAnalyticsWorkspace => ("log", Hyphenated, 63),
        };
        NameRule {
            prefix,
            style,
            max_len,
        }
    }

    /// ARM resource type, e.g. `Microsoft.Web/sites`.
    pub fn arm_type(self) -> &'static str {
        match self {
            Self::ResourceGroup => "Microsoft.Resources/resourceGroups",
            Self::StaticWebApp => "Microsoft.Web/staticSites",
            Self::FunctionApp => "Microsoft.Web/sites",
            Self::AppServicePlan => "Microsoft.Web/serverfarms",
            Self::StorageAccount => "Microsoft.Storage/storageAccounts",
            Self::ManagedIdentity => "Microsoft.ManagedIdentity/userAssignedIdentities",
            Self::ApplicationInsights => "Microsoft.Insights/components",
            Self::AiServices => "Microsoft.CognitiveServices/accounts",
            Self::AiProject => "Microsoft.CognitiveServices/accounts/projects",
            Self::LogAnalyticsWorkspace => "Microsoft.OperationalInsights/workspaces",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ResourceGroup => "resource group",
            Self::StaticWebApp => "static web app",
            Self::FunctionApp => "function app",
            Self::AppServicePlan => "app service plan",
            Self::StorageAccount => "storage account",
            Self::ManagedIdentity => "managed identity",
            Self::ApplicationInsights => "application insights",
            Self::AiServices => "AI services account",
            Self::AiProject => "AI project",
            Self::LogAnalyticsWorkspace => "log analytics workspace",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    /// `{prefix}-{app}-{role}-{env}-{region}`: lowercase letters, digits, hyphens.
    Hyphenated,
    /// Separators stripped: lowercase letters and digits only.
    Compact,
}

/// Charset and length constraints for one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NameRule {
    pub prefix: &'static str,
    pub style: NameStyle,
    pub max_len: usize,
}

impl NameRule {
    pub fn check(&self, name: &str) -> Result<(), NameViolation> {
        let allowed = |c: char| match self.style {
            NameStyle::Hyphenated => c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-',
            NameStyle::Compact => c.is_ascii_lowercase() || c.is_ascii_digit(),
        };
        if let Some(character) = name.chars().find(|c| !allowed(*c)) {
            return Err(NameViolation::InvalidCharset { character });
        }

        let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_lowercase());
        if !starts_with_letter || name.ends_with('-') || name.contains("--") {
            return Err(NameViolation::MalformedSeparator);
        }

        let len = name.chars().count();
        if len > self.max_len {
            return Err(NameViolation::TooLong {
                len,
                max: self.max_len,
            });
        }
        Ok(())
    }
}

/// Naming state shared by the resolver and the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    pub regions: RegionCodeTable,
}

impl NamingConvention {
    /// The process-wide convention, built on first use.
    pub fn global() -> &'static NamingConvention {
        &GLOBAL
    }

    pub fn standard() -> Self {
        Self {
            regions: RegionCodeTable::azure(),
        }
    }

    pub fn with_regions(regions: RegionCodeTable) -> Self {
        Self { regions }
    }

    pub fn rule(&self, kind: ResourceKind) -> NameRule {
        kind.rule()
    }

    pub fn role_token(&self, component: ComponentKind) -> &'static str {
        component.role_token()
    }

    /// Prefix every convention-conforming resource group starts with.
    pub fn group_prefix(&self) -> String {
        format!("{}-", ResourceKind::ResourceGroup.rule().prefix)
    }

    /// Tokens an existing group for `component` is expected to contain.
    pub fn expected_tokens(&self, component: ComponentKind) -> &'static [&'static str] {
        match component {
            ComponentKind::Frontend => &["frontend", "web"],
            ComponentKind::Backend => &["backend", "api"],
            ComponentKind::Platform => &["aifoundry", "foundry", "ai"],
            ComponentKind::Logging => &["logging", "log"],
        }
    }
}
