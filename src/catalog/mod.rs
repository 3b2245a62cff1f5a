//! The validated, deployment-wide registry of error descriptors.
//!
//! An [`ErrorCatalog`] is assembled once at startup from a *common* descriptor
//! set (shared across an organization, exempt from range checks) and a
//! *deployment* set (this service's own errors). Construction validates every
//! invariant eagerly and reports all violations at once; a catalog that exists
//! is a catalog that is valid. After construction it is immutable and can be
//! shared across threads behind an `Arc` without locking.
//!
//! # Invariants
//!
//! Checked in this order, every violation collected:
//!
//! 1. Descriptor names are unique across common + deployment descriptors.
//! 2. Every deployment descriptor that is not a wrapper of a common descriptor
//!    has a numeric code inside the declared [`CodeRange`].
//! 3. If any such non-wrapper deployment descriptor exists, a code range is
//!    declared at all.
//! 4. Every [`Role`] is bound exactly once, to a descriptor present in the
//!    catalog.
//!
//! # Example
//!
//! ```rust
//! use error_contract::{CodeRange, Descriptor, ErrorCatalog, Role};
//!
//! let order_missing = Descriptor::new("ORDER_NOT_FOUND", "99001", "Order not found", 404);
//! let catalog = ErrorCatalog::with_core(vec![order_missing], CodeRange::between(99000, 99999))
//!     .expect("valid catalog");
//!
//! assert_eq!(catalog.role(Role::NotFound).code(), "404");
//! assert!(catalog.lookup_by_name("ORDER_NOT_FOUND").is_some());
//! ```

pub mod core_errors;
pub mod range;
pub mod roles;

pub use core_errors::{core_descriptor, core_descriptors, core_role_bindings};
pub use range::{status, CodeRange, StatusPriority};
pub use roles::Role;

use crate::config::EngineConfig;
use crate::core_types::descriptor::Descriptor;
use crate::error::{EngineError, EngineResult};
use crate::logging::log_debug;
use std::collections::BTreeMap;

/// Validated registry of descriptors and role bindings for one deployment.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    common: Vec<Descriptor>,
    deployment: Vec<Descriptor>,
    by_name: BTreeMap<String, Descriptor>,
    code_range: Option<CodeRange>,
    /// Indexed by `Role as usize`; complete once validation passes.
    roles: Vec<Descriptor>,
    status_priority: StatusPriority,
}

impl ErrorCatalog {
    /// Validate and assemble a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CatalogConfiguration`] listing every violated
    /// invariant (see the module docs).
    pub fn build(
        common: Vec<Descriptor>,
        deployment: Vec<Descriptor>,
        code_range: Option<CodeRange>,
        role_bindings: Vec<(Role, Descriptor)>,
        status_priority: StatusPriority,
    ) -> EngineResult<Self> {
        let mut violations = Vec::new();
        check_unique_names(&common, &deployment, &mut violations);
        check_code_range(&common, &deployment, code_range.as_ref(), &mut violations);
        let roles = resolve_roles(&common, &deployment, &role_bindings, &mut violations);

        if !violations.is_empty() {
            return Err(EngineError::catalog_configuration(violations));
        }

        let by_name = common
            .iter()
            .chain(deployment.iter())
            .map(|descriptor| (descriptor.name().to_string(), descriptor.clone()))
            .collect();

        log_debug!(
            common_descriptors = common.len(),
            deployment_descriptors = deployment.len(),
            code_range = ?code_range,
            status_priority = ?status_priority.as_slice(),
            "Error catalog built and validated"
        );

        Ok(Self {
            common,
            deployment,
            by_name,
            code_range,
            roles,
            status_priority,
        })
    }

    /// Catalog on top of the built-in [`core_descriptors`], with every role
    /// bound to its core descriptor and the default status priority.
    pub fn with_core(deployment: Vec<Descriptor>, code_range: CodeRange) -> EngineResult<Self> {
        Self::build(
            core_descriptors(),
            deployment,
            Some(code_range),
            core_role_bindings(),
            StatusPriority::default(),
        )
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The descriptor bound to `role`.
    pub fn role(&self, role: Role) -> &Descriptor {
        &self.roles[role as usize]
    }

    /// Exact-name lookup across common and deployment descriptors.
    pub fn lookup_by_name(&self, name: &str) -> Option<&Descriptor> {
        self.by_name.get(name)
    }

    /// Exact-name lookup, returning `default` on a miss.
    pub fn lookup_by_name_or<'a>(&'a self, name: &str, default: &'a Descriptor) -> &'a Descriptor {
        self.lookup_by_name(name).unwrap_or(default)
    }

    /// Every descriptor, common first, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.common.iter().chain(self.deployment.iter())
    }

    pub fn common_descriptors(&self) -> &[Descriptor] {
        &self.common
    }

    pub fn deployment_descriptors(&self) -> &[Descriptor] {
        &self.deployment
    }

    pub fn code_range(&self) -> Option<&CodeRange> {
        self.code_range.as_ref()
    }

    pub fn status_priority(&self) -> &StatusPriority {
        &self.status_priority
    }

    /// True when `descriptor` presents a common descriptor's code, message
    /// and status under a different name or metadata.
    pub fn is_wrapper(&self, descriptor: &Descriptor) -> bool {
        is_wrapper_of_common(descriptor, &self.common)
    }

    /// The single status to respond with for a set of descriptors.
    ///
    /// If every descriptor shares one status it is returned directly, without
    /// consulting the priority order. Otherwise the first status of the
    /// priority order present in the set wins. `None` means the set is empty
    /// or none of its statuses appear in the priority order.
    pub fn highest_priority_status(&self, descriptors: &[Descriptor]) -> Option<u16> {
        let first = descriptors.first()?.http_status();
        if descriptors.iter().all(|d| d.http_status() == first) {
            return Some(first);
        }
        self.status_priority
            .first_matching(|status| descriptors.iter().any(|d| d.http_status() == status))
    }

    /// Descriptors with the given status, in input order.
    pub fn filter_by_status(&self, descriptors: &[Descriptor], status: u16) -> Vec<Descriptor> {
        descriptors
            .iter()
            .filter(|d| d.http_status() == status)
            .cloned()
            .collect()
    }
}

// ============================================================================
// Validation
// ============================================================================

fn is_wrapper_of_common(descriptor: &Descriptor, common: &[Descriptor]) -> bool {
    common.iter().any(|base| descriptor.wraps(base))
}

fn check_unique_names(
    common: &[Descriptor],
    deployment: &[Descriptor],
    violations: &mut Vec<String>,
) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for descriptor in common.iter().chain(deployment.iter()) {
        *counts.entry(descriptor.name()).or_insert(0) += 1;
    }
    for (name, count) in counts {
        if count > 1 {
            violations.push(format!(
                "descriptor name '{name}' is defined {count} times; names must be unique"
            ));
        }
    }
}

fn check_code_range(
    common: &[Descriptor],
    deployment: &[Descriptor],
    code_range: Option<&CodeRange>,
    violations: &mut Vec<String>,
) {
    let non_wrappers: Vec<&Descriptor> = deployment
        .iter()
        .filter(|descriptor| !is_wrapper_of_common(descriptor, common))
        .collect();

    match code_range {
        Some(range) => {
            for descriptor in non_wrappers {
                if !range.contains(descriptor.code()) {
                    violations.push(format!(
                        "deployment descriptor '{}' has code '{}' outside the declared code range {}",
                        descriptor.name(),
                        descriptor.code(),
                        range
                    ));
                }
            }
        }
        None if !non_wrappers.is_empty() => {
            let names: Vec<&str> = non_wrappers.iter().map(|d| d.name()).collect();
            violations.push(format!(
                "no code range is declared but {} deployment descriptor(s) are not wrappers of common descriptors: {}",
                names.len(),
                names.join(", ")
            ));
        }
        None => {}
    }
}

fn resolve_roles(
    common: &[Descriptor],
    deployment: &[Descriptor],
    bindings: &[(Role, Descriptor)],
    violations: &mut Vec<String>,
) -> Vec<Descriptor> {
    let mut resolved = Vec::with_capacity(Role::ALL.len());
    for role in Role::ALL {
        let bound: Vec<&Descriptor> = bindings
            .iter()
            .filter(|(bound_role, _)| *bound_role == role)
            .map(|(_, descriptor)| descriptor)
            .collect();

        match bound.as_slice() {
            [] => violations.push(format!("role '{role}' is not bound to any descriptor")),
            [descriptor] => {
                let present = common
                    .iter()
                    .chain(deployment.iter())
                    .any(|candidate| candidate == *descriptor);
                if present {
                    resolved.push((*descriptor).clone());
                } else {
                    violations.push(format!(
                        "role '{role}' is bound to descriptor '{}' which is not part of the catalog",
                        descriptor.name()
                    ));
                }
            }
            _ => violations.push(format!(
                "role '{role}' is bound {} times; each role takes exactly one descriptor",
                bound.len()
            )),
        }
    }
    resolved
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent construction of an [`ErrorCatalog`].
///
/// ```rust
/// use error_contract::{CodeRange, Descriptor, ErrorCatalog, Role};
///
/// let teapot = Descriptor::new("TEAPOT", "7001", "I'm a teapot", 418);
/// let catalog = ErrorCatalog::builder()
///     .core_common()
///     .deployment(vec![teapot.clone()])
///     .code_range(CodeRange::between(7000, 7999))
///     .build()
///     .expect("valid catalog");
///
/// assert_eq!(catalog.lookup_by_name("TEAPOT"), Some(&teapot));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    common: Vec<Descriptor>,
    deployment: Vec<Descriptor>,
    code_range: Option<CodeRange>,
    bindings: BTreeMap<Role, Descriptor>,
    status_priority: StatusPriority,
}

impl CatalogBuilder {
    /// Builder carrying the status priority order from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::default().status_priority(config.status_priority.clone())
    }

    /// Use the built-in core descriptors as the common set, binding every role.
    pub fn core_common(mut self) -> Self {
        self.common.extend(core_descriptors());
        self.bindings.extend(core_role_bindings());
        self
    }

    pub fn common(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.common.extend(descriptors);
        self
    }

    pub fn deployment(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.deployment.extend(descriptors);
        self
    }

    pub fn code_range(mut self, code_range: CodeRange) -> Self {
        self.code_range = Some(code_range);
        self
    }

    /// Bind (or rebind) a role.
    pub fn bind(mut self, role: Role, descriptor: Descriptor) -> Self {
        self.bindings.insert(role, descriptor);
        self
    }

    pub fn bind_all(mut self, bindings: impl IntoIterator<Item = (Role, Descriptor)>) -> Self {
        self.bindings.extend(bindings);
        self
    }

    pub fn status_priority(mut self, status_priority: StatusPriority) -> Self {
        self.status_priority = status_priority;
        self
    }

    pub fn build(self) -> EngineResult<ErrorCatalog> {
        ErrorCatalog::build(
            self.common,
            self.deployment,
            self.code_range,
            self.bindings.into_iter().collect(),
            self.status_priority,
        )
    }
}
