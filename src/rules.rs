//! Rule predicates for layer validation.
//!
//! Four total, stateless functions. The validation engine composes
//! these in a fixed precedence order; none of them has an error path.

use std::collections::HashSet;

use crate::config::LayerMap;
use crate::package::Package;

/// Reserved token in `allowedDependencies` that permits any target layer.
pub const WILDCARD: &str = "*";

/// Whether a package declares a layer. An absent or empty `layer` field
/// both count as unassigned.
pub fn has_required_layer(pkg: &Package) -> bool {
    matches!(pkg.layer.as_deref(), Some(layer) if !layer.is_empty())
}

/// Whether a layer name is defined in the config.
pub fn is_known_layer(layer_name: &str, layers: &LayerMap) -> bool {
    layers.contains_key(layer_name)
}

/// Whether a dependency from one layer to another is permitted. The
/// wildcard `*` permits any target layer; otherwise the target must
/// appear in `allowed_dependencies` by exact, case-sensitive match.
pub fn is_dependency_allowed(
    _from_layer: &str,
    to_layer: &str,
    allowed_dependencies: &[String],
) -> bool {
    allowed_dependencies
        .iter()
        .any(|allowed| allowed == WILDCARD || allowed == to_layer)
}

/// Whether a package may be a member of its declared layer. `None`
/// means the layer is unrestricted; an explicitly empty set admits no
/// package at all.
pub fn is_package_allowed_in_layer(
    package_name: &str,
    allowed_packages: Option<&HashSet<String>>,
) -> bool {
    match allowed_packages {
        None => true,
        Some(allowed) => allowed.contains(package_name),
    }
}
