//! Actionable detailed messages for layer violations.
//!
//! Each violation carries a short single-line `message` plus one of
//! these multi-line messages with context and concrete next steps. The
//! short messages live with the engine; everything here is the long
//! form.

/// Detailed message for a package with no `layer` field.
pub fn missing_layer(package: &str, path: &str) -> String {
    format!(
        "Package \"{}\" has no \"layer\" field\n\n\
         Context:\n\
         \x20 - Package: {}\n\
         \x20 - Location: {}\n\
         \x20 - Every workspace package must declare the architectural layer it belongs to\n\n\
         Next Steps:\n\
         \x20 1. Open {} and add a layer field:  \"layer\": \"<layer-name>\"\n\
         \x20 2. Pick one of the layers defined in your stratify config\n\
         \x20 3. Re-run:  stratify",
        package, package, path, path
    )
}

/// Detailed message for a package declaring a layer the config does not
/// define. `valid_layers` is the comma-joined list in config order.
pub fn unknown_layer(package: &str, path: &str, layer: &str, valid_layers: &str) -> String {
    format!(
        "Package \"{}\" declares unknown layer \"{}\"\n\n\
         Context:\n\
         \x20 - Package: {}\n\
         \x20 - Location: {}\n\
         \x20 - Declared layer: {}\n\
         \x20 - Valid layers: {}\n\n\
         Next Steps:\n\
         \x20 1. Change the \"layer\" field in {} to one of the valid layers\n\
         \x20 2. Or define a \"{}\" layer in your stratify config\n\
         \x20 3. Re-run:  stratify",
        package, layer, package, path, layer, valid_layers, path, layer
    )
}

/// Detailed message for a package that is not on its layer's membership
/// allowlist. `source` names where the allowlist came from: the
/// configured allowlist file path, or the inline config field.
pub fn unauthorized_member(package: &str, path: &str, layer: &str, source: &str) -> String {
    format!(
        "Package \"{}\" is not an allowed member of layer \"{}\"\n\n\
         Context:\n\
         \x20 - Package: {}\n\
         \x20 - Location: {}\n\
         \x20 - Layer: {}\n\
         \x20 - Membership restricted by: {}\n\n\
         Next Steps:\n\
         \x20 1. Add \"{}\" to the allowed packages for layer \"{}\" ({})\n\
         \x20 2. Or move the package to a layer it is allowed to claim\n\
         \x20 3. Dependency rules for this package were not checked; fix membership first",
        package, layer, package, path, layer, source, package, layer, source
    )
}

/// Detailed message for a dependency edge that crosses layers in a
/// direction the config forbids.
pub fn invalid_dependency(
    package: &str,
    path: &str,
    from_layer: &str,
    to_package: &str,
    to_layer: &str,
    allowed_layers: &[String],
) -> String {
    let allowed = if allowed_layers.is_empty() {
        "(none)".to_string()
    } else {
        allowed_layers.join(", ")
    };
    format!(
        "Layer violation: \"{}\" ({}) cannot depend on \"{}\" ({})\n\n\
         Context:\n\
         \x20 - Package: {}\n\
         \x20 - Location: {}\n\
         \x20 - Dependency: {} (layer: {})\n\
         \x20 - Layer \"{}\" may depend on: {}\n\n\
         Next Steps:\n\
         \x20 1. Remove the dependency on \"{}\" from {}\n\
         \x20 2. Or allow \"{}\" in the \"{}\" layer's allowedDependencies\n\
         \x20 3. Or move \"{}\" to a layer that \"{}\" may depend on",
        package,
        from_layer,
        to_package,
        to_layer,
        package,
        path,
        to_package,
        to_layer,
        from_layer,
        allowed,
        to_package,
        path,
        to_layer,
        from_layer,
        to_package,
        from_layer
    )
}
